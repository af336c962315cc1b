pub mod config;
pub mod dispatch;
pub mod error;
pub mod factory;
pub mod forward;
pub mod operators;
pub mod proxy;
pub mod stress;

pub use dispatch::{FullInterface, PublicInterface, Visibility};
pub use error::{Error, Result};
pub use factory::Factory;
pub use forward::Enumerator;
pub use operators::{CaseEq, Nullable, PatternMatch};
pub use proxy::LazyProxy;
