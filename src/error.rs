use crate::dispatch::Visibility;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// `reset` was called on a proxy that holds no factory.
    #[error("proxy was not provided with a factory")]
    InvalidOperation,

    /// The resolved value has no operation by that name, or has one that the
    /// chosen entry point is not allowed to reach.
    #[error("{} `{method}' for {receiver}", missing_kind(.visibility))]
    OperationNotFound {
        method: String,
        receiver: String,
        /// Visibility of the operation when it exists but was not reachable.
        visibility: Option<Visibility>,
    },

    /// The factory failed while resolving. The proxy stays unresolved.
    #[error(transparent)]
    Factory(anyhow::Error),

    /// A forwarded operation failed on the resolved value.
    #[error(transparent)]
    Target(anyhow::Error),
}

impl Error {
    pub(crate) fn undefined<T: ?Sized>(method: &str, visibility: Option<Visibility>) -> Self {
        Self::OperationNotFound {
            method: method.into(),
            receiver: std::any::type_name::<T>().into(),
            visibility,
        }
    }

    pub(crate) fn nil_receiver(method: &str) -> Self {
        Self::OperationNotFound {
            method: method.into(),
            receiver: "nil".into(),
            visibility: None,
        }
    }

    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation)
    }

    pub fn is_operation_not_found(&self) -> bool {
        matches!(self, Self::OperationNotFound { .. })
    }
}

fn missing_kind(visibility: &Option<Visibility>) -> &'static str {
    match visibility {
        Some(Visibility::Private) => "private method",
        Some(Visibility::Public) | None => "undefined method",
    }
}
