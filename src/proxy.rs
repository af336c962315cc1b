use crate::error::{Error, Result};
use crate::factory::Factory;
use log::{debug, trace};
use parking_lot::{Mutex, RwLock};
use std::fmt::Debug;
use std::sync::Arc;

struct State<T> {
    value: Option<Arc<T>>,
    factory: Option<Factory<T>>,
    resolved: bool,
    generation: u64,
}

impl<T> State<T> {
    /// A direct value always wins over a factory; the losing factory is
    /// dropped along with the previous pair.
    fn assigned(value: Option<T>, factory: Option<Factory<T>>, generation: u64) -> Self {
        match (value, factory) {
            (Some(value), _) => Self {
                value: Some(Arc::new(value)),
                factory: None,
                resolved: true,
                generation,
            },
            (None, Some(factory)) => Self {
                value: None,
                factory: Some(factory),
                resolved: false,
                generation: generation + 1,
            },
            (None, None) => Self {
                value: None,
                factory: None,
                resolved: true,
                generation,
            },
        }
    }
}

/// A transparent lazy-initialization proxy.
///
/// Holds either a value or a [`Factory`]. The factory runs at most once per
/// unresolved generation, on the first [`LazyProxy::getobj`]; its result is
/// cached until the next [`LazyProxy::setobj`] or [`LazyProxy::reset`].
///
/// `state` is only ever held for short, non-blocking sections. `lock`
/// serializes every mutation and the factory invocation itself; it is never
/// held while a forwarded operation runs on the resolved value.
pub struct LazyProxy<T> {
    state: RwLock<State<T>>,
    lock: Mutex<()>,
}

impl<T> LazyProxy<T> {
    pub fn new(value: Option<T>, factory: Option<Factory<T>>) -> Self {
        Self {
            state: RwLock::new(State::assigned(value, factory, 0)),
            lock: Mutex::new(()),
        }
    }

    pub fn from_value(value: T) -> Self {
        Self::new(Some(value), None)
    }

    pub fn from_factory<F>(init: F) -> Self
    where
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self::new(None, Some(Factory::new(init)))
    }

    pub fn from_fn<F>(init: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(None, Some(Factory::infallible(init)))
    }

    /// A proxy resolved to no value.
    pub fn empty() -> Self {
        Self::new(None, None)
    }

    /// Replaces the held value or factory, with the same priority rule as
    /// [`LazyProxy::new`]. The previous value is released before returning.
    pub fn setobj(&self, value: Option<T>, factory: Option<Factory<T>>) {
        let previous = {
            let _guard = self.lock.lock();
            let mut state = self.state.write();
            let next = State::assigned(value, factory, state.generation);
            trace!(
                "replacing proxied value (resolved: {}, generation: {})",
                next.resolved, next.generation
            );
            std::mem::replace(&mut *state, next)
        };
        drop(previous);
    }

    pub fn set_value(&self, value: T) {
        self.setobj(Some(value), None);
    }

    pub fn set_factory(&self, factory: Factory<T>) {
        self.setobj(None, Some(factory));
    }

    pub fn clear(&self) {
        self.setobj(None, None);
    }

    /// Returns the current value, running the factory if the proxy is
    /// unresolved. `None` means the proxy resolved to no value.
    ///
    /// A failing factory leaves the proxy unresolved, so the next call runs
    /// it again. Calling back into the same proxy from its own factory
    /// deadlocks.
    pub fn getobj(&self) -> Result<Option<Arc<T>>> {
        if let Some(value) = self.resolved_value() {
            return Ok(value);
        }
        let _guard = self.lock.lock();
        let factory = {
            let state = self.state.read();
            match &state.factory {
                Some(factory) if !state.resolved => factory.clone(),
                _ => return Ok(state.value.clone()),
            }
        };
        let value = Arc::new(factory.call().map_err(Error::Factory)?);
        let mut state = self.state.write();
        state.value = Some(value.clone());
        state.resolved = true;
        debug!(
            "resolved {} (generation {})",
            factory.label(),
            state.generation
        );
        Ok(Some(value))
    }

    /// Like [`LazyProxy::getobj`], but a proxy without a value is an error.
    pub fn get(&self) -> Result<Arc<T>> {
        self.target("get")
    }

    /// Resolves the receiver of `method`, which fails on an absent value.
    pub(crate) fn target(&self, method: &str) -> Result<Arc<T>> {
        self.getobj()?.ok_or_else(|| Error::nil_receiver(method))
    }

    /// Drops the cached result so that the next access runs the factory
    /// again. Fails when the proxy holds no factory.
    pub fn reset(&self) -> Result<()> {
        let previous = {
            let _guard = self.lock.lock();
            let mut state = self.state.write();
            if state.factory.is_none() {
                return Err(Error::InvalidOperation);
            }
            state.resolved = false;
            state.generation += 1;
            trace!("reset proxy (generation: {})", state.generation);
            state.value.take()
        };
        drop(previous);
        Ok(())
    }

    pub fn is_resolved(&self) -> bool {
        self.state.read().resolved
    }

    /// Number of transitions into the unresolved state so far.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// A new, independent proxy holding the same value handle or factory.
    /// The value itself is shared, not cloned.
    pub fn dup(&self) -> Self {
        let state = self.state.read();
        trace!("duplicating proxy (resolved: {})", state.resolved);
        Self {
            state: RwLock::new(State {
                value: state.value.clone(),
                factory: state.factory.clone(),
                resolved: state.resolved,
                generation: state.generation,
            }),
            lock: Mutex::new(()),
        }
    }

    pub fn inspect(&self) -> String
    where
        T: Debug,
    {
        format!("{self:?}")
    }

    fn resolved_value(&self) -> Option<Option<Arc<T>>> {
        let state = self.state.read();
        state.resolved.then(|| state.value.clone())
    }
}

impl<T> Default for LazyProxy<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<T> for LazyProxy<T> {
    fn from(value: T) -> Self {
        Self::from_value(value)
    }
}

impl<T> Clone for LazyProxy<T> {
    fn clone(&self) -> Self {
        self.dup()
    }
}

impl<T: Debug> Debug for LazyProxy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (value, unresolved) = {
            let state = self.state.read();
            match &state.factory {
                Some(factory) if !state.resolved => (None, Some(factory.clone())),
                _ => (state.value.clone(), None),
            }
        };
        match (unresolved, value) {
            (Some(factory), _) => write!(f, "#<LazyProxy: {factory:?} (unresolved)>"),
            (None, Some(value)) => write!(f, "#<LazyProxy: {value:?}>"),
            (None, None) => write!(f, "#<LazyProxy: nil>"),
        }
    }
}
