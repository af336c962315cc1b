use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

/// A zero-argument deferred initializer.
///
/// Clones share the same underlying closure, so a duplicated proxy invokes the
/// very factory its source was built with.
pub struct Factory<T> {
    init: Arc<dyn Fn() -> anyhow::Result<T> + Send + Sync>,
    label: Cow<'static, str>,
}

impl<T> Factory<T> {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            init: Arc::new(init),
            label: Cow::Borrowed(std::any::type_name::<F>()),
        }
    }

    pub fn infallible<F>(init: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            init: Arc::new(move || Ok(init())),
            label: Cow::Borrowed(std::any::type_name::<F>()),
        }
    }

    /// Replaces the label shown by `Debug`, which defaults to the closure's
    /// type name.
    pub fn named(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn call(&self) -> anyhow::Result<T> {
        (self.init)()
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            init: self.init.clone(),
            label: self.label.clone(),
        }
    }
}

impl<T> Debug for Factory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<Factory: {}>", self.label)
    }
}
