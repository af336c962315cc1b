//! Forwarding of operations from a [`LazyProxy`] to its resolved value.
//!
//! Every entry point resolves the proxy first, releases all proxy locks and
//! only then runs the operation on the value, so forwarded operations may
//! freely call back into the proxy.
//!
//! Statically typed callers forward through [`LazyProxy::get`], which hands
//! out an `Arc<T>` whose `Deref` exposes exactly the target's public API.
//! Callers that only know an operation by name go through [`LazyProxy::call`],
//! [`LazyProxy::public_send`] or [`LazyProxy::send`].

use crate::dispatch::{FullInterface, PublicInterface, Visibility, visibility_of};
use crate::error::{Error, Result};
use crate::operators::{CaseEq, Nullable, PatternMatch};
use crate::proxy::LazyProxy;
use std::fmt::{Debug, Display};
use std::ops::Not;
use std::sync::Arc;

impl<T: PublicInterface> LazyProxy<T> {
    /// Ordinary forwarding: reaches public operations only.
    pub fn call(&self, method: &str, args: Vec<T::Value>) -> Result<T::Value> {
        self.public_send(method, args)
    }

    /// Forwards `method` by name, rejecting operations outside the target's
    /// public capability set.
    pub fn public_send(&self, method: &str, args: Vec<T::Value>) -> Result<T::Value> {
        let target = self.target(method)?;
        if !target.respond_to_public(method) {
            return Err(Error::undefined::<T>(method, None));
        }
        target.invoke_public(method, args).map_err(Error::Target)
    }
}

impl<T: FullInterface> LazyProxy<T> {
    /// Forwards `method` by name regardless of its visibility.
    pub fn send(&self, method: &str, args: Vec<T::Value>) -> Result<T::Value> {
        let target = self.target(method)?;
        let result = match visibility_of(&*target, method) {
            Some(Visibility::Public) => target.invoke_public(method, args),
            Some(Visibility::Private) => target.invoke_private(method, args),
            None => return Err(Error::undefined::<T>(method, None)),
        };
        result.map_err(Error::Target)
    }

    /// Whether the resolved value answers to `method`. Private operations
    /// count only when `include_private` is set.
    pub fn respond_to(&self, method: &str, include_private: bool) -> Result<bool> {
        let Some(target) = self.getobj()? else {
            return Ok(false);
        };
        Ok(match visibility_of(&*target, method) {
            Some(Visibility::Public) => true,
            Some(Visibility::Private) => include_private,
            None => false,
        })
    }

    /// Like [`LazyProxy::public_send`], but reports a hidden private
    /// operation as such.
    pub fn public_send_strict(&self, method: &str, args: Vec<T::Value>) -> Result<T::Value> {
        let target = self.target(method)?;
        match visibility_of(&*target, method) {
            Some(Visibility::Public) => target.invoke_public(method, args).map_err(Error::Target),
            visibility => Err(Error::undefined::<T>(method, visibility)),
        }
    }
}

impl<T> LazyProxy<T> {
    /// Logical negation as defined by the resolved value. An absent value
    /// negates to `true`.
    pub fn negate(&self) -> Result<bool>
    where
        for<'a> &'a T: Not<Output = bool>,
    {
        Ok(match self.getobj()? {
            Some(target) => !&*target,
            None => true,
        })
    }

    pub fn equals(&self, other: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        Ok(self.getobj()?.is_some_and(|target| *target == *other))
    }

    pub fn not_equals(&self, other: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        Ok(self.getobj()?.is_none_or(|target| *target != *other))
    }

    /// Case membership of `other` in the resolved value.
    pub fn case_eq<U: ?Sized>(&self, other: &U) -> Result<bool>
    where
        T: CaseEq<U>,
    {
        Ok(self.getobj()?.is_some_and(|target| target.case_eq(other)))
    }

    /// Matches the resolved value against `pattern`, returning the character
    /// offset of the first match.
    pub fn pattern_match<P: ?Sized>(&self, pattern: &P) -> Result<Option<usize>>
    where
        T: PatternMatch<P>,
    {
        Ok(self
            .getobj()?
            .and_then(|target| target.pattern_match(pattern)))
    }

    pub fn is_nil(&self) -> Result<bool>
    where
        T: Nullable,
    {
        Ok(self.getobj()?.is_none_or(|target| target.is_nil()))
    }

    /// String conversion through the resolved value's `Display`. An absent
    /// value converts to the empty string.
    pub fn to_text(&self) -> Result<String>
    where
        T: Display,
    {
        Ok(self
            .getobj()?
            .map(|target| target.to_string())
            .unwrap_or_default())
    }

    /// An enumerator over the resolved value's own iteration.
    pub fn to_enum(&self) -> Result<Enumerator<T, fn(Arc<T>) -> T::IntoIter>>
    where
        T: Clone + IntoIterator,
    {
        let each: fn(Arc<T>) -> T::IntoIter = |target| T::clone(&target).into_iter();
        self.enum_for("each", each)
    }

    /// An enumerator driven by `each`, which receives a handle to the
    /// resolved value every time iteration starts.
    pub fn enum_for<I, F>(&self, method: &str, each: F) -> Result<Enumerator<T, F>>
    where
        F: Fn(Arc<T>) -> I,
        I: Iterator,
    {
        Ok(Enumerator {
            target: self.target(method)?,
            each,
        })
    }
}

/// A restartable lazy sequence bound to a resolved value.
///
/// Each iteration runs the target's own sequence from the start; finite and
/// infinite sequences behave exactly as they do on the target.
pub struct Enumerator<T, F> {
    target: Arc<T>,
    each: F,
}

impl<T, I, F> Enumerator<T, F>
where
    F: Fn(Arc<T>) -> I,
    I: Iterator,
{
    pub fn iter(&self) -> I {
        (self.each)(self.target.clone())
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }
}

impl<T, I, F> IntoIterator for Enumerator<T, F>
where
    F: Fn(Arc<T>) -> I,
    I: Iterator,
{
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> Self::IntoIter {
        (self.each)(self.target)
    }
}

impl<T, I, F> IntoIterator for &Enumerator<T, F>
where
    F: Fn(Arc<T>) -> I,
    I: Iterator,
{
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Debug, F> Debug for Enumerator<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<Enumerator: {:?}>", self.target)
    }
}
