//! Visibility-scoped views of a proxied value.
//!
//! A target exposes its operations by name through two traits. The restricted
//! view, [`PublicInterface`], is all that ordinary and public-only forwarding
//! ever consult. [`FullInterface`] adds the private operations and is reached
//! only through unrestricted sends.

/// Visibility of a named operation on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// The public capability set of a target.
pub trait PublicInterface {
    /// Argument and result type of named operations.
    type Value;

    fn respond_to_public(&self, method: &str) -> bool;

    /// Invokes a public operation. Only called for names accepted by
    /// [`PublicInterface::respond_to_public`].
    fn invoke_public(&self, method: &str, args: Vec<Self::Value>) -> anyhow::Result<Self::Value>;
}

/// All capabilities of a target, public and private.
///
/// Targets without private operations get an empty private set by writing
/// `impl FullInterface for Target {}`.
pub trait FullInterface: PublicInterface {
    fn respond_to_private(&self, _method: &str) -> bool {
        false
    }

    /// Invokes a private operation. Only called for names accepted by
    /// [`FullInterface::respond_to_private`].
    fn invoke_private(
        &self,
        method: &str,
        _args: Vec<Self::Value>,
    ) -> anyhow::Result<Self::Value> {
        Err(anyhow::anyhow!("no private method `{method}'"))
    }
}

/// Looks `method` up in the full interface of `target`. Public wins when a
/// target reports both.
pub fn visibility_of<T: FullInterface + ?Sized>(target: &T, method: &str) -> Option<Visibility> {
    if target.respond_to_public(method) {
        Some(Visibility::Public)
    } else if target.respond_to_private(method) {
        Some(Visibility::Private)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Door;

    impl PublicInterface for Door {
        type Value = &'static str;

        fn respond_to_public(&self, method: &str) -> bool {
            method == "open"
        }

        fn invoke_public(&self, _method: &str, _args: Vec<Self::Value>) -> anyhow::Result<Self::Value> {
            Ok("opened")
        }
    }

    impl FullInterface for Door {
        fn respond_to_private(&self, method: &str) -> bool {
            method == "unhinge" || method == "open"
        }
    }

    struct Wall;

    impl PublicInterface for Wall {
        type Value = ();

        fn respond_to_public(&self, _method: &str) -> bool {
            false
        }

        fn invoke_public(&self, _method: &str, _args: Vec<Self::Value>) -> anyhow::Result<Self::Value> {
            Ok(())
        }
    }

    impl FullInterface for Wall {}

    #[test]
    fn test_public_visibility() {
        assert_eq!(visibility_of(&Door, "open"), Some(Visibility::Public));
    }

    #[test]
    fn test_private_visibility() {
        assert_eq!(visibility_of(&Door, "unhinge"), Some(Visibility::Private));
    }

    #[test]
    fn test_missing() {
        assert_eq!(visibility_of(&Door, "knock"), None);
    }

    #[test]
    fn test_default_private_set_is_empty() {
        assert!(!Wall.respond_to_private("anything"));
        assert!(Wall.invoke_private("anything", vec![]).is_err());
        assert_eq!(visibility_of(&Wall, "anything"), None);
    }
}
