//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Every identifier in
//! this system is an opaque string (catalog slugs like `card-7`, PocketBase
//! record ids, or synthesized `local_<n>` ids).

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use elite_cards_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new("w-1");
/// let gadget = GadgetId::new("w-1");
///
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget;
/// assert_eq!(widget.as_str(), gadget.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(CardId);
define_id!(TransactionId);

impl TransactionId {
    /// Prefix that marks ids synthesized for the local payments mirror.
    pub const LOCAL_PREFIX: &'static str = "local_";

    /// Build the synthesized id for an entry of the local payments mirror.
    #[must_use]
    pub fn local(index: usize) -> Self {
        Self(format!("{}{index}", Self::LOCAL_PREFIX))
    }

    /// Returns `true` if this id belongs to the local-fallback namespace.
    ///
    /// Remote record ids never carry the prefix, so the two namespaces are
    /// disjoint.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0.starts_with(Self::LOCAL_PREFIX)
    }

    /// Index into the local payments mirror, if this is a well-formed local id.
    #[must_use]
    pub fn local_index(&self) -> Option<usize> {
        self.0.strip_prefix(Self::LOCAL_PREFIX)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_transaction_id() {
        let id = TransactionId::local(2);
        assert_eq!(id.as_str(), "local_2");
        assert!(id.is_local());
        assert_eq!(id.local_index(), Some(2));
    }

    #[test]
    fn test_remote_transaction_id() {
        let id = TransactionId::new("k3j2h1g4f5d6s7a");
        assert!(!id.is_local());
        assert_eq!(id.local_index(), None);
    }

    #[test]
    fn test_malformed_local_index() {
        let id = TransactionId::new("local_abc");
        assert!(id.is_local());
        assert_eq!(id.local_index(), None);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = ProductId::new("card-3");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"card-3\""));
    }
}
