use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identity of a product. Immutable once assigned.
    ProductId
);
entity_id!(
    /// Identity of a product variant. Absent on a submitted entry means
    /// "create a new row".
    VariantId
);
entity_id!(
    /// Identity of a product image. Always server-assigned, never submitted.
    ImageId
);
entity_id!(
    /// Identity of a category.
    CategoryId
);

/// Opaque concurrency token.
///
/// A fresh value is stamped on every committed mutation; callers echo the
/// token they loaded and the store compares byte-for-byte at commit time.
/// The bytes carry no ordering, only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionToken([u8; 16]);

impl VersionToken {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().into_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Lifecycle state of a catalog record.
///
/// Soft-deleted records stay in the store so historical references keep
/// resolving; active-only queries skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    Active,
    Deleted,
}

impl EntityStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tokens_are_distinct() {
        let a = VersionToken::fresh();
        let b = VersionToken::fresh();
        assert_ne!(a, b);
        assert_eq!(a.as_bytes().len(), 16);
    }

    #[test]
    fn entity_ids_are_distinct() {
        assert_ne!(ProductId::new(), ProductId::new());
        assert_ne!(VariantId::new(), VariantId::new());
    }
}
