use serde::{Deserialize, Serialize};

use crate::core::{CategoryId, EntityStatus};

/// Referenced by products via foreign key. Soft-deleted rather than
/// physically removed, so historical product references remain resolvable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub status: EntityStatus,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            status: EntityStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
