//! Typed identifiers for pipeline entities.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::ModelError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| ModelError::InvalidId(value.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Identifier of a governed contract.
    ContractId
);
entity_id!(
    /// Identifier of a department that owns contracts and audit items.
    DepartmentId
);
entity_id!(
    /// Identifier of a user account.
    UserId
);
entity_id!(
    /// Identifier of an audit-queue item.
    AuditItemId
);
entity_id!(
    /// Identifier of a notification row.
    NotificationId
);
