use serde::{Deserialize, Serialize};

/// A change notification for the remote collection. Consumers treat every
/// variant the same way (full refetch), but gateway implementations that
/// forward backend events keep the distinction on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeEvent {
    Insert,
    Update,
    Delete,
}
