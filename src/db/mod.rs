//! Durable key-value storage for the session.

pub mod memory;
pub mod secure_store;

pub use memory::MemoryStore;
pub use secure_store::FileSecureStore;

/// Key names as constants.
pub mod keys {
    /// Bearer token of the signed-in user
    pub const AUTH_TOKEN: &str = "authToken";
    /// JSON-serialized `UserProfile`
    pub const USER_DATA: &str = "USER_DATA";
}

/// Storage contract used by the session.
///
/// Implementations must never panic on missing or damaged data; they report
/// it through [`StoreError`] and let the caller fall back.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a key that is not present succeeds.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Errors from storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(String),

    #[error("Stored value for {key:?} failed integrity check")]
    Integrity { key: String },

    #[error("Storage unavailable")]
    Unavailable,
}
