use thiserror::Error;

/// Failures reported by the credential store.
///
/// Every variant leaves the store exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Name (after trimming) or secret was empty.
    #[error("name and secret must both be non-empty")]
    EmptyInput,

    #[error("identity '{0}' already exists")]
    DuplicateName(String),

    #[error("no identity named '{0}'")]
    UnknownName(String),

    /// The random source or the hash primitive failed.
    #[error("hashing failed: {0}")]
    HashFailure(String),
}
