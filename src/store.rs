use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use crate::error::StoreError;
use crate::hashing;
use crate::types::IdentityRecord;

/// In-memory list of registered identities, kept in insertion order.
///
/// The store exists only as long as its owner; nothing is ever written to disk.
/// It owns its random source so tests can swap the OS generator for a seeded
/// or failing one.
pub struct CredentialStore<R = OsRng> {
    records: Vec<IdentityRecord>,
    rng: R,
}

impl<R> std::fmt::Debug for CredentialStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

impl CredentialStore<OsRng> {
    /// Empty store drawing salts from the operating system CSPRNG.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for CredentialStore<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> CredentialStore<R> {
    /// Empty store drawing salts from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            records: Vec::new(),
            rng,
        }
    }

    /// Register a new identity.
    ///
    /// `name` is trimmed, `secret` is taken as-is. Fails without touching the
    /// store if either is empty, if the name is taken (case-sensitive), or if
    /// no salt could be drawn.
    pub fn register(&mut self, name: &str, secret: &str) -> Result<(), StoreError> {
        let name = check_input(name, secret)?;

        if self.get(name).is_some() {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        let salt = hashing::generate_salt_with(&mut self.rng)?;
        let digest = hashing::digest(secret, &salt);
        self.records.push(IdentityRecord::new(name, salt, digest));

        debug!(name = %name, total = self.records.len(), "registered identity");
        Ok(())
    }

    /// Check `secret` against the stored digest for `name`.
    ///
    /// Returns `Ok(false)` for a wrong secret; an unregistered name is an error.
    pub fn verify(&self, name: &str, secret: &str) -> Result<bool, StoreError> {
        let name = check_input(name, secret)?;

        let record = self
            .get(name)
            .ok_or_else(|| StoreError::UnknownName(name.to_string()))?;
        let matches = hashing::digest(secret, record.salt()) == record.digest();

        debug!(name = %name, matches, "verified identity");
        Ok(matches)
    }

    /// Read-only view of every record, in registration order.
    pub fn list(&self) -> &[IdentityRecord] {
        &self.records
    }

    /// Look up a record by exact name.
    pub fn get(&self, name: &str) -> Option<&IdentityRecord> {
        self.records.iter().find(|r| r.name() == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Trim the name and reject empty input. Returns the trimmed name.
fn check_input<'a>(name: &'a str, secret: &str) -> Result<&'a str, StoreError> {
    let name = name.trim();
    if name.is_empty() || secret.is_empty() {
        return Err(StoreError::EmptyInput);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Random source that always fails, to exercise the hash-failure path.
    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            unreachable!("only try_fill_bytes is used")
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!("only try_fill_bytes is used")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unreachable!("only try_fill_bytes is used")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy pool offline",
            )))
        }
    }

    #[test]
    fn test_register_then_verify() {
        let mut store = CredentialStore::new();
        store.register("alice", "p@ss1").unwrap();

        assert!(store.verify("alice", "p@ss1").unwrap());
        assert!(!store.verify("alice", "wrong").unwrap());
    }

    #[test]
    fn test_alice_walkthrough() {
        let mut store = CredentialStore::new();
        store.register("alice", "p@ss1").unwrap();

        let rows = store.list();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name(), "alice");
        assert!(hashing::is_valid_salt(rows[0].salt()));
        assert!(hashing::is_valid_digest(rows[0].digest()));

        assert_eq!(store.verify("alice", "p@ss1"), Ok(true));
        assert_eq!(store.verify("alice", "wrong"), Ok(false));
        assert_eq!(
            store.register("alice", "other"),
            Err(StoreError::DuplicateName("alice".to_string()))
        );
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_duplicate_leaves_first_record_untouched() {
        let mut store = CredentialStore::new();
        store.register("bob", "first").unwrap();
        let before = store.get("bob").unwrap().clone();

        let err = store.register("bob", "second").unwrap_err();
        assert_eq!(err, StoreError::DuplicateName("bob".to_string()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("bob").unwrap(), &before);
        assert!(store.verify("bob", "first").unwrap());
        assert!(!store.verify("bob", "second").unwrap());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut store = CredentialStore::new();
        store.register("Alice", "x").unwrap();
        store.register("alice", "y").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.verify("ALICE", "x"),
            Err(StoreError::UnknownName("ALICE".to_string()))
        );
    }

    #[test]
    fn test_name_is_trimmed_but_secret_is_not() {
        let mut store = CredentialStore::new();
        store.register("  carol \t", " spaced ").unwrap();

        assert_eq!(store.list()[0].name(), "carol");
        assert!(store.verify("carol", " spaced ").unwrap());
        assert!(!store.verify("carol", "spaced").unwrap());
        assert_eq!(
            store.register("carol", "again"),
            Err(StoreError::DuplicateName("carol".to_string()))
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let mut store = CredentialStore::new();
        assert_eq!(store.register("", "secret"), Err(StoreError::EmptyInput));
        assert_eq!(store.register("   ", "secret"), Err(StoreError::EmptyInput));
        assert_eq!(store.register("dave", ""), Err(StoreError::EmptyInput));
        assert!(store.is_empty());

        store.register("dave", "secret").unwrap();
        assert_eq!(store.verify("", "secret"), Err(StoreError::EmptyInput));
        assert_eq!(store.verify("dave", ""), Err(StoreError::EmptyInput));
    }

    #[test]
    fn test_verify_unknown_name() {
        let store = CredentialStore::new();
        assert_eq!(
            store.verify("nobody", "secret"),
            Err(StoreError::UnknownName("nobody".to_string()))
        );
    }

    #[test]
    fn test_same_secret_gets_distinct_salts() {
        let mut store = CredentialStore::with_rng(StdRng::seed_from_u64(42));
        store.register("erin", "shared").unwrap();
        store.register("frank", "shared").unwrap();

        let rows = store.list();
        assert_ne!(rows[0].salt(), rows[1].salt());
        assert_ne!(rows[0].digest(), rows[1].digest());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut store = CredentialStore::new();
        for name in ["zed", "amy", "mo"] {
            store.register(name, "pw").unwrap();
        }
        let names: Vec<_> = store.list().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["zed", "amy", "mo"]);
        // Listing twice yields the same snapshot.
        assert_eq!(store.list(), store.list());
    }

    #[test]
    fn test_broken_rng_reports_hash_failure_and_keeps_store() {
        let mut store = CredentialStore::with_rng(BrokenRng);
        let err = store.register("gina", "pw").unwrap_err();
        assert!(matches!(err, StoreError::HashFailure(_)), "got {err:?}");
        assert!(store.is_empty());
    }
}
