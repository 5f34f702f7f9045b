use std::io::{self, Write};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::hashing;
use crate::shell;
use crate::store::CredentialStore;
use crate::types::{IdentityRecord, SaltedHash};

/// Print `data` as pretty JSON if `json` is true, otherwise call `human_fmt`.
fn output<T: Serialize>(data: &T, json: bool, human_fmt: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        human_fmt(data);
    }
    Ok(())
}

/// Result of checking a password against a salt and digest.
#[derive(Debug, Serialize)]
pub struct VerifyResult {
    pub matches: bool,
    pub computed: String,
}

fn require_salt(salt: &str) -> Result<()> {
    if !hashing::is_valid_salt(salt) {
        bail!(
            "salt must be {} lowercase hex characters, got '{salt}'",
            hashing::SALT_HEX_LEN
        );
    }
    Ok(())
}

/// Generate a salt and hash for a password, or rehash with a given salt.
pub fn cmd_hash(password: &str, salt: Option<&str>, json: bool) -> Result<()> {
    let hashed = match salt {
        Some(salt) => {
            require_salt(salt)?;
            (!password.is_empty()).then(|| SaltedHash {
                salt: salt.to_string(),
                digest: hashing::digest(password, salt),
            })
        }
        None => hashing::salt_and_hash(password)?,
    };

    output(&hashed, json, |h| match h {
        Some(h) => {
            println!("Salt:   {}", h.salt);
            println!("Digest: {}", h.digest);
        }
        None => {
            println!("Salt:");
            println!("Digest:");
        }
    })
}

/// Check a password against a known salt and digest. Returns whether it matched.
pub fn cmd_verify(password: &str, salt: &str, digest: &str, json: bool) -> Result<bool> {
    require_salt(salt)?;
    if !hashing::is_valid_digest(digest) {
        bail!(
            "digest must be {} lowercase hex characters",
            hashing::DIGEST_HEX_LEN
        );
    }

    let computed = hashing::digest(password, salt);
    let result = VerifyResult {
        matches: computed == digest,
        computed,
    };

    output(&result, json, |r| {
        if r.matches {
            println!("Match: password, salt and digest agree");
        } else {
            println!("No match");
            println!("  expected {digest}");
            println!("  computed {}", r.computed);
        }
    })?;
    Ok(result.matches)
}

/// Start an interactive session on stdin/stdout with a fresh, empty store.
pub fn cmd_shell() -> Result<()> {
    let mut store = CredentialStore::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    shell::run_session(&mut store, &mut input, &mut out)
}

/// Render the identity table, one row per record in registration order.
pub fn write_identity_table<W: Write>(out: &mut W, records: &[IdentityRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No users registered");
    }

    let name_width = records
        .iter()
        .map(|r| r.name().chars().count())
        .max()
        .unwrap_or(0)
        .max("Username".len());

    writeln!(
        out,
        "{:<name_width$}  {:<salt_width$}  Hashed Password",
        "Username",
        "Salt",
        salt_width = hashing::SALT_HEX_LEN,
    )?;
    for rec in records {
        writeln!(
            out,
            "{:<name_width$}  {:<salt_width$}  {}",
            rec.name(),
            rec.salt(),
            rec.digest(),
            salt_width = hashing::SALT_HEX_LEN,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_table_rows_follow_store_order() {
        let mut store = CredentialStore::new();
        store.register("alice", "a").unwrap();
        store.register("bartholomew", "b").unwrap();

        let mut buf = Vec::new();
        write_identity_table(&mut buf, store.list()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Username"));
        assert!(lines[1].starts_with("alice "));
        assert!(lines[2].starts_with("bartholomew "));
        assert!(lines[1].ends_with(store.list()[0].digest()));
    }

    #[test]
    fn test_identity_table_empty() {
        let mut buf = Vec::new();
        write_identity_table(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No users registered\n");
    }

    #[test]
    fn test_verify_rejects_malformed_salt() {
        let digest = "0".repeat(64);
        assert!(cmd_verify("pw", "not-hex", &digest, true).is_err());
    }

    #[test]
    fn test_verify_reports_match_and_mismatch() {
        let salt = "00112233445566778899aabbccddeeff";
        let digest = hashing::digest("p@ss1", salt);
        assert!(cmd_verify("p@ss1", salt, &digest, true).unwrap());
        assert!(!cmd_verify("p@ss2", salt, &digest, true).unwrap());
    }

    #[test]
    fn test_hash_rejects_uppercase_salt() {
        let err = cmd_hash("pw", Some("00112233445566778899AABBCCDDEEFF"), true).unwrap_err();
        assert!(err.to_string().contains("lowercase hex"));
    }
}
