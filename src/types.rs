use serde::Serialize;

/// One registered identity: the name plus the salt and digest derived from its secret.
///
/// Fields are private so a record cannot be altered once the store has created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRecord {
    name: String,
    salt: String,
    digest: String,
}

impl IdentityRecord {
    pub(crate) fn new(name: impl Into<String>, salt: String, digest: String) -> Self {
        Self {
            name: name.into(),
            salt,
            digest,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Salt as 32 lowercase hex characters.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// SHA-256 of `secret ∥ salt`, as 64 lowercase hex characters.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// A salt together with the digest computed from it, as produced by the standalone hashing tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaltedHash {
    pub salt: String,
    pub digest: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Success,
    Error,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            _ => Err(anyhow::anyhow!("unknown feedback category: '{s}'")),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
