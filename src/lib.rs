//! Salted password hashing playground.
//!
//! A [`store::CredentialStore`] keeps registered users in memory for the
//! lifetime of a session. Each user gets a fresh 16-byte salt and a SHA-256
//! digest of `password ∥ salt_hex` (see [`hashing`]).

pub mod cli;
pub mod commands;
pub mod error;
pub mod feedback;
pub mod hashing;
pub mod mcp;
pub mod shell;
pub mod store;
pub mod types;
