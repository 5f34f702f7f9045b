use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "saltbox")]
#[command(about = "See how salting changes a password hash. Register, log in, compare digests.")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a random salt and the salted SHA-256 digest of a password
    Hash {
        /// Plaintext password (an empty string produces no output)
        password: String,

        /// Reuse this salt (32 lowercase hex characters) instead of generating one
        #[arg(long)]
        salt: Option<String>,
    },

    /// Check a password against a salt and digest; exits 1 on mismatch
    Verify {
        /// Plaintext password to check
        password: String,

        /// Salt the digest was computed with
        #[arg(long)]
        salt: String,

        /// Expected digest (64 lowercase hex characters)
        #[arg(long)]
        digest: String,
    },

    /// Interactive register/login session with an in-memory user list
    Shell,

    /// Start MCP server over stdio; registered users live until the server exits
    Serve,
}
