use anyhow::Result;
use clap::Parser;

use saltbox::cli::{Cli, Command};
use saltbox::{commands, mcp};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let is_session = matches!(cli.command, Command::Serve | Command::Shell);
    let default_level = if is_session { "info" } else { "warn" };

    // Logs go to stderr so stdout stays clean for command output and the MCP protocol.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Command::Hash { password, salt } => {
            commands::cmd_hash(&password, salt.as_deref(), cli.json)
        }
        Command::Verify {
            password,
            salt,
            digest,
        } => {
            if !commands::cmd_verify(&password, &salt, &digest, cli.json)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Shell => commands::cmd_shell(),
        Command::Serve => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(mcp::run_server())
        }
    }
}
