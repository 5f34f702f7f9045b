use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rand::RngCore;
use tracing::{debug, info};

use crate::commands::write_identity_table;
use crate::feedback::Feedback;
use crate::hashing;
use crate::store::CredentialStore;

const PROMPT: &str = "saltbox> ";

const HELP: &str = "Commands:
  register   Register a new user (prompts for username and password)
  login      Log in as an existing user
  list       Show the stored username, salt and hash for every user
  hash       Generate a salt and hash for a password without storing it
  help       Show this help
  quit       End the session (all users are forgotten)";

/// Run an interactive session against `store` until `quit` or end of input.
///
/// Each `register`/`login` reads the username and the password from one line
/// each. Only the line terminator is stripped from the password.
pub fn run_session<G, R, W>(
    store: &mut CredentialStore<G>,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    G: RngCore,
    R: BufRead,
    W: Write,
{
    info!("session started");
    writeln!(out, "saltbox: type 'help' for commands")?;

    loop {
        let Some(line) = prompt(input, out, PROMPT)? else {
            break;
        };
        let command = line.trim();
        debug!(command = %command, "shell command");

        match command {
            "" => continue,
            "register" => {
                let Some((name, secret)) = read_credentials(input, out)? else {
                    break;
                };
                let result = store.register(&name, &secret);
                let feedback = Feedback::for_register(&name, &result);
                writeln!(out, "{feedback}")?;
                if result.is_ok() {
                    write_identity_table(out, store.list())?;
                }
            }
            "login" => {
                let Some((name, secret)) = read_credentials(input, out)? else {
                    break;
                };
                let result = store.verify(&name, &secret);
                writeln!(out, "{}", Feedback::for_login(&name, &result))?;
            }
            "list" => write_identity_table(out, store.list())?,
            "hash" => {
                let Some(secret) = prompt(input, out, "password: ")? else {
                    break;
                };
                match hashing::salt_and_hash(&secret) {
                    Ok(Some(hashed)) => {
                        writeln!(out, "salt:   {}", hashed.salt)?;
                        writeln!(out, "digest: {}", hashed.digest)?;
                    }
                    Ok(None) => writeln!(out, "salt:\ndigest:")?,
                    Err(e) => writeln!(out, "{}", Feedback::from(&e))?,
                }
            }
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => break,
            other => writeln!(
                out,
                "Unknown command '{other}'. Type 'help' for a list of commands."
            )?,
        }
    }

    info!(identities = store.len(), "session ended");
    Ok(())
}

fn read_credentials<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<(String, String)>> {
    let Some(name) = prompt(input, out, "username: ")? else {
        return Ok(None);
    };
    let Some(secret) = prompt(input, out, "password: ")? else {
        return Ok(None);
    };
    Ok(Some((name, secret)))
}

/// Print `label`, then read one line. Returns `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(strip_line_ending(line)))
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
