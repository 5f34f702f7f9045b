use std::future::Future;
use std::sync::{Arc, Mutex};

use rmcp::schemars;
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::feedback::Feedback;
use crate::hashing;
use crate::store::CredentialStore;
use crate::types::{IdentityRecord, SaltedHash};

// ── Parameter types ──

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CredentialParams {
    /// Username (leading and trailing whitespace is ignored)
    pub username: String,
    /// Plaintext password, used exactly as given
    pub password: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HashParams {
    /// Plaintext password to salt and hash
    pub password: String,
    /// Optional salt to reuse (32 lowercase hex characters); a fresh one is generated otherwise
    pub salt: Option<String>,
}

// ── Response wrappers for JSON serialization ──

#[derive(Debug, Serialize)]
struct RegisterResponse {
    feedback: Feedback,
    /// Full user table after the attempt, in registration order.
    users: Vec<IdentityRecord>,
}

// ── Tool bodies, run under spawn_blocking ──

fn register_user(store: &mut CredentialStore, params: &CredentialParams) -> RegisterResponse {
    let result = store.register(&params.username, &params.password);
    if result.is_ok() {
        info!(username = %params.username.trim(), total = store.len(), "user registered");
    }
    RegisterResponse {
        feedback: Feedback::for_register(&params.username, &result),
        users: store.list().to_vec(),
    }
}

fn login_user(store: &CredentialStore, params: &CredentialParams) -> Feedback {
    let result = store.verify(&params.username, &params.password);
    Feedback::for_login(&params.username, &result)
}

fn hash_password(params: &HashParams) -> Result<Option<SaltedHash>, String> {
    match params.salt.as_deref() {
        Some(salt) if !hashing::is_valid_salt(salt) => Err(format!(
            "salt must be {} lowercase hex characters",
            hashing::SALT_HEX_LEN
        )),
        Some(salt) => Ok((!params.password.is_empty()).then(|| SaltedHash {
            salt: salt.to_string(),
            digest: hashing::digest(&params.password, salt),
        })),
        None => hashing::salt_and_hash(&params.password).map_err(|e| e.to_string()),
    }
}

fn mcp_err(msg: impl std::fmt::Display) -> McpError {
    McpError::internal_error(msg.to_string(), None)
}

fn json_result<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| mcp_err(format!("serialization failed: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ── MCP Server ──

#[derive(Clone)]
pub struct SaltboxServer {
    tool_router: ToolRouter<Self>,
    /// Users registered during this server's lifetime. Dropped on exit.
    store: Arc<Mutex<CredentialStore>>,
}

impl Default for SaltboxServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl SaltboxServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            store: Arc::new(Mutex::new(CredentialStore::new())),
        }
    }

    /// Register a user with a fresh salt.
    #[tool(
        description = "Register a new user. Generates a random 16-byte salt, stores SHA-256(password + salt_hex), and returns a status message plus the full user table (username, salt, hashed password)."
    )]
    async fn saltbox_register(
        &self,
        Parameters(params): Parameters<CredentialParams>,
    ) -> Result<CallToolResult, McpError> {
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || {
            debug!(username = %params.username, "register");
            let mut store = store.lock().map_err(|_| mcp_err("store lock poisoned"))?;
            json_result(&register_user(&mut store, &params))
        })
        .await
        .map_err(|e| mcp_err(format!("task join failed: {e}")))?
    }

    /// Check a username/password pair.
    #[tool(
        description = "Log in as a registered user. Re-hashes the password with the stored salt and compares digests. Returns a status message with category success or error."
    )]
    async fn saltbox_login(
        &self,
        Parameters(params): Parameters<CredentialParams>,
    ) -> Result<CallToolResult, McpError> {
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || {
            debug!(username = %params.username, "login");
            let store = store.lock().map_err(|_| mcp_err("store lock poisoned"))?;
            json_result(&login_user(&store, &params))
        })
        .await
        .map_err(|e| mcp_err(format!("task join failed: {e}")))?
    }

    /// Show every registered user.
    #[tool(
        description = "List registered users in registration order with their salt and hashed password. Plaintext passwords are never stored."
    )]
    async fn saltbox_list(&self) -> Result<CallToolResult, McpError> {
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || {
            debug!("list");
            let store = store.lock().map_err(|_| mcp_err("store lock poisoned"))?;
            json_result(&store.list())
        })
        .await
        .map_err(|e| mcp_err(format!("task join failed: {e}")))?
    }

    /// Salt and hash a password without storing anything.
    #[tool(
        description = "Generate a salt and the salted SHA-256 hash of a password without registering anyone. Pass salt to reproduce an earlier hash. An empty password returns null."
    )]
    async fn saltbox_hash(
        &self,
        Parameters(params): Parameters<HashParams>,
    ) -> Result<CallToolResult, McpError> {
        tokio::task::spawn_blocking(move || {
            debug!(with_salt = params.salt.is_some(), "hash");
            let hashed = hash_password(&params).map_err(mcp_err)?;
            json_result(&hashed)
        })
        .await
        .map_err(|e| mcp_err(format!("task join failed: {e}")))?
    }
}

#[tool_handler]
impl ServerHandler for SaltboxServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "saltbox".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some(
                "saltbox demonstrates salted password hashing. Each registered user gets a \
                 random 16-byte salt (32 hex chars) and a SHA-256 digest of the password \
                 followed by the hex salt.\n\n\
                 Workflow:\n\
                 1. saltbox_register to add a user; the response shows the stored table.\n\
                 2. saltbox_login to check a password against the stored salt and digest.\n\
                 3. saltbox_list to inspect what is stored (never the plaintext).\n\
                 4. saltbox_hash to see how the same password hashes under different salts.\n\n\
                 Users are kept in memory only and disappear when the server stops."
                    .into(),
            ),
        }
    }
}

/// Start the MCP server over stdio.
pub async fn run_server() -> anyhow::Result<()> {
    info!("starting saltbox MCP server v{}", env!("CARGO_PKG_VERSION"));

    let server = SaltboxServer::new();
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    info!("saltbox MCP server stopped");
    Ok(())
}
