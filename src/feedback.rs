//! User-facing status messages for register and login outcomes.
//!
//! Unknown names and wrong secrets share one message so the reply does not
//! reveal which names are registered.

use serde::Serialize;

use crate::error::StoreError;
use crate::types::Category;

const MSG_EMPTY_INPUT: &str = "Error: Please enter both username and password.";
const MSG_INVALID_LOGIN: &str = "Error: Invalid username or password.";
const MSG_HASH_FAILURE: &str = "Error: Unable to hash password. Please try again.";

/// A status line for the feedback surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub message: String,
    pub category: Category,
}

impl Feedback {
    fn success(message: String) -> Self {
        Self {
            message,
            category: Category::Success,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: Category::Error,
        }
    }

    pub fn registered(name: &str) -> Self {
        Self::success(format!("User \"{}\" registered successfully!", name.trim()))
    }

    pub fn logged_in(name: &str) -> Self {
        Self::success(format!("User \"{}\" logged in successfully!", name.trim()))
    }

    pub fn invalid_login() -> Self {
        Self::error(MSG_INVALID_LOGIN)
    }

    /// Feedback for the result of a registration attempt.
    pub fn for_register(name: &str, result: &Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Self::registered(name),
            Err(e) => Self::from(e),
        }
    }

    /// Feedback for the result of a login attempt.
    pub fn for_login(name: &str, result: &Result<bool, StoreError>) -> Self {
        match result {
            Ok(true) => Self::logged_in(name),
            Ok(false) => Self::invalid_login(),
            Err(e) => Self::from(e),
        }
    }

    pub fn is_success(&self) -> bool {
        self.category == Category::Success
    }
}

impl From<&StoreError> for Feedback {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::EmptyInput => Self::error(MSG_EMPTY_INPUT),
            StoreError::DuplicateName(name) => {
                Self::error(format!("Error: User \"{name}\" already exists."))
            }
            StoreError::UnknownName(_) => Self::invalid_login(),
            StoreError::HashFailure(_) => Self::error(MSG_HASH_FAILURE),
        }
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
