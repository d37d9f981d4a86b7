//! Error types shared by the domain modules.

use thiserror::Error;

/// Raised when a calculation or a deposit record receives values outside its
/// domain. Nothing is computed for invalid input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl CalcError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures of the authentication and session layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("an account already exists for {0}")]
    EmailTaken(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not logged in; run `fintechora login` first")]
    NotLoggedIn,
    #[error("invalid registration details: {0}")]
    InvalidRegistration(String),
}
