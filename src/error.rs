use std::{error::Error, fmt::Debug};

use crate::constants::{BAD_REQUEST, UNAUTHORIZED};

#[derive(thiserror::Error)]
pub enum CustomError {
    #[error("ENV '{0}' Not Found")]
    EnvError(String, #[source] std::env::VarError),

    #[error("Invalid value for '{0}': {1}")]
    ConfigError(String, String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Invalid account number or password")]
    InvalidCredentials,

    #[error("Account has no usable password")]
    EmptyPassword,

    #[error("Error hashing password")]
    HashError(#[source] bcrypt::BcryptError),

    #[error("No free account number after {0} attempts")]
    NumberExhausted(u32),

    #[error("Database")]
    DBError(#[source] sqlx::Error),

    #[error("Error encode token")]
    EncodeError(#[source] jsonwebtoken::errors::Error),

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,
}

impl CustomError {
    /// Auth failures are indistinguishable to the caller.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            CustomError::Unauthenticated
                | CustomError::Forbidden
                | CustomError::MalformedToken
                | CustomError::ExpiredToken
                | CustomError::InvalidSignature
        )
    }

    pub fn is_internal(&self) -> bool {
        !self.is_auth_failure()
            && !matches!(
                self,
                CustomError::ValidationError(_)
                    | CustomError::AccountNotFound
                    | CustomError::InvalidCredentials
                    | CustomError::EmptyPassword
            )
    }

    pub fn status_line(&self) -> &'static str {
        if self.is_auth_failure() {
            UNAUTHORIZED
        } else {
            BAD_REQUEST
        }
    }

    /// Message safe to send back to a client.
    pub fn public_message(&self) -> String {
        if self.is_auth_failure() {
            "access denied".to_string()
        } else if self.is_internal() {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl Debug for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        if let Some(source) = self.source() {
            write!(f, " (Caused by: {})", source)?;
        }
        Ok(())
    }
}
