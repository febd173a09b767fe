use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::auth::PasswordCodec;
use crate::error::CustomError;

pub const MAX_ACCOUNT_NUMBER: i64 = 999_999_999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    #[serde(skip)]
    pub encrypted_password: String,
    pub created_at: DateTime<Utc>,
}

/// Row shape as stored; `created_at` is RFC 3339 text so the same query
/// decodes on every Any backend.
#[derive(sqlx::FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub encrypted_password: String,
    pub number: i64,
    pub balance: i64,
    pub created_at: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = CustomError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| CustomError::DBError(sqlx::Error::Decode(Box::new(e))))?
            .with_timezone(&Utc);
        Ok(Account {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            number: row.number,
            balance: row.balance,
            encrypted_password: row.encrypted_password,
            created_at,
        })
    }
}

/// An account that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub encrypted_password: String,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    pub fn new(
        first_name: &str,
        last_name: &str,
        password: &str,
        codec: &PasswordCodec,
    ) -> Result<Self, CustomError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() {
            return Err(CustomError::ValidationError("first_name must not be empty".into()));
        }
        if last_name.is_empty() {
            return Err(CustomError::ValidationError("last_name must not be empty".into()));
        }
        if password.is_empty() {
            return Err(CustomError::ValidationError("password must not be empty".into()));
        }

        Ok(NewAccount {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            encrypted_password: codec.hash(password)?,
            // Storage keeps microseconds.
            created_at: Utc::now().trunc_subsecs(6),
        })
    }

    pub fn into_account(self, id: i64, number: i64) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number,
            balance: 0,
            encrypted_password: self.encrypted_password,
            created_at: self.created_at,
        }
    }
}

pub fn random_account_number() -> i64 {
    rand::thread_rng().gen_range(1..=MAX_ACCOUNT_NUMBER)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub number: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransferRequest {
    #[serde(default)]
    pub from_account_number: i64,
    #[serde(default)]
    pub to_account_number: i64,
    #[serde(default)]
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
