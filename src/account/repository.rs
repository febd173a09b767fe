use async_trait::async_trait;
use chrono::SecondsFormat;
use sqlx::AnyPool;
use tracing::{debug, warn};

use super::model::{Account, AccountRow, NewAccount, random_account_number};
use crate::auth::PasswordCodec;
use crate::error::CustomError;

pub const MAX_NUMBER_ATTEMPTS: u32 = 10;

const SELECT_ACCOUNT: &str = r#"
    SELECT id, first_name, last_name, encrypted_password, number, balance, created_at
    FROM accounts"#;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Account, CustomError>;
    async fn get_all(&self) -> Result<Vec<Account>, CustomError>;
    async fn get_by_id(&self, id: i64) -> Result<Account, CustomError>;
    async fn get_by_number(&self, number: i64) -> Result<Account, CustomError>;
    async fn delete_all(&self) -> Result<(), CustomError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), CustomError>;
    async fn transfer_money(
        &self,
        from_number: i64,
        to_number: i64,
        amount: i64,
    ) -> Result<(), CustomError>;
    fn codec(&self) -> &PasswordCodec;
}

pub struct AccountRepository {
    pool: AnyPool,
    codec: PasswordCodec,
}

impl AccountRepository {
    pub fn new(pool: AnyPool, codec: PasswordCodec) -> Self {
        AccountRepository { pool, codec }
    }

    async fn insert(&self, account: &NewAccount, number: i64) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO accounts (first_name, last_name, encrypted_password, number, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id"#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.encrypted_password)
        .bind(number)
        .bind(0_i64)
        .bind(account.created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    async fn fetch_one(&self, filter: &str, value: i64) -> Result<Account, CustomError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{SELECT_ACCOUNT} WHERE {filter} = $1"))
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => CustomError::AccountNotFound,
                _ => CustomError::DBError(e),
            })?;
        Account::try_from(row)
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Account, CustomError> {
        let new_account = NewAccount::new(first_name, last_name, password, &self.codec)?;

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = random_account_number();
            match self.insert(&new_account, number).await {
                Ok(id) => return Ok(new_account.into_account(id, number)),
                Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                    debug!(attempt, "account number collision, retrying");
                }
                Err(e) => return Err(CustomError::DBError(e)),
            }
        }
        Err(CustomError::NumberExhausted(MAX_NUMBER_ATTEMPTS))
    }

    async fn get_all(&self) -> Result<Vec<Account>, CustomError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!("{SELECT_ACCOUNT} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(CustomError::DBError)?;
        rows.into_iter().map(Account::try_from).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Account, CustomError> {
        self.fetch_one("id", id).await
    }

    async fn get_by_number(&self, number: i64) -> Result<Account, CustomError> {
        self.fetch_one("number", number).await
    }

    async fn delete_all(&self) -> Result<(), CustomError> {
        sqlx::query("DELETE FROM accounts")
            .execute(&self.pool)
            .await
            .map_err(CustomError::DBError)?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), CustomError> {
        // Zero rows affected is still success.
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(CustomError::DBError)?;
        Ok(())
    }

    /// Not implemented: no balance is read or written. Kept as an
    /// acknowledged no-op until atomic debit/credit with row locking exists.
    async fn transfer_money(
        &self,
        from_number: i64,
        to_number: i64,
        amount: i64,
    ) -> Result<(), CustomError> {
        warn!(
            from_number,
            to_number, amount, "transfer requested but transfers are not implemented"
        );
        Ok(())
    }

    fn codec(&self) -> &PasswordCodec {
        &self.codec
    }
}
