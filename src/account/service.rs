use std::sync::Arc;

use tracing::{debug, info};

use super::model::{Account, LoginResponse};
use super::repository::AccountStore;
use crate::auth::TokenIssuer;
use crate::error::CustomError;

pub struct AccountService {
    store: Arc<dyn AccountStore>,
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenIssuer) -> Self {
        AccountService { store, tokens }
    }

    pub async fn login(&self, number: i64, password: &str) -> Result<LoginResponse, CustomError> {
        let account = match self.store.get_by_number(number).await {
            Ok(account) => account,
            Err(CustomError::AccountNotFound) => {
                info!(number, "login for unknown account");
                return Err(CustomError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };
        self.store
            .codec()
            .verify(&account.encrypted_password, password)?;

        let access_token = self.tokens.issue(&account)?;
        info!(number, "login succeeded");
        Ok(LoginResponse {
            access_token,
            number: account.number,
        })
    }

    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Account, CustomError> {
        let account = self.store.create(first_name, last_name, password).await?;
        info!(id = account.id, number = account.number, "account created");
        Ok(account)
    }

    pub async fn list(&self) -> Result<Vec<Account>, CustomError> {
        self.store.get_all().await
    }

    pub async fn delete_all(&self) -> Result<(), CustomError> {
        self.store.delete_all().await?;
        info!("all accounts deleted");
        Ok(())
    }

    /// Resolves the account at `id` and checks that `token` was issued for it.
    /// Every failure collapses to `Unauthenticated` or `Forbidden`.
    pub async fn authorize(&self, token: Option<&str>, id: i64) -> Result<Account, CustomError> {
        let token = token.ok_or(CustomError::Unauthenticated)?;
        let claims = self.tokens.validate(token).map_err(|e| {
            debug!(reason = %e, "token rejected");
            CustomError::Unauthenticated
        })?;

        let account = match self.store.get_by_id(id).await {
            Ok(account) => account,
            Err(CustomError::AccountNotFound) => {
                debug!(id, "token presented for missing account");
                return Err(CustomError::Unauthenticated);
            }
            Err(e) => return Err(e),
        };

        if claims.account_number != account.number {
            debug!(id, "token account number mismatch");
            return Err(CustomError::Forbidden);
        }
        Ok(account)
    }

    pub async fn get_authorized(&self, token: Option<&str>, id: i64) -> Result<Account, CustomError> {
        self.authorize(token, id).await
    }

    pub async fn delete_authorized(&self, token: Option<&str>, id: i64) -> Result<(), CustomError> {
        let account = self.authorize(token, id).await?;
        self.store.delete_by_id(account.id).await?;
        info!(id, "account deleted");
        Ok(())
    }

    pub async fn transfer(&self, from_number: i64, to_number: i64, amount: i64) -> Result<(), CustomError> {
        self.store.transfer_money(from_number, to_number, amount).await
    }
}
