#![allow(dead_code)]

use std::sync::Arc;

use bank_accounts::{
    account::{controller::AccountController, repository::AccountRepository, service::AccountService},
    auth::{MIN_BCRYPT_COST, PasswordCodec, TokenIssuer},
    db::Database,
};
use rand::Rng;

pub const TEST_SECRET: &[u8] = b"test-secret";

pub async fn setup_test_db() -> Database {
    let suffix: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();
    let db_name = format!("test_{}", suffix);
    let database_url = format!("sqlite:file:{}?mode=memory&cache=shared", db_name);

    let database = Database::connect(&database_url)
        .await
        .expect("Failed to create in-memory SQLite DB");
    database
        .init_schema()
        .await
        .expect("Failed to create accounts table");

    database
}

/// Cheapest bcrypt cost so hashing-heavy tests stay fast.
pub fn fast_codec() -> PasswordCodec {
    PasswordCodec::new(MIN_BCRYPT_COST).expect("min cost is valid")
}

pub fn tokens() -> TokenIssuer {
    TokenIssuer::new(TEST_SECRET, chrono::Duration::hours(1))
}

pub async fn setup_repository() -> Arc<AccountRepository> {
    let database = setup_test_db().await;
    Arc::new(AccountRepository::new(database.pool.clone(), fast_codec()))
}

pub async fn setup_controller() -> (Arc<AccountRepository>, AccountController) {
    let repository = setup_repository().await;
    let service = AccountService::new(repository.clone(), tokens());
    (repository, AccountController::new(service))
}
