use std::collections::HashMap;

use serde::Serialize;
use tracing::{error, info};

use super::model::{CreateAccountRequest, LoginRequest, MessageResponse, TransferRequest};
use super::service::AccountService;
use crate::{
    constants::{BAD_REQUEST, INTERNAL_ERROR_BODY, OK_RESPONSE},
    error::CustomError,
    utils::{des_from_str, extract_token, parse_id, ser_to_str},
};

/// `(status line, JSON body)`
pub type Reply = (String, String);

pub struct AccountController {
    service: AccountService,
}

impl AccountController {
    pub fn new(service: AccountService) -> Self {
        AccountController { service }
    }

    pub async fn login(&self, body: &str) -> Reply {
        let result = match des_from_str::<LoginRequest>(body) {
            Ok(req) => self.service.login(req.number, &req.password).await,
            Err(e) => Err(e),
        };
        respond(result)
    }

    pub async fn list_accounts(&self) -> Reply {
        respond(self.service.list().await)
    }

    pub async fn create_account(&self, body: &str) -> Reply {
        let result = match des_from_str::<CreateAccountRequest>(body) {
            Ok(req) => {
                self.service
                    .create(&req.first_name, &req.last_name, &req.password)
                    .await
            }
            Err(e) => Err(e),
        };
        respond(result)
    }

    pub async fn delete_accounts(&self) -> Reply {
        respond(
            self.service
                .delete_all()
                .await
                .map(|_| MessageResponse::new("All accounts deleted")),
        )
    }

    pub async fn get_account(&self, headers: &HashMap<String, String>, raw_id: &str) -> Reply {
        let result = match parse_id(raw_id) {
            Ok(id) => self.service.get_authorized(extract_token(headers), id).await,
            Err(e) => Err(e),
        };
        respond(result)
    }

    pub async fn delete_account(&self, headers: &HashMap<String, String>, raw_id: &str) -> Reply {
        let result = match parse_id(raw_id) {
            Ok(id) => self
                .service
                .delete_authorized(extract_token(headers), id)
                .await
                .map(|_| MessageResponse::new("Account deleted")),
            Err(e) => Err(e),
        };
        respond(result)
    }

    pub async fn transfer(&self, body: &str) -> Reply {
        // The body is informational only; an empty or odd body still succeeds.
        let req = des_from_str::<TransferRequest>(body).unwrap_or_default();
        respond(
            self.service
                .transfer(req.from_account_number, req.to_account_number, req.amount)
                .await
                .map(|_| MessageResponse::new("Transfer successful")),
        )
    }
}

pub fn message(status: &str, text: &str) -> Reply {
    match ser_to_str(&MessageResponse::new(text)) {
        Ok(json) => (status.to_string(), json),
        Err(_) => (status.to_string(), INTERNAL_ERROR_BODY.to_string()),
    }
}

fn respond<T: Serialize>(result: Result<T, CustomError>) -> Reply {
    match result {
        Ok(value) => match ser_to_str(&value) {
            Ok(json) => (OK_RESPONSE.to_string(), json),
            Err(e) => {
                error!("serde error: {e}");
                message(BAD_REQUEST, "internal error")
            }
        },
        Err(err) => {
            if err.is_auth_failure() {
                info!("permission denied: {err}");
            } else if err.is_internal() {
                error!("request failed: {:?}", err);
            } else {
                info!("request rejected: {err}");
            }
            message(err.status_line(), &err.public_message())
        }
    }
}
