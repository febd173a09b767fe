use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::account::model::Account;
use crate::error::CustomError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub account_number: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates HS256 session tokens. The secret is fixed for the
/// lifetime of the issuer.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        TokenIssuer {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, account: &Account) -> Result<String, CustomError> {
        let now = Utc::now();
        let claims = Claims {
            account_number: account.number,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(CustomError::EncodeError)
    }

    pub fn validate(&self, token: &str) -> Result<Claims, CustomError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CustomError::ExpiredToken,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    CustomError::InvalidSignature
                }
                _ => CustomError::MalformedToken,
            })
    }
}
