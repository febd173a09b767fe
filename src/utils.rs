use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};

use crate::constants::TOKEN_HEADER;
use crate::error::CustomError;

pub fn des_from_str<T: DeserializeOwned>(string: &str) -> Result<T, CustomError> {
    serde_json::from_str(string).map_err(|e| CustomError::ValidationError(format!("invalid body: {e}")))
}

pub fn ser_to_str<T: Serialize>(t: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(t)
}

/// Parses an `{id}` path segment. Bad input is a client error, never a crash.
pub fn parse_id(raw: &str) -> Result<i64, CustomError> {
    raw.parse::<i64>()
        .map_err(|_| CustomError::ValidationError(format!("invalid account id '{raw}'")))
}

pub fn extract_token(headers: &HashMap<String, String>) -> Option<&str> {
    headers
        .get(TOKEN_HEADER)
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
}
