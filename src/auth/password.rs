use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error::CustomError;

pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// One-way salted password hashing (bcrypt).
#[derive(Debug, Clone, Copy)]
pub struct PasswordCodec {
    cost: u32,
}

impl Default for PasswordCodec {
    fn default() -> Self {
        PasswordCodec { cost: DEFAULT_COST }
    }
}

impl PasswordCodec {
    pub fn new(cost: u32) -> Result<Self, CustomError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(CustomError::ConfigError(
                "BCRYPT_COST".to_string(),
                format!("{cost} is outside {MIN_BCRYPT_COST}..={MAX_BCRYPT_COST}"),
            ));
        }
        Ok(PasswordCodec { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, CustomError> {
        hash(plaintext, self.cost).map_err(CustomError::HashError)
    }

    /// `Ok(())` only when `plaintext` matches `digest`. An empty digest is
    /// reported as `EmptyPassword` so a locked-out account is visible.
    pub fn verify(&self, digest: &str, plaintext: &str) -> Result<(), CustomError> {
        if digest.is_empty() {
            return Err(CustomError::EmptyPassword);
        }
        match verify(plaintext, digest) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CustomError::InvalidCredentials),
            Err(e) => Err(CustomError::HashError(e)),
        }
    }
}
