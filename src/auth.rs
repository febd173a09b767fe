pub mod jwt;
pub mod password;

pub use jwt::{Claims, TokenIssuer};
pub use password::{MIN_BCRYPT_COST, PasswordCodec};
