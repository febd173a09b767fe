use std::time::Duration;

pub const OK_RESPONSE: &str = "HTTP/1.1 200 OK";
pub const BAD_REQUEST: &str = "HTTP/1.1 400 Bad Request";
pub const UNAUTHORIZED: &str = "HTTP/1.1 401 Unauthorized";
pub const NOT_FOUND: &str = "HTTP/1.1 404 Not Found";
pub const REQUEST_TIMEOUT: &str = "HTTP/1.1 408 Request Timeout";
pub const PAYLOAD_TOO_LARGE: &str = "HTTP/1.1 413 Payload Too Large";
pub const HEADERS_TOO_LARGE: &str = "HTTP/1.1 431 Request Header Fields Too Large";

pub const INTERNAL_ERROR_BODY: &str = r#"{"message":"internal error"}"#;

pub const TOKEN_HEADER: &str = "x-jwt-token";
pub const MAX_BODY_BYTES: usize = 64 * 1024;
pub const MAX_HEADER_BYTES: usize = 8 * 1024;
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);
