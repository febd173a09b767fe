use bank_accounts::{
    account::{model::LoginResponse, repository::AccountStore},
    constants::{MAX_BODY_BYTES, MAX_HEADER_BYTES, READ_TIMEOUT},
    server::Server,
};
use common::setup_controller;
use serde_json::json;
mod common;

async fn send(controller: &bank_accounts::account::controller::AccountController, raw: &str) -> String {
    let mut out = Vec::new();
    Server::handle_client(raw.as_bytes(), &mut out, controller)
        .await
        .expect("handle client");
    String::from_utf8(out).unwrap()
}

fn request(method: &str, path: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n");
    for (k, v) in headers {
        raw.push_str(&format!("{k}: {v}\r\n"));
    }
    raw.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
    raw
}

fn body_of(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or_default()
}

#[tokio::test]
async fn login_over_http() {
    let (repository, controller) = setup_controller().await;
    let account = repository.create("John", "Doe", "password").await.unwrap();

    let body = json!({ "number": account.number, "password": "password" }).to_string();
    let response = send(&controller, &request("POST", "/login", &[], &body)).await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Content-Type: application/json"));
    let login: LoginResponse = serde_json::from_str(body_of(&response)).unwrap();
    assert_eq!(login.number, account.number);

    let body = json!({ "number": account.number, "password": "nope" }).to_string();
    let response = send(&controller, &request("POST", "/login", &[], &body)).await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn guarded_route_reads_token_header() {
    let (repository, controller) = setup_controller().await;
    let account = repository.create("John", "Doe", "pw").await.unwrap();
    let body = json!({ "number": account.number, "password": "pw" }).to_string();
    let login = send(&controller, &request("POST", "/login", &[], &body)).await;
    let token = serde_json::from_str::<LoginResponse>(body_of(&login))
        .unwrap()
        .access_token;
    let path = format!("/account/{}", account.id);

    let response = send(&controller, &request("GET", &path, &[("X-JWT-Token", token.as_str())], "")).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

    let response = send(&controller, &request("GET", &path, &[], "")).await;
    assert!(response.starts_with("HTTP/1.1 401 Unauthorized\r\n"));
    assert_eq!(body_of(&response), r#"{"message":"access denied"}"#);

    let response = send(&controller, &request("DELETE", &path, &[("x-jwt-token", token.as_str())], "")).await;
    assert_eq!(body_of(&response), r#"{"message":"Account deleted"}"#);
}

#[tokio::test]
async fn account_collection_routes() {
    let (_, controller) = setup_controller().await;

    let body = json!({ "first_name": "John", "last_name": "Doe", "password": "pw" }).to_string();
    let response = send(&controller, &request("POST", "/account", &[], &body)).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));

    let response = send(&controller, &request("GET", "/account?page=1", &[], "")).await;
    let accounts: Vec<serde_json::Value> = serde_json::from_str(body_of(&response)).unwrap();
    assert_eq!(accounts.len(), 1);
    assert!(accounts[0].get("encrypted_password").is_none());

    let response = send(&controller, &request("DELETE", "/account", &[], "")).await;
    assert_eq!(body_of(&response), r#"{"message":"All accounts deleted"}"#);
}

#[tokio::test]
async fn transfer_route_acknowledges() {
    let (_, controller) = setup_controller().await;
    let response = send(&controller, &request("POST", "/transfer", &[], "{}")).await;
    assert_eq!(body_of(&response), r#"{"message":"Transfer successful"}"#);
}

#[tokio::test]
async fn unknown_route_and_method() {
    let (_, controller) = setup_controller().await;

    let response = send(&controller, &request("GET", "/nowhere", &[], "")).await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));

    let response = send(&controller, &request("PUT", "/account", &[], "")).await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert_eq!(body_of(&response), r#"{"message":"unsupported method PUT"}"#);

    let response = send(&controller, "BREW /coffee HTTP/1.1\r\n\r\n").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    let response = send(&controller, "").await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let (_, controller) = setup_controller().await;
    let raw = format!(
        "POST /account HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        MAX_BODY_BYTES + 1
    );
    let response = send(&controller, &raw).await;
    assert!(response.starts_with("HTTP/1.1 413 Payload Too Large\r\n"));
}

#[tokio::test]
async fn oversized_header_is_refused() {
    let (_, controller) = setup_controller().await;
    let padding = "a".repeat(MAX_HEADER_BYTES * 4);
    let response = send(&controller, &request("GET", "/account", &[("X-Pad", padding.as_str())], "")).await;
    assert!(response.starts_with("HTTP/1.1 431 Request Header Fields Too Large\r\n"));
}

#[tokio::test]
async fn too_many_headers_are_refused() {
    let (_, controller) = setup_controller().await;
    let mut raw = String::from("GET /account HTTP/1.1\r\n");
    for i in 0..10_000 {
        raw.push_str(&format!("X-H{i}: v\r\n"));
    }
    raw.push_str("\r\n");
    let response = send(&controller, &raw).await;
    assert!(response.starts_with("HTTP/1.1 431 Request Header Fields Too Large\r\n"));
}

#[tokio::test]
async fn oversized_request_line_is_refused() {
    let (_, controller) = setup_controller().await;
    let path = format!("/account/{}", "9".repeat(MAX_HEADER_BYTES));
    let response = send(&controller, &request("GET", &path, &[], "")).await;
    assert!(response.starts_with("HTTP/1.1 431 Request Header Fields Too Large\r\n"));
}

#[tokio::test]
async fn headers_just_under_limit_are_accepted() {
    let (_, controller) = setup_controller().await;
    let padding = "a".repeat(MAX_HEADER_BYTES / 2);
    let response = send(&controller, &request("GET", "/account", &[("X-Pad", padding.as_str())], "")).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn silent_client_times_out() {
    let (_, controller) = setup_controller().await;
    tokio::time::pause();
    // Keep the client half open so the read never sees EOF.
    let (_client, server_side) = tokio::io::duplex(1024);
    let (reader, _) = tokio::io::split(server_side);

    let mut out = Vec::new();
    let started = tokio::time::Instant::now();
    Server::handle_client(reader, &mut out, &controller)
        .await
        .expect("handle client");

    assert!(started.elapsed() >= READ_TIMEOUT);
    let response = String::from_utf8(out).unwrap();
    assert!(response.starts_with("HTTP/1.1 408 Request Timeout\r\n"));
}

#[tokio::test]
async fn non_numeric_path_id_does_not_crash() {
    let (_, controller) = setup_controller().await;
    let response = send(&controller, &request("GET", "/account/abc", &[], "")).await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
}
