use crate::account::controller::{AccountController, Reply, message};
use crate::constants::{
    BAD_REQUEST, HEADERS_TOO_LARGE, NOT_FOUND, PAYLOAD_TOO_LARGE, READ_TIMEOUT, REQUEST_TIMEOUT,
};
use crate::req::Method::{DELETE, GET, POST};
use crate::req::{BodyTooLarge, HeadersTooLarge, Request};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot::Receiver;
use tracing::{error, info, warn};

pub struct Server {
    controller: Arc<AccountController>,
}

impl Server {
    pub fn new(controller: Arc<AccountController>) -> Self {
        Self { controller }
    }

    pub async fn start(&self, addr: SocketAddr, mut shutdown_rx: Receiver<()>) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("Server running on http://{}", listener.local_addr()?);

        loop {
            tokio::select! {
                conn = listener.accept() => {
                    let (mut stream, peer) = match conn {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!("accept failed: {e}");
                            continue;
                        }
                    };

                    let controller = Arc::clone(&self.controller);

                    tokio::spawn(async move {
                        let (reader, writer) = stream.split();
                        if let Err(e) = Self::handle_client(reader, writer, &controller).await {
                            error!(%peer, "Connection error: {e:#}");
                        }
                    });
                }
                _ = &mut shutdown_rx => {
                    info!("Shutting down server...");
                    break;
                }
            }
        }
        Ok(())
    }

    pub async fn handle_client<Reader, Writer>(
        reader: Reader,
        mut writer: Writer,
        controller: &AccountController,
    ) -> Result<()>
    where
        Reader: AsyncRead + Unpin,
        Writer: AsyncWrite + Unpin,
    {
        let (status_line, content) = match tokio::time::timeout(READ_TIMEOUT, Request::new(reader)).await {
            Ok(Ok(request)) => Self::route(&request, controller).await,
            Ok(Err(e)) if e.is::<BodyTooLarge>() => message(PAYLOAD_TOO_LARGE, &e.to_string()),
            Ok(Err(e)) if e.is::<HeadersTooLarge>() => {
                warn!("{e}");
                message(HEADERS_TOO_LARGE, "request headers too large")
            }
            Ok(Err(e)) => {
                warn!("bad request: {e:#}");
                message(BAD_REQUEST, "malformed request")
            }
            Err(_) => {
                warn!("no complete request within {READ_TIMEOUT:?}");
                message(REQUEST_TIMEOUT, "request timeout")
            }
        };

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{content}",
            content.len()
        );
        writer
            .write_all(response.as_bytes())
            .await
            .context("Failed to write")?;
        writer.flush().await.context("Failed to flush")
    }

    async fn route(request: &Request, controller: &AccountController) -> Reply {
        info!("{} {}", request.method, request.path);

        match (&request.method, request.segments().as_slice()) {
            (POST, ["login"]) => controller.login(&request.body).await,
            (GET, ["account"]) => controller.list_accounts().await,
            (POST, ["account"]) => controller.create_account(&request.body).await,
            (DELETE, ["account"]) => controller.delete_accounts().await,
            (GET, ["account", id]) => controller.get_account(&request.headers, id).await,
            (DELETE, ["account", id]) => controller.delete_account(&request.headers, id).await,
            (POST, ["transfer"]) => controller.transfer(&request.body).await,
            (method, ["login" | "account" | "transfer"] | ["account", _]) => {
                message(BAD_REQUEST, &format!("unsupported method {method}"))
            }
            _ => message(NOT_FOUND, "not found"),
        }
    }
}
