use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader, Take};

use crate::constants::{MAX_BODY_BYTES, MAX_HEADER_BYTES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl TryFrom<&str> for Method {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, anyhow::Error> {
        match value {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            other => Err(anyhow::anyhow!("Method {other} not supported")),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("request body larger than {MAX_BODY_BYTES} bytes")]
pub struct BodyTooLarge;

#[derive(Debug, thiserror::Error)]
#[error("request line and headers larger than {MAX_HEADER_BYTES} bytes")]
pub struct HeadersTooLarge;

pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Request {
    pub async fn new<Reader>(reader: Reader) -> Result<Self>
    where
        Reader: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        // Request line and headers share one byte budget.
        let mut head = (&mut reader).take(MAX_HEADER_BYTES as u64);

        // Method and path
        let mut first = String::new();
        read_head_line(&mut head, &mut first)
            .await
            .context("Failed to read request line")?;
        if first.trim().is_empty() {
            bail!("Empty Request");
        }
        let mut request_parts = first.split_whitespace();
        let method: Method = request_parts
            .next()
            .ok_or(anyhow::anyhow!("missing method"))
            .and_then(TryInto::try_into)
            .context("Missing Method")?;
        let path = request_parts.next().context("No Path")?;

        // Headers
        let mut headers = HashMap::new();
        loop {
            let mut line = String::new();
            let read = read_head_line(&mut head, &mut line)
                .await
                .context("Failed to read header")?;
            let line = line.trim_end();
            if read == 0 || line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.insert(k.trim().to_lowercase(), v.trim().to_string());
            }
        }

        drop(head);

        // Body
        let length = match headers.get("content-length") {
            Some(raw) => raw.parse::<usize>().context("Invalid Content-Length")?,
            None => 0,
        };
        if length > MAX_BODY_BYTES {
            return Err(BodyTooLarge.into());
        }
        let mut body = vec![0; length];
        reader
            .read_exact(&mut body)
            .await
            .context("Truncated body")?;

        Ok(Request {
            method,
            path: path.into(),
            headers,
            body: String::from_utf8(body).context("Body is not utf-8")?,
        })
    }

    /// Path segments with the query string dropped.
    pub fn segments(&self) -> Vec<&str> {
        let path = self.path.split('?').next().unwrap_or_default();
        path.split('/').filter(|s| !s.is_empty()).collect()
    }
}

/// Reads one line of the request head, failing once the head budget is spent
/// before the line ends.
async fn read_head_line<R>(head: &mut Take<R>, line: &mut String) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let read = head.read_line(line).await?;
    if head.limit() == 0 && !line.ends_with('\n') {
        return Err(HeadersTooLarge.into());
    }
    Ok(read)
}
