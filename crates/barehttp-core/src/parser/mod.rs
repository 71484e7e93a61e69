//! HTTP/1.1 request head parser
//!
//! Reads one request line and its header block straight off a buffered
//! byte stream. Only the subset needed for `GET` with `Connection: close`
//! is supported; bodies are read only on explicit request via [`read_body`].

mod method;

pub use method::Method;

use crate::{Error, Request, Result};
use std::net::SocketAddr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt};

/// Maximum number of headers to parse
pub const MAX_HEADERS: usize = 64;

/// Maximum length of the request line or of one header line, in bytes
pub const MAX_LINE: usize = 8 * 1024;

/// Read one line terminated by LF (a preceding CR is stripped).
///
/// Returns `Ok(None)` on EOF before any byte was read.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            if line.is_empty() {
                return Ok(None);
            }
            break;
        }

        let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
            Some(i) => (&available[..i], Some(i + 1)),
            None => (available, None),
        };
        if line.len() + chunk.len() > MAX_LINE {
            return Err(Error::HeadTooLarge(format!("line exceeds {} bytes", MAX_LINE)));
        }
        line.extend_from_slice(chunk);

        match done {
            Some(consumed) => {
                reader.consume(consumed);
                break;
            }
            None => {
                let n = available.len();
                reader.consume(n);
            }
        }
    }

    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Read one request head from the stream.
///
/// Returns `Ok(None)` when the peer closed (or sent an empty line) before
/// any request line arrived.
pub async fn read_request<R>(reader: &mut R, peer: SocketAddr) -> Result<Option<Request>>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_line(reader).await? {
        Some(line) if !line.is_empty() => line,
        _ => return Ok(None),
    };

    let parts: Vec<&str> = request_line.split(' ').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(Error::MalformedRequest(format!(
            "expected `METHOD TARGET VERSION`, got {:?}",
            request_line
        )));
    }

    let mut request = Request::new(parts[0], parts[1], peer);

    while let Some(line) = read_line(reader).await? {
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if request.headers.len() == MAX_HEADERS {
            return Err(Error::MalformedRequest(format!(
                "more than {} headers",
                MAX_HEADERS
            )));
        }
        request.headers.push((name.to_string(), value.trim().to_string()));
    }

    Ok(Some(request))
}

/// Read exactly `content_length` body bytes.
pub async fn read_body<R>(reader: &mut R, content_length: usize, limit: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    if content_length > limit {
        return Err(Error::BodyTooLarge {
            size: content_length,
            limit,
        });
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;
    Ok(body)
}
