//! HTTP Request types

use crate::parser::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// HTTP Request
///
/// Built once per accepted connection and never mutated after parsing.
#[derive(Debug, Clone)]
pub struct Request {
    /// Method token exactly as sent
    pub method: String,
    /// Raw request target (path plus optional `?query`)
    pub target: String,
    /// Request path (target up to the first `?`)
    pub path: String,
    /// Raw query string (without leading ?), empty if absent
    pub query: String,
    /// Request headers in arrival order, duplicates kept
    pub headers: SmallVec<[(String, String); 16]>,
    /// Remote end of the connection
    pub peer: SocketAddr,
}

impl Request {
    /// Create a new request, splitting the target on its first `?`
    pub fn new(method: impl Into<String>, target: impl Into<String>, peer: SocketAddr) -> Self {
        let target = target.into();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (target.clone(), String::new()),
        };
        Self {
            method: method.into(),
            target,
            path,
            query,
            headers: SmallVec::new(),
            peer,
        }
    }

    /// Typed method, if it is one we know
    pub fn method(&self) -> Option<Method> {
        Method::from_name(&self.method)
    }

    /// GET check, case-insensitive on the method token
    pub fn is_get(&self) -> bool {
        self.method() == Some(Method::Get)
    }

    /// Get a header value (case-insensitive name, first occurrence wins)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get content-length header
    pub fn content_length(&self) -> Option<usize> {
        self.header("content-length").and_then(|v| v.trim().parse().ok())
    }

    /// Absolute base URL for links in rendered pages, e.g. `http://host:8080/`
    pub fn base_url(&self, default_port: u16) -> String {
        match self.header("host") {
            Some(host) if !host.is_empty() => format!("http://{}/", host),
            _ => format!("http://localhost:{}/", default_port),
        }
    }

    /// Whether the peer is a loopback address (IPv4-mapped IPv6 included)
    pub fn is_loopback(&self) -> bool {
        is_loopback(self.peer.ip())
    }

    /// Parse the query string
    pub fn query_params(&self) -> QueryParams {
        QueryParams::parse(&self.query)
    }
}

/// Loopback test that also accepts `::ffff:127.0.0.1`
pub fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
        }
    }
}

/// Decoded query parameters
///
/// Keys are case-sensitive; on duplicate keys the first occurrence wins.
/// A key without `=` maps to the empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Parse a raw query string
    pub fn parse(query: &str) -> Self {
        let mut params = HashMap::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params
                .entry(urlencoding_decode(key))
                .or_insert_with(|| urlencoding_decode(value));
        }
        Self { params }
    }

    /// Get a decoded value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|s| s.as_str())
    }

    /// Get a value, treating missing and whitespace-only as absent
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Builder for constructing requests
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new builder; the peer defaults to 127.0.0.1:0
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        let peer = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
        Self {
            request: Request::new(method, target, peer),
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Set the remote address
    pub fn peer(mut self, peer: SocketAddr) -> Self {
        self.request.peer = peer;
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        self.request
    }
}

/// URL decoding for query components: `+` is a space
pub fn urlencoding_decode(s: &str) -> String {
    decode(s, true)
}

/// URL decoding for path components: `+` stays literal
pub fn percent_decode_path(s: &str) -> String {
    decode(s, false)
}

fn decode(s: &str, plus_as_space: bool) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                        continue;
                    }
                    _ => out.push(b'%'),
                }
            }
            b'+' if plus_as_space => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
