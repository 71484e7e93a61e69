//! HTTP Response types and HTTP/1.1 serialization

use crate::html;
use smallvec::SmallVec;

/// HTTP Status Code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Reason phrase; codes we never send render as `Unknown`
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            400 => "Bad Request",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// Content type used for every HTML page we produce
pub const HTML_UTF8: &str = "text/html; charset=utf-8";

/// HTTP Response
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: StatusCode,
    /// Content-Type header value
    pub content_type: String,
    /// Extra headers, written after the fixed ones
    pub headers: SmallVec<[(String, String); 4]>,
    /// Response body
    pub body: bytes::Bytes,
}

impl Response {
    /// Create a new, empty response
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8".to_string(),
            headers: SmallVec::new(),
            body: bytes::Bytes::new(),
        }
    }

    /// Create an HTML response with an arbitrary status
    pub fn html(status: StatusCode, body: impl Into<bytes::Bytes>) -> Self {
        ResponseBuilder::new(status)
            .content_type(HTML_UTF8)
            .body(body)
            .build()
    }

    /// Create a 200 HTML response
    pub fn ok_html(body: impl Into<bytes::Bytes>) -> Self {
        Self::html(StatusCode::OK, body)
    }

    /// Minimal HTML error document embedding the escaped message
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::html(status, html::error_page(status.as_u16(), message))
    }

    pub fn bad_request(message: &str) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::error(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::error(StatusCode::NOT_FOUND, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    pub fn internal_error(message: &str) -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Get body as string (if UTF-8)
    pub fn body_string(&self) -> Option<String> {
        std::str::from_utf8(&self.body).ok().map(|s| s.to_string())
    }

    /// Serialize to HTTP/1.1 wire format.
    ///
    /// Header order is fixed: Content-Type, Content-Length, Connection,
    /// Date, Server, then any extra headers.
    pub fn to_http1_bytes(&self, server: &str, date: &str) -> bytes::Bytes {
        let mut buf = Vec::with_capacity(256 + self.body.len());

        // Status line
        buf.extend_from_slice(b"HTTP/1.1 ");
        buf.extend_from_slice(self.status.0.to_string().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.status.reason_phrase().as_bytes());
        buf.extend_from_slice(b"\r\n");

        let length = self.body.len().to_string();
        let fixed = [
            ("Content-Type", self.content_type.as_str()),
            ("Content-Length", length.as_str()),
            ("Connection", "close"),
            ("Date", date),
            ("Server", server),
        ];
        for (name, value) in fixed
            .iter()
            .copied()
            .chain(self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        // End of headers
        buf.extend_from_slice(b"\r\n");

        // Body
        buf.extend_from_slice(&self.body);

        bytes::Bytes::from(buf)
    }
}

/// Current time as an RFC 1123 `Date` header value
pub fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Builder for constructing responses
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    /// Create a new builder
    pub fn new(status: StatusCode) -> Self {
        Self {
            response: Response::new(status),
        }
    }

    /// Set the Content-Type
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.response.content_type = value.into();
        self
    }

    /// Add an extra header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.headers.push((name.into(), value.into()));
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.response.body = body.into();
        self
    }

    /// Build the response
    pub fn build(self) -> Response {
        self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "Sun, 06 Nov 1994 08:49:37 GMT";

    #[test]
    fn test_status_code() {
        assert_eq!(StatusCode::FORBIDDEN.as_u16(), 403);
        assert_eq!(StatusCode::METHOD_NOT_ALLOWED.to_string(), "405 Method Not Allowed");
    }

    #[test]
    fn test_reason_placeholder() {
        assert_eq!(StatusCode(418).reason_phrase(), "Unknown");
        assert_eq!(StatusCode(302).reason_phrase(), "Unknown");
    }

    #[test]
    fn test_response_to_http1_order() {
        let res = ResponseBuilder::new(StatusCode::OK)
            .content_type("image/svg+xml; charset=utf-8")
            .header("X-Extra", "1")
            .body("<svg/>")
            .build();

        let bytes = res.to_http1_bytes("Drawer-Tcp", DATE);
        let s = std::str::from_utf8(&bytes).unwrap();

        assert_eq!(
            s,
            "HTTP/1.1 200 OK\r\n\
             Content-Type: image/svg+xml; charset=utf-8\r\n\
             Content-Length: 6\r\n\
             Connection: close\r\n\
             Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n\
             Server: Drawer-Tcp\r\n\
             X-Extra: 1\r\n\
             \r\n\
             <svg/>"
        );
    }

    #[test]
    fn test_content_length_counts_utf8_bytes() {
        let res = Response::ok_html("héllo");
        let bytes = res.to_http1_bytes("T", DATE);
        let s = std::str::from_utf8(&bytes).unwrap();
        assert!(s.contains("Content-Length: 6\r\n"));
    }

    #[test]
    fn test_empty_body_has_zero_length() {
        let res = Response::new(StatusCode::OK);
        let bytes = res.to_http1_bytes("T", DATE);
        let s = std::str::from_utf8(&bytes).unwrap();
        assert!(s.contains("Content-Length: 0\r\n"));
        assert!(s.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_error_response_is_escaped_html() {
        let res = Response::bad_request("<script>alert(1)</script>");
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.content_type, HTML_UTF8);
        let body = res.body_string().unwrap();
        assert!(body.contains("<h1>Error 400</h1>"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn test_http_date_format() {
        let date = http_date();
        assert!(date.ends_with(" GMT"));
        assert_eq!(date.len(), DATE.len());
        assert_eq!(&date[3..5], ", ");
    }
}
