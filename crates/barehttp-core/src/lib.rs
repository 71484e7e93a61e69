//! barehttp-core: minimal HTTP/1.1 server over raw TCP sockets
//!
//! Everything a small GET-only service needs, without an HTTP framework:
//! request parsing, routing, fixed-length `Connection: close` responses,
//! static files and an allowlisted shell executor.
//!
//! ## Modules
//! - [`parser`] - request line and header block off the socket
//! - [`server`] - listener loop and dispatch
//! - [`shell`] - shell dialects, sanitizer, diagnostics and executor
//! - [`handlers`] - static file serving
//! - [`config`] - listen URL resolution
//! - [`log`] - console and hourly file logging

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod html;
pub mod log;
pub mod parser;
pub mod request;
pub mod response;
pub mod server;
pub mod shell;

// Re-exports
pub use barehttp_router::{Match, Router};
pub use config::{resolve_listen_url, ListenUrl};
pub use error::{Error, Result};
pub use handlers::StaticFiles;
pub use parser::Method;
pub use request::{QueryParams, Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode, HTML_UTF8};
pub use server::{create_optimized_socket, DynamicHandler, Server, ServerConfig, ServerState};
