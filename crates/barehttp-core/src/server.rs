//! Native HTTP server implementation
//!
//! One accept loop per service:
//! - socket2 listener with SO_REUSEADDR and TCP_NODELAY
//! - one tokio task per connection, one request per connection
//! - GET-only dispatch through the trie router
//! - `Connection: close` after every response

use crate::handlers::StaticFiles;
use crate::parser;
use crate::response::http_date;
use crate::{Request, Response, Result, Router};
use futures_util::FutureExt;
use socket2::{Domain, Protocol, Socket, Type};
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Largest declared body drained before answering a rejected method
pub const MAX_DRAIN: usize = 64 * 1024;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Service name, used for the `Server` header and logs
    pub name: String,
    pub addr: SocketAddr,
    pub workers: usize,
}

impl ServerConfig {
    pub fn new(name: impl Into<String>, addr: SocketAddr) -> Self {
        Self {
            name: name.into(),
            addr,
            workers: num_cpus::get(),
        }
    }

    /// Multi-threaded runtime sized to `workers`
    pub fn runtime(&self) -> std::io::Result<tokio::runtime::Runtime> {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.workers.max(1))
            .enable_all()
            .build()
    }
}

/// Dynamic route handler type
pub type DynamicHandler = Arc<
    dyn Fn(Request) -> Pin<Box<dyn Future<Output = Result<Response>> + Send>> + Send + Sync,
>;

/// Server state shared across all connections
///
/// Routes are registered before the server starts and never change
/// afterwards, so lookups need no locking.
pub struct ServerState {
    name: String,
    server_header: String,
    router: Router,
    handlers: HashMap<u32, DynamicHandler>,
    next_id: u32,
}

impl ServerState {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            server_header: format!("{}-Tcp", name),
            name,
            router: Router::new(),
            handlers: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the `Server` response header
    pub fn server_header(&self) -> &str {
        &self.server_header
    }

    /// Register a GET route
    pub fn route<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response>> + Send + 'static,
    {
        let handler: DynamicHandler = Arc::new(move |req| Box::pin(handler(req)));
        self.add_dynamic("GET", path, handler);
        self
    }

    /// Serve `files` for every GET path no other route matches
    pub fn static_files(self, files: StaticFiles) -> Self {
        let files = Arc::new(files);
        self.route("/*path", move |req: Request| {
            let files = files.clone();
            async move { Ok(files.serve(&req.path).await) }
        })
    }

    /// Add a dynamic route
    pub fn add_dynamic(&mut self, method: &str, path: &str, handler: DynamicHandler) -> u32 {
        let handler_id = self.next_id;
        self.next_id += 1;
        self.router.insert(method, path, handler_id);
        self.handlers.insert(handler_id, handler);
        handler_id
    }

    /// Match and handle a request
    ///
    /// Never fails: handler errors and panics become a 500 page.
    pub async fn handle(&self, req: Request) -> Response {
        tracing::info!("{} {} from {}", req.method, req.target, req.peer);

        if !req.is_get() {
            return Response::method_not_allowed();
        }

        let handler = self
            .router
            .find("GET", &req.path)
            .and_then(|matched| self.handlers.get(&matched.handler_id).cloned());
        let Some(handler) = handler else {
            return Response::not_found("Not Found");
        };

        match AssertUnwindSafe(async move { handler(req).await })
            .catch_unwind()
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(service = %self.name, "handler failed: {}", e);
                Response::internal_error("Internal Server Error")
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                tracing::error!(service = %self.name, "handler panicked: {}", reason);
                Response::internal_error("Internal Server Error")
            }
        }
    }
}

/// Create a TCP socket with optimizations
pub fn create_optimized_socket(addr: &SocketAddr) -> std::io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Rebinding right after a restart must not fail on TIME_WAIT
    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;

    Ok(socket)
}

/// A bound listener plus the routes it serves
pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl Server {
    /// Bind `addr`. Must be called inside a tokio runtime.
    pub async fn bind(addr: SocketAddr, state: ServerState) -> Result<Self> {
        let socket = create_optimized_socket(&addr)?;
        socket.set_nonblocking(true)?;
        let listener = TcpListener::from_std(socket.into())?;
        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves. In-flight connections are not drained.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(service = %self.state.name(), "listener stopped");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let state = self.state.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, peer, &state).await;
                        });
                    }
                    Err(e) => {
                        tracing::error!(service = %self.state.name(), "accept failed: {}", e);
                    }
                },
            }
        }
    }
}

/// Read one request, answer it, close the connection
async fn handle_connection(mut stream: TcpStream, peer: SocketAddr, state: &ServerState) {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half);

    let response = match parser::read_request(&mut reader, peer).await {
        Ok(None) => return,
        Ok(Some(req)) => {
            if !req.is_get() {
                drain_body(&mut reader, &req).await;
            }
            state.handle(req).await
        }
        Err(e) if e.is_client_error() => {
            tracing::info!("bad request from {}: {}", peer, e);
            Response::bad_request("Bad Request")
        }
        Err(e) => {
            tracing::debug!("read from {} failed: {}", peer, e);
            return;
        }
    };

    let bytes = response.to_http1_bytes(state.server_header(), &http_date());
    if let Err(e) = write_all_and_close(&mut write_half, &bytes).await {
        tracing::debug!("write to {} failed: {}", peer, e);
    }
}

/// Consume a small declared body so the client sees our answer
async fn drain_body<R>(reader: &mut R, req: &Request)
where
    R: tokio::io::AsyncRead + Unpin,
{
    match req.content_length() {
        Some(len) if len > 0 && len <= MAX_DRAIN => {
            if let Err(e) = parser::read_body(reader, len, MAX_DRAIN).await {
                tracing::debug!("could not drain body from {}: {}", req.peer, e);
            }
        }
        _ => {}
    }
}

async fn write_all_and_close<W>(writer: &mut W, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(bytes).await?;
    writer.flush().await?;
    writer.shutdown().await
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
