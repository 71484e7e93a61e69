//! Admin panel: diagnostic commands and an allowlisted pseudo-terminal
//!
//! ## Routes
//! - `/` - home page
//! - `/exec?key=K[&path=P]` - one fixed diagnostic command
//! - `/shell?q=TEXT[&token=T]` - free text through the sanitizer
//!
//! `/shell` is gated: with a shared secret configured every request must
//! carry the exact `token`; without one only loopback peers may run commands.

pub mod pages;

use barehttp_core::shell::{diagnostics, sanitizer, CommandRunner};
use barehttp_core::{Request, Response, Result, ServerState};
use pages::ShellView;
use std::sync::Arc;

/// Service name, also used for the `Server` header
pub const NAME: &str = "AdminPanel";
pub const DEFAULT_URL: &str = "http://127.0.0.1:8080/";
pub const DEFAULT_PORT: u16 = 8080;
/// Environment variable holding the `/shell` shared secret
pub const TOKEN_ENV: &str = "ADMINPANEL_TOKEN";

/// Admin panel handlers
#[derive(Debug, Clone)]
pub struct AdminPanel {
    runner: CommandRunner,
    token: Option<String>,
}

impl AdminPanel {
    /// An empty token counts as unset
    pub fn new(runner: CommandRunner, token: Option<String>) -> Self {
        Self {
            runner,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Whether `req` may use the shell
    pub fn authorized(&self, req: &Request, supplied: Option<&str>) -> bool {
        match &self.token {
            Some(expected) => supplied == Some(expected.as_str()),
            None => req.is_loopback(),
        }
    }

    pub fn home(&self, req: &Request) -> Response {
        let vocabulary = sanitizer::vocabulary(self.runner.dialect());
        Response::ok_html(pages::home(
            &req.base_url(DEFAULT_PORT),
            &diagnostics::KEYS,
            &vocabulary,
        ))
    }

    pub async fn exec(&self, req: &Request) -> Result<Response> {
        let params = req.query_params();
        let Some(key) = params.non_blank("key") else {
            return Ok(Response::bad_request("Query parameter 'key' is required"));
        };
        let Some(spec) = diagnostics::build(self.runner.dialect(), key, params.get("path")) else {
            return Ok(Response::bad_request("Unknown or disallowed command key"));
        };

        let output = self.runner.run(&spec.command).await?;
        tracing::info!(
            "{} exited {} in {}ms",
            spec.title,
            output.exit_code,
            output.elapsed_ms
        );
        Ok(Response::ok_html(pages::command_result(
            &spec.title,
            &spec.command,
            &output,
        )))
    }

    pub async fn shell(&self, req: &Request) -> Result<Response> {
        let params = req.query_params();
        let q = params.get("q").unwrap_or("");
        if q.trim().is_empty() {
            return Ok(Response::ok_html(pages::shell("", ShellView::Blank)));
        }

        if !self.authorized(req, params.get("token")) {
            tracing::warn!("shell refused for {}", req.peer);
            return Ok(Response::forbidden("Forbidden"));
        }

        let command = match sanitizer::try_build(self.runner.dialect(), q) {
            Ok(command) => command,
            Err(rejection) => {
                tracing::info!("shell rejected {:?}: {}", q, rejection);
                return Ok(Response::html(
                    barehttp_core::StatusCode::BAD_REQUEST,
                    pages::shell(q, ShellView::Rejected(rejection)),
                ));
            }
        };

        let output = self.runner.run(&command.command).await?;
        tracing::info!("shell {:?} -> {}", q, command.command);
        Ok(Response::ok_html(pages::shell(
            q,
            ShellView::Ran {
                command: &command,
                output: &output,
            },
        )))
    }
}

/// Route table for the admin panel
pub fn routes(panel: AdminPanel) -> ServerState {
    let panel = Arc::new(panel);
    let home = panel.clone();
    let exec = panel.clone();
    let shell = panel;

    ServerState::new(NAME)
        .route("/", move |req: Request| {
            let panel = home.clone();
            async move { Ok(panel.home(&req)) }
        })
        .route("/exec", move |req: Request| {
            let panel = exec.clone();
            async move { panel.exec(&req).await }
        })
        .route("/shell", move |req: Request| {
            let panel = shell.clone();
            async move { panel.shell(&req).await }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use barehttp_core::shell::Posix;
    use barehttp_core::{RequestBuilder, StatusCode};
    use std::net::SocketAddr;

    fn remote() -> SocketAddr {
        "10.1.2.3:50000".parse().unwrap()
    }

    fn panel(token: Option<&str>) -> AdminPanel {
        AdminPanel::new(CommandRunner::new(&Posix), token.map(String::from))
    }

    #[test]
    fn test_empty_token_is_unset() {
        let p = panel(Some(""));
        let local = RequestBuilder::new("GET", "/shell").build();
        let far = RequestBuilder::new("GET", "/shell").peer(remote()).build();
        assert!(p.authorized(&local, None));
        assert!(!p.authorized(&far, Some("")));
    }

    #[test]
    fn test_token_must_match_exactly() {
        let p = panel(Some("s3cret"));
        let far = RequestBuilder::new("GET", "/shell").peer(remote()).build();
        let local = RequestBuilder::new("GET", "/shell").build();
        assert!(p.authorized(&far, Some("s3cret")));
        assert!(!p.authorized(&far, Some("S3CRET")));
        assert!(!p.authorized(&far, Some("s3cret ")));
        assert!(!p.authorized(&far, None));
        // Loopback does not bypass a configured secret
        assert!(!p.authorized(&local, None));
    }

    #[tokio::test]
    async fn test_shell_from_remote_without_token_is_forbidden() {
        let state = routes(panel(None));
        let req = RequestBuilder::new("GET", "/shell?q=whoami").peer(remote()).build();
        assert_eq!(state.handle(req).await.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_blank_shell_needs_no_auth() {
        let state = routes(panel(None));
        let req = RequestBuilder::new("GET", "/shell?q=+").peer(remote()).build();
        let res = state.handle(req).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body_string().unwrap().contains("name=\"q\""));
    }

    #[tokio::test]
    async fn test_shell_rejection_is_400() {
        let state = routes(panel(None));
        let req = RequestBuilder::new("GET", "/shell?q=ls%3B+id").build();
        let res = state.handle(req).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.body_string().unwrap().contains("Rejected: Bad chars"));
    }

    #[tokio::test]
    async fn test_exec_validation() {
        let state = routes(panel(None));
        let res = state.handle(RequestBuilder::new("GET", "/exec").build()).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.body_string().unwrap().contains("Query parameter &#39;key&#39; is required"));

        let res = state.handle(RequestBuilder::new("GET", "/exec?key=rm").build()).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.body_string().unwrap().contains("Unknown or disallowed command key"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exec_runs_whoami() {
        let state = routes(panel(None));
        let res = state.handle(RequestBuilder::new("GET", "/exec?key=WHOAMI").build()).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body_string().unwrap().contains("<code>whoami</code>"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_from_loopback_runs() {
        let state = routes(panel(None));
        let res = state.handle(RequestBuilder::new("GET", "/shell?q=whoami").build()).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body_string().unwrap().contains("<code>whoami</code>"));
    }

    #[tokio::test]
    async fn test_home() {
        let state = routes(panel(None));
        let req = RequestBuilder::new("GET", "/").header("Host", "admin.local:9000").build();
        let res = state.handle(req).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res
            .body_string()
            .unwrap()
            .contains("http://admin.local:9000/exec?key=uptime"));
    }
}
