//! Admin panel server

use barehttp_core::config::{generic_port, resolve_listen_url};
use barehttp_core::shell::{native, CommandRunner};
use barehttp_services::admin::{self, AdminPanel};
use barehttp_services::launch::{self, CommonArgs};
use clap::Parser;
use std::time::Duration;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "admin-panel", about = "Diagnostic commands over HTTP", version)]
struct Cli {
    /// Listen URL, e.g. http://0.0.0.0:8080/
    #[arg(long, env = "ADMINPANEL_URL")]
    url: Option<String>,

    /// Listen port, used when no URL is given
    #[arg(long, env = "ADMINPANEL_PORT")]
    port: Option<String>,

    /// Shared secret for /shell; without it only loopback peers may run commands
    #[arg(long, env = admin::TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Kill commands running longer than this many seconds
    #[arg(long, env = "ADMINPANEL_COMMAND_TIMEOUT")]
    command_timeout: Option<u64>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    launch::init_logging(&cli.common);

    let url = resolve_listen_url(
        cli.url.as_deref(),
        cli.port.as_deref(),
        generic_port().as_deref(),
        admin::DEFAULT_URL,
        admin::DEFAULT_PORT,
    );
    let timeout = cli.command_timeout.map(Duration::from_secs);
    let runner = CommandRunner::new(native()).with_timeout(timeout);
    let token_state = match cli.token.as_deref() {
        Some(token) if !token.is_empty() => "set",
        _ => "unset (loopback only)",
    };
    tracing::info!(
        "shell dialect {}, token {}",
        runner.dialect().name(),
        token_state
    );

    let state = admin::routes(AdminPanel::new(runner, cli.token));
    launch::serve(state, &url, &cli.common)
}
