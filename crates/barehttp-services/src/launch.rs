//! Startup shared by the service binaries

use anyhow::Context;
use barehttp_core::{ListenUrl, Server, ServerConfig, ServerState};
use clap::Args;
use std::path::PathBuf;

/// Flags every service accepts
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory for hourly log files
    #[arg(long, env = "BAREHTTP_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Runtime worker threads (default: CPU count)
    #[arg(long)]
    pub workers: Option<usize>,
}

pub fn init_logging(args: &CommonArgs) {
    barehttp_core::log::init(&args.log_level, Some(args.log_dir.as_path()));
}

/// Bind `url` and serve `state` until Ctrl-C or SIGTERM
pub fn serve(state: ServerState, url: &ListenUrl, args: &CommonArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::new(state.name(), url.socket_addr());
    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    let runtime = config.runtime().context("failed to build tokio runtime")?;
    runtime.block_on(async move {
        let server = Server::bind(config.addr, state)
            .await
            .with_context(|| format!("failed to bind {}", config.addr))?;
        tracing::info!(
            "{} listening on http://{}:{}/ ({} workers)",
            config.name,
            url.display_host(),
            url.port,
            config.workers
        );
        server.run().await?;
        tracing::info!("{} stopped", config.name);
        Ok::<_, anyhow::Error>(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn test_common_defaults() {
        let cli = Cli::parse_from(["svc"]);
        assert_eq!(cli.common.log_level, "info");
        assert_eq!(cli.common.workers, None);
    }

    #[test]
    fn test_common_flags() {
        let cli = Cli::parse_from([
            "svc",
            "--log-dir",
            "/tmp/x",
            "--log-level",
            "debug",
            "--workers",
            "3",
        ]);
        assert_eq!(cli.common.log_dir, PathBuf::from("/tmp/x"));
        assert_eq!(cli.common.log_level, "debug");
        assert_eq!(cli.common.workers, Some(3));
    }
}
