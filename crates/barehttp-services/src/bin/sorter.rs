//! Sorter server

use anyhow::Context;
use barehttp_core::config::{generic_port, resolve_listen_url};
use barehttp_core::StaticFiles;
use barehttp_services::sorter;
use barehttp_services::launch::{self, CommonArgs};
use clap::Parser;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "sorter", about = "Integer merge sort over HTTP", version)]
struct Cli {
    /// Listen URL, e.g. http://0.0.0.0:8082/
    #[arg(long, env = "SORTER_URL")]
    url: Option<String>,

    /// Listen port, used when no URL is given
    #[arg(long, env = "SORTER_PORT")]
    port: Option<String>,

    /// Static file root, created if missing
    #[arg(long, env = "SORTER_ROOT", default_value = "wwwroot")]
    root: PathBuf,

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
        sorter::DEFAULT_URL,
        sorter::DEFAULT_PORT,
    );
    let files = StaticFiles::new(&cli.root)
        .with_context(|| format!("static root {}", cli.root.display()))?;
    tracing::info!("serving static files from {}", files.root().display());

    launch::serve(sorter::routes(files), &url, &cli.common)
}
