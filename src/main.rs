use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use berth::config::BerthConfig;
use berth::pipeline::DeploymentPipeline;
use berth::runtime::DockerRuntime;
use berth::server::{serve, ServerState};
use berth::source::GitSourceFetcher;
use berth::util::logging;

#[derive(Parser, Debug)]
#[command(
    name = "berth",
    version,
    about = "Zero-configuration git-to-container deployment service"
)]
struct Cli {
    /// Bind host (overrides BERTH_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides BERTH_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Workspace scratch root (overrides BERTH_SCRATCH_ROOT)
    #[arg(long)]
    scratch_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_from_env();

    let cli = Cli::parse();
    let mut config = BerthConfig::default();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(scratch_root) = cli.scratch_root {
        config.scratch_root = scratch_root;
    }
    config.validate().context("invalid configuration")?;

    info!("berth v{} starting", berth::VERSION);
    info!("\n{}", config);

    let engine = DockerRuntime::connect(config.build_timeout)
        .await
        .context("container engine unavailable")?;
    let fetcher = GitSourceFetcher::new(config.scratch_root.clone());
    let pipeline = DeploymentPipeline::new(Arc::new(fetcher), Arc::new(engine), config.health);

    let state = Arc::new(ServerState {
        pipeline,
        default_memory_mb: config.default_memory_mb,
    });

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
    };

    serve(&config.bind_addr(), state, shutdown)
        .await
        .context("server terminated")?;

    Ok(())
}
