use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use saorsa_reprovider::{Key, MemoryRouting, Node, NodeConfig, ReportFormat, run_stats_report};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "reprovidectl")]
#[command(about = "Operate and inspect the (re)provide subsystem of a content-routing node")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Node configuration file (JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a provider node that announces its keys until interrupted
    Run {
        /// Number of random keys to seed the keystore with
        #[arg(long, default_value = "1000")]
        keys: usize,

        /// Seconds between stats reports printed to stdout
        #[arg(long, default_value = "30")]
        stats_interval_secs: u64,
    },

    /// Report statistics from the node's (re)provide subsystem
    Stats {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Deadline for the stats query in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },
}

/// Output format for the stats report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .init();

    let config = match &cli.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };

    match cli.command {
        Commands::Run {
            keys,
            stats_interval_secs,
        } => {
            if !config.online {
                anyhow::bail!("node is configured offline; set `online: true` to run a provider");
            }

            let routing = Arc::new(MemoryRouting::with_latency(config.provide.announce_latency));
            let node = Node::new(&config, routing);

            info!("seeding keystore with {} random keys", keys);
            for _ in 0..keys {
                node.provide(Key::random()).await?;
            }

            let worker = node.start();

            let mut stats_tick =
                tokio::time::interval(Duration::from_secs(stats_interval_secs.max(1)));
            stats_tick.tick().await; // consume the immediate first tick

            info!("provider node running; press Ctrl+C to stop");
            loop {
                tokio::select! {
                    _ = stats_tick.tick() => {
                        if let Err(e) = print_report(&node, ReportFormat::Text).await {
                            warn!("stats report failed: {e:#}");
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }

            if let Some(worker) = worker {
                worker.abort();
            }
            print_report(&node, ReportFormat::Text).await?;
        }

        Commands::Stats {
            format,
            timeout_secs,
        } => {
            let routing = Arc::new(MemoryRouting::new());
            let node = Node::new(&config, routing);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            run_stats_report(
                &node,
                format.into(),
                Duration::from_secs(timeout_secs),
                &mut out,
            )
            .await?;
        }
    }

    Ok(())
}

async fn print_report(node: &Node, format: ReportFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_stats_report(node, format, Duration::from_secs(10), &mut out).await?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}
