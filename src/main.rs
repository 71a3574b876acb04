use anyhow::{Context, Result};
use clap::Parser;
use dvr_data_plane::{PlaneConfig, PlaneController};
use env_logger::Env;
use log::{debug, info};
use std::sync::Arc;
use tokio::runtime::Builder;

#[derive(Parser)]
#[command(name = "dvr-data-plane")]
struct Cli {
    /// Worker sleep between two simulated packet batches
    #[arg(long, default_value_t = 2000)]
    interval_ms: u64,

    /// Packets added to the counter on every worker iteration
    #[arg(long, default_value_t = 5)]
    packet_increment: u64,

    /// Log worker progress every N iterations
    #[arg(long, default_value_t = 5)]
    report_every: u64,

    /// Print the final statistics and routes as JSON on shutdown
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    println!("🚀 Starting DVR Data Plane...");

    let config = PlaneConfig::default()
        .with_interval_ms(cli.interval_ms)
        .with_packet_increment(cli.packet_increment)
        .with_report_every(cli.report_every);
    debug!("Effective config: {}", serde_json::to_string(&config)?);

    let rt = Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let plane = Arc::new(PlaneController::new(config));

        plane
            .initialize()
            .await
            .context("Failed to initialize data plane")?;

        plane.start().await;
        println!("Data plane running. Press Ctrl+C to stop.");

        // The shutdown path owns its own handle on the controller.
        let shutdown_plane = plane.clone();
        let shutdown = tokio::spawn(async move {
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            info!("Received interrupt, shutting down data plane...");
            shutdown_plane.stop().await;
            anyhow::Ok(())
        });
        shutdown.await??;

        let stats = plane.show_stats().await;
        if cli.json {
            let report = serde_json::json!({
                "stats": stats,
                "routes": plane.get_routes().await,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Ok::<(), anyhow::Error>(())
    })
}
