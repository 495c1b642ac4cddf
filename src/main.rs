mod app;
mod cli;
mod config;
mod ssh;
mod state;
mod task;
mod types;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging
    let default_filter = if cli.output.verbose {
        "keydeck=trace,debug"
    } else if cli.command.is_some() {
        "keydeck=warn,warn"
    } else {
        "keydeck=debug,info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(command) = cli.command {
        return cli::run(command, &cli.output).await;
    }

    tracing::info!("Starting Keydeck");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([760.0, 640.0])
        .with_min_inner_size([520.0, 420.0])
        .with_title("Keydeck - SSH keys");

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Keydeck",
        native_options,
        Box::new(|cc| Ok(Box::new(app::KeydeckApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
