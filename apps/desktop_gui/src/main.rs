use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::DirectoryClient;
use crossbeam_channel::bounded;
use eframe::egui;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::DirectoryApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop admin panel for the user directory service")]
struct Args {
    /// TOML file with `server_url` and `request_timeout_secs`.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = config::load_settings(args.config.as_deref())?
        .with_overrides(args.server_url, args.timeout_secs);
    let client = DirectoryClient::with_timeout(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    let server_url = client.base_url().to_string();
    tracing::info!(%server_url, "starting user directory");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    backend_bridge::runtime::launch(Arc::new(client), cmd_rx, ui_tx);

    let lifetime = CancellationToken::new();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("User Directory")
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "User Directory",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DirectoryApp::new(
                cmd_tx, ui_rx, server_url, lifetime,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop shell exited with error: {err}"))
}
