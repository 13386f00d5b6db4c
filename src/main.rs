mod api;
mod app;
mod config;
mod error;
mod folders;
mod logging;
mod structure;
mod upload;
mod utils;

use anyhow::{anyhow, Context};
use api::ApiClient;
use app::DropboxUploader;
use config::AppConfig;
use eframe::CreationContext;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging);
    tracing::info!(base_url = %config.api.base_url, "Starting Dropbox File Manager");

    let runtime = Arc::new(Runtime::new().context("Failed to start async runtime")?);
    let api = ApiClient::new(&config.api).context("Failed to build HTTP client")?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dropbox File Manager",
        options,
        Box::new(move |cc: &CreationContext| Box::new(DropboxUploader::new(cc, api, runtime))),
    )
    .map_err(|e| anyhow!("UI terminated with an error: {}", e))
}
