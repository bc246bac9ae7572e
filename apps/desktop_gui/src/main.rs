mod backend_bridge;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::DesktopGuiApp;

#[derive(Parser, Debug)]
#[command(about = "Operator console for golden batch predictions")]
struct Args {
    /// Base url of the prediction service.
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    request_timeout_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let settings =
        load_settings().with_overrides(args.service_url.as_deref(), args.request_timeout_ms)?;
    tracing::info!(service_url = %settings.service_url, "starting desktop gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Golden Batch Simulator")
            .with_inner_size([900.0, 560.0])
            .with_min_inner_size([680.0, 440.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Golden Batch Simulator",
        options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx);
            Ok(Box::new(DesktopGuiApp::bootstrap(
                cmd_tx,
                ui_rx,
                settings.service_url,
            )))
        }),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
