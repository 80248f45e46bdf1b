// Nox Coder GUI - Main Entry Point
// Native desktop client for the Nox code generator and AI chat

mod state;
mod ui;

use anyhow::Context as _;
use eframe::egui;
use nox_coder_core::gemini::GeminiClient;
use nox_coder_core::Config;
use state::AppShell;
use std::sync::Arc;
use tracing::{info, warn};
use ui::render_app_layout;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    if !config.has_api_key() {
        warn!("GEMINI_API_KEY is not set; generation and chat requests will fail");
    }

    // Background requests run here; the GUI owns the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("nox-worker")
        .build()
        .context("Failed to start async runtime")?;

    let client = GeminiClient::new(&config.gemini).context("Failed to build Gemini client")?;
    let provider = Arc::new(client);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Nox Coder AI")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    info!(version = %config.default_version, "Starting Nox Coder");

    eframe::run_native(
        "Nox Coder AI",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let shell = AppShell::new(&config, provider, runtime.handle().clone(), move || {
                ctx.request_repaint()
            });
            Box::new(NoxCoderApp {
                shell,
                _runtime: runtime,
            })
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}

/// Main application struct
struct NoxCoderApp {
    shell: AppShell<GeminiClient>,
    /// Kept alive for the lifetime of the window
    _runtime: tokio::runtime::Runtime,
}

impl eframe::App for NoxCoderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.shell.drain_results();

        let actions = render_app_layout(ctx, &self.shell.state);
        self.shell.dispatch_all(actions);

        if let Err(e) = self.shell.persist_if_changed() {
            warn!(error = %e, "Failed to save chat sessions");
        }
    }
}
