mod app;
mod catalog;
mod chat;
mod config;
mod error;
mod event;
mod logging;
mod navigation;
mod relay;
mod route;
mod theme;
mod views;

use app::ValkaApp;
use eframe::egui;
use relay::RelayClient;
use std::sync::{mpsc, Arc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("valka: logging disabled: {err}");
    }

    let settings = config::load_settings();
    let catalog = Arc::new(catalog::load(settings.catalog.path.as_deref())?);
    tracing::info!(
        modules = catalog.len(),
        first = %catalog.first().id,
        "module catalog loaded"
    );

    // First argument plays the role of the page fragment, e.g. `valka '#cursos'`.
    let initial_token = std::env::args().nth(1).unwrap_or_default();

    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("valka-runtime")
        .build()?;

    let relay = runtime.block_on(async { RelayClient::new(&settings.relay, tx) })?;
    tracing::info!(endpoint = %settings.relay.endpoint, "chat relay ready");

    let mut app = ValkaApp::new(rx, relay, catalog, settings, &initial_token);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Valka · Aprende a entrenar")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Valka",
        native_options,
        Box::new(move |creation_context| {
            app.attach_context(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
