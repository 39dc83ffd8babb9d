mod app;
mod config;
mod event;
mod gateway;
mod navigation;
mod role;
mod session;
mod studio;
mod theme;
mod ui;
mod view;

use app::TailorApp;
use config::AppConfig;
use eframe::egui;
use gateway::credentials::CredentialStore;
use gateway::gemini::GeminiService;
use gateway::GenerationGateway;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tailor_ai=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("tailor-runtime")
        .build()?;

    let credentials = Arc::new(CredentialStore::new(config.api_key.clone(), tx.clone()));
    let service = GeminiService::new(config.models.clone(), Arc::clone(&credentials))?;
    let gateway = GenerationGateway::new(Arc::new(service), credentials.clone());
    info!(
        text_model = %config.models.text_model,
        credential = config.api_key.is_some(),
        "generation gateway ready"
    );

    let app = TailorApp::new(
        rx,
        tx,
        runtime.handle().clone(),
        credentials,
        gateway,
        config.loading_duration,
    );
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TailorAI",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )?;

    Ok(())
}
