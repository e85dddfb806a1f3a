//! Folio Gateway: portfolio API, admin API and the Eve chat endpoint.
//! sled store on disk, OpenAI-compatible completion provider (Groq by default).

mod admin;
mod app;
mod error;
mod routes;

use folio_core::{AdminAuth, ChatResponder, FolioConfig, OpenAiCompatClient, PortfolioStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{build_app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("[folio] could not read .env: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = FolioConfig::load().map_err(|e| {
        tracing::error!(error = %e, "failed to load configuration");
        e
    })?;
    tracing::info!(app = %cfg.app_name, version = folio_core::version(), "starting");

    let store = Arc::new(PortfolioStore::open(Some(&cfg.storage_path))?);

    let http = reqwest::Client::new();
    let completion = OpenAiCompatClient::new(
        http,
        cfg.llm_api_url.clone(),
        cfg.llm_model.clone(),
        cfg.llm_api_key.clone(),
    );
    if completion.has_api_key() {
        tracing::info!(model = %completion.model(), "completion provider configured");
    } else {
        tracing::warn!("no completion API key set; /api/chat will answer 500 until GROQ_API_KEY is configured");
    }

    let admin = AdminAuth::from_config(&cfg);
    if !cfg.admin_login_enabled() {
        tracing::warn!("ADMIN_EMAIL / ADMIN_PASSWORD not set; admin login disabled");
    }

    let state = AppState {
        store: store.clone(),
        responder: ChatResponder::new(store.clone(), Arc::new(completion)),
        admin: Arc::new(admin),
    };
    let app = build_app(state, &cfg.cors_origin_list());

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!(addr = %addr, error = %e, "failed to bind");
        e
    })?;
    tracing::info!("Folio gateway listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    match store.flush() {
        Ok(bytes) => tracing::info!(bytes, "store flushed; shutting down"),
        Err(e) => tracing::error!(error = %e, "store flush failed on shutdown"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
