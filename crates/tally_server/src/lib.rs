//! HTTP surface of the tally service.

pub mod config;
mod error;
pub mod handlers;
pub mod logging;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use tally_engine::{OpenAiClient, ReqwestFetcher, Tally};
use tally_logging::tally_info;

pub use config::{Cli, ConfigError, Settings};
pub use error::ApiError;
pub use routes::create_router;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub tally: Arc<Tally>,
}

impl AppState {
    pub fn new(tally: Tally) -> Self {
        Self {
            tally: Arc::new(tally),
        }
    }
}

/// Wires the production fetcher and model client into a [`Tally`].
pub fn build_tally(settings: &Settings) -> anyhow::Result<Tally> {
    let fetcher = ReqwestFetcher::new(settings.fetch.clone()).context("building page fetcher")?;
    let completion =
        OpenAiClient::new(settings.openai.clone()).context("building model client")?;
    Ok(Tally::new(
        settings.tally.clone(),
        Arc::new(fetcher),
        Arc::new(completion),
    ))
}

/// Binds the listener and serves until Ctrl-C.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let tally = build_tally(&settings)?;
    let app = create_router(AppState::new(tally));

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("binding {}", settings.bind))?;
    tally_info!(
        "listening on http://{} (article model {}, {} seed urls)",
        settings.bind,
        settings.tally.article_model,
        settings.tally.seed_urls.len()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tally_info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tally_info!("shutdown requested");
    }
}
