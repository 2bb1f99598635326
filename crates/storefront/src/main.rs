//! Zudio Storefront - local shopping state server.
//!
//! Serves the JSON storefront API (port 3000 by default). The product
//! catalog is fetched from a remote API and cached in memory; the cart and
//! wishlist live as JSON files in the data directory, shared with the
//! `zudio` CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zudio_storefront::catalog::CatalogError;
use zudio_storefront::config::StorefrontConfig;
use zudio_storefront::routes;
use zudio_storefront::state::AppState;
use zudio_storefront::storage::{FileStore, StorageError};

/// Anything that stops the server from starting or keeps it from running.
#[derive(Debug, Error)]
enum StartupError {
    #[error("cannot open data directory: {0}")]
    Storage(#[from] StorageError),

    #[error("cannot build catalog client: {0}")]
    Catalog(#[from] CatalogError),

    #[error("server I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// Start Sentry when a DSN is configured. The guard must outlive the server.
fn init_error_tracking(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    };
    let guard = sentry::init((dsn, options));

    sentry::configure_scope(|scope| {
        scope.set_tag(
            "catalog_host",
            config.catalog.base_url.host_str().unwrap_or("unknown"),
        );
    });
    Some(guard)
}

/// Warnings and errors become Sentry events; info lines become breadcrumbs.
///
/// Debug output (including `tower_http` request chatter) stays local.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Sentry reads its settings from the config, so this comes first
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");
    let sentry_guard = init_error_tracking(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zudio_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::info!("Sentry error tracking enabled");
    }

    if let Err(e) = serve(config).await {
        tracing::error!(error = %e, "Storefront stopped");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn serve(config: StorefrontConfig) -> Result<(), StartupError> {
    let store = FileStore::open(&config.data_dir)?;
    tracing::info!(data_dir = %store.dir().display(), "Local storage opened");

    let state = AppState::new(&config, Arc::new(store))?;

    // Cart and wishlist are usable right away; categories follow
    state.start_category_loading();

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        catalog = %config.catalog.base_url,
        "storefront listening"
    );

    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Storefront shut down cleanly");
    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl+C received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
