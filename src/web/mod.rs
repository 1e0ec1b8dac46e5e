//! HTTP surface: admin login, dashboard, batch QR issuance, tickets and
//! the two scanner endpoints.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, middleware::from_fn_with_state, routing::get};
use tokio::{net::TcpListener, signal};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

pub mod error;
mod handlers;
mod middleware;
mod pages;

use crate::auth::{Credentials, SessionStore};
use crate::checkin::CheckinService;
use crate::config::CheckpointConfig;
use crate::error::CheckpointError;
use crate::issuance::{QrIssuer, QrRenderer};
use crate::store::AttendeeStore;

pub struct AppState {
    pub config: CheckpointConfig,
    pub checkin: CheckinService,
    pub sessions: SessionStore,
    pub credentials: Credentials,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        config: CheckpointConfig,
        renderer: Arc<dyn QrRenderer>,
    ) -> Result<SharedState, CheckpointError> {
        let store = AttendeeStore::new(config.data_file.clone());
        let issuer = QrIssuer::new(renderer, &config.static_dir);

        Ok(Arc::new(Self {
            checkin: CheckinService::new(store, issuer),
            sessions: SessionStore::new(config.session_ttl()?),
            credentials: config.credentials(),
            config,
        }))
    }
}

pub fn router(state: SharedState) -> Router {
    let admin = Router::new()
        .route("/", get(handlers::dashboard))
        .route("/logout", get(handlers::logout))
        .route("/generate_qr", get(handlers::generate_qr))
        .route("/scanner", get(handlers::scanner))
        .route("/generate_lunch_qr", get(handlers::generate_lunch_qr))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_admin));

    Router::new()
        .route("/admin", get(handlers::login_page).post(handlers::login))
        .route("/ticket/{token}", get(handlers::ticket))
        .route("/lunch_ticket/{lunch_token}", get(handlers::lunch_ticket))
        .route("/api/verify", get(handlers::verify))
        .route("/api/verify_lunch", get(handlers::verify_lunch))
        .merge(admin)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: SharedState) -> Result<()> {
    if !state.credentials.is_configured() {
        warn!("Admin credentials not configured, login is disabled");
    }
    if !state.checkin.store().exists().await {
        warn!(
            path = %state.checkin.store().path().display(),
            "Data file missing, requests will fail until `checkpoint roster` is run"
        );
    }

    let address = state.config.listen_addr();
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
