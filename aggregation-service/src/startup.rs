//! Application startup and lifecycle management.

use crate::config::AggregationConfig;
use crate::handlers;
use crate::services::{init_metrics, MongoDb};
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AggregationConfig,
    pub db: MongoDb,
}

/// Builds the HTTP router with every query and operational endpoint.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::all_users))
        .route("/active-by-gender", get(handlers::active_by_gender))
        .route("/active-favorite", get(handlers::active_favorite))
        .route("/favorite-average-age", get(handlers::favorite_average_age))
        .route("/unique-friend-names", get(handlers::unique_friend_names))
        .route("/age-range-group", get(handlers::age_range_group))
        .route("/total-company-balance", get(handlers::total_company_balance))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connects to MongoDB, verifies it answers a ping and binds the listener.
    pub async fn build(config: AggregationConfig) -> Result<Self, AppError> {
        init_metrics();

        let db = MongoDb::connect(&config.mongodb).await?;
        db.health_check().await.map_err(|e| {
            tracing::error!(error = %e, "Initial MongoDB ping failed");
            e
        })?;
        tracing::info!("Pinged your deployment. Successfully connected to MongoDB");

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState { config, db },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    /// Serve until the listener fails.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_graceful_shutdown(std::future::pending::<()>()).await
    }

    /// Serve until `signal` resolves, drain in-flight requests, then close
    /// the database client.
    pub async fn run_with_graceful_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let db = self.state.db.clone();
        let app = router(self.state);

        tracing::info!(
            service = "aggregation-service",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        let result = axum::serve(self.listener, app)
            .with_graceful_shutdown(signal)
            .await;

        if let Err(e) = &result {
            tracing::error!(error = %e, "HTTP server error");
        }

        db.shutdown().await;
        result
    }
}
