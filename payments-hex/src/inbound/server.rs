//! HTTP Server configuration and startup.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use payments_types::{CardTokenizer, ExchangeRateProvider};

use super::auth::auth_middleware;
use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::PaymentService;
use crate::security::ApiKeys;

/// HTTP Server for the Payments API.
pub struct HttpServer<X: ExchangeRateProvider, T: CardTokenizer> {
    state: Arc<AppState<X, T>>,
    api_keys: Arc<ApiKeys>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<X: ExchangeRateProvider, T: CardTokenizer> HttpServer<X, T> {
    /// Creates a new HTTP server with the given service.
    ///
    /// Authentication is disabled until keys are supplied with [`Self::with_api_keys`].
    pub fn new(service: PaymentService<X, T>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            api_keys: Arc::new(ApiKeys::default()),
            rate_limiter: Arc::new(RateLimiterState::default()), // 100 req/min default
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: PaymentService<X, T>, requests_per_minute: NonZeroU32) -> Self {
        Self {
            rate_limiter: Arc::new(RateLimiterState::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
            ..Self::new(service)
        }
    }

    /// Requires one of `keys` on every API request.
    pub fn with_api_keys(mut self, keys: ApiKeys) -> Self {
        self.api_keys = Arc::new(keys);
        self
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api-docs/openapi.json", get(handlers::openapi_json))
            .route("/api/currencies", get(handlers::list_currencies::<X, T>))
            .route("/api/currencies/{code}", get(handlers::get_currency::<X, T>))
            .route("/api/money/add", post(handlers::add::<X, T>))
            .route("/api/money/subtract", post(handlers::subtract::<X, T>))
            .route("/api/money/compare", post(handlers::compare::<X, T>))
            .route("/api/money/multiply", post(handlers::multiply::<X, T>))
            .route("/api/money/discount", post(handlers::discount::<X, T>))
            .route("/api/money/split", post(handlers::split::<X, T>))
            .route("/api/money/convert", post(handlers::convert::<X, T>))
            .route("/api/cards/tokenize", post(handlers::tokenize_card::<X, T>))
            .route("/api/cards/restore", post(handlers::restore_card::<X, T>))
            .layer(middleware::from_fn_with_state(
                (self.rate_limiter.clone(), self.api_keys.clone()),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                self.api_keys.clone(),
                auth_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
