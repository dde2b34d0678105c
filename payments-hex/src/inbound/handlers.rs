//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use payments_types::{
    AppError, CardTokenizer, ConvertRequest, DiscountRequest, ExchangeRateProvider,
    MoneyPairRequest, MultiplyRequest, RestoreCardRequest, SplitRequest, TokenizeCardRequest,
};

use crate::PaymentService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<X: ExchangeRateProvider, T: CardTokenizer> {
    pub service: PaymentService<X, T>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match &self.0 {
            AppError::Domain(err) => (StatusCode::BAD_REQUEST, err.to_string(), Some(err.code())),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let mut body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });
        if let Some(kind) = kind {
            body["kind"] = kind.into();
        }

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ─────────────────────────────────────────────────────────────────────────────
// Currencies
// ─────────────────────────────────────────────────────────────────────────────

/// List supported currencies.
#[tracing::instrument(skip(state))]
pub async fn list_currencies<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
) -> impl IntoResponse {
    Json(state.service.list_currencies())
}

/// Get a currency by code.
#[tracing::instrument(skip(state), fields(code = %code))]
pub async fn get_currency<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let currency = state.service.get_currency(&code)?;
    Ok(Json(currency))
}

// ─────────────────────────────────────────────────────────────────────────────
// Money
// ─────────────────────────────────────────────────────────────────────────────

#[tracing::instrument(skip(state))]
pub async fn add<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<MoneyPairRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.add(req)?))
}

#[tracing::instrument(skip(state))]
pub async fn subtract<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<MoneyPairRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.subtract(req)?))
}

#[tracing::instrument(skip(state))]
pub async fn compare<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<MoneyPairRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.compare(req)?))
}

#[tracing::instrument(skip(state), fields(factor = %req.factor))]
pub async fn multiply<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<MultiplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.multiply(req)?))
}

#[tracing::instrument(skip(state), fields(percent = %req.percent))]
pub async fn discount<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<DiscountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.discount(req)?))
}

#[tracing::instrument(skip(state), fields(parts = req.parts))]
pub async fn split<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<SplitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.split(req)?))
}

#[tracing::instrument(skip(state), fields(target = %req.target_currency))]
pub async fn convert<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<ConvertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.convert(req).await?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Cards
// ─────────────────────────────────────────────────────────────────────────────

/// Tokenize raw card data. The request body is never logged.
#[tracing::instrument(skip_all)]
pub async fn tokenize_card<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<TokenizeCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.service.tokenize_card(req)?;
    Ok((StatusCode::CREATED, Json(card)))
}

#[tracing::instrument(skip_all, fields(last4 = %req.last4_digits))]
pub async fn restore_card<X: ExchangeRateProvider, T: CardTokenizer>(
    State(state): State<Arc<AppState<X, T>>>,
    Json(req): Json<RestoreCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.restore_card(req)?))
}
