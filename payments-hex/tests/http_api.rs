//! End-to-end tests for the HTTP routes, driven through the full router.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::{Datelike, Utc};
use http_body_util::BodyExt;
use payments_hex::{
    PaymentService, inbound::HttpServer, outbound::StaticRateProvider, security::ApiKeys,
};
use payments_types::LocalTokenizer;
use serde_json::{Value, json};
use tower::ServiceExt;

const API_KEY: &str = "sk_test_http";

fn app() -> Router {
    let service = PaymentService::new(StaticRateProvider::default(), LocalTokenizer::new());
    HttpServer::new(service)
        .with_api_keys(ApiKeys::from_raw([API_KEY]))
        .router()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", API_KEY))
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", API_KEY))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn next_year() -> i32 {
    Utc::now().year() + 1
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_needs_no_key() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/money/split"].is_object());
}

#[tokio::test]
async fn test_missing_key_unauthorized() {
    let request = Request::builder()
        .uri("/api/currencies")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn test_wrong_key_unauthorized() {
    let request = Request::builder()
        .uri("/api/currencies")
        .header("Authorization", "Bearer sk_wrong")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_and_get_currency() {
    let (status, body) = send(get("/api/currencies")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().iter().any(|c| c["code"] == "KWD"));

    let (status, body) = send(get("/api/currencies/kwd")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decimal_places"], 3);

    let (status, _) = send(get("/api/currencies/XYZ")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_money() {
    let (status, body) = send(post(
        "/api/money/add",
        json!({
            "left": { "amount": "10.10", "currency": "USD" },
            "right": { "amount": "0.25", "currency": "USD" }
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], "10.35");
    assert_eq!(body["formatted"], "$10.35");
}

#[tokio::test]
async fn test_currency_mismatch_is_bad_request() {
    let (status, body) = send(post(
        "/api/money/add",
        json!({
            "left": { "amount": "1", "currency": "USD" },
            "right": { "amount": "1", "currency": "EUR" }
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "CURRENCY_MISMATCH");
}

#[tokio::test]
async fn test_split_money() {
    let (status, body) = send(post(
        "/api/money/split",
        json!({ "money": { "amount": "0.05", "currency": "EUR" }, "parts": 3 }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    let parts: Vec<&str> = body["parts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["amount"].as_str().unwrap())
        .collect();
    assert_eq!(parts, vec!["0.02", "0.02", "0.01"]);
}

#[tokio::test]
async fn test_convert_with_builtin_rates() {
    let (status, body) = send(post(
        "/api/money/convert",
        json!({ "money": { "amount": "100", "currency": "EUR" }, "target_currency": "USD" }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["money"]["amount"], "108.70");
    assert_eq!(body["exchange_rate"], "1.087");
}

#[tokio::test]
async fn test_tokenize_card_hides_raw_data() {
    let (status, body) = send(post(
        "/api/cards/tokenize",
        json!({
            "card_number": "5555 5555 5555 4444",
            "cardholder_name": "Jane Doe",
            "expiry_month": 12,
            "expiry_year": next_year(),
            "cvv": "123"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["brand"], "MASTERCARD");
    assert_eq!(body["masked_number"], "5555********4444");
    let raw = body.to_string();
    assert!(!raw.contains("5555555555554444"));
    assert!(!raw.contains("\"cvv\""));
}

#[tokio::test]
async fn test_tokenize_invalid_cvv() {
    let (status, body) = send(post(
        "/api/cards/tokenize",
        json!({
            "card_number": "4111111111111111",
            "cardholder_name": "Jane Doe",
            "expiry_month": 12,
            "expiry_year": next_year(),
            "cvv": "12"
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_CVV");
}
