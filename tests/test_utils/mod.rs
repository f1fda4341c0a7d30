//! Test utilities for integration tests
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body, http::Response};

use salon_dashboard::api::AppState;
use salon_dashboard::api::app;
use salon_dashboard::appointments::Locale;
use salon_dashboard::core::AppConfig;

pub fn test_config(api_base_url: &str) -> AppConfig {
    AppConfig {
        api_base_url: api_base_url.to_string(),
        supabase_url: Some(String::from("https://abcdefgh.supabase.co")),
        supabase_anon_key: Some(String::from("test-anon-key")),
        upcoming_take: 5,
        locale: Locale::Tr,
        session_cookies: None,
        dashboard_idle_secs: 1800,
    }
}

/// Creates a test application router talking to the backend at
/// `api_base_url` (usually a `mockito` server).
pub fn test_app(api_base_url: &str) -> Router {
    test_app_with_config(test_config(api_base_url))
}

pub fn test_app_with_config(config: AppConfig) -> Router {
    let app_state = AppState::new(config);
    app(Arc::new(RwLock::new(app_state)))
}

/// Like `test_app` but also hands back the shared state for inspection
pub fn test_app_with_state(api_base_url: &str) -> (Router, Arc<RwLock<AppState>>) {
    let app_state = Arc::new(RwLock::new(AppState::new(test_config(api_base_url))));
    (app(app_state.clone()), app_state)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    let body = body_to_string(body).await;
    serde_json::from_str(&body).expect("Body is not JSON")
}

/// The `name=value` pair of the dashboard cookie set on a response
pub fn dashboard_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("dashboard_sid="))
        .and_then(|v| v.split(';').next())
        .expect("Missing dashboard cookie")
        .to_string()
}

/// Upcoming appointments payload with a single appointment
pub fn single_appointment() -> String {
    serde_json::json!([{
        "id": "a1",
        "date": "2024-05-01",
        "time": "2024-05-01T14:30:00Z",
        "employee": {"firstName": "Ali", "lastName": "Veli"},
        "serviceName": "Haircut"
    }])
    .to_string()
}
