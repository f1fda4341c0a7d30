//! API routes module

pub mod dashboard;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Customer dashboard routes
        .nest("/dashboard", dashboard::router())
}
