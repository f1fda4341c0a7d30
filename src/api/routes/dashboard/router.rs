//! Router for the customer dashboard API
//!
//! Each browser gets its own dashboard, identified by a cookie issued by
//! `GET /api/dashboard`. The shared state lock is never held across a
//! backend call: confirming a cancellation marks it in flight under the
//! lock, releases it for the DELETE request and takes it again to apply
//! the result.

use std::sync::{Arc, RwLock};

use axum::{Json, Router, extract::State, routing::post};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::public::{self, DASHBOARD_COOKIE};
use crate::api::public::ApiError;
use crate::api::state::{AppState, DashboardNotFound};
use crate::appointments::FormatContext;
use crate::backend::HttpBackend;
use crate::dashboard::{DashboardSnapshot, cancel_on_backend, fetch_views};
use crate::session::SessionContext;

type SharedState = Arc<RwLock<AppState>>;

type DashboardResponse = Result<(CookieJar, Json<DashboardSnapshot>), ApiError>;

fn dashboard_cookie(id: String) -> Cookie<'static> {
    Cookie::build((DASHBOARD_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// The dashboard id this browser was issued
fn dashboard_id(jar: &CookieJar) -> Result<String, DashboardNotFound> {
    jar.get(DASHBOARD_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(DashboardNotFound)
}

/// A backend client acting with the request's session cookies
fn request_backend(
    state: &SharedState,
    jar: CookieJar,
) -> Result<(HttpBackend<CookieJar>, FormatContext, usize), ApiError> {
    let (config, client) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (shared_state.config.clone(), shared_state.client.clone())
    };

    let session = SessionContext::new(&config, jar)?;
    if !session.has_auth_session() {
        tracing::debug!("Dashboard request without a Supabase auth cookie");
    }

    let backend = HttpBackend::new(client, &config.api_base_url, session);
    let context = FormatContext::local(config.locale);
    Ok((backend, context, config.upcoming_take))
}

async fn dashboard_handler(State(state): State<SharedState>, jar: CookieJar) -> DashboardResponse {
    let known_id = jar.get(DASHBOARD_COOKIE).map(|c| c.value().to_string());
    let (mut backend, context, take) = request_backend(&state, jar)?;

    let views = fetch_views(&mut backend, take, &context).await;
    let mut jar = backend.into_session().into_store();

    let snapshot = {
        let mut shared_state = state.write().expect("Unable to write shared state");
        // Unknown or evicted ids get a new dashboard under a fresh id
        let id = match known_id.filter(|id| shared_state.has_dashboard(id)) {
            Some(id) => id,
            None => {
                let id = shared_state.open_dashboard();
                jar = jar.add(dashboard_cookie(id.clone()));
                id
            }
        };
        let dashboard = shared_state.dashboard(&id)?;
        dashboard.replace_views(views);
        dashboard.snapshot()
    };

    Ok((jar, Json(snapshot)))
}

async fn select_handler(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(params): Json<public::SelectRequest>,
) -> DashboardResponse {
    let id = dashboard_id(&jar)?;

    let snapshot = {
        let mut shared_state = state.write().expect("Unable to write shared state");
        let dashboard = shared_state.dashboard(&id)?;
        dashboard.select_for_cancel(&params.id)?;
        dashboard.snapshot()
    };

    Ok((jar, Json(snapshot)))
}

async fn confirm_handler(State(state): State<SharedState>, jar: CookieJar) -> DashboardResponse {
    let id = dashboard_id(&jar)?;
    let (mut backend, context, _) = request_backend(&state, jar)?;

    let ticket = {
        let mut shared_state = state.write().expect("Unable to write shared state");
        shared_state.dashboard(&id)?.begin_confirm()
    };

    // Nothing selected or a cancellation is already in flight
    let Some(ticket) = ticket else {
        let snapshot = state
            .write()
            .expect("Unable to write shared state")
            .dashboard(&id)?
            .snapshot();
        return Ok((backend.into_session().into_store(), Json(snapshot)));
    };

    // The deletion and applying its result run in their own task so the
    // ticket is always resolved, even when the client goes away and this
    // handler is dropped
    let task_state = state.clone();
    let deletion = tokio::spawn(async move {
        let outcome = cancel_on_backend(&mut backend, &ticket, &context).await;

        let mut shared_state = task_state.write().expect("Unable to write shared state");
        let dashboard = shared_state.dashboard(&id)?;
        // A failure is reported inline through `last_error`
        if let Err(e) = dashboard.finish_confirm(ticket, outcome) {
            tracing::debug!("Cancellation failed for dashboard {}: {}", id, e);
        }
        Ok::<_, DashboardNotFound>((backend, dashboard.snapshot()))
    });
    let (backend, snapshot) = deletion.await??;

    Ok((backend.into_session().into_store(), Json(snapshot)))
}

async fn abandon_handler(State(state): State<SharedState>, jar: CookieJar) -> DashboardResponse {
    let id = dashboard_id(&jar)?;

    let snapshot = {
        let mut shared_state = state.write().expect("Unable to write shared state");
        let dashboard = shared_state.dashboard(&id)?;
        dashboard.abandon()?;
        dashboard.snapshot()
    };

    Ok((jar, Json(snapshot)))
}

/// Create the dashboard router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(dashboard_handler))
        .route("/cancel/select", post(select_handler))
        .route("/cancel/confirm", post(confirm_handler))
        .route("/cancel/abandon", post(abandon_handler))
}
