use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Client;
use thiserror::Error;
use uuid::Uuid;

use crate::core::AppConfig;
use crate::dashboard::DashboardState;

#[derive(Debug, Error)]
#[error("No dashboard for this browser, load the dashboard first")]
pub struct DashboardNotFound;

struct DashboardEntry {
    state: DashboardState,
    touched: Instant,
}

pub struct AppState {
    pub config: AppConfig,
    pub client: Client,
    // One dashboard per browser session, keyed by the session cookie
    dashboards: HashMap<String, DashboardEntry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            client: Client::new(),
            dashboards: HashMap::new(),
        }
    }

    /// The dashboard registered under `id`, marking it as recently used
    pub fn dashboard(&mut self, id: &str) -> Result<&mut DashboardState, DashboardNotFound> {
        let entry = self.dashboards.get_mut(id).ok_or(DashboardNotFound)?;
        entry.touched = Instant::now();
        Ok(&mut entry.state)
    }

    /// Register an empty dashboard under a freshly minted id. Idle
    /// dashboards are evicted first.
    pub fn open_dashboard(&mut self) -> String {
        self.evict_idle(Instant::now());

        let id = Uuid::new_v4().to_string();
        self.dashboards.insert(
            id.clone(),
            DashboardEntry {
                state: DashboardState::new(),
                touched: Instant::now(),
            },
        );
        id
    }

    pub fn has_dashboard(&self, id: &str) -> bool {
        self.dashboards.contains_key(id)
    }

    pub fn dashboard_count(&self) -> usize {
        self.dashboards.len()
    }

    /// Drop dashboards untouched for longer than the configured idle
    /// timeout. A dashboard with a cancellation in flight is kept so the
    /// result can still be applied.
    pub fn evict_idle(&mut self, now: Instant) {
        let idle = Duration::from_secs(self.config.dashboard_idle_secs);
        let before = self.dashboards.len();
        self.dashboards.retain(|_, entry| {
            entry.state.is_pending() || now.saturating_duration_since(entry.touched) <= idle
        });

        let evicted = before - self.dashboards.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} idle dashboards", evicted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointments::Locale;

    fn state(idle_secs: u64) -> AppState {
        AppState::new(AppConfig {
            api_base_url: String::from("http://127.0.0.1:9/api"),
            supabase_url: None,
            supabase_anon_key: None,
            upcoming_take: 5,
            locale: Locale::Tr,
            session_cookies: None,
            dashboard_idle_secs: idle_secs,
        })
    }

    #[test]
    fn it_only_finds_opened_dashboards() {
        let mut state = state(60);
        assert!(state.dashboard("made-up").is_err());
        assert_eq!(state.dashboard_count(), 0);

        let id = state.open_dashboard();
        assert!(state.dashboard(&id).is_ok());
        assert!(state.has_dashboard(&id));
        assert_eq!(state.dashboard_count(), 1);
    }

    #[test]
    fn it_evicts_idle_dashboards() {
        let mut state = state(60);
        let id = state.open_dashboard();

        state.evict_idle(Instant::now() + Duration::from_secs(30));
        assert!(state.has_dashboard(&id));

        state.evict_idle(Instant::now() + Duration::from_secs(61));
        assert!(!state.has_dashboard(&id));
    }

    #[test]
    fn it_keeps_dashboards_with_a_cancellation_in_flight() {
        let mut state = state(60);
        let id = state.open_dashboard();
        {
            let dashboard = state.dashboard(&id).unwrap();
            dashboard.select_for_cancel("a1").unwrap();
            dashboard.begin_confirm().unwrap();
        }

        state.evict_idle(Instant::now() + Duration::from_secs(3600));
        assert!(state.has_dashboard(&id));
    }
}
