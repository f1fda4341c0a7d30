use std::env;

use crate::appointments::Locale;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub upcoming_take: usize,
    pub locale: Locale,
    // Raw `Cookie` header value used by CLI commands to act on behalf
    // of a signed-in user
    pub session_cookies: Option<String>,
    // Seconds a server-side dashboard may sit untouched before it is
    // evicted
    pub dashboard_idle_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let host = "127.0.0.1";
        let port = "3000";
        let api_base_url =
            env::var("SALON_API_URL").unwrap_or(format!("http://{}:{}/api", host, port));
        let supabase_url = env::var("SALON_SUPABASE_URL").ok();
        let supabase_anon_key = env::var("SALON_SUPABASE_ANON_KEY").ok();
        let upcoming_take = match env::var("SALON_UPCOMING_TAKE") {
            Ok(s) => s.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid SALON_UPCOMING_TAKE {:?}, using 5", s);
                5
            }),
            Err(_) => 5,
        };
        let locale = match env::var("SALON_LOCALE") {
            Ok(s) => s.parse().unwrap_or_else(|_| {
                tracing::warn!("Unsupported SALON_LOCALE {:?}, using tr-TR", s);
                Locale::Tr
            }),
            Err(_) => Locale::Tr,
        };
        let session_cookies = env::var("SALON_SESSION_COOKIE").ok();
        let dashboard_idle_secs = match env::var("SALON_DASHBOARD_IDLE_SECS") {
            Ok(s) => s.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid SALON_DASHBOARD_IDLE_SECS {:?}, using 1800", s);
                1800
            }),
            Err(_) => 1800,
        };

        Self {
            api_base_url,
            supabase_url,
            supabase_anon_key,
            upcoming_take,
            locale,
            session_cookies,
            dashboard_idle_secs,
        }
    }
}
