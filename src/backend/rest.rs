use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use serde_json::Value;

use super::{AppointmentsBackend, BackendError};
use crate::session::{CookieStore, SessionContext};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `AppointmentsBackend` over the booking app's REST API, authenticated
/// with the caller's session cookies
pub struct HttpBackend<S> {
    client: Client,
    api_base_url: String,
    session: SessionContext<S>,
}

impl<S: CookieStore> HttpBackend<S> {
    pub fn new(client: Client, api_base_url: &str, session: SessionContext<S>) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn into_session(self) -> SessionContext<S> {
        self.session
    }
}

#[async_trait]
impl<S: CookieStore + Send> AppointmentsBackend for HttpBackend<S> {
    async fn upcoming(&mut self, take: usize) -> Result<Value, BackendError> {
        let url = format!("{}/appointments", self.api_base_url);
        let take = take.to_string();
        let request = self
            .client
            .get(url)
            .query(&[("past", "false"), ("take", take.as_str())])
            .header(CACHE_CONTROL, "no-store");

        let response = self.session.forward(request).send().await?;
        self.session.absorb(response.headers());

        let status = response.status();
        let body = response.text().await?;
        let payload = serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::debug!(
                "Appointments response ({}) is not JSON, treating as empty: {}",
                status,
                e
            );
            Value::Array(Vec::new())
        });

        Ok(payload)
    }

    async fn cancel(&mut self, id: &str) -> Result<(), BackendError> {
        let url = format!(
            "{}/appointments/{}",
            self.api_base_url,
            urlencoding::encode(id)
        );
        let response = self
            .session
            .forward(self.client.delete(url))
            .send()
            .await?;
        self.session.absorb(response.headers());

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error);
        tracing::warn!("Cancelling appointment {} failed with {}", id, status);

        Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
