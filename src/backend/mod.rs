pub mod rest;
pub use rest::HttpBackend;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend rejected the request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
}

/// The appointments API of the booking backend
#[async_trait]
pub trait AppointmentsBackend: Send {
    /// Upcoming appointments for the signed-in user, at most `take` of
    /// them. The payload is returned as-is. A body that isn't JSON is
    /// returned as an empty array.
    async fn upcoming(&mut self, take: usize) -> Result<Value, BackendError>;

    /// Delete the appointment with `id`
    async fn cancel(&mut self, id: &str) -> Result<(), BackendError>;
}
