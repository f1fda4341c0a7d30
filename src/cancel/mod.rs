pub mod workflow;
pub use workflow::*;

use thiserror::Error;

use crate::appointments::Locale;
use crate::backend::BackendError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("A cancellation is already in progress")]
    CancelInFlight,
}

/// A cancellation the backend did not carry out. Always recoverable:
/// the appointment stays in the list and may be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DeletionFailed(pub String);

impl DeletionFailed {
    /// User facing message for a failed delete call. Uses the message
    /// from the backend when it sent one, otherwise a generic one.
    pub fn from_backend(err: &BackendError, locale: Locale) -> Self {
        match err {
            BackendError::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => Self(message.clone()),
            _ => Self(locale.cancel_failed().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_uses_the_backend_message() {
        let err = BackendError::Rejected {
            status: 400,
            message: Some("Already passed".to_string()),
        };
        assert_eq!(
            DeletionFailed::from_backend(&err, Locale::Tr),
            DeletionFailed("Already passed".to_string())
        );
    }

    #[test]
    fn it_falls_back_to_the_generic_message() {
        let missing = BackendError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(
            DeletionFailed::from_backend(&missing, Locale::Tr).to_string(),
            "Randevu iptal edilemedi"
        );

        let blank = BackendError::Rejected {
            status: 500,
            message: Some(String::new()),
        };
        assert_eq!(
            DeletionFailed::from_backend(&blank, Locale::En).to_string(),
            "Appointment could not be cancelled"
        );
    }
}
