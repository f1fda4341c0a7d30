//! Confirm-then-delete state machine for cancelling an appointment.
//!
//! ```text
//! Idle --select--> Confirming --confirm--> InFlight --ok--> Idle
//!  ^                  |   ^                   |
//!  +----abandon-------+   +-------failed------+
//! ```
//!
//! Only one deletion may be outstanding at a time. `begin_confirm`
//! moves to `InFlight` before the request is sent and hands out a
//! `CancelTicket`; the ticket has to be given back to `resolve` to leave
//! `InFlight`, so a second confirm can't start a second request.

use serde::{Deserialize, Serialize};

use super::{DeletionFailed, WorkflowError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelState {
    Idle,
    Confirming {
        target_id: String,
        last_error: Option<String>,
    },
    InFlight {
        target_id: String,
    },
}

/// Proof that a deletion was started for `target_id`
#[derive(Debug, PartialEq, Eq)]
pub struct CancelTicket {
    target_id: String,
}

impl CancelTicket {
    pub fn target_id(&self) -> &str {
        &self.target_id
    }
}

/// What the confirmation surface needs to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationSnapshot {
    pub target_id: Option<String>,
    pub pending: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The backend deleted the appointment with this id
    Removed(String),
    /// The deletion failed and the target stays selected
    Failed(DeletionFailed),
}

#[derive(Debug, Clone)]
pub struct CancellationWorkflow {
    state: CancelState,
}

impl Default for CancellationWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationWorkflow {
    pub fn new() -> Self {
        Self {
            state: CancelState::Idle,
        }
    }

    pub fn state(&self) -> &CancelState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, CancelState::InFlight { .. })
    }

    /// Select an appointment to cancel. Selecting while another target
    /// is awaiting confirmation retargets; an error left over from the
    /// previous target is cleared.
    pub fn select_for_cancel(&mut self, id: &str) -> Result<(), WorkflowError> {
        let last_error = match &self.state {
            CancelState::InFlight { .. } => return Err(WorkflowError::CancelInFlight),
            CancelState::Confirming {
                target_id,
                last_error,
            } if target_id == id => last_error.clone(),
            _ => None,
        };

        self.state = CancelState::Confirming {
            target_id: id.to_string(),
            last_error,
        };
        Ok(())
    }

    /// Start deleting the selected appointment. Returns `None` without
    /// changing anything when nothing is selected or a deletion is
    /// already in flight.
    pub fn begin_confirm(&mut self) -> Option<CancelTicket> {
        let CancelState::Confirming { target_id, .. } = &self.state else {
            return None;
        };

        let target_id = target_id.clone();
        self.state = CancelState::InFlight {
            target_id: target_id.clone(),
        };
        Some(CancelTicket { target_id })
    }

    /// Finish the deletion started with `ticket`
    pub fn resolve(
        &mut self,
        ticket: CancelTicket,
        outcome: Result<(), DeletionFailed>,
    ) -> Resolution {
        let CancelTicket { target_id } = ticket;

        match outcome {
            Ok(()) => {
                self.state = CancelState::Idle;
                Resolution::Removed(target_id)
            }
            Err(err) => {
                self.state = CancelState::Confirming {
                    target_id,
                    last_error: Some(err.0.clone()),
                };
                Resolution::Failed(err)
            }
        }
    }

    /// Close the confirmation without cancelling anything
    pub fn abandon(&mut self) -> Result<(), WorkflowError> {
        if self.is_pending() {
            return Err(WorkflowError::CancelInFlight);
        }
        self.state = CancelState::Idle;
        Ok(())
    }

    pub fn snapshot(&self) -> CancellationSnapshot {
        match &self.state {
            CancelState::Idle => CancellationSnapshot {
                target_id: None,
                pending: false,
                last_error: None,
            },
            CancelState::Confirming {
                target_id,
                last_error,
            } => CancellationSnapshot {
                target_id: Some(target_id.clone()),
                pending: false,
                last_error: last_error.clone(),
            },
            CancelState::InFlight { target_id } => CancellationSnapshot {
                target_id: Some(target_id.clone()),
                pending: true,
                last_error: None,
            },
        }
    }
}
