//! The customer's upcoming appointments and the cancellation flow
//! acting on them.

use serde::{Deserialize, Serialize};

use crate::appointments::{AppointmentView, FormatContext, build};
use crate::backend::AppointmentsBackend;
use crate::cancel::{
    CancelTicket, CancellationSnapshot, CancellationWorkflow, DeletionFailed, Resolution,
    WorkflowError,
};

/// Everything the rendering layer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub appointments: Vec<AppointmentView>,
    pub cancellation: CancellationSnapshot,
}

/// The view list and the cancellation workflow, without any I/O
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    views: Vec<AppointmentView>,
    workflow: CancellationWorkflow,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> &[AppointmentView] {
        &self.views
    }

    /// Start a new fetch cycle with `views`
    pub fn replace_views(&mut self, views: Vec<AppointmentView>) {
        self.views = views;
    }

    pub fn select_for_cancel(&mut self, id: &str) -> Result<(), WorkflowError> {
        self.workflow.select_for_cancel(id)
    }

    pub fn begin_confirm(&mut self) -> Option<CancelTicket> {
        self.workflow.begin_confirm()
    }

    pub fn is_pending(&self) -> bool {
        self.workflow.is_pending()
    }

    /// Apply the result of a deletion. On success every view with the
    /// cancelled id is removed, including all entries sharing the
    /// `unknown` sentinel id.
    pub fn finish_confirm(
        &mut self,
        ticket: CancelTicket,
        outcome: Result<(), DeletionFailed>,
    ) -> Result<(), DeletionFailed> {
        match self.workflow.resolve(ticket, outcome) {
            Resolution::Removed(id) => {
                self.views.retain(|view| view.id != id);
                tracing::info!("Cancelled appointment {}", id);
                Ok(())
            }
            Resolution::Failed(err) => Err(err),
        }
    }

    pub fn abandon(&mut self) -> Result<(), WorkflowError> {
        self.workflow.abandon()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            appointments: self.views.clone(),
            cancellation: self.workflow.snapshot(),
        }
    }
}

/// A dashboard bound to a backend. Use `Dashboard::builder()` to
/// construct one.
pub struct Dashboard<B> {
    backend: B,
    context: FormatContext,
    take: usize,
    state: DashboardState,
}

pub struct DashboardBuilder<B> {
    backend: B,
    context: FormatContext,
    take: usize,
}

impl<B: AppointmentsBackend> DashboardBuilder<B> {
    pub fn new(backend: B, context: FormatContext) -> Self {
        Self {
            backend,
            context,
            take: 5,
        }
    }

    /// Number of upcoming appointments to request
    pub fn take(mut self, take: usize) -> Self {
        self.take = take;
        self
    }

    pub fn build(self) -> Dashboard<B> {
        Dashboard {
            backend: self.backend,
            context: self.context,
            take: self.take,
            state: DashboardState::new(),
        }
    }
}

impl<B: AppointmentsBackend> Dashboard<B> {
    pub fn builder(backend: B, context: FormatContext) -> DashboardBuilder<B> {
        DashboardBuilder::new(backend, context)
    }

    /// Fetch upcoming appointments and replace the list. A failed fetch
    /// leaves an empty list rather than an error.
    pub async fn load(&mut self) -> &[AppointmentView] {
        let views = fetch_views(&mut self.backend, self.take, &self.context).await;
        self.state.replace_views(views);
        self.state.views()
    }

    pub fn views(&self) -> &[AppointmentView] {
        self.state.views()
    }

    pub fn select_for_cancel(&mut self, id: &str) -> Result<(), WorkflowError> {
        self.state.select_for_cancel(id)
    }

    /// Cancel the selected appointment. Returns `Ok(false)` when there
    /// was nothing to do.
    pub async fn confirm_cancel(&mut self) -> Result<bool, DeletionFailed> {
        let Some(ticket) = self.state.begin_confirm() else {
            return Ok(false);
        };

        let outcome = cancel_on_backend(&mut self.backend, &ticket, &self.context).await;
        self.state.finish_confirm(ticket, outcome)?;
        Ok(true)
    }

    pub fn abandon(&mut self) -> Result<(), WorkflowError> {
        self.state.abandon()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.snapshot()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Fetch and build the view list, degrading to an empty list on error
pub async fn fetch_views<B: AppointmentsBackend>(
    backend: &mut B,
    take: usize,
    context: &FormatContext,
) -> Vec<AppointmentView> {
    match backend.upcoming(take).await {
        Ok(payload) => build(&payload, context),
        Err(e) => {
            tracing::error!("Failed to load upcoming appointments: {}", e);
            Vec::new()
        }
    }
}

/// Run the deletion for `ticket`, mapping failures to a user facing
/// message
pub async fn cancel_on_backend<B: AppointmentsBackend>(
    backend: &mut B,
    ticket: &CancelTicket,
    context: &FormatContext,
) -> Result<(), DeletionFailed> {
    backend.cancel(ticket.target_id()).await.map_err(|e| {
        tracing::error!("Failed to cancel appointment {}: {}", ticket.target_id(), e);
        DeletionFailed::from_backend(&e, context.locale)
    })
}
