//! Public types for the dashboard API
use serde::{Deserialize, Serialize};

pub use crate::appointments::AppointmentView;
pub use crate::cancel::CancellationSnapshot;
pub use crate::dashboard::DashboardSnapshot;

/// Name of the cookie identifying a browser's dashboard
pub const DASHBOARD_COOKIE: &str = "dashboard_sid";

#[derive(Serialize, Deserialize)]
pub struct SelectRequest {
    pub id: String,
}
