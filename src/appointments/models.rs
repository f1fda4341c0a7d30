use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Id given to records that arrive without one. Appointment ids are
/// UUIDs so this never collides with a real id, but several id-less
/// records will share it.
pub const UNKNOWN_ID: &str = "unknown";

/// Shown when an appointment has no time
pub const TIME_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// An appointment as returned by the backend. Nothing about the payload
/// is trusted: every field is optional and anything of the wrong type is
/// treated as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAppointmentRecord {
    pub id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub employee: Option<RawEmployee>,
    pub service_name: Option<String>,
}

impl RawAppointmentRecord {
    pub fn from_value(value: &Value) -> Self {
        let employee = value
            .get("employee")
            .filter(|e| e.is_object())
            .map(|e| RawEmployee {
                first_name: text(e.get("firstName")),
                last_name: text(e.get("lastName")),
            });

        Self {
            id: text(value.get("id")),
            date: text(value.get("date")),
            time: text(value.get("time")),
            employee,
            service_name: text(value.get("serviceName")),
        }
    }
}

// Non-empty strings and non-zero numbers are usable text, everything
// else is missing
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Display-ready appointment. Every field is a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: String,
    pub display_date: String,
    pub display_time: String,
    pub staff_name: String,
    pub service_name: String,
}
