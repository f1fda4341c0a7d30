//! Turns the upcoming appointments payload into view models.
//!
//! The payload comes straight from the backend and is not trusted. A
//! payload that isn't an array yields no appointments, falsy elements
//! are dropped, and each remaining element is normalized field by field
//! with placeholders for anything missing.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde_json::Value;

use super::locale::FormatContext;
use super::models::{
    AppointmentView, RawAppointmentRecord, RawEmployee, TIME_PLACEHOLDER, UNKNOWN_ID,
};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Build the view models for a raw payload. Output order matches the
/// input order.
pub fn build(raw: &Value, ctx: &FormatContext) -> Vec<AppointmentView> {
    let Some(items) = raw.as_array() else {
        tracing::debug!("Appointments payload is not an array, ignoring: {}", raw);
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| {
            let keep = !is_falsy(item);
            if !keep {
                tracing::debug!("Dropping empty appointment record: {}", item);
            }
            keep
        })
        .map(|item| normalize(&RawAppointmentRecord::from_value(item), ctx))
        .collect()
}

/// Normalize a single record
pub fn normalize(record: &RawAppointmentRecord, ctx: &FormatContext) -> AppointmentView {
    let locale = ctx.locale;

    let date = record
        .date
        .as_deref()
        .and_then(|raw| {
            let date = calendar_date(raw);
            if date.is_none() {
                tracing::debug!("Unparsable appointment date {:?}, using today", raw);
            }
            date
        })
        .unwrap_or(ctx.today);

    let display_time = record
        .time
        .as_deref()
        .and_then(|raw| clock_time(raw, ctx))
        .map(|time| locale.short_time(time))
        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string());

    let staff_name = record
        .employee
        .as_ref()
        .map(full_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| locale.unspecified().to_string());

    AppointmentView {
        id: record.id.clone().unwrap_or_else(|| UNKNOWN_ID.to_string()),
        display_date: locale.long_date(date),
        display_time,
        staff_name,
        service_name: record
            .service_name
            .clone()
            .unwrap_or_else(|| locale.unspecified().to_string()),
    }
}

/// The calendar date a stored value refers to. Only the `YYYY-MM-DD`
/// prefix is read so an offset on the value can never move the day.
///
/// Months and days outside their range roll over into the neighbouring
/// month or year (`2024-02-30` is March 1st), an empty part counts as
/// zero and years below 100 are 19xx.
pub fn calendar_date(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.trim().split(['T', ' ']).next()?;
    let mut parts = prefix.split('-').map(date_part);
    let year = parts.next()??;
    let month = parts.next()??;
    let day = parts.next()??;

    let year = if (0..100).contains(&year) { year + 1900 } else { year };
    let january = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, 1, 1)?;
    let months = Months::new(u32::try_from((month - 1).abs()).ok()?);
    let first_of_month = if month >= 1 {
        january.checked_add_months(months)?
    } else {
        january.checked_sub_months(months)?
    };
    first_of_month.checked_add_signed(TimeDelta::try_days(day - 1)?)
}

fn date_part(part: &str) -> Option<i64> {
    if part.is_empty() {
        Some(0)
    } else {
        part.parse().ok()
    }
}

/// Clock time of a stored timestamp in the display timezone. Values
/// with an offset are converted, values without one are taken as
/// wall-clock time, and a bare date is midnight UTC.
pub fn clock_time(raw: &str, ctx: &FormatContext) -> Option<NaiveTime> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(ctx.wall_clock(instant));
    }

    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.time());
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_time(NaiveTime::MIN).and_utc().fixed_offset();
        return Some(ctx.wall_clock(midnight));
    }

    tracing::debug!("Unparsable appointment time {:?}", raw);
    None
}

fn full_name(employee: &RawEmployee) -> String {
    format!(
        "{} {}",
        employee.first_name.as_deref().unwrap_or(""),
        employee.last_name.as_deref().unwrap_or("")
    )
    .trim()
    .to_string()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointments::Locale;
    use chrono::FixedOffset;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 20).unwrap()
    }

    fn utc_ctx() -> FormatContext {
        FormatContext::fixed(Locale::Tr, FixedOffset::east_opt(0).unwrap(), today())
    }

    #[test]
    fn it_returns_nothing_for_non_array_payloads() {
        let ctx = utc_ctx();
        for payload in [
            json!(null),
            json!({"error": "Unauthorized"}),
            json!("appointments"),
            json!(42),
            json!(true),
        ] {
            assert!(build(&payload, &ctx).is_empty(), "payload: {}", payload);
        }
    }

    #[test]
    fn it_drops_null_records_and_keeps_order() {
        let payload = json!([
            null,
            {"id": "first", "serviceName": "Haircut"},
            null,
            {"id": "second", "serviceName": "Shave"},
            false,
            {"id": "third"},
        ]);

        let views = build(&payload, &utc_ctx());
        let ids: Vec<_> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn it_builds_the_full_view() {
        let payload = json!([{
            "id": "a1",
            "date": "2024-05-01",
            "time": "2024-05-01T14:30:00Z",
            "employee": {"firstName": "Ali", "lastName": "Veli"},
            "serviceName": "Haircut"
        }]);

        let views = build(&payload, &utc_ctx());
        assert_eq!(
            views,
            vec![AppointmentView {
                id: "a1".to_string(),
                display_date: "1 Mayıs 2024".to_string(),
                display_time: "14:30".to_string(),
                staff_name: "Ali Veli".to_string(),
                service_name: "Haircut".to_string(),
            }]
        );
    }

    #[test]
    fn it_keeps_the_stored_calendar_day_in_every_timezone() {
        let payload = json!([{"id": "a1", "date": "2024-03-10T22:00:00+05:00"}]);

        for hours in [-12, -5, 0, 3, 5, 9, 14] {
            let offset = FixedOffset::east_opt(hours * 3600).unwrap();
            let ctx = FormatContext::fixed(Locale::Tr, offset, today());
            let views = build(&payload, &ctx);
            assert_eq!(views[0].display_date, "10 Mart 2024", "offset {}", hours);
        }
    }

    #[test]
    fn it_converts_times_to_the_display_timezone() {
        let payload = json!([{"id": "a1", "time": "2024-05-01T14:30:00Z"}]);
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
        let ctx = FormatContext::fixed(Locale::Tr, istanbul, today());
        assert_eq!(build(&payload, &ctx)[0].display_time, "17:30");
    }

    #[test]
    fn it_uses_placeholders_for_missing_fields() {
        let payload = json!([{}]);
        let views = build(&payload, &utc_ctx());

        assert_eq!(
            views[0],
            AppointmentView {
                id: UNKNOWN_ID.to_string(),
                display_date: "20 Nisan 2024".to_string(),
                display_time: TIME_PLACEHOLDER.to_string(),
                staff_name: "Belirtilmemiş".to_string(),
                service_name: "Belirtilmemiş".to_string(),
            }
        );
    }

    #[test]
    fn it_uses_the_unspecified_placeholder_for_missing_staff() {
        let ctx = utc_ctx();
        let payload = json!([
            {"id": "no-employee"},
            {"id": "null-employee", "employee": null},
            {"id": "blank-employee", "employee": {"firstName": " ", "lastName": null}},
            {"id": "first-only", "employee": {"firstName": "Ali"}},
        ]);

        let views = build(&payload, &ctx);
        assert_eq!(views[0].staff_name, "Belirtilmemiş");
        assert_eq!(views[1].staff_name, "Belirtilmemiş");
        assert_eq!(views[2].staff_name, "Belirtilmemiş");
        assert_eq!(views[3].staff_name, "Ali");
    }

    #[test]
    fn it_gives_every_id_less_record_the_sentinel() {
        let payload = json!([{"serviceName": "Haircut"}, {"serviceName": "Shave"}]);
        let views = build(&payload, &utc_ctx());
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.id == UNKNOWN_ID));
        assert_ne!(views[0], views[1]);
    }

    #[test]
    fn it_falls_back_to_today_for_unparsable_dates() {
        let payload = json!([
            {"id": "a1", "date": "soon"},
            {"id": "a2", "date": "2024-05"},
        ]);
        let views = build(&payload, &utc_ctx());
        assert_eq!(views[0].display_date, "20 Nisan 2024");
        assert_eq!(views[1].display_date, "20 Nisan 2024");
    }

    #[test]
    fn it_rolls_out_of_range_dates_over() {
        let payload = json!([{"id": "a1", "date": "2024-02-30"}]);
        assert_eq!(build(&payload, &utc_ctx())[0].display_date, "1 Mart 2024");

        assert_eq!(calendar_date("2024-13-01"), NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(calendar_date("2024-00-10"), NaiveDate::from_ymd_opt(2023, 12, 10));
        assert_eq!(calendar_date("2024-03-00"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(calendar_date("2024--05"), NaiveDate::from_ymd_opt(2023, 12, 5));
        assert_eq!(calendar_date("24-05-01"), NaiveDate::from_ymd_opt(1924, 5, 1));
    }

    #[test]
    fn it_uses_the_placeholder_for_unparsable_times() {
        let payload = json!([{"id": "a1", "time": "half past two"}]);
        assert_eq!(build(&payload, &utc_ctx())[0].display_time, TIME_PLACEHOLDER);
    }

    #[test]
    fn it_reads_naive_times_as_wall_clock() {
        let ctx = FormatContext::fixed(
            Locale::Tr,
            FixedOffset::east_opt(-5 * 3600).unwrap(),
            today(),
        );
        assert_eq!(
            clock_time("2024-05-01T09:15:00", &ctx),
            NaiveTime::from_hms_opt(9, 15, 0)
        );
        assert_eq!(
            clock_time("2024-05-01 09:15", &ctx),
            NaiveTime::from_hms_opt(9, 15, 0)
        );
        // A bare date is midnight UTC
        assert_eq!(clock_time("2024-05-01", &ctx), NaiveTime::from_hms_opt(19, 0, 0));
    }

    #[test]
    fn it_parses_calendar_dates() {
        assert_eq!(calendar_date("2024-05-01"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(
            calendar_date("2024-05-01 23:59:59-08:00"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(calendar_date("2024-05-01-extra"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(calendar_date("2024-May-01"), None);
        assert_eq!(calendar_date(""), None);
    }

    #[test]
    fn it_formats_with_the_context_locale() {
        let ctx = FormatContext::fixed(Locale::En, FixedOffset::east_opt(0).unwrap(), today());
        let payload = json!([{"id": "a1", "date": "2024-05-01", "time": "2024-05-01T14:30:00Z"}]);
        let views = build(&payload, &ctx);
        assert_eq!(views[0].display_date, "May 1, 2024");
        assert_eq!(views[0].display_time, "02:30 PM");
        assert_eq!(views[0].service_name, "Unspecified");
    }

    #[test]
    fn it_is_idempotent() {
        let ctx = utc_ctx();
        let payload = json!([
            {"id": "a1", "date": "2024-05-01", "time": "2024-05-01T14:30:00Z"},
            null,
            {"employee": {"lastName": "Veli"}},
        ]);
        assert_eq!(build(&payload, &ctx), build(&payload, &ctx));
    }
}
