//! Plain text rendering of the appointment list for the terminal

use super::locale::Locale;
use super::models::AppointmentView;

pub fn render_list(views: &[AppointmentView], locale: Locale) -> String {
    let mut out = vec![locale.heading().to_string()];

    if views.is_empty() {
        out.push(locale.empty_state().to_string());
        out.push(format!("-> {}", locale.book_prompt()));
        return out.join("\n");
    }

    for view in views {
        out.push(render_item(view, locale));
    }
    out.join("\n")
}

pub fn render_item(view: &AppointmentView, locale: Locale) -> String {
    format!(
        "- {}: {} | {} | {} | {} [{}]",
        locale.staff_label(),
        view.staff_name,
        view.display_date,
        view.display_time,
        view.service_name,
        view.id
    )
}
