use crate::currency::format_number;
use crate::domain::{Ledger, Session};

/// Header shared by the session template and the spreadsheet importer.
pub const SESSION_TEMPLATE_HEADER: &str =
    "Date, Client Name, Duration (hours), Rate ($/hour), Type, Paid, Notes";

const EXAMPLE_ROW: &str = "2024-01-15,Jane Smith,1.5,45,in-person,no,Algebra review";

/// Wraps a field in double quotes when it contains a comma, quote or line break, doubling
/// embedded quotes.
pub fn quote_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Writes `sessions` in the layout read back by [`crate::import::parse_sessions_csv`].
///
/// Durations and rates use the shortest exact decimal form so a re-import reproduces them.
pub fn session_template_csv(ledger: &Ledger, sessions: &[Session]) -> String {
    let mut lines = Vec::with_capacity(sessions.len() + 1);
    lines.push(SESSION_TEMPLATE_HEADER.to_string());
    for session in sessions {
        let row = [
            session.date.to_string(),
            quote_field(ledger.client_name(&session.client_id)),
            format_number(session.duration),
            format_number(session.rate),
            session.session_type.as_str().to_string(),
            if session.paid { "yes" } else { "no" }.to_string(),
            quote_field(&session.notes),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Header plus one illustrative row for users filling the sheet by hand.
pub fn blank_session_template() -> String {
    format!("{SESSION_TEMPLATE_HEADER}\n{EXAMPLE_ROW}")
}
