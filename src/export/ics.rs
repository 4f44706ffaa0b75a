//! iCalendar (RFC 5545) export of logged sessions.

use chrono::{FixedOffset, NaiveDateTime, NaiveTime, Offset, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::currency::{format_currency, format_number};
use crate::domain::{Ledger, Session};

use super::csv_report::DEFAULT_APP_NAME;

pub const DEFAULT_UID_DOMAIN: &str = "tutortracker.app";
pub const DEFAULT_START_HOUR: u32 = 9;
const VIRTUAL_LOCATION: &str = "Virtual Session";
const MAX_LINE_OCTETS: usize = 75;
const UTC_STAMP: &str = "%Y%m%dT%H%M%SZ";

/// Rendering knobs for [`sessions_to_ics`].
#[derive(Debug, Clone, PartialEq)]
pub struct IcsOptions {
    pub app_name: String,
    pub uid_domain: String,
    /// Local clock hour at which every session is placed, since sessions have no time of day.
    pub start_hour: u32,
    /// Offset of the tutor's local time from UTC.
    pub offset: FixedOffset,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            uid_domain: DEFAULT_UID_DOMAIN.to_string(),
            start_hour: DEFAULT_START_HOUR,
            offset: Utc.fix(),
        }
    }
}

pub fn calendar_filename() -> &'static str {
    "tutoring-sessions.ics"
}

/// Renders one `VEVENT` per session. Event UIDs derive from session ids, so exporting the
/// same sessions twice yields the same document.
pub fn sessions_to_ics(ledger: &Ledger, sessions: &[Session], options: &IcsOptions) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        format!("PRODID:-//{}//Session Export//EN", escape_text(&options.app_name)),
        "CALSCALE:GREGORIAN".into(),
        "METHOD:PUBLISH".into(),
    ];
    for session in sessions {
        lines.extend(event_lines(ledger, session, options));
    }
    lines.push("END:VCALENDAR".into());

    debug!(events = sessions.len(), "calendar rendered");

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str("\r\n");
    }
    out
}

fn event_lines(ledger: &Ledger, session: &Session, options: &IcsOptions) -> Vec<String> {
    let start = utc_start(session, options);
    let end = session_end(start, session.duration).unwrap_or_else(|| {
        warn!(session_id = %session.id, duration = session.duration, "end time out of range");
        start
    });
    let client = ledger.client(&session.client_id);
    let client_name = ledger.client_name(&session.client_id);

    let mut details = vec![
        format!("Client: {client_name}"),
        format!("Duration: {} hours", format_number(session.duration)),
        format!("Rate: {}/hour", format_currency(session.rate)),
        format!("Total: {}", format_currency(session.total_earned)),
        format!("Type: {}", session.session_type.label()),
        format!(
            "Payment: {}",
            if session.paid { "Paid" } else { "Unpaid" }
        ),
    ];
    if session.mileage > 0.0 {
        details.push(format!("Mileage: {} miles", format_number(session.mileage)));
    }
    if !session.notes.trim().is_empty() {
        details.push(format!("Notes: {}", session.notes.trim()));
    }

    let location = if session.session_type.is_in_person() {
        client.and_then(|c| c.address.clone())
    } else {
        Some(VIRTUAL_LOCATION.to_string())
    };

    let stamp = start.format(UTC_STAMP).to_string();
    let mut lines = vec![
        "BEGIN:VEVENT".into(),
        format!("UID:{}@{}", session.id, options.uid_domain),
        format!("DTSTAMP:{stamp}"),
        format!("DTSTART:{stamp}"),
        format!("DTEND:{}", end.format(UTC_STAMP)),
        format!("SUMMARY:{}", escape_text(&format!("Tutoring with {client_name}"))),
        format!("DESCRIPTION:{}", escape_text(&details.join("\n"))),
    ];
    if let Some(location) = location.filter(|l| !l.trim().is_empty()) {
        lines.push(format!("LOCATION:{}", escape_text(&location)));
    }
    lines.push("END:VEVENT".into());
    lines
}

/// Session start in UTC: the configured local hour on the session date, shifted by the offset.
fn utc_start(session: &Session, options: &IcsOptions) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(options.start_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let local = session.date.and_time(time);
    TimeDelta::try_seconds(i64::from(options.offset.local_minus_utc()))
        .and_then(|shift| local.checked_sub_signed(shift))
        .unwrap_or(local)
}

/// `start` plus `hours`, or `None` when the sum leaves the representable range.
fn session_end(start: NaiveDateTime, hours: f64) -> Option<NaiveDateTime> {
    let seconds = (hours * 3600.0).round();
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_seconds(seconds as i64).and_then(|delta| start.checked_add_signed(delta))
}

/// RFC 5545 TEXT escaping.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Folds a content line into chunks of at most 75 octets, never splitting a UTF-8 character.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut used = 0;
    // Continuation lines spend one octet on the leading space.
    let mut limit = MAX_LINE_OCTETS;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if used + width > limit {
            out.push_str("\r\n ");
            used = 0;
            limit = MAX_LINE_OCTETS - 1;
        }
        out.push(ch);
        used += width;
    }
    out
}
