//! Best-effort import of calendar events as tutoring sessions.
//!
//! Accepts either iCalendar text (`BEGIN:VEVENT` blocks) or a spreadsheet export with
//! subject/start/end columns. Client names come from the event title and delivery mode from the
//! location, so every draft is tagged [`ExtractionConfidence::Fuzzy`].
//!
//! Drafts are always unpaid. A payment mention in the description is kept on
//! [`SessionDraft::payment_hint`] but is not applied.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::derive::round_trip_mileage;
use crate::domain::{Client, NamedEntity, SessionType};

use super::{
    cell, find_column, find_column_by, parse_date, parse_number, parse_time, read_records,
    ExtractionConfidence, ImportBatch, ImportRow, SessionDraft,
};

/// Hourly rate applied when the event's client cannot be resolved.
pub const DEFAULT_FALLBACK_RATE: f64 = 50.0;

const DEFAULT_DURATION_HOURS: f64 = 1.0;
const VIRTUAL_KEYWORDS: [&str; 3] = ["virtual", "zoom", "online"];

static TITLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:tutoring|session|lesson)s?\b\s*(?:with|for|[-:–])?\s*(.+)")
        .expect("hardcoded regex should be valid")
});

#[derive(Debug, Clone, Copy, PartialEq)]
enum EventTime {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl EventTime {
    fn date(self) -> NaiveDate {
        match self {
            EventTime::Date(date) => date,
            EventTime::DateTime(at) => at.date(),
        }
    }
}

#[derive(Debug, Default)]
struct CalendarEvent {
    line: usize,
    title: String,
    start: Option<EventTime>,
    end: Option<EventTime>,
    duration_hours: Option<f64>,
    location: String,
    description: String,
    /// Set when input ended, or another event began, before `END:VEVENT`.
    unterminated: bool,
}

impl CalendarEvent {
    /// Explicit duration, else end minus start when both carry a time, else one hour.
    fn hours(&self) -> f64 {
        if let Some(hours) = self.duration_hours.filter(|h| *h > 0.0) {
            return hours;
        }
        if let (Some(EventTime::DateTime(start)), Some(EventTime::DateTime(end))) =
            (self.start, self.end)
        {
            let minutes = end.signed_duration_since(start).num_minutes();
            if minutes > 0 {
                return minutes as f64 / 60.0;
            }
        }
        DEFAULT_DURATION_HOURS
    }
}

/// Parses calendar text into one draft per event.
pub fn parse_calendar(text: &str, clients: &[Client], fallback_rate: f64) -> ImportBatch {
    let events = if text.to_ascii_uppercase().contains("BEGIN:VEVENT") {
        parse_ics_events(text)
    } else {
        parse_tabular_events(text)
    };

    let rows: Vec<ImportRow> = events
        .iter()
        .map(|event| event_to_row(event, clients, fallback_rate))
        .collect();
    let batch = ImportBatch { rows };
    debug!(
        events = batch.len(),
        valid = batch.valid_count(),
        "parsed calendar events"
    );
    batch
}

/// Pulls a client name out of an event title such as `Tutoring with Ada`, falling back to
/// the whole title. Trailing punctuation is dropped.
pub fn extract_client_name(title: &str) -> String {
    strip_trailing_punctuation(title_fragment(title)).to_string()
}

/// Name part of the title, cut at `(` or `|`, with punctuation kept.
fn title_fragment(title: &str) -> &str {
    let title = title.trim();
    let fragment = TITLE_NAME
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(title);
    fragment.split(['(', '|']).next().unwrap_or(fragment).trim()
}

fn strip_trailing_punctuation(name: &str) -> &str {
    name.trim_end_matches(['.', ',', ';', '!']).trim()
}

/// Matches the title fragment as written first, so names such as `Grace, Jr.` keep their
/// punctuation, then without trailing punctuation.
fn resolve_client<'a>(title: &str, clients: &'a [Client]) -> (String, Option<&'a Client>) {
    let fragment = title_fragment(title);
    if let Some(client) = clients.iter().find(|c| c.matches_name(fragment)) {
        return (fragment.to_string(), Some(client));
    }
    let name = strip_trailing_punctuation(fragment);
    let client = clients.iter().find(|c| c.matches_name(name));
    (name.to_string(), client)
}

/// `virtual`, `zoom` or `online` anywhere in the location means a virtual session; anything
/// else, including no location, means in-person.
pub fn infer_session_type(location: &str) -> SessionType {
    let location = location.to_lowercase();
    if VIRTUAL_KEYWORDS.iter().any(|k| location.contains(k)) {
        SessionType::Virtual
    } else {
        SessionType::InPerson
    }
}

fn payment_hint(description: &str) -> Option<bool> {
    let description = description.to_lowercase();
    if description.contains("unpaid") {
        Some(false)
    } else if description.contains("paid") {
        Some(true)
    } else {
        None
    }
}

fn event_to_row(event: &CalendarEvent, clients: &[Client], fallback_rate: f64) -> ImportRow {
    let mut errors = Vec::new();
    let mut draft = SessionDraft::empty(ExtractionConfidence::Fuzzy);

    let (name, found) = resolve_client(&event.title, clients);
    let client = if name.is_empty() {
        errors.push("Event title is required".to_string());
        None
    } else {
        if found.is_none() {
            errors.push(format!("Client \"{name}\" not found"));
        }
        found
    };
    draft.client_name = name;

    draft.date = event.start.map(EventTime::date);
    if draft.date.is_none() {
        errors.push("Event start date is missing or invalid".to_string());
    }
    if event.unterminated {
        errors.push("Event is not terminated".to_string());
    }

    draft.client_id = client.map(|c| c.id.clone());
    draft.duration = Some(event.hours());
    draft.rate = Some(client.map(|c| c.hourly_rate).unwrap_or(fallback_rate));
    draft.session_type = infer_session_type(&event.location);
    draft.mileage = client
        .map(|c| round_trip_mileage(c, draft.session_type))
        .unwrap_or(0.0);
    draft.payment_hint = payment_hint(&event.description);
    draft.paid = false;
    draft.notes = event.description.clone();

    ImportRow {
        line: event.line,
        draft,
        errors,
    }
}

fn parse_ics_events(text: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut current: Option<CalendarEvent> = None;
    // Depth of components nested inside the open event, e.g. VALARM.
    let mut nested = 0usize;

    for (line, content) in unfold_lines(text) {
        let upper = content.trim_end().to_ascii_uppercase();
        if upper == "BEGIN:VEVENT" {
            let reopened = current.replace(CalendarEvent {
                line,
                ..CalendarEvent::default()
            });
            push_unterminated(&mut events, reopened);
            nested = 0;
            continue;
        }
        if upper == "END:VEVENT" {
            if let Some(event) = current.take() {
                events.push(event);
            }
            continue;
        }
        if upper == "END:VCALENDAR" {
            push_unterminated(&mut events, current.take());
            continue;
        }
        let Some(event) = current.as_mut() else {
            continue;
        };
        if upper.starts_with("BEGIN:") {
            nested += 1;
            continue;
        }
        if upper.starts_with("END:") {
            nested = nested.saturating_sub(1);
            continue;
        }
        if nested > 0 {
            continue;
        }

        let Some((key, value)) = content.split_once(':') else {
            continue;
        };
        let name = key.split(';').next().unwrap_or(key).to_ascii_uppercase();
        match name.as_str() {
            "SUMMARY" => event.title = unescape_text(value),
            "DTSTART" => event.start = parse_ics_time(value),
            "DTEND" => event.end = parse_ics_time(value),
            "DURATION" => event.duration_hours = parse_ics_duration(value),
            "LOCATION" => event.location = unescape_text(value),
            "DESCRIPTION" => event.description = unescape_text(value),
            _ => {}
        }
    }
    push_unterminated(&mut events, current);
    events
}

fn push_unterminated(events: &mut Vec<CalendarEvent>, open: Option<CalendarEvent>) {
    if let Some(mut event) = open {
        event.unterminated = true;
        events.push(event);
    }
}

/// Joins folded continuation lines, keeping the line number where each logical line starts.
fn unfold_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        if let Some(rest) = raw.strip_prefix([' ', '\t']) {
            if let Some((_, previous)) = lines.last_mut() {
                previous.push_str(rest);
                continue;
            }
        }
        lines.push((index + 1, raw.to_string()));
    }
    lines
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out.trim().to_string()
}

fn parse_ics_time(value: &str) -> Option<EventTime> {
    let value = value.trim().trim_end_matches(['Z', 'z']);
    if value.len() == 8 {
        return NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .map(EventTime::Date);
    }
    ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(EventTime::DateTime)
}

/// Hours in an RFC 5545 duration such as `PT1H30M` or `P1D`. Negative or empty durations
/// yield `None`.
fn parse_ics_duration(value: &str) -> Option<f64> {
    let value = value.trim().trim_start_matches('+');
    let body = value.strip_prefix(['P', 'p'])?;

    let mut hours = 0.0;
    let mut digits = String::new();
    for ch in body.chars() {
        match ch.to_ascii_uppercase() {
            '0'..='9' => digits.push(ch),
            'T' => {}
            unit => {
                let amount: f64 = digits.parse().ok()?;
                digits.clear();
                hours += amount
                    * match unit {
                        'W' => 24.0 * 7.0,
                        'D' => 24.0,
                        'H' => 1.0,
                        'M' => 1.0 / 60.0,
                        'S' => 1.0 / 3600.0,
                        _ => return None,
                    };
            }
        }
    }
    Some(hours).filter(|h| *h > 0.0)
}

struct CalendarColumns {
    title: Option<usize>,
    start_date: Option<usize>,
    start_time: Option<usize>,
    end_date: Option<usize>,
    end_time: Option<usize>,
    duration: Option<usize>,
    location: Option<usize>,
    description: Option<usize>,
}

impl CalendarColumns {
    fn locate(headers: &[String]) -> Self {
        let start_date = find_column_by(headers, |h| h.contains("start") && h.contains("date"))
            .or_else(|| find_column_by(headers, |h| h.contains("date") && !h.contains("end")));
        Self {
            title: find_column(headers, &["subject", "title", "summary"]),
            start_date,
            start_time: find_column_by(headers, |h| h.contains("start") && h.contains("time")),
            end_date: find_column_by(headers, |h| h.contains("end") && h.contains("date")),
            end_time: find_column_by(headers, |h| h.contains("end") && h.contains("time")),
            duration: find_column(headers, &["duration"]),
            location: find_column(headers, &["location"]),
            description: find_column(headers, &["description", "notes"]),
        }
    }
}

fn parse_tabular_events(text: &str) -> Vec<CalendarEvent> {
    let mut records = read_records(text).into_iter();
    let headers = match records.next().map(|r| r.fields) {
        Some(Ok(fields)) => fields,
        _ => return Vec::new(),
    };
    let columns = CalendarColumns::locate(&headers);

    records
        .map(|record| {
            let fields = record.fields.unwrap_or_default();
            let start_date = parse_date(cell(&fields, columns.start_date));
            let end_date = parse_date(cell(&fields, columns.end_date)).or(start_date);
            let start_time = parse_time(cell(&fields, columns.start_time));
            let end_time = parse_time(cell(&fields, columns.end_time));

            CalendarEvent {
                line: record.line,
                title: cell(&fields, columns.title).to_string(),
                start: start_date.map(|date| match start_time {
                    Some(time) => EventTime::DateTime(date.and_time(time)),
                    None => EventTime::Date(date),
                }),
                end: end_date.map(|date| match end_time {
                    Some(time) => EventTime::DateTime(date.and_time(time)),
                    None => EventTime::Date(date),
                }),
                duration_hours: parse_number(cell(&fields, columns.duration)),
                location: cell(&fields, columns.location).to_string(),
                description: cell(&fields, columns.description).to_string(),
                unterminated: false,
            }
        })
        .collect()
}
