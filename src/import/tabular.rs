use tracing::debug;

use crate::core::derive::round_trip_mileage;
use crate::domain::{Client, NamedEntity, SessionType};

use super::{
    cell, find_column, parse_date, parse_flag, parse_number, read_records, ExtractionConfidence,
    ImportBatch, ImportRow, SessionDraft,
};

struct Columns {
    date: Option<usize>,
    client: Option<usize>,
    duration: Option<usize>,
    rate: Option<usize>,
    session_type: Option<usize>,
    paid: Option<usize>,
    notes: Option<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Self {
        Self {
            date: find_column(headers, &["date"]),
            client: find_column(headers, &["client", "name"]),
            duration: find_column(headers, &["duration", "hours"]),
            rate: find_column(headers, &["rate"]),
            session_type: find_column(headers, &["type"]),
            paid: find_column(headers, &["paid"]),
            notes: find_column(headers, &["notes"]),
        }
    }
}

/// Parses the session spreadsheet layout produced by
/// [`crate::export::session_template_csv`], matching columns loosely by header.
///
/// The first non-blank record is the header. Every later record yields one row in order.
pub fn parse_sessions_csv(text: &str, clients: &[Client]) -> ImportBatch {
    let mut records = read_records(text).into_iter();
    let headers = match records.next() {
        Some(header) => match header.fields {
            Ok(fields) => fields,
            Err(_) => return ImportBatch::default(),
        },
        None => return ImportBatch::default(),
    };
    let columns = Columns::locate(&headers);

    let rows: Vec<ImportRow> = records
        .map(|record| match record.fields {
            Ok(fields) => parse_row(record.line, &fields, &columns, clients),
            Err(message) => ImportRow {
                line: record.line,
                draft: SessionDraft::empty(ExtractionConfidence::Exact),
                errors: vec![message],
            },
        })
        .collect();

    let batch = ImportBatch { rows };
    debug!(
        rows = batch.len(),
        valid = batch.valid_count(),
        "parsed session spreadsheet"
    );
    batch
}

fn parse_row(line: usize, fields: &[String], columns: &Columns, clients: &[Client]) -> ImportRow {
    let mut errors = Vec::new();
    let mut draft = SessionDraft::empty(ExtractionConfidence::Exact);

    let raw_date = cell(fields, columns.date);
    if raw_date.is_empty() {
        errors.push("Date is required".to_string());
    } else {
        draft.date = parse_date(raw_date);
        if draft.date.is_none() {
            errors.push(format!("Invalid date \"{raw_date}\""));
        }
    }

    let name = cell(fields, columns.client);
    draft.client_name = name.to_string();
    let client = if name.is_empty() {
        errors.push("Client name is required".to_string());
        None
    } else {
        let found = clients.iter().find(|c| c.matches_name(name));
        if found.is_none() {
            errors.push(format!("Client \"{name}\" not found"));
        }
        found
    };
    draft.client_id = client.map(|c| c.id.clone());

    let raw_duration = cell(fields, columns.duration);
    match parse_number(raw_duration) {
        Some(hours) if hours > 0.0 => draft.duration = Some(hours),
        _ => errors.push(format!(
            "Duration must be a positive number (got \"{raw_duration}\")"
        )),
    }

    let raw_rate = cell(fields, columns.rate);
    if raw_rate.is_empty() {
        draft.rate = client.map(|c| c.hourly_rate);
    } else {
        match parse_number(raw_rate) {
            Some(rate) if rate >= 0.0 => draft.rate = Some(rate),
            Some(_) => errors.push("Rate must not be negative".to_string()),
            None => errors.push(format!("Rate must be a number (got \"{raw_rate}\")")),
        }
    }

    draft.session_type = SessionType::from_loose(cell(fields, columns.session_type));
    draft.mileage = client
        .map(|c| round_trip_mileage(c, draft.session_type))
        .unwrap_or(0.0);
    draft.paid = parse_flag(cell(fields, columns.paid));
    draft.notes = cell(fields, columns.notes).to_string();

    ImportRow {
        line,
        draft,
        errors,
    }
}
