//! Normalizers turning external text into candidate sessions.
//!
//! Every input row (or calendar event) yields exactly one [`ImportRow`], valid or not, so
//! callers can audit counts before committing. Nothing here writes to a ledger; committing is
//! [`crate::core::services::ImportService::commit`].

pub mod calendar;
pub mod tabular;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::{Session, SessionType};

pub use calendar::{extract_client_name, infer_session_type, parse_calendar, DEFAULT_FALLBACK_RATE};
pub use tabular::parse_sessions_csv;

/// How much the importer trusts the fields it extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionConfidence {
    /// Values came from explicitly labelled columns.
    Exact,
    /// Values were inferred heuristically (calendar titles, location keywords).
    Fuzzy,
}

/// A proposed session. Fields stay `None` when the source value was missing or unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDraft {
    pub client_id: Option<String>,
    pub client_name: String,
    pub date: Option<NaiveDate>,
    pub duration: Option<f64>,
    pub rate: Option<f64>,
    pub session_type: SessionType,
    pub mileage: f64,
    pub paid: bool,
    /// Payment status mentioned by the source, if any. Calendar imports record it here but
    /// still create unpaid sessions.
    pub payment_hint: Option<bool>,
    pub notes: String,
    pub confidence: ExtractionConfidence,
}

impl SessionDraft {
    pub(crate) fn empty(confidence: ExtractionConfidence) -> Self {
        Self {
            client_id: None,
            client_name: String::new(),
            date: None,
            duration: None,
            rate: None,
            session_type: SessionType::Virtual,
            mileage: 0.0,
            paid: false,
            payment_hint: None,
            notes: String::new(),
            confidence,
        }
    }

    /// Materializes the draft under `id`; `None` while a required field is missing.
    pub fn to_session(&self, id: impl Into<String>) -> Option<Session> {
        let client_id = self.client_id.clone()?;
        let date = self.date?;
        let duration = self.duration?;
        let rate = self.rate?;
        Some(Session {
            id: id.into(),
            client_id,
            date,
            duration,
            rate,
            session_type: self.session_type,
            mileage: self.mileage,
            total_earned: duration * rate,
            paid: self.paid,
            paid_date: None,
            notes: self.notes.clone(),
        })
    }
}

/// One verdict per source row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// 1-based source line (tabular) or line of `BEGIN:VEVENT` (calendar).
    pub line: usize,
    pub draft: SessionDraft,
    pub errors: Vec<String>,
}

impl ImportRow {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatch {
    pub rows: Vec<ImportRow>,
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn valid_rows(&self) -> impl Iterator<Item = &ImportRow> {
        self.rows.iter().filter(|row| row.is_valid())
    }

    pub fn invalid_rows(&self) -> impl Iterator<Item = &ImportRow> {
        self.rows.iter().filter(|row| !row.is_valid())
    }

    pub fn valid_count(&self) -> usize {
        self.valid_rows().count()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid_rows().count()
    }
}

/// A record read from comma-separated text along with its source line.
pub(crate) struct RawRecord {
    pub line: usize,
    pub fields: Result<Vec<String>, String>,
}

/// Splits comma-separated text into trimmed records. The `csv` reader strips one layer of
/// surrounding quotes per field. Lines with no content are dropped.
pub(crate) fn read_records(text: &str) -> Vec<RawRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|pos| pos.line() as usize)
                    .unwrap_or(index + 1);
                let fields: Vec<String> = record.iter().map(str::to_string).collect();
                if fields.iter().all(|field| field.is_empty()) {
                    continue;
                }
                records.push(RawRecord {
                    line,
                    fields: Ok(fields),
                });
            }
            Err(err) => {
                let line = err
                    .position()
                    .map(|pos| pos.line() as usize)
                    .unwrap_or(index + 1);
                records.push(RawRecord {
                    line,
                    fields: Err(format!("Unreadable row: {err}")),
                });
            }
        }
    }
    records
}

/// Index of the first header containing any of `keywords` (headers compared lowercase).
pub(crate) fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.to_lowercase();
        keywords.iter().any(|keyword| header.contains(keyword))
    })
}

pub(crate) fn find_column_by(
    headers: &[String],
    predicate: impl Fn(&str) -> bool,
) -> Option<usize> {
    headers
        .iter()
        .position(|header| predicate(&header.to_lowercase()))
}

pub(crate) fn cell(fields: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|idx| fields.get(idx))
        .map(|value| value.trim())
        .unwrap_or("")
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

pub(crate) fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim().to_uppercase();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&raw, format).ok())
}

/// Parses a finite number, tolerating a leading `$`.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches('$').trim();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub(crate) fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "paid" | "1"
    )
}
