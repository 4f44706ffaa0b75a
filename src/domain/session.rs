use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{client::Client, common::*};

/// How a session was delivered. Only in-person sessions accrue mileage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    #[default]
    Virtual,
    InPerson,
}

impl SessionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Virtual => "virtual",
            SessionType::InPerson => "in-person",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionType::Virtual => "Virtual",
            SessionType::InPerson => "In-Person",
        }
    }

    /// Maps free text to a session type; only an exact `in-person` selects in-person delivery.
    pub fn from_loose(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("in-person") {
            SessionType::InPerson
        } else {
            SessionType::Virtual
        }
    }

    pub fn is_in_person(self) -> bool {
        matches!(self, SessionType::InPerson)
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged tutoring session.
///
/// `rate` is a snapshot taken when the session was logged, and `total_earned` is frozen at
/// write time: later changes to the client's hourly rate never touch existing sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// May dangle once the client is deleted.
    pub client_id: String,
    pub date: NaiveDate,
    pub duration: f64,
    pub rate: f64,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[serde(default)]
    pub mileage: f64,
    pub total_earned: f64,
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl Session {
    /// Logs a new unpaid session for `client`, computing mileage and earnings.
    pub fn log(
        client: &Client,
        date: NaiveDate,
        duration: f64,
        rate: f64,
        session_type: SessionType,
    ) -> Self {
        Self {
            id: new_id(),
            client_id: client.id.clone(),
            date,
            duration,
            rate,
            session_type,
            mileage: crate::core::derive::round_trip_mileage(client, session_type),
            total_earned: duration * rate,
            paid: false,
            paid_date: None,
            notes: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Flips the payment flag, stamping `paid_date` only on the unpaid to paid transition.
    pub fn toggle_paid(&mut self, today: NaiveDate) {
        self.paid = !self.paid;
        self.paid_date = if self.paid { Some(today) } else { None };
    }
}

impl Identifiable for Session {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Session {
    fn display_label(&self) -> String {
        format!(
            "{} • {}hr • {} • ${:.2}",
            self.date, self.duration, self.session_type, self.total_earned
        )
    }
}
