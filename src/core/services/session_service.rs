//! Business logic helpers for logging and settling sessions.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::derive::{earned_amount, round_trip_mileage};
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{new_id, Ledger, Session, SessionType};

/// Form payload for logging or editing a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInput {
    pub client_id: String,
    pub date: NaiveDate,
    pub duration: f64,
    pub rate: f64,
    pub session_type: SessionType,
    pub notes: String,
}

impl SessionInput {
    pub fn new(
        client_id: impl Into<String>,
        date: NaiveDate,
        duration: f64,
        rate: f64,
        session_type: SessionType,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            date,
            duration,
            rate,
            session_type,
            notes: String::new(),
        }
    }
}

pub struct SessionService;

impl SessionService {
    /// Logs a new unpaid session. Mileage and earnings are frozen at this point.
    pub fn log(ledger: &Ledger, input: SessionInput) -> ServiceResult<Ledger> {
        let session = build(ledger, new_id(), input)?;
        info!(session_id = %session.id, earned = session.total_earned, "session logged");
        let mut next = ledger.clone();
        next.sessions.push(session);
        Ok(next)
    }

    /// Rewrites a session from `input`, recomputing mileage and earnings. Payment state is
    /// left untouched; use [`SessionService::toggle_paid`] for that.
    pub fn update(ledger: &Ledger, id: &str, input: SessionInput) -> ServiceResult<Ledger> {
        let existing = ledger
            .session(id)
            .ok_or_else(|| ServiceError::NotFound(format!("Session {id}")))?;
        let mut session = build(ledger, id.to_string(), input)?;
        session.paid = existing.paid;
        session.paid_date = existing.paid_date;

        let mut next = ledger.clone();
        if let Some(slot) = next.sessions.iter_mut().find(|s| s.id == id) {
            *slot = session;
        }
        Ok(next)
    }

    /// Flips the payment flag, stamping `today` as the paid date on the unpaid to paid edge.
    pub fn toggle_paid(ledger: &Ledger, id: &str, today: NaiveDate) -> ServiceResult<Ledger> {
        let mut next = ledger.clone();
        let session = next
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Session {id}")))?;
        session.toggle_paid(today);
        debug!(session_id = id, paid = session.paid, "payment toggled");
        Ok(next)
    }

    pub fn remove(ledger: &Ledger, id: &str) -> ServiceResult<Ledger> {
        if ledger.session(id).is_none() {
            return Err(ServiceError::NotFound(format!("Session {id}")));
        }
        let mut next = ledger.clone();
        next.sessions.retain(|session| session.id != id);
        Ok(next)
    }
}

fn build(ledger: &Ledger, id: String, input: SessionInput) -> ServiceResult<Session> {
    let client = ledger
        .client(&input.client_id)
        .ok_or_else(|| ServiceError::NotFound(format!("Client {}", input.client_id)))?;
    if input.duration.is_nan() || input.duration <= 0.0 {
        return Err(ServiceError::Invalid(
            "Duration must be a positive number of hours".into(),
        ));
    }
    if input.rate.is_nan() || input.rate < 0.0 {
        return Err(ServiceError::Invalid("Rate must be zero or greater".into()));
    }
    let mut session = Session {
        id,
        client_id: client.id.clone(),
        date: input.date,
        duration: input.duration,
        rate: input.rate,
        session_type: input.session_type,
        mileage: round_trip_mileage(client, input.session_type),
        total_earned: 0.0,
        paid: false,
        paid_date: None,
        notes: input.notes,
    };
    session.total_earned = earned_amount(&session);
    Ok(session)
}
