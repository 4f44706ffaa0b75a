use chrono::NaiveDateTime;
use tracing::debug;

use crate::core::derive::{calendar_year, days_since, in_year, is_deductible};
use crate::domain::{Ledger, Session};

/// Number of sessions shown in the recent-activity list.
pub const RECENT_SESSION_LIMIT: usize = 5;
/// Number of unpaid sessions shown before collapsing into an overflow count.
pub const UNPAID_PREVIEW_LIMIT: usize = 5;

/// An unpaid session with its aging information.
#[derive(Debug, Clone, PartialEq)]
pub struct UnpaidSession {
    pub session: Session,
    pub client_name: String,
    pub days_outstanding: i64,
}

/// Headline figures for the landing view.
///
/// `net_income_estimate` deliberately omits the mileage deduction, unlike
/// [`crate::core::services::YearReport::net_income`]. Both formulas are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub current_year: i32,
    /// All years.
    pub total_income: f64,
    pub paid_income: f64,
    pub unpaid_income: f64,
    /// In-person mileage, all years.
    pub total_mileage: f64,
    /// Deductible expenses, all years.
    pub total_deductible_expenses: f64,
    pub current_year_income: f64,
    pub current_year_expense_total: f64,
    pub current_year_session_count: usize,
    pub client_count: usize,
    pub net_income_estimate: f64,
    pub recent_sessions: Vec<Session>,
    pub unpaid_sessions: Vec<UnpaidSession>,
}

impl DashboardSummary {
    /// First `limit` unpaid sessions plus the number left over.
    pub fn unpaid_preview(&self, limit: usize) -> (&[UnpaidSession], usize) {
        let shown = limit.min(self.unpaid_sessions.len());
        (
            &self.unpaid_sessions[..shown],
            self.unpaid_sessions.len() - shown,
        )
    }
}

pub struct DashboardService;

impl DashboardService {
    /// Summarises the ledger as seen at `now`, which also fixes the current year.
    pub fn summarize(ledger: &Ledger, now: NaiveDateTime) -> DashboardSummary {
        let current_year = calendar_year(now.date());

        let total_income: f64 = ledger.sessions.iter().map(|s| s.total_earned).sum();
        let paid_income: f64 = ledger
            .sessions
            .iter()
            .filter(|s| s.paid)
            .map(|s| s.total_earned)
            .sum();
        let total_mileage: f64 = ledger
            .sessions
            .iter()
            .filter(|s| s.session_type.is_in_person())
            .map(|s| s.mileage)
            .sum();
        let total_deductible_expenses: f64 = ledger
            .expenses
            .iter()
            .filter(|e| is_deductible(e))
            .map(|e| e.amount)
            .sum();

        let year_sessions: Vec<&Session> = ledger
            .sessions
            .iter()
            .filter(|s| in_year(s.date, current_year))
            .collect();
        let current_year_income: f64 = year_sessions.iter().map(|s| s.total_earned).sum();
        let current_year_expense_total: f64 = ledger
            .expenses
            .iter()
            .filter(|e| in_year(e.date, current_year) && is_deductible(e))
            .map(|e| e.amount)
            .sum();

        let by_recency = sessions_by_recency(&ledger.sessions);
        let recent_sessions = by_recency
            .iter()
            .take(RECENT_SESSION_LIMIT)
            .map(|s| (*s).clone())
            .collect();
        let unpaid_sessions: Vec<UnpaidSession> = by_recency
            .iter()
            .filter(|s| !s.paid)
            .map(|s| UnpaidSession {
                session: (*s).clone(),
                client_name: ledger.client_name(&s.client_id).to_string(),
                days_outstanding: days_since(s.date, now),
            })
            .collect();

        debug!(
            current_year,
            sessions = ledger.sessions.len(),
            unpaid = unpaid_sessions.len(),
            "dashboard summarised"
        );

        DashboardSummary {
            current_year,
            total_income,
            paid_income,
            unpaid_income: total_income - paid_income,
            total_mileage,
            total_deductible_expenses,
            current_year_income,
            current_year_expense_total,
            current_year_session_count: year_sessions.len(),
            client_count: ledger.clients.len(),
            net_income_estimate: current_year_income - current_year_expense_total,
            recent_sessions,
            unpaid_sessions,
        }
    }
}

/// Newest first; `sort_by` is stable so same-day sessions keep insertion order.
fn sessions_by_recency(sessions: &[Session]) -> Vec<&Session> {
    let mut ordered: Vec<&Session> = sessions.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered
}
