use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::core::derive::{calendar_year, in_year, is_deductible, month_index, ratio_or_zero};
use crate::currency::month_label;
use crate::domain::{Expense, ExpenseCategory, Ledger, Session};

/// Reference per-mile rate used when the caller has no configured rate.
pub const DEFAULT_MILEAGE_RATE: f64 = 0.655;

/// Income attributed to one client within a report year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientIncome {
    pub income: f64,
    pub session_count: usize,
    pub total_hours: f64,
}

impl ClientIncome {
    /// Share of `gross_income` as a percentage; zero when there is no income at all.
    pub fn percentage_of(&self, gross_income: f64) -> f64 {
        ratio_or_zero(self.income, gross_income) * 100.0
    }
}

/// One bucket of the monthly series.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotals {
    pub month_label: &'static str,
    pub income: f64,
    /// Deductible expenses only.
    pub expenses: f64,
    pub session_count: usize,
}

/// Tax-year view of the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct YearReport {
    pub year: i32,
    pub mileage_rate: f64,
    pub gross_income: f64,
    pub deductible_expense_total: f64,
    pub business_mileage: f64,
    pub mileage_deduction: f64,
    /// Gross income less deductible expenses and the mileage deduction.
    pub net_income: f64,
    pub expense_by_category: BTreeMap<ExpenseCategory, f64>,
    pub client_income_breakdown: BTreeMap<String, ClientIncome>,
    /// Always twelve entries, January first.
    pub monthly_breakdown: Vec<MonthlyTotals>,
    /// Year-scoped sessions in ledger order.
    pub sessions: Vec<Session>,
    /// Year-scoped expenses in ledger order, deductible or not.
    pub expenses: Vec<Expense>,
}

impl YearReport {
    /// Deductible categories, largest amount first.
    pub fn categories_by_amount(&self) -> Vec<(ExpenseCategory, f64)> {
        let mut ordered: Vec<(ExpenseCategory, f64)> = self
            .expense_by_category
            .iter()
            .map(|(category, amount)| (*category, *amount))
            .collect();
        ordered.sort_by(|a, b| b.1.total_cmp(&a.1));
        ordered
    }

    /// Client rows with their share of gross income, largest income first.
    pub fn clients_by_income(&self) -> Vec<(&str, &ClientIncome, f64)> {
        let mut ordered: Vec<(&str, &ClientIncome, f64)> = self
            .client_income_breakdown
            .iter()
            .map(|(name, income)| {
                (
                    name.as_str(),
                    income,
                    income.percentage_of(self.gross_income),
                )
            })
            .collect();
        ordered.sort_by(|a, b| b.1.income.total_cmp(&a.1.income));
        ordered
    }
}

pub struct ReportService;

impl ReportService {
    /// Builds the report for `year`, pricing business miles at `mileage_rate`.
    pub fn year_report(ledger: &Ledger, year: i32, mileage_rate: f64) -> YearReport {
        let sessions: Vec<Session> = ledger
            .sessions
            .iter()
            .filter(|s| in_year(s.date, year))
            .cloned()
            .collect();
        let expenses: Vec<Expense> = ledger
            .expenses
            .iter()
            .filter(|e| in_year(e.date, year))
            .cloned()
            .collect();

        let gross_income: f64 = sessions.iter().map(|s| s.total_earned).sum();
        let deductible_expense_total: f64 = expenses
            .iter()
            .filter(|e| is_deductible(e))
            .map(|e| e.amount)
            .sum();
        let business_mileage: f64 = sessions
            .iter()
            .filter(|s| s.session_type.is_in_person())
            .map(|s| s.mileage)
            .sum();
        let mileage_deduction = business_mileage * mileage_rate;

        let mut expense_by_category = BTreeMap::new();
        for expense in expenses.iter().filter(|e| is_deductible(e)) {
            *expense_by_category.entry(expense.category).or_insert(0.0) += expense.amount;
        }

        let mut client_income_breakdown: BTreeMap<String, ClientIncome> = BTreeMap::new();
        for session in &sessions {
            let entry = client_income_breakdown
                .entry(ledger.client_name(&session.client_id).to_string())
                .or_default();
            entry.income += session.total_earned;
            entry.session_count += 1;
            entry.total_hours += session.duration;
        }

        let monthly_breakdown = monthly_series(&sessions, &expenses);

        debug!(
            year,
            sessions = sessions.len(),
            expenses = expenses.len(),
            gross_income,
            "year report built"
        );

        YearReport {
            year,
            mileage_rate,
            gross_income,
            deductible_expense_total,
            business_mileage,
            mileage_deduction,
            net_income: gross_income - deductible_expense_total - mileage_deduction,
            expense_by_category,
            client_income_breakdown,
            monthly_breakdown,
            sessions,
            expenses,
        }
    }

    /// Distinct years across sessions and expenses, newest first. Never empty: with no
    /// records at all the result is `[current_year]`.
    pub fn available_years(ledger: &Ledger, current_year: i32) -> Vec<i32> {
        let years: BTreeSet<i32> = ledger
            .sessions
            .iter()
            .map(|s| calendar_year(s.date))
            .chain(ledger.expenses.iter().map(|e| calendar_year(e.date)))
            .collect();
        if years.is_empty() {
            return vec![current_year];
        }
        years.into_iter().rev().collect()
    }
}

fn monthly_series(sessions: &[Session], expenses: &[Expense]) -> Vec<MonthlyTotals> {
    let mut months: Vec<MonthlyTotals> = (1..=12)
        .map(|month| MonthlyTotals {
            month_label: month_label(month),
            income: 0.0,
            expenses: 0.0,
            session_count: 0,
        })
        .collect();
    for session in sessions {
        let bucket = &mut months[month_index(session.date)];
        bucket.income += session.total_earned;
        bucket.session_count += 1;
    }
    for expense in expenses.iter().filter(|e| is_deductible(e)) {
        months[month_index(expense.date)].expenses += expense.amount;
    }
    months
}
