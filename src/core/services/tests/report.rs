use super::{ada, assert_close, date, sample_ledger, session};
use crate::core::services::{ClientIncome, ReportService, DEFAULT_MILEAGE_RATE};
use crate::domain::{ExpenseCategory, Ledger, SessionType};

#[test]
fn single_in_person_session_nets_out_mileage() {
    let ada = ada();
    let s = session("s1", &ada, date(2024, 3, 1), 2.0, SessionType::InPerson);
    assert_eq!(s.mileage, 10.0);
    assert_eq!(s.total_earned, 80.0);
    let ledger = Ledger::from_parts(vec![ada], vec![s], Vec::new());

    let report = ReportService::year_report(&ledger, 2024, DEFAULT_MILEAGE_RATE);

    assert_close(report.business_mileage, 10.0);
    assert_close(report.mileage_deduction, 6.55);
    assert_close(report.gross_income, 80.0);
    assert_close(report.net_income, 73.45);
}

#[test]
fn client_breakdown_sums_income_and_hours() {
    let ada = ada();
    let mut first = session("a", &ada, date(2024, 1, 5), 1.25, SessionType::Virtual);
    first.rate = 40.0;
    first.total_earned = 50.0;
    let mut second = session("b", &ada, date(2024, 1, 20), 1.5, SessionType::Virtual);
    second.total_earned = 75.0;
    let ledger = Ledger::from_parts(vec![ada], vec![first, second], Vec::new());

    let report = ReportService::year_report(&ledger, 2024, DEFAULT_MILEAGE_RATE);
    let entry = &report.client_income_breakdown["Ada"];

    assert_close(entry.income, 125.0);
    assert_eq!(entry.session_count, 2);
    assert_close(entry.total_hours, 2.75);
    assert_close(entry.percentage_of(report.gross_income), 100.0);
}

#[test]
fn totals_are_year_scoped() {
    let ledger = sample_ledger();
    let report = ReportService::year_report(&ledger, 2024, DEFAULT_MILEAGE_RATE);

    assert_eq!(report.sessions.len(), 3);
    assert_eq!(report.expenses.len(), 2);
    assert_close(report.gross_income, 170.0);
    assert_close(report.deductible_expense_total, 20.0);
    assert_close(report.business_mileage, 34.0);
    assert_eq!(report.expense_by_category.len(), 1);
    assert_close(report.expense_by_category[&ExpenseCategory::Supplies], 20.0);

    let older = ReportService::year_report(&ledger, 2023, DEFAULT_MILEAGE_RATE);
    assert_close(older.gross_income, 60.0);
    assert_close(older.deductible_expense_total, 10.0);
}

#[test]
fn monthly_series_has_twelve_buckets_summing_to_gross() {
    let ledger = sample_ledger();
    let report = ReportService::year_report(&ledger, 2024, DEFAULT_MILEAGE_RATE);

    assert_eq!(report.monthly_breakdown.len(), 12);
    assert_eq!(report.monthly_breakdown[0].month_label, "Jan");
    let income: f64 = report.monthly_breakdown.iter().map(|m| m.income).sum();
    assert_close(income, report.gross_income);

    let march = &report.monthly_breakdown[2];
    assert_eq!(march.session_count, 3);
    // Non-deductible lunch is excluded.
    assert_close(report.monthly_breakdown[1].expenses, 20.0);
}

#[test]
fn orphaned_sessions_group_under_unknown_client() {
    let mut ledger = sample_ledger();
    ledger.clients.retain(|c| c.id != "grace");
    let report = ReportService::year_report(&ledger, 2024, DEFAULT_MILEAGE_RATE);

    let unknown = &report.client_income_breakdown["Unknown Client"];
    assert_eq!(unknown.session_count, 2);
    assert_close(unknown.income, 90.0);

    let ranked = report.clients_by_income();
    assert_eq!(ranked[0].0, "Unknown Client");
}

#[test]
fn percentages_are_zero_without_income() {
    let report = ReportService::year_report(&Ledger::new(), 2024, DEFAULT_MILEAGE_RATE);
    assert_eq!(report.gross_income, 0.0);
    assert!(report.client_income_breakdown.is_empty());
    assert!(report.clients_by_income().is_empty());
    assert_eq!(report.monthly_breakdown.len(), 12);
    assert_eq!(ClientIncome::default().percentage_of(0.0), 0.0);
}

#[test]
fn available_years_are_descending_and_never_empty() {
    let ledger = sample_ledger();
    assert_eq!(ReportService::available_years(&ledger, 2030), vec![2024, 2023]);
    assert_eq!(ReportService::available_years(&Ledger::new(), 2030), vec![2030]);
}
