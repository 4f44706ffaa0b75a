use tracing::debug;

use crate::core::services::YearReport;
use crate::currency::{format_currency, format_number};
use crate::domain::{Expense, Ledger, Session};

use super::template::quote_field;

/// Application name printed in report titles when none is configured.
pub const DEFAULT_APP_NAME: &str = "TutorTracker";

/// Suggested download name for a year's tax report.
pub fn tax_report_filename(year: i32) -> String {
    format!("tutor-tax-report-{year}.csv")
}

/// Renders the tax report for `report.year`.
///
/// Section order and labels are fixed. Detail rows are sorted by date (ties keep ledger order)
/// and the output carries no timestamps, so identical input produces identical bytes.
pub fn tax_report_csv(ledger: &Ledger, report: &YearReport, app_name: &str) -> String {
    let mut lines: Vec<String> = vec![
        format!("{app_name} Tax Report - {}", report.year),
        String::new(),
        "INCOME SUMMARY".into(),
        format!("Total Gross Income,{}", format_currency(report.gross_income)),
        String::new(),
        "EXPENSE SUMMARY".into(),
        format!(
            "Total Deductible Expenses,{}",
            format_currency(report.deductible_expense_total)
        ),
        format!(
            "Business Mileage,{} miles",
            format_number(report.business_mileage)
        ),
        format!(
            "Mileage Deduction (@ ${}/mile),{}",
            format_number(report.mileage_rate),
            format_currency(report.mileage_deduction)
        ),
        String::new(),
        "NET INCOME".into(),
        format!("Estimated Net Income,{}", format_currency(report.net_income)),
        String::new(),
        "DETAILED SESSIONS".into(),
        "Date,Client,Hours,Rate,Amount,Type,Mileage,Paid".into(),
    ];

    let mut sessions: Vec<&Session> = report.sessions.iter().collect();
    sessions.sort_by_key(|s| s.date);
    lines.extend(sessions.iter().map(|s| session_row(ledger, s)));

    lines.push(String::new());
    lines.push("DETAILED EXPENSES".into());
    lines.push("Date,Category,Description,Amount,Deductible".into());

    let mut expenses: Vec<&Expense> = report.expenses.iter().collect();
    expenses.sort_by_key(|e| e.date);
    lines.extend(expenses.iter().map(|e| expense_row(e)));

    debug!(
        year = report.year,
        sessions = sessions.len(),
        expenses = expenses.len(),
        "tax report rendered"
    );
    lines.join("\n")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn session_row(ledger: &Ledger, session: &Session) -> String {
    [
        session.date.to_string(),
        quote_field(ledger.client_name(&session.client_id)),
        format_number(session.duration),
        format!("${}", format_number(session.rate)),
        format_currency(session.total_earned),
        session.session_type.as_str().to_string(),
        format_number(session.mileage),
        yes_no(session.paid).to_string(),
    ]
    .join(",")
}

fn expense_row(expense: &Expense) -> String {
    [
        expense.date.to_string(),
        expense.category.as_str().to_string(),
        quote_field(&expense.description),
        format_currency(expense.amount),
        yes_no(expense.deductible).to_string(),
    ]
    .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{ReportService, DEFAULT_MILEAGE_RATE};
    use crate::domain::{Client, ExpenseCategory, SessionType};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn report_sections_appear_in_order() {
        let ada = Client::new("Ada", 40.0, 5.0);
        let later = Session::log(&ada, date(2024, 3, 9), 1.0, 40.0, SessionType::Virtual);
        let earlier = Session::log(&ada, date(2024, 3, 1), 2.0, 40.0, SessionType::InPerson);
        let expense = Expense::new(
            date(2024, 2, 1),
            ExpenseCategory::Supplies,
            "Pens, paper",
            12.5,
        );
        let ledger = Ledger::from_parts(vec![ada], vec![later, earlier], vec![expense]);
        let report = ReportService::year_report(&ledger, 2024, DEFAULT_MILEAGE_RATE);

        let csv = tax_report_csv(&ledger, &report, DEFAULT_APP_NAME);
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines[0], "TutorTracker Tax Report - 2024");
        assert_eq!(lines[3], "Total Gross Income,$120.00");
        assert_eq!(lines[6], "Total Deductible Expenses,$12.50");
        assert_eq!(lines[7], "Business Mileage,10 miles");
        assert_eq!(lines[8], "Mileage Deduction (@ $0.655/mile),$6.55");
        assert_eq!(lines[11], "Estimated Net Income,$100.95");
        assert_eq!(lines[15], "2024-03-01,Ada,2,$40,$80.00,in-person,10,No");
        assert_eq!(lines[16], "2024-03-09,Ada,1,$40,$40.00,virtual,0,No");
        assert_eq!(lines[19], "Date,Category,Description,Amount,Deductible");
        assert_eq!(lines[20], "2024-02-01,supplies,\"Pens, paper\",$12.50,Yes");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn rendering_is_reproducible() {
        let ledger = Ledger::new();
        let report = ReportService::year_report(&ledger, 2024, DEFAULT_MILEAGE_RATE);
        let first = tax_report_csv(&ledger, &report, "Tutor");
        let second = tax_report_csv(&ledger, &report, "Tutor");
        assert_eq!(first, second);
        assert!(first.contains("Total Gross Income,$0.00"));
        assert!(first.contains("Business Mileage,0 miles"));
    }
}
