mod commands;
mod report;

use chrono::NaiveDate;

use crate::domain::{Client, Expense, ExpenseCategory, Ledger, Session, SessionType};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn ada() -> Client {
    Client::new("Ada", 40.0, 5.0).with_id("ada")
}

pub(super) fn grace() -> Client {
    Client::new("Grace", 60.0, 12.0).with_id("grace")
}

pub(super) fn session(
    id: &str,
    client: &Client,
    on: NaiveDate,
    hours: f64,
    session_type: SessionType,
) -> Session {
    Session::log(client, on, hours, client.hourly_rate, session_type).with_id(id)
}

/// Two clients, sessions across 2023/2024 and a mix of deductible and personal expenses.
pub(super) fn sample_ledger() -> Ledger {
    let ada = ada();
    let grace = grace();
    let mut paid = session("s1", &ada, date(2024, 3, 1), 2.0, SessionType::InPerson);
    paid.toggle_paid(date(2024, 3, 2));
    let sessions = vec![
        paid,
        session("s2", &grace, date(2024, 3, 5), 1.0, SessionType::Virtual),
        session("s3", &ada, date(2023, 12, 31), 1.5, SessionType::InPerson),
        session("s4", &grace, date(2024, 3, 5), 0.5, SessionType::InPerson),
    ];
    let expenses = vec![
        Expense::new(date(2024, 2, 1), ExpenseCategory::Supplies, "Workbooks", 20.0),
        Expense::new(date(2024, 2, 3), ExpenseCategory::Other, "Lunch", 5.0).non_deductible(),
        Expense::new(date(2023, 6, 1), ExpenseCategory::Internet, "Router", 10.0),
    ];
    Ledger::from_parts(vec![ada, grace], sessions, expenses)
}
