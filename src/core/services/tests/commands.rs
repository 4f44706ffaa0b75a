use super::{ada, date, sample_ledger};
use crate::core::commands::Command;
use crate::core::services::{ImportService, ServiceError, SessionInput};
use crate::domain::{Client, Expense, ExpenseCategory, Ledger, SessionType};

fn log_for_ada() -> Command {
    Command::LogSession(SessionInput::new(
        "ada",
        date(2024, 4, 2),
        2.0,
        45.0,
        SessionType::InPerson,
    ))
}

#[test]
fn apply_leaves_the_original_snapshot_untouched() {
    let ledger = Ledger::new();
    let next = ledger.apply(Command::AddClient(ada())).unwrap();

    assert!(ledger.clients.is_empty());
    assert_eq!(next.clients.len(), 1);
}

#[test]
fn client_validation_rejects_negative_values() {
    let ledger = Ledger::new();
    let bad_rate = Client::new("Ada", -1.0, 0.0);
    let bad_distance = Client::new("Ada", 10.0, -2.0);
    let no_name = Client::new("  ", 10.0, 0.0);
    let nan_rate = Client::new("Ada", f64::NAN, 0.0);

    for client in [bad_rate, bad_distance, no_name, nan_rate] {
        assert!(matches!(
            ledger.apply(Command::AddClient(client)),
            Err(ServiceError::Invalid(_))
        ));
    }
}

#[test]
fn rate_change_does_not_touch_logged_sessions() {
    let ledger = Ledger::new()
        .apply(Command::AddClient(ada()))
        .unwrap()
        .apply(log_for_ada())
        .unwrap();

    let mut raised = ada();
    raised.hourly_rate = 80.0;
    let next = ledger
        .apply(Command::UpdateClient {
            id: "ada".into(),
            client: raised,
        })
        .unwrap();

    assert_eq!(next.clients[0].hourly_rate, 80.0);
    assert_eq!(next.sessions[0].rate, 45.0);
    assert_eq!(next.sessions[0].total_earned, 90.0);
    assert_eq!(next.sessions[0].mileage, 10.0);
}

#[test]
fn deleting_a_client_with_sessions_requires_orphaning() {
    let ledger = sample_ledger();

    let refused = ledger.apply(Command::DeleteClient {
        id: "ada".into(),
        orphan_sessions: false,
    });
    assert!(matches!(refused, Err(ServiceError::Invalid(_))));

    let next = ledger
        .apply(Command::DeleteClient {
            id: "ada".into(),
            orphan_sessions: true,
        })
        .unwrap();
    assert!(next.client("ada").is_none());
    assert_eq!(next.sessions.len(), ledger.sessions.len());
    assert_eq!(next.client_name("ada"), "Unknown Client");
}

#[test]
fn logging_requires_a_known_client_and_positive_duration() {
    let ledger = Ledger::new().apply(Command::AddClient(ada())).unwrap();

    let unknown = Command::LogSession(SessionInput::new(
        "nobody",
        date(2024, 4, 2),
        1.0,
        40.0,
        SessionType::Virtual,
    ));
    assert!(matches!(
        ledger.apply(unknown),
        Err(ServiceError::NotFound(_))
    ));

    let zero = Command::LogSession(SessionInput::new(
        "ada",
        date(2024, 4, 2),
        0.0,
        40.0,
        SessionType::Virtual,
    ));
    assert!(matches!(ledger.apply(zero), Err(ServiceError::Invalid(_))));
}

#[test]
fn toggle_paid_stamps_and_clears_paid_date() {
    let ledger = Ledger::new()
        .apply(Command::AddClient(ada()))
        .unwrap()
        .apply(log_for_ada())
        .unwrap();
    let id = ledger.sessions[0].id.clone();

    let paid = ledger
        .apply(Command::TogglePaid {
            id: id.clone(),
            today: date(2024, 4, 9),
        })
        .unwrap();
    assert!(paid.sessions[0].paid);
    assert_eq!(paid.sessions[0].paid_date, Some(date(2024, 4, 9)));

    let unpaid = paid
        .apply(Command::TogglePaid {
            id,
            today: date(2024, 4, 10),
        })
        .unwrap();
    assert!(!unpaid.sessions[0].paid);
    assert_eq!(unpaid.sessions[0].paid_date, None);
}

#[test]
fn editing_a_session_recomputes_earnings_but_keeps_payment() {
    let ledger = Ledger::new()
        .apply(Command::AddClient(ada()))
        .unwrap()
        .apply(log_for_ada())
        .unwrap();
    let id = ledger.sessions[0].id.clone();
    let paid = ledger
        .apply(Command::TogglePaid {
            id: id.clone(),
            today: date(2024, 4, 9),
        })
        .unwrap();

    let edited = paid
        .apply(Command::UpdateSession {
            id: id.clone(),
            input: SessionInput::new("ada", date(2024, 4, 3), 1.0, 45.0, SessionType::Virtual),
        })
        .unwrap();

    let session = edited.session(&id).unwrap();
    assert_eq!(session.total_earned, 45.0);
    assert_eq!(session.mileage, 0.0);
    assert!(session.paid);
    assert_eq!(session.paid_date, Some(date(2024, 4, 9)));
}

#[test]
fn unknown_ids_are_not_found() {
    let ledger = sample_ledger();
    for command in [
        Command::DeleteSession { id: "nope".into() },
        Command::DeleteExpense { id: "nope".into() },
        Command::TogglePaid {
            id: "nope".into(),
            today: date(2024, 1, 1),
        },
    ] {
        assert!(matches!(
            ledger.apply(command),
            Err(ServiceError::NotFound(_))
        ));
    }
}

#[test]
fn expenses_round_trip_through_commands() {
    let expense = Expense::new(date(2024, 5, 1), ExpenseCategory::Marketing, "Flyers", 35.0);
    let id = expense.id.clone();
    let ledger = Ledger::new().apply(Command::AddExpense(expense.clone())).unwrap();

    let mut changed = expense;
    changed.amount = 40.0;
    let ledger = ledger
        .apply(Command::UpdateExpense {
            id: id.clone(),
            expense: changed,
        })
        .unwrap();
    assert_eq!(ledger.expense(&id).unwrap().amount, 40.0);

    let negative = Expense::new(date(2024, 5, 1), ExpenseCategory::Other, "Refund", -3.0);
    assert!(matches!(
        ledger.apply(Command::AddExpense(negative)),
        Err(ServiceError::Invalid(_))
    ));

    let ledger = ledger.apply(Command::DeleteExpense { id }).unwrap();
    assert!(ledger.expenses.is_empty());
}

#[test]
fn committing_an_import_appends_only_valid_rows() {
    let ledger = Ledger::new().apply(Command::AddClient(ada())).unwrap();
    let text = "Date,Client Name,Duration (hours),Rate ($/hour),Type,Paid,Notes\n\
2024-03-01,Ada,2,40,in-person,no,\n\
2024-03-02,Nobody,1,40,virtual,no,";
    let batch = ImportService::preview_sessions_csv(&ledger, text);
    assert_eq!(batch.len(), 2);
    assert!(batch.rows[1]
        .errors
        .iter()
        .any(|e| e.contains("not found")));

    let next = ledger.apply(Command::CommitImport(batch)).unwrap();
    assert_eq!(next.sessions.len(), 1);
    assert_eq!(next.sessions[0].client_id, "ada");
    assert_eq!(next.sessions[0].total_earned, 80.0);
    assert_eq!(next.sessions[0].mileage, 10.0);
    assert!(!next.sessions[0].id.is_empty());
}
