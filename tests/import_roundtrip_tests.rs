use chrono::NaiveDate;
use tutor_core::{
    core::services::ImportService,
    domain::{Client, Ledger, Session, SessionType},
    export::{self, IcsOptions},
    import::{self, ExtractionConfidence},
    Command,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clients() -> Vec<Client> {
    vec![
        Client::new("Ada Lovelace", 40.0, 5.0)
            .with_id("ada")
            .with_address("12 Main St"),
        Client::new("Grace, Jr.", 55.5, 0.0).with_id("grace"),
    ]
}

fn sessions(clients: &[Client]) -> Vec<Session> {
    vec![
        Session::log(&clients[0], date(2024, 3, 1), 1.3, 42.75, SessionType::InPerson)
            .with_notes("Fractions, \"word problems\""),
        Session::log(&clients[1], date(2024, 3, 2), 0.1 + 0.2, 55.5, SessionType::Virtual),
        Session::log(&clients[0], date(2024, 3, 9), 2.0, 40.0, SessionType::Virtual),
    ]
}

#[test]
fn template_export_reimports_bit_for_bit() {
    let clients = clients();
    let originals = sessions(&clients);
    let ledger = Ledger::from_parts(clients.clone(), originals.clone(), Vec::new());

    let csv = export::session_template_csv(&ledger, &originals);
    let batch = import::parse_sessions_csv(&csv, &clients);

    assert_eq!(batch.len(), originals.len());
    for (row, original) in batch.rows.iter().zip(&originals) {
        assert!(row.is_valid(), "line {}: {:?}", row.line, row.errors);
        let draft = &row.draft;
        assert_eq!(draft.client_id.as_deref(), Some(original.client_id.as_str()));
        assert_eq!(draft.date, Some(original.date));
        assert_eq!(draft.duration.map(f64::to_bits), Some(original.duration.to_bits()));
        assert_eq!(draft.rate.map(f64::to_bits), Some(original.rate.to_bits()));
        assert_eq!(draft.session_type, original.session_type);
        assert_eq!(draft.notes, original.notes);
        assert_eq!(draft.confidence, ExtractionConfidence::Exact);
    }
}

#[test]
fn partial_import_commits_only_clean_rows() {
    let ledger = Ledger::from_parts(clients(), Vec::new(), Vec::new());
    let text = "Date, Client Name, Duration (hours), Rate ($/hour), Type, Paid, Notes\n\
2024-04-01,Ada Lovelace,1,40,virtual,yes,\n\
2024-04-02,Charles Babbage,1,40,virtual,no,\n\
\n\
04/03/2024,ada lovelace,abc,40,virtual,no,\n\
2024-04-04,\"Grace, Jr.\",2,,in-person,no,";

    let batch = ImportService::preview_sessions_csv(&ledger, text);
    assert_eq!(batch.len(), 4);
    assert_eq!(batch.valid_count(), 2);

    let missing = &batch.rows[1];
    assert_eq!(missing.line, 3);
    assert!(missing
        .errors
        .iter()
        .any(|e| e == "Client \"Charles Babbage\" not found"));
    assert_eq!(batch.rows[2].line, 5);

    let next = ledger.apply(Command::CommitImport(batch)).unwrap();
    assert_eq!(next.sessions.len(), 2);
    assert!(next.sessions.iter().all(|s| s.client_id != ""));
    assert!(next.sessions[0].paid);
    assert_eq!(next.sessions[1].client_id, "grace");
    assert_eq!(next.sessions[1].rate, 55.5);
    assert_eq!(next.sessions[1].total_earned, 111.0);
    assert_ne!(next.sessions[0].id, next.sessions[1].id);
}

#[test]
fn calendar_export_reimports_as_fuzzy_unpaid_drafts() {
    let clients = clients();
    let mut originals = sessions(&clients);
    originals[2].paid = true;
    let ledger = Ledger::from_parts(clients.clone(), originals.clone(), Vec::new());

    let ics = export::sessions_to_ics(&ledger, &originals, &IcsOptions::default());
    let batch = import::parse_calendar(&ics, &clients, import::DEFAULT_FALLBACK_RATE);

    assert_eq!(batch.len(), 3);
    for (row, original) in batch.rows.iter().zip(&originals) {
        assert!(row.is_valid(), "line {}: {:?}", row.line, row.errors);
        assert_eq!(row.draft.client_id.as_deref(), Some(original.client_id.as_str()));
        assert_eq!(row.draft.date, Some(original.date));
    }
    assert_eq!(batch.rows[1].draft.client_name, "Grace, Jr.");

    let first = &batch.rows[0];
    assert_eq!(first.draft.client_id.as_deref(), Some("ada"));
    assert_eq!(first.draft.date, Some(date(2024, 3, 1)));
    assert_eq!(first.draft.session_type, SessionType::InPerson);
    assert_eq!(first.draft.mileage, 10.0);
    assert_eq!(first.draft.confidence, ExtractionConfidence::Fuzzy);
    assert_eq!(first.draft.payment_hint, Some(false));

    // Rate comes from the client record, not the exported session.
    assert_eq!(first.draft.rate, Some(40.0));
    assert_eq!(batch.rows[2].draft.session_type, SessionType::Virtual);

    // Paid in the ledger, hinted as paid, but still imported unpaid.
    let paid = &batch.rows[2].draft;
    assert_eq!(paid.payment_hint, Some(true));
    assert!(!paid.paid);
}

#[test]
fn oversized_imported_duration_still_exports_to_calendar() {
    let ledger = Ledger::from_parts(clients(), Vec::new(), Vec::new());
    let text = "Date,Client Name,Duration (hours),Rate ($/hour),Type,Paid,Notes\n\
2024-03-01,Ada Lovelace,1e10,40,virtual,no,";

    let batch = ImportService::preview_sessions_csv(&ledger, text);
    assert_eq!(batch.valid_count(), 1);
    let next = ledger.apply(Command::CommitImport(batch)).unwrap();

    let ics = export::sessions_to_ics(&next, &next.sessions, &IcsOptions::default());
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    assert!(ics.contains("DTEND:20240301T090000Z\r\n"));
}
