//! Deterministic text renderings of ledger data: the tax report, the calendar feed and the
//! session spreadsheet template.

pub mod csv_report;
pub mod ics;
pub mod template;

pub use csv_report::{tax_report_csv, tax_report_filename, DEFAULT_APP_NAME};
pub use ics::{
    calendar_filename, sessions_to_ics, IcsOptions, DEFAULT_START_HOUR, DEFAULT_UID_DOMAIN,
};
pub use template::{
    blank_session_template, quote_field, session_template_csv, SESSION_TEMPLATE_HEADER,
};
