#![doc(test(attr(deny(warnings))))]

//! Tutor Core turns a tutor's clients, sessions and expenses into dashboards, tax-year reports
//! and calendar/spreadsheet exports, and normalizes imported spreadsheets and calendars into
//! candidate sessions.
//!
//! Everything in [`core`], [`import`] and [`export`] is pure: functions take a [`Ledger`]
//! snapshot and return values or a new snapshot. File access lives in [`utils::persistence`]
//! and [`config`].

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod export;
pub mod import;
pub mod utils;

pub use crate::core::Command;
pub use crate::domain::Ledger;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tutor Core tracing initialized.");
    });
}
