//! Preview and commit of imported sessions.

use tracing::{info, warn};

use crate::domain::{new_id, Ledger};
use crate::import::{self, ImportBatch};

pub struct ImportService;

impl ImportService {
    /// Parses a session spreadsheet against the ledger's clients without touching the ledger.
    pub fn preview_sessions_csv(ledger: &Ledger, text: &str) -> ImportBatch {
        import::parse_sessions_csv(text, &ledger.clients)
    }

    /// Parses calendar text against the ledger's clients without touching the ledger.
    pub fn preview_calendar(ledger: &Ledger, text: &str, fallback_rate: f64) -> ImportBatch {
        import::parse_calendar(text, &ledger.clients, fallback_rate)
    }

    /// Appends every error-free row as a new session with a fresh identifier. Rows carrying
    /// errors are skipped; the batch itself is the audit trail.
    pub fn commit(ledger: &Ledger, batch: &ImportBatch) -> Ledger {
        let mut next = ledger.clone();
        let before = next.sessions.len();
        next.sessions.extend(
            batch
                .valid_rows()
                .filter_map(|row| row.draft.to_session(new_id())),
        );
        let imported = next.sessions.len() - before;
        let skipped = batch.len() - imported;
        if skipped > 0 {
            warn!(skipped, "import rows skipped");
        }
        info!(imported, "sessions imported");
        next
    }
}
