use std::{fs, path::Path};

use tracing::debug;

use crate::{core::utils::ensure_dir, domain::Ledger, errors::TutorError};

/// Writes the ledger snapshot as pretty JSON, staging to a temporary file and renaming it over
/// `path` so a failed write never truncates the previous snapshot.
pub fn save_ledger_to_file(ledger: &Ledger, path: &Path) -> Result<(), TutorError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(ledger)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), sessions = ledger.sessions.len(), "ledger saved");
    Ok(())
}

/// Loads a ledger snapshot from disk.
pub fn load_ledger_from_file(path: &Path) -> Result<Ledger, TutorError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Like [`load_ledger_from_file`], but a missing file yields an empty ledger.
pub fn load_or_default(path: &Path) -> Result<Ledger, TutorError> {
    if path.exists() {
        load_ledger_from_file(path)
    } else {
        Ok(Ledger::default())
    }
}
