use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".tutor_core";
const HOME_ENV: &str = "TUTOR_CORE_HOME";
const LEDGER_FILE: &str = "ledger.json";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory: `$TUTOR_CORE_HOME`, else `~/.tutor_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Default location of the ledger snapshot.
pub fn ledger_file() -> PathBuf {
    ledger_file_in(&app_data_dir())
}

pub fn ledger_file_in(base: &Path) -> PathBuf {
    base.join(LEDGER_FILE)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_the_base_dir() {
        let base = Path::new("/tmp/tutor");
        assert_eq!(ledger_file_in(base), base.join("ledger.json"));
        assert_eq!(config_file_in(base), base.join("config.json"));
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
