use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::services::DEFAULT_MILEAGE_RATE;
use crate::core::utils::{app_data_dir, config_file_in, ensure_dir};
use crate::export::{IcsOptions, DEFAULT_APP_NAME, DEFAULT_START_HOUR, DEFAULT_UID_DOMAIN};
use crate::import::DEFAULT_FALLBACK_RATE;

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

/// User-tunable settings. Missing keys fall back to their defaults when loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub app_name: String,
    /// Dollars per business mile.
    pub mileage_rate: f64,
    /// Hourly rate for calendar events whose client cannot be matched.
    pub fallback_hourly_rate: f64,
    /// Local hour at which exported calendar events start.
    pub session_start_hour: u32,
    pub calendar_uid_domain: String,
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.into(),
            mileage_rate: DEFAULT_MILEAGE_RATE,
            fallback_hourly_rate: DEFAULT_FALLBACK_RATE,
            session_start_hour: DEFAULT_START_HOUR,
            calendar_uid_domain: DEFAULT_UID_DOMAIN.into(),
            currency: "USD".into(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mileage_rate.is_nan() || self.mileage_rate < 0.0 {
            return Err(ConfigError::Invalid(
                "mileage rate must be zero or greater".into(),
            ));
        }
        if self.fallback_hourly_rate.is_nan() || self.fallback_hourly_rate < 0.0 {
            return Err(ConfigError::Invalid(
                "fallback hourly rate must be zero or greater".into(),
            ));
        }
        if self.session_start_hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "session start hour {} is outside 0-23",
                self.session_start_hour
            )));
        }
        Ok(())
    }

    /// Calendar export settings for a tutor whose local time is `offset` from UTC.
    pub fn ics_options(&self, offset: FixedOffset) -> IcsOptions {
        IcsOptions {
            app_name: self.app_name.clone(),
            uid_domain: self.calendar_uid_domain.clone(),
            start_hour: self.session_start_hour,
            offset,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
