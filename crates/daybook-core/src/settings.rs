//! Client settings persisted as JSON.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Application directory name under the platform config/data dirs.
const APP_DIR: &str = "daybook";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.json";

/// Local database file name.
const DATABASE_FILE: &str = "daybook.db";

/// Environment variable that overrides [`Settings::base_url`].
pub const BASE_URL_ENV: &str = "DAYBOOK_BASE_URL";

/// User-tunable client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Chat inactivity window before history is dropped.
    pub session_timeout_minutes: u32,
    /// Minimum gap between two operation-card displays.
    pub operation_card_interval_minutes: u32,
    /// Typewriter delay per character.
    pub typewriter_interval_ms: u64,
    /// Overrides the user id taken from the signed-in user.
    pub user_id: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            session_timeout_minutes: 30,
            operation_card_interval_minutes: 30,
            typewriter_interval_ms: 20,
            user_id: None,
        }
    }
}

impl Settings {
    /// Loads settings from the default location, then applies env overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        let mut settings = Self::load_from(&config_path()).await?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            debug!("Base URL overridden by {BASE_URL_ENV}");
            settings.base_url = url;
        }
        Ok(settings)
    }

    /// Loads settings from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Saves settings to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self) -> Result<()> {
        self.save_to(&config_path()).await
    }

    /// Saves settings to a specific file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Checks values that would make the client unusable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::Config("base_url is empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Session timeout as a [`chrono::Duration`].
    #[must_use]
    pub fn session_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.session_timeout_minutes))
    }

    /// Operation-card interval as a [`chrono::Duration`].
    #[must_use]
    pub fn operation_card_interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.operation_card_interval_minutes))
    }

    /// Typewriter interval as a [`Duration`].
    #[must_use]
    pub const fn typewriter_interval(&self) -> Duration {
        Duration::from_millis(self.typewriter_interval_ms)
    }
}

/// Path of the settings file.
#[must_use]
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(SETTINGS_FILE)
}

/// Path of the local database, creating its directory.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub async fn database_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    tokio::fs::create_dir_all(&data_dir).await?;
    Ok(data_dir.join(DATABASE_FILE))
}
