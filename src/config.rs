//! Runtime configuration
//!
//! Read from `QR_STUDIO_*` environment variables. Every setting is optional
//! and falls back to the defaults below:
//! - `QR_STUDIO_DATA_DIR` (default: `<data dir>/qr-studio`)
//! - `QR_STUDIO_HISTORY_LIMIT` (default and maximum: 10)
//! - `QR_STUDIO_DEBOUNCE_MS` (default: 300)
//! - `QR_STUDIO_TOAST_MS` (default: 3000)

use log::{info, warn};
use serde::Deserialize;
use std::env::vars;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const ENV_PREFIX: &str = "QR_STUDIO_";

/// Number of history entries kept before the oldest is evicted, also the cap
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
/// Quiet period after an option change before regenerating
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_TOAST_MS: u64 = 3000;

// Intermediate struct where every field may be missing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    data_dir: Option<PathBuf>,
    history_limit: Option<usize>,
    debounce_ms: Option<u64>,
    toast_ms: Option<u64>,
}

/// Validated configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    data_dir: PathBuf,
    history_limit: usize,
    debounce: Duration,
    toast: Duration,
}

impl Config {
    /// Load configuration from the process environment
    pub fn init() -> AppResult<Self> {
        info!("Loading configuration from {}* environment variables", ENV_PREFIX);

        let prefixed = vars().filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|stripped| (stripped.to_string(), value))
        });
        let raw: RawConfig =
            serde_env::from_iter(prefixed).map_err(|e| AppError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> AppResult<Self> {
        let RawConfig {
            data_dir,
            history_limit,
            debounce_ms,
            toast_ms,
        } = raw;

        let data_dir = match data_dir {
            Some(dir) => {
                info!("Using provided DATA_DIR: {}", dir.display());
                dir
            }
            None => Self::default_data_dir()?,
        };

        let history_limit = history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        if history_limit == 0 {
            return Err(AppError::Config(
                "HISTORY_LIMIT must be at least 1".to_string(),
            ));
        }
        if history_limit > DEFAULT_HISTORY_LIMIT {
            warn!(
                "HISTORY_LIMIT {} exceeds the maximum, keeping {}",
                history_limit, DEFAULT_HISTORY_LIMIT
            );
        }
        let history_limit = history_limit.min(DEFAULT_HISTORY_LIMIT);

        Ok(Self {
            data_dir,
            history_limit,
            debounce: Duration::from_millis(debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)),
            toast: Duration::from_millis(toast_ms.unwrap_or(DEFAULT_TOAST_MS)),
        })
    }

    /// Defaults rooted at `data_dir`, used when the environment is unusable
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            history_limit: DEFAULT_HISTORY_LIMIT,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            toast: Duration::from_millis(DEFAULT_TOAST_MS),
        }
    }

    /// Where the app keeps its data:
    /// - Linux: ~/.local/share/qr-studio
    /// - macOS: ~/Library/Application Support/qr-studio
    /// - Windows: %APPDATA%\qr-studio
    fn default_data_dir() -> AppResult<PathBuf> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| AppError::Config("could not determine user data directory".into()))?;
        path.push("qr-studio");
        Ok(path)
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Path of the SQLite file backing the local store
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("qr_studio.db")
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn toast(&self) -> Duration {
        self.toast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    #[test]
    fn test_defaults_apply_when_unset() {
        let raw: RawConfig = from_iter(vec![("DATA_DIR", "/tmp/qr-studio-test")])
            .expect("RawConfig should deserialize");

        let config = Config::from_raw(raw).expect("config should build");
        assert_eq!(config.data_dir(), &PathBuf::from("/tmp/qr-studio-test"));
        assert_eq!(config.history_limit(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.toast(), Duration::from_millis(3000));
        assert_eq!(
            config.store_path(),
            PathBuf::from("/tmp/qr-studio-test/qr_studio.db")
        );
    }

    #[test]
    fn test_overrides_are_read() {
        let raw: RawConfig = from_iter(vec![
            ("DATA_DIR", "/tmp/qr"),
            ("HISTORY_LIMIT", "5"),
            ("DEBOUNCE_MS", "150"),
        ])
        .expect("RawConfig should deserialize");

        let config = Config::from_raw(raw).expect("config should build");
        assert_eq!(config.history_limit(), 5);
        assert_eq!(config.debounce(), Duration::from_millis(150));
    }

    #[test]
    fn test_zero_history_limit_is_rejected() {
        let raw = RawConfig {
            data_dir: Some(PathBuf::from("/tmp/qr")),
            history_limit: Some(0),
            ..RawConfig::default()
        };

        let err = Config::from_raw(raw).unwrap_err();
        assert!(err.to_string().contains("HISTORY_LIMIT"));
    }

    #[test]
    fn test_history_limit_is_capped() {
        let raw: RawConfig = from_iter(vec![("DATA_DIR", "/tmp/qr"), ("HISTORY_LIMIT", "50")])
            .expect("RawConfig should deserialize");

        let config = Config::from_raw(raw).expect("config should build");
        assert_eq!(config.history_limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_fallback_uses_defaults() {
        let config = Config::with_data_dir(PathBuf::from("/tmp/fallback"));
        assert_eq!(config.history_limit(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.store_path(), PathBuf::from("/tmp/fallback/qr_studio.db"));
    }
}
