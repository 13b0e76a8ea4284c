use crate::{QuickAddError, QuickAddResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 150;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAddConfig {
    /// Quiet period before a keystroke burst is parsed. Zero parses on the next tick.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Whether natural-language parsing starts enabled for a new session.
    #[serde(default = "default_nlp_enabled")]
    pub nlp_enabled: bool,
    #[serde(default)]
    pub suggestion_limit: Option<usize>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_nlp_enabled() -> bool {
    true
}

impl Default for QuickAddConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            nlp_enabled: true,
            suggestion_limit: None,
        }
    }
}

impl QuickAddConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/quickadd/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("quickadd/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("quickadd\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Loads the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Ignoring config {}: {}", config_path.display(), e);
                    }
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> QuickAddResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| QuickAddError::Config(e.to_string()))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn effective_suggestion_limit(&self) -> usize {
        self.suggestion_limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = QuickAddConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert!(config.nlp_enabled);
        assert_eq!(config.effective_suggestion_limit(), DEFAULT_SUGGESTION_LIMIT);
    }

    #[test]
    fn test_load_from_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debounce_ms = 0\n").unwrap();

        let config = QuickAddConfig::load_from(&path).unwrap();
        assert_eq!(config.debounce_ms, 0);
        assert!(config.nlp_enabled);
        assert_eq!(config.suggestion_limit, None);
    }

    #[test]
    fn test_load_from_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "debounce_ms = 300\nnlp_enabled = false\nsuggestion_limit = 3\n",
        )
        .unwrap();

        let config = QuickAddConfig::load_from(&path).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert!(!config.nlp_enabled);
        assert_eq!(config.effective_suggestion_limit(), 3);
    }

    #[test]
    fn test_load_from_invalid_toml_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debounce_ms = \"soon\"").unwrap();

        let err = QuickAddConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, QuickAddError::Config(_)));
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = QuickAddConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, QuickAddError::Io(_)));
    }
}
