//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default school slug or URL for the timetable commands.
    pub school: Option<String>,
    /// Host serving the timetable pages.
    pub base_url: String,
    /// How long a fetched timetable is reused.
    pub cache_seconds: u64,
    /// HTTP request timeout.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            school: None,
            base_url: urnik_http::DEFAULT_BASE_URL.to_string(),
            cache_seconds: 300,
            timeout_secs: urnik_http::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // URNIK_SCHOOL, URNIK_BASE_URL, ...
        figment = figment.merge(Env::prefixed("URNIK_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for urnik.
///
/// On Linux: `~/.config/urnik`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("urnik"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://www.easistent.com");
        assert_eq!(config.cache_seconds, 300);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.school.is_none());
    }

    #[test]
    fn test_dirs_config_path_ends_with_urnik() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "urnik");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "school = \"abc123\"").unwrap();
        writeln!(file, "cache_seconds = 60").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.school.as_deref(), Some("abc123"));
        assert_eq!(config.cache_seconds, 60);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_config_value_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache_seconds = \"soon\"").unwrap();

        assert!(Config::load_from(Some(file.path())).is_err());
    }
}
