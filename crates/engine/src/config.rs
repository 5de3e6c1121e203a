//! Engine configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Continuous-suggestion settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistConfig {
	/// Whether continuous suggestion starts enabled.
	pub enabled: bool,
	/// Cap on candidates a provider should consider per request.
	pub max_options: usize,
	/// Quiet period after the last keystroke before a request is sent.
	pub debounce_delay_ms: u64,
}

impl Default for AssistConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			max_options: 10,
			debounce_delay_ms: 1000,
		}
	}
}

impl AssistConfig {
	/// Parses a TOML string into a config, filling omitted fields with
	/// defaults.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Loads configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&input)
	}

	/// The debounce delay as a [`Duration`].
	pub fn debounce_delay(&self) -> Duration {
		Duration::from_millis(self.debounce_delay_ms)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn test_defaults() {
		let config = AssistConfig::default();
		assert!(!config.enabled);
		assert_eq!(config.max_options, 10);
		assert_eq!(config.debounce_delay(), Duration::from_millis(1000));
	}

	#[test]
	fn test_parse_partial() {
		let config = AssistConfig::parse("enabled = true\ndebounce_delay_ms = 250\n").unwrap();
		assert!(config.enabled);
		assert_eq!(config.max_options, 10);
		assert_eq!(config.debounce_delay_ms, 250);
	}

	#[test]
	fn test_parse_rejects_unknown_fields() {
		assert!(AssistConfig::parse("assist_delay = 5\n").is_err());
	}

	#[test]
	fn test_load_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "enabled = true").unwrap();
		let config = AssistConfig::load(file.path()).unwrap();
		assert!(config.enabled);
	}

	#[test]
	fn test_load_missing_file() {
		let err = AssistConfig::load(Path::new("/nonexistent/wisp.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}
