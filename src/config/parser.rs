use crate::config::types::Settings;
use crate::error::{PrefixerError, Result};
use std::path::Path;

/// Parse a settings file from the given path.
pub fn parse_settings_file(path: &Path) -> Result<Settings> {
	let content = std::fs::read_to_string(path).map_err(|source| PrefixerError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_settings_str(&content, path)
}

/// Parse settings from a string (useful for testing).
pub fn parse_settings_str(content: &str, path: &Path) -> Result<Settings> {
	toml::from_str(content).map_err(|source| PrefixerError::ConfigParseError {
		path: path.to_path_buf(),
		source,
	})
}

/// Render settings in the on-disk TOML layout.
pub fn render_settings(settings: &Settings) -> Result<String> {
	toml::to_string_pretty(settings).map_err(PrefixerError::ConfigSerializeError)
}

/// Persist settings to the given path, replacing any existing file.
pub fn write_settings_file(path: &Path, settings: &Settings) -> Result<()> {
	let content = render_settings(settings)?;
	std::fs::write(path, content).map_err(|source| PrefixerError::ConfigWriteError {
		path: path.to_path_buf(),
		source,
	})
}
