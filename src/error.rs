use std::path::PathBuf;

/// Library-level structured errors for commit-prefixer.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum PrefixerError {
	#[error("Failed to read settings file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to write settings file: {path}")]
	ConfigWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to serialize settings")]
	ConfigSerializeError(#[source] toml::ser::Error),

	#[error("Invalid branch extraction pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid value for {key}: {value}")]
	InvalidValue { key: String, value: String },

	#[error("Failed to read commit message: {path}")]
	MessageReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write commit message: {path}")]
	MessageWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("git invocation failed: {command}")]
	GitFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to install hook: {hook_path}")]
	HookInstallFailed {
		hook_path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Not inside a git repository: {path}")]
	NotARepository { path: PathBuf },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using PrefixerError.
pub type Result<T> = std::result::Result<T, PrefixerError>;
