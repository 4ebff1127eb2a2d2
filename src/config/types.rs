use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default pattern: matches "bug/12345-description" or "feature/12345-description".
pub const DEFAULT_BRANCH_EXTRACTION_PATTERN: &str = r"(bug|feature)/(\d+)-(.+)";

/// Default format: the ticket number from the second group, then the message.
pub const DEFAULT_COMMIT_MESSAGE_FORMAT: &str = "#$2 - $MESSAGE";

/// When the host should run the transformation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrefixingMode {
	/// Apply silently to the message at commit time.
	#[default]
	BeforeCommit,

	/// Populate the commit message editor so the user can adjust it.
	PreFill,
}

/// Human-readable labels, kept apart from the variants themselves.
pub const PREFIXING_MODE_LABELS: &[(PrefixingMode, &str)] = &[
	(PrefixingMode::BeforeCommit, "Before commit"),
	(PrefixingMode::PreFill, "Pre-fill in commit dialog"),
];

/// Look up the label shown to users for a mode.
pub fn display_name(mode: PrefixingMode) -> &'static str {
	PREFIXING_MODE_LABELS
		.iter()
		.find(|(candidate, _)| *candidate == mode)
		.map_or(mode.as_str(), |(_, label)| *label)
}

impl PrefixingMode {
	pub const ALL: [PrefixingMode; 2] = [PrefixingMode::BeforeCommit, PrefixingMode::PreFill];

	/// Get the persisted string form of this mode.
	pub fn as_str(&self) -> &'static str {
		match self {
			PrefixingMode::BeforeCommit => "BEFORE_COMMIT",
			PrefixingMode::PreFill => "PRE_FILL",
		}
	}
}

impl fmt::Display for PrefixingMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PrefixingMode {
	type Err = String;

	/// Accepts the persisted names as well as kebab/lower-case spellings
	/// (`PRE_FILL`, `pre-fill`, `pre_fill`).
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
		PrefixingMode::ALL
			.into_iter()
			.find(|mode| mode.as_str() == normalized)
			.ok_or_else(|| format!("unknown prefixing mode: {s}"))
	}
}

/// Unknown mode strings fall back to the default instead of failing the load.
fn lenient_mode<'de, D>(deserializer: D) -> Result<PrefixingMode, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;
	Ok(raw.parse().unwrap_or_else(|_| {
		tracing::warn!("Unknown prefixing-mode {raw:?}, using {}", PrefixingMode::default());
		PrefixingMode::default()
	}))
}

/// Settings stored in a `.commit-prefixer.toml` file.
///
/// Missing keys take their defaults and unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
	/// Regular expression applied to the whole branch name.
	pub branch_extraction_pattern: String,

	/// Template using `$1`, `$2`, ... for capture groups and `$MESSAGE`
	/// for the original commit message.
	pub commit_message_format: String,

	/// When false the commit message is passed through unchanged.
	pub enabled: bool,

	/// When the host applies the format.
	#[serde(deserialize_with = "lenient_mode")]
	pub prefixing_mode: PrefixingMode,
}

impl Default for Settings {
	fn default() -> Self {
		Settings {
			branch_extraction_pattern: DEFAULT_BRANCH_EXTRACTION_PATTERN.to_string(),
			commit_message_format: DEFAULT_COMMIT_MESSAGE_FORMAT.to_string(),
			enabled: true,
			prefixing_mode: PrefixingMode::default(),
		}
	}
}

impl Settings {
	/// Overwrite every field with the values from `other`.
	pub fn copy_state(&mut self, other: &Settings) {
		self.branch_extraction_pattern
			.clone_from(&other.branch_extraction_pattern);
		self.commit_message_format
			.clone_from(&other.commit_message_format);
		self.enabled = other.enabled;
		self.prefixing_mode = other.prefixing_mode;
	}
}

/// Settings together with the file they were loaded from.
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
	/// The effective settings.
	pub settings: Settings,

	/// The file they came from, `None` when built-in defaults are in effect.
	pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let settings = Settings::default();
		assert_eq!(settings.branch_extraction_pattern, r"(bug|feature)/(\d+)-(.+)");
		assert_eq!(settings.commit_message_format, "#$2 - $MESSAGE");
		assert!(settings.enabled);
		assert_eq!(settings.prefixing_mode, PrefixingMode::BeforeCommit);
	}

	#[test]
	fn test_copy_state_overwrites_every_field() {
		let mut target = Settings::default();
		let source = Settings {
			branch_extraction_pattern: "(.*)".to_string(),
			commit_message_format: "$1".to_string(),
			enabled: false,
			prefixing_mode: PrefixingMode::PreFill,
		};

		target.copy_state(&source);
		assert_eq!(target, source);
	}

	#[test]
	fn test_display_names() {
		assert_eq!(display_name(PrefixingMode::BeforeCommit), "Before commit");
		assert_eq!(display_name(PrefixingMode::PreFill), "Pre-fill in commit dialog");
	}

	#[test]
	fn test_mode_from_str() {
		assert_eq!("PRE_FILL".parse::<PrefixingMode>(), Ok(PrefixingMode::PreFill));
		assert_eq!("pre-fill".parse::<PrefixingMode>(), Ok(PrefixingMode::PreFill));
		assert_eq!("before_commit".parse::<PrefixingMode>(), Ok(PrefixingMode::BeforeCommit));
		assert!("sometimes".parse::<PrefixingMode>().is_err());
	}

	#[test]
	fn test_mode_round_trips_through_as_str() {
		for mode in PrefixingMode::ALL {
			assert_eq!(mode.as_str().parse::<PrefixingMode>(), Ok(mode));
		}
	}
}
