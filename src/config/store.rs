use crate::config::types::{PrefixingMode, Settings};
use crate::error::{PrefixerError, Result};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Keys accepted by [`SettingsStore::set_field`], as spelled in the settings file.
pub const SETTING_KEYS: [&str; 4] = [
	"branch-extraction-pattern",
	"commit-message-format",
	"enabled",
	"prefixing-mode",
];

/// Shared, mutable holder for one project's settings.
///
/// A settings surface can change fields while transformations run; a
/// transformation should call [`SettingsStore::snapshot`] once and work from
/// that copy so it never observes a half-applied update.
///
/// No validation happens on set. An invalid pattern is accepted here and only
/// reported when a transformation tries to use it.
#[derive(Debug, Default)]
pub struct SettingsStore {
	inner: RwLock<Settings>,
}

impl SettingsStore {
	/// Create a store holding the default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a store holding the given settings.
	pub fn from_settings(settings: Settings) -> Self {
		SettingsStore {
			inner: RwLock::new(settings),
		}
	}

	fn read(&self) -> RwLockReadGuard<'_, Settings> {
		self.inner.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, Settings> {
		self.inner.write().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn branch_extraction_pattern(&self) -> String {
		self.read().branch_extraction_pattern.clone()
	}

	pub fn set_branch_extraction_pattern(&self, pattern: impl Into<String>) {
		self.write().branch_extraction_pattern = pattern.into();
	}

	pub fn commit_message_format(&self) -> String {
		self.read().commit_message_format.clone()
	}

	pub fn set_commit_message_format(&self, format: impl Into<String>) {
		self.write().commit_message_format = format.into();
	}

	pub fn is_enabled(&self) -> bool {
		self.read().enabled
	}

	pub fn set_enabled(&self, enabled: bool) {
		self.write().enabled = enabled;
	}

	pub fn prefixing_mode(&self) -> PrefixingMode {
		self.read().prefixing_mode
	}

	pub fn set_prefixing_mode(&self, mode: PrefixingMode) {
		self.write().prefixing_mode = mode;
	}

	/// Read all four fields under a single lock acquisition.
	pub fn snapshot(&self) -> Settings {
		self.read().clone()
	}

	/// The state to hand to the persistence layer.
	pub fn state(&self) -> Settings {
		self.snapshot()
	}

	/// Replace the held settings with a freshly loaded state.
	pub fn load_state(&self, state: &Settings) {
		self.write().copy_state(state);
	}

	/// Set one field from its textual form, as a settings surface would.
	pub fn set_field(&self, key: &str, value: &str) -> Result<()> {
		let invalid = || PrefixerError::InvalidValue {
			key: key.to_string(),
			value: value.to_string(),
		};

		match key {
			"branch-extraction-pattern" => self.set_branch_extraction_pattern(value),
			"commit-message-format" => self.set_commit_message_format(value),
			"enabled" => self.set_enabled(value.parse().map_err(|_| invalid())?),
			"prefixing-mode" => self.set_prefixing_mode(value.parse().map_err(|_| invalid())?),
			_ => return Err(invalid()),
		}

		Ok(())
	}
}
