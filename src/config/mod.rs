//! Settings for commit-prefixer.
//!
//! This module handles:
//! - The settings model and its defaults
//! - A shared store with per-field accessors and consistent snapshots
//! - TOML parsing and rendering
//! - Project and user settings discovery

pub mod discovery;
pub mod parser;
pub mod store;
pub mod types;

pub use discovery::{
	SETTINGS_FILE_NAME, discover_settings, find_repository_root, load_settings,
	project_settings_path, user_settings_path,
};
pub use parser::{parse_settings_file, parse_settings_str, render_settings, write_settings_file};
pub use store::{SETTING_KEYS, SettingsStore};
pub use types::{LoadedSettings, PrefixingMode, Settings, display_name};
