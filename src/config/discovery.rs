use crate::config::parser::parse_settings_file;
use crate::config::types::LoadedSettings;
use crate::error::{PrefixerError, Result};
use std::path::{Path, PathBuf};

/// File name the settings are stored under, both per project and per user.
pub const SETTINGS_FILE_NAME: &str = ".commit-prefixer.toml";

/// Environment variable that, if truthy, skips `~/.commit-prefixer.toml`.
pub const NO_USER_CONFIG_ENV: &str = "COMMIT_PREFIXER_NO_USER_CONFIG";

/// Find the settings that apply to `start_dir`.
///
/// The lookup order is:
/// 1. Start from `start_dir` and look for `.commit-prefixer.toml`
/// 2. Continue up the directory tree, stopping after the repository root
/// 3. Finally, check ~/.commit-prefixer.toml (unless disabled)
///
/// Returns `None` when no settings file applies.
pub fn discover_settings(start_dir: &Path) -> Result<Option<LoadedSettings>> {
	let user_config = user_settings_candidate(is_env_truthy(NO_USER_CONFIG_ENV), dirs::home_dir());
	discover_settings_with(start_dir, user_config.as_deref())
}

/// The user settings file to consider. An unknown home directory means
/// there is no user file, not an error.
fn user_settings_candidate(disabled: bool, home_dir: Option<PathBuf>) -> Option<PathBuf> {
	if disabled {
		return None;
	}

	match home_dir {
		Some(home) => Some(home.join(SETTINGS_FILE_NAME)),
		None => {
			tracing::debug!("Home directory unknown, skipping user settings");
			None
		}
	}
}

/// Same as [`discover_settings`] with an explicit user settings path.
pub fn discover_settings_with(
	start_dir: &Path,
	user_config: Option<&Path>,
) -> Result<Option<LoadedSettings>> {
	for dir in start_dir.ancestors() {
		let candidate = dir.join(SETTINGS_FILE_NAME);
		if candidate.is_file() {
			tracing::debug!("Using project settings {}", candidate.display());
			return load_from(candidate).map(Some);
		}

		if is_repository_root(dir) {
			break;
		}
	}

	match user_config {
		Some(path) if path.is_file() => {
			tracing::debug!("Using user settings {}", path.display());
			load_from(path.to_path_buf()).map(Some)
		}
		_ => Ok(None),
	}
}

/// Discover settings, falling back to the built-in defaults.
pub fn load_settings(start_dir: &Path) -> Result<LoadedSettings> {
	Ok(discover_settings(start_dir)?.unwrap_or_else(|| {
		tracing::debug!("No settings file found, using defaults");
		LoadedSettings::default()
	}))
}

fn load_from(path: PathBuf) -> Result<LoadedSettings> {
	let settings = parse_settings_file(&path)?;
	Ok(LoadedSettings {
		settings,
		path: Some(path),
	})
}

/// Whether `dir` is the top of a git work tree (`.git` may be a file in worktrees).
fn is_repository_root(dir: &Path) -> bool {
	dir.join(".git").exists()
}

/// Find the root of the repository containing `start_dir`.
pub fn find_repository_root(start_dir: &Path) -> Option<PathBuf> {
	start_dir
		.ancestors()
		.find(|dir| is_repository_root(dir))
		.map(Path::to_path_buf)
}

/// Where project settings for `start_dir` are written: the repository root
/// when there is one, `start_dir` otherwise.
pub fn project_settings_path(start_dir: &Path) -> PathBuf {
	find_repository_root(start_dir)
		.unwrap_or_else(|| start_dir.to_path_buf())
		.join(SETTINGS_FILE_NAME)
}

/// Get the path to the user's settings file.
pub fn user_settings_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(PrefixerError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(SETTINGS_FILE_NAME))
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn write_settings(dir: &Path, content: &str) -> PathBuf {
		let path = dir.join(SETTINGS_FILE_NAME);
		fs::write(&path, content).unwrap();
		path
	}

	#[test]
	fn test_is_env_truthy() {
		// SAFETY: These env var operations are safe in single-threaded test context
		unsafe {
			std::env::remove_var("TEST_PREFIXER_ENV_1");
			assert!(!is_env_truthy("TEST_PREFIXER_ENV_1"));

			std::env::set_var("TEST_PREFIXER_ENV_2", "");
			assert!(!is_env_truthy("TEST_PREFIXER_ENV_2"));

			std::env::set_var("TEST_PREFIXER_ENV_3", "FALSE");
			assert!(!is_env_truthy("TEST_PREFIXER_ENV_3"));

			std::env::set_var("TEST_PREFIXER_ENV_4", "no");
			assert!(!is_env_truthy("TEST_PREFIXER_ENV_4"));

			std::env::set_var("TEST_PREFIXER_ENV_5", "1");
			assert!(is_env_truthy("TEST_PREFIXER_ENV_5"));

			for i in 1..=5 {
				std::env::remove_var(format!("TEST_PREFIXER_ENV_{}", i));
			}
		}
	}

	#[test]
	fn test_finds_settings_in_start_dir() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = write_settings(temp_dir.path(), "enabled = false\n");

		let loaded = discover_settings_with(temp_dir.path(), None)
			.unwrap()
			.unwrap();
		assert_eq!(loaded.path, Some(path));
		assert!(!loaded.settings.enabled);
	}

	#[test]
	fn test_finds_settings_in_ancestor_within_repository() {
		let temp_dir = tempfile::tempdir().unwrap();
		let repo = temp_dir.path().join("repo");
		let nested = repo.join("src").join("deep");
		fs::create_dir_all(&nested).unwrap();
		fs::create_dir(repo.join(".git")).unwrap();
		let path = write_settings(&repo, "enabled = false\n");

		let loaded = discover_settings_with(&nested, None).unwrap().unwrap();
		assert_eq!(loaded.path, Some(path));
	}

	#[test]
	fn test_stops_at_repository_root() {
		let temp_dir = tempfile::tempdir().unwrap();
		let repo = temp_dir.path().join("repo");
		fs::create_dir_all(repo.join(".git")).unwrap();
		// Outside the repository, must not be picked up.
		write_settings(temp_dir.path(), "enabled = false\n");

		let loaded = discover_settings_with(&repo, None).unwrap();
		assert!(loaded.is_none());
	}

	#[test]
	fn test_nearest_settings_win() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("sub");
		fs::create_dir(&nested).unwrap();
		write_settings(temp_dir.path(), "commit-message-format = \"outer\"\n");
		write_settings(&nested, "commit-message-format = \"inner\"\n");

		let loaded = discover_settings_with(&nested, None).unwrap().unwrap();
		assert_eq!(loaded.settings.commit_message_format, "inner");
	}

	#[test]
	fn test_falls_back_to_user_settings() {
		let temp_dir = tempfile::tempdir().unwrap();
		let repo = temp_dir.path().join("repo");
		let home = temp_dir.path().join("home");
		fs::create_dir_all(repo.join(".git")).unwrap();
		fs::create_dir(&home).unwrap();
		let user_path = write_settings(&home, "prefixing-mode = \"PRE_FILL\"\n");

		let loaded = discover_settings_with(&repo, Some(&user_path))
			.unwrap()
			.unwrap();
		assert_eq!(loaded.path, Some(user_path));
	}

	#[test]
	fn test_missing_user_settings_is_not_an_error() {
		let temp_dir = tempfile::tempdir().unwrap();
		fs::create_dir(temp_dir.path().join(".git")).unwrap();
		let user_path = temp_dir.path().join("nowhere").join(SETTINGS_FILE_NAME);

		let loaded = discover_settings_with(temp_dir.path(), Some(&user_path)).unwrap();
		assert!(loaded.is_none());
	}

	#[test]
	fn test_project_settings_path_prefers_repository_root() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("a").join("b");
		fs::create_dir_all(&nested).unwrap();
		fs::create_dir(temp_dir.path().join(".git")).unwrap();

		assert_eq!(
			project_settings_path(&nested),
			temp_dir.path().join(SETTINGS_FILE_NAME)
		);
		assert_eq!(
			find_repository_root(&nested),
			Some(temp_dir.path().to_path_buf())
		);
	}

	#[test]
	fn test_user_settings_candidate() {
		let home = PathBuf::from("/home/someone");

		assert_eq!(
			user_settings_candidate(false, Some(home.clone())),
			Some(home.join(SETTINGS_FILE_NAME))
		);
		assert_eq!(user_settings_candidate(true, Some(home)), None);
		assert_eq!(user_settings_candidate(false, None), None);
	}

	#[test]
	fn test_user_settings_path() {
		let path = user_settings_path().unwrap();
		assert!(path.ends_with(SETTINGS_FILE_NAME));
	}
}
