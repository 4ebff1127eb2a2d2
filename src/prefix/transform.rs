use crate::config::{Settings, SettingsStore};
use crate::error::PrefixerError;
use crate::prefix::formatter::MessageFormat;
use crate::prefix::matcher::BranchPattern;

/// Why a transformation did or did not change the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The format was applied.
	Applied,

	/// Prefixing is switched off.
	Disabled,

	/// The branch name does not follow the configured convention.
	NoMatch,

	/// The branch extraction pattern does not compile.
	InvalidPattern { pattern: String, reason: String },
}

impl Outcome {
	pub fn is_applied(&self) -> bool {
		matches!(self, Outcome::Applied)
	}
}

/// Result of running the transformer: the message to use and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
	/// The message to commit. Equal to the original unless `outcome` is `Applied`.
	pub message: String,

	pub outcome: Outcome,
}

impl Transformation {
	fn pass_through(message: &str, outcome: Outcome) -> Self {
		Transformation {
			message: message.to_string(),
			outcome,
		}
	}
}

/// Build the commit message for `branch` from the given settings.
///
/// Never fails: every problem falls back to the original message and is
/// reported through [`Transformation::outcome`].
pub fn transform(settings: &Settings, branch: &str, message: &str) -> Transformation {
	if !settings.enabled {
		return Transformation::pass_through(message, Outcome::Disabled);
	}

	let pattern = match BranchPattern::compile(&settings.branch_extraction_pattern) {
		Ok(pattern) => pattern,
		Err(e) => {
			let reason = match e {
				PrefixerError::InvalidRegex { source, .. } => source.to_string(),
				other => other.to_string(),
			};
			return Transformation::pass_through(
				message,
				Outcome::InvalidPattern {
					pattern: settings.branch_extraction_pattern.clone(),
					reason,
				},
			);
		}
	};

	let Some(groups) = pattern.extract(branch) else {
		tracing::debug!("Branch {branch:?} does not match {:?}", pattern.source);
		return Transformation::pass_through(message, Outcome::NoMatch);
	};

	let format = MessageFormat::parse(&settings.commit_message_format);
	for unresolved in format.unresolved_groups(groups.len()) {
		tracing::debug!("Format references missing group {unresolved}, leaving it as written");
	}

	Transformation {
		message: format.render(&groups, message),
		outcome: Outcome::Applied,
	}
}

/// Whether `message` already carries the format for `branch`, as after an
/// amend or reword of a commit that was prefixed before.
///
/// False whenever [`transform`] would not apply.
pub fn is_already_applied(settings: &Settings, branch: &str, message: &str) -> bool {
	if !settings.enabled {
		return false;
	}

	let Ok(pattern) = BranchPattern::compile(&settings.branch_extraction_pattern) else {
		return false;
	};

	pattern.extract(branch).is_some_and(|groups| {
		MessageFormat::parse(&settings.commit_message_format).is_applied_to(&groups, message)
	})
}

/// Run [`transform`] against one snapshot of a shared store.
pub fn transform_with(store: &SettingsStore, branch: &str, message: &str) -> Transformation {
	let settings = store.snapshot();
	transform(&settings, branch, message)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::PrefixingMode;
	use std::sync::Arc;
	use std::thread;

	const MESSAGE: &str = "Fix login bug";

	fn settings_with_format(format: &str) -> Settings {
		Settings {
			commit_message_format: format.to_string(),
			..Settings::default()
		}
	}

	#[test]
	fn test_default_settings_prefix_ticket_number() {
		let result = transform(&Settings::default(), "bug/12345-fix-login", MESSAGE);
		assert_eq!(result.message, "#12345 - Fix login bug");
		assert_eq!(result.outcome, Outcome::Applied);
	}

	#[test]
	fn test_non_matching_branch_passes_through() {
		let result = transform(&Settings::default(), "main", MESSAGE);
		assert_eq!(result.message, MESSAGE);
		assert_eq!(result.outcome, Outcome::NoMatch);
	}

	#[test]
	fn test_disabled_passes_through() {
		let settings = Settings {
			enabled: false,
			..Settings::default()
		};
		let result = transform(&settings, "bug/12345-fix-login", MESSAGE);
		assert_eq!(result.message, MESSAGE);
		assert_eq!(result.outcome, Outcome::Disabled);
	}

	#[test]
	fn test_disabled_wins_over_invalid_pattern() {
		let settings = Settings {
			enabled: false,
			branch_extraction_pattern: "(".to_string(),
			..Settings::default()
		};
		let result = transform(&settings, "anything", MESSAGE);
		assert_eq!(result.outcome, Outcome::Disabled);
	}

	#[test]
	fn test_groups_and_message_in_custom_format() {
		let settings = settings_with_format("$1: $2 $MESSAGE");
		let result = transform(&settings, "feature/999-add-x", "Add X");
		assert_eq!(result.message, "feature: 999 Add X");
	}

	#[test]
	fn test_invalid_pattern_passes_through() {
		let settings = Settings {
			branch_extraction_pattern: "(bug|feature/(\\d+".to_string(),
			..Settings::default()
		};
		let result = transform(&settings, "bug/12345-fix-login", MESSAGE);

		assert_eq!(result.message, MESSAGE);
		match result.outcome {
			Outcome::InvalidPattern { pattern, reason } => {
				assert_eq!(pattern, "(bug|feature/(\\d+");
				assert!(!reason.is_empty());
			}
			other => panic!("Expected InvalidPattern, got {other:?}"),
		}
	}

	#[test]
	fn test_out_of_range_group_left_literal() {
		let settings = settings_with_format("$5 $2 $MESSAGE");
		let result = transform(&settings, "bug/1-x", "m");
		assert_eq!(result.message, "$5 1 m");
		assert!(result.outcome.is_applied());
	}

	#[test]
	fn test_format_without_message_drops_original() {
		let settings = settings_with_format("#$2");
		let result = transform(&settings, "bug/12345-fix-login", MESSAGE);
		assert_eq!(result.message, "#12345");
	}

	#[test]
	fn test_partial_match_is_not_applied() {
		let result = transform(&Settings::default(), "users/jo/bug/12-x", MESSAGE);
		assert_eq!(result.outcome, Outcome::NoMatch);
	}

	#[test]
	fn test_empty_message() {
		let result = transform(&Settings::default(), "feature/7-x", "");
		assert_eq!(result.message, "#7 - ");
	}

	#[test]
	fn test_mode_does_not_change_result() {
		let mut settings = Settings::default();
		let before = transform(&settings, "bug/1-x", MESSAGE);
		settings.prefixing_mode = PrefixingMode::PreFill;
		let pre_fill = transform(&settings, "bug/1-x", MESSAGE);
		assert_eq!(before, pre_fill);
	}

	#[test]
	fn test_transform_with_reads_latest_store_values() {
		let store = SettingsStore::new();
		assert_eq!(
			transform_with(&store, "bug/1-x", MESSAGE).message,
			"#1 - Fix login bug"
		);

		store.set_commit_message_format("[$3] $MESSAGE");
		assert_eq!(
			transform_with(&store, "bug/1-x", MESSAGE).message,
			"[x] Fix login bug"
		);

		store.set_branch_extraction_pattern(r"(\w+)");
		assert_eq!(
			transform_with(&store, "bug/1-x", MESSAGE).outcome,
			Outcome::NoMatch
		);
	}

	#[test]
	fn test_passes_through_for_many_non_matching_branches() {
		let settings = Settings::default();
		for branch in ["", "main", "develop", "bug/", "bug/abc-x", "hotfix/1-x", "bug/1-"] {
			let result = transform(&settings, branch, MESSAGE);
			assert_eq!(result.message, MESSAGE, "branch {branch:?}");
		}
	}

	#[test]
	fn test_is_already_applied() {
		let settings = settings_with_format("[$2] $MESSAGE");
		let first = transform(&settings, "bug/42-login", MESSAGE);

		assert!(is_already_applied(&settings, "bug/42-login", &first.message));
		assert!(!is_already_applied(&settings, "bug/42-login", MESSAGE));
		assert!(!is_already_applied(&settings, "main", &first.message));

		let disabled = Settings {
			enabled: false,
			..settings
		};
		assert!(!is_already_applied(&disabled, "bug/42-login", &first.message));
	}

	#[test]
	fn test_transform_with_never_mixes_two_states() {
		// Each state is only recognisable when pattern and format come from it.
		let first = Settings {
			branch_extraction_pattern: "(7)".to_string(),
			commit_message_format: "A$1".to_string(),
			..Settings::default()
		};
		let second = Settings {
			branch_extraction_pattern: "7".to_string(),
			commit_message_format: "B$1".to_string(),
			..Settings::default()
		};
		let store = Arc::new(SettingsStore::from_settings(first.clone()));

		let writer = {
			let store = Arc::clone(&store);
			thread::spawn(move || {
				for i in 0..500 {
					store.load_state(if i % 2 == 0 { &second } else { &first });
				}
			})
		};

		for _ in 0..500 {
			let message = transform_with(&store, "7", "").message;
			assert!(
				message == "A7" || message == "B$1",
				"torn settings produced {message:?}"
			);
		}

		writer.join().unwrap();
	}
}
