//! Host integration for commit-prefixer.
//!
//! The transformer never reads branches or touches commit messages itself.
//! This module defines what a host has to provide and ships the git-backed
//! implementations used by the CLI hooks.

pub mod git;

pub use git::{GitBranch, LogNotifier, MessageFile, comment_char, hooks_dir};

use crate::config::SettingsStore;
use crate::error::Result;
use crate::prefix::{Outcome, is_already_applied, transform};

/// Supplies the branch name for the current context.
pub trait BranchSource {
	/// `None` when there is no current branch.
	fn current_branch(&self) -> Result<Option<String>>;
}

/// Gives access to the commit message being written.
pub trait CommitMessage {
	fn read(&self) -> Result<String>;

	fn write(&self, message: &str) -> Result<()>;

	/// Lines starting with this character are kept out of the transformation.
	fn comment_char(&self) -> Option<char> {
		None
	}
}

/// Best-effort channel for telling the user about a broken configuration.
pub trait Notifier {
	fn config_error(&self, message: &str);
}

/// A branch name known up front, e.g. given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBranch(pub String);

impl BranchSource for FixedBranch {
	fn current_branch(&self) -> Result<Option<String>> {
		Ok(Some(self.0.clone()))
	}
}

/// Marker `git commit -v` puts above the diff; everything from it on is cut.
const SCISSORS: &str = " ------------------------ >8 ------------------------";

/// Byte offset of the scissors line, if the message has one.
fn scissors_offset(content: &str, comment_char: char) -> Option<usize> {
	let mut offset = 0;
	for line in content.split_inclusive('\n') {
		let trimmed = line.trim_end();
		if trimmed.starts_with(comment_char) && &trimmed[comment_char.len_utf8()..] == SCISSORS {
			return Some(offset);
		}
		offset += line.len();
	}
	None
}

/// Split a commit message file into the message text, the line break(s)
/// ending it, and the trailing block of comment and blank lines.
///
/// A scissors line and everything after it (the `--verbose` diff) always
/// belongs to the trailing block.
pub fn split_comment_block(content: &str, comment_char: char) -> (&str, &str, &str) {
	let scan_end = scissors_offset(content, comment_char).unwrap_or(content.len());
	let mut tail_start = scan_end;

	for line in content[..scan_end].split_inclusive('\n').rev() {
		let trimmed = line.trim_end();
		if trimmed.is_empty() || trimmed.starts_with(comment_char) {
			tail_start -= line.len();
		} else {
			break;
		}
	}

	let (head, tail) = content.split_at(tail_start);
	let body = head.trim_end_matches(['\r', '\n']);
	(body, &head[body.len()..], tail)
}

/// Whether `result` has a comment line that was not already in `body`.
///
/// Git strips such lines, which would drop the subject or empty the message.
fn introduces_comment_line(result: &str, body: &str, comment_char: char) -> bool {
	result
		.lines()
		.filter(|line| line.starts_with(comment_char))
		.any(|line| !body.lines().any(|existing| existing == line))
}

/// What [`prefix_commit_message`] did with the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageUpdate {
	/// The formatted message was written back.
	Written,

	/// Left alone for the given transformer outcome.
	Unchanged(Outcome),

	/// The message already carries the format, e.g. on amend or reword.
	AlreadyApplied,

	/// The result would start a line with the comment character and be
	/// stripped by git, so the original message was kept.
	CommentConflict,
}

/// Apply the current settings to a commit message in place.
///
/// Takes a single settings snapshot, so a concurrent settings change never
/// mixes old and new values within one call. The message is rewritten only
/// when the format applies, changes it, was not applied before, and survives
/// git's comment stripping.
pub fn prefix_commit_message(
	store: &SettingsStore,
	branch: &dyn BranchSource,
	message: &dyn CommitMessage,
	notifier: &dyn Notifier,
) -> Result<MessageUpdate> {
	let settings = store.snapshot();
	if !settings.enabled {
		return Ok(MessageUpdate::Unchanged(Outcome::Disabled));
	}

	let Some(branch_name) = branch.current_branch()? else {
		tracing::debug!("No current branch, leaving message unchanged");
		return Ok(MessageUpdate::Unchanged(Outcome::NoMatch));
	};

	let content = message.read()?;
	let comment_char = message.comment_char();
	let (body, separator, tail) = match comment_char {
		Some(comment_char) => split_comment_block(&content, comment_char),
		None => (content.as_str(), "", ""),
	};

	let result = transform(&settings, &branch_name, body);
	match result.outcome {
		Outcome::Applied if result.message != body => {}
		Outcome::InvalidPattern {
			ref pattern,
			ref reason,
		} => {
			notifier.config_error(&format!(
				"Invalid branch extraction pattern {pattern:?}, commit message left unchanged: {reason}"
			));
			return Ok(MessageUpdate::Unchanged(result.outcome.clone()));
		}
		outcome => {
			tracing::debug!("Commit message unchanged ({outcome:?})");
			return Ok(MessageUpdate::Unchanged(outcome));
		}
	}

	if is_already_applied(&settings, &branch_name, body) {
		tracing::debug!("Commit message already formatted for {branch_name:?}");
		return Ok(MessageUpdate::AlreadyApplied);
	}

	if let Some(comment_char) = comment_char
		&& introduces_comment_line(&result.message, body, comment_char)
	{
		notifier.config_error(&format!(
			"Formatted message starts a line with git's comment character '{comment_char}' \
			 and would be stripped, commit message left unchanged. \
			 Change commit-message-format or set core.commentChar."
		));
		return Ok(MessageUpdate::CommentConflict);
	}

	message.write(&format!("{}{separator}{tail}", result.message))?;
	tracing::info!("Prefixed commit message from branch {branch_name:?}");
	Ok(MessageUpdate::Written)
}
