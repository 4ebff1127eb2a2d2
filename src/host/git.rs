use crate::error::{PrefixerError, Result};
use crate::host::{BranchSource, CommitMessage, Notifier};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Run git in `dir` and return trimmed stdout, or `None` on a non-zero exit.
fn git_output(dir: &Path, args: &[&str]) -> Result<Option<String>> {
	let output = Command::new("git")
		.args(args)
		.current_dir(dir)
		.stdin(Stdio::null())
		.stderr(Stdio::null())
		.output()
		.map_err(|source| PrefixerError::GitFailed {
			command: format!("git {}", args.join(" ")),
			source,
		})?;

	if !output.status.success() {
		return Ok(None);
	}

	let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
	Ok(Some(stdout).filter(|s| !s.is_empty()))
}

/// Reads the checked-out branch of a git work tree.
#[derive(Debug, Clone)]
pub struct GitBranch {
	pub repo_dir: PathBuf,
}

impl GitBranch {
	pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
		GitBranch {
			repo_dir: repo_dir.into(),
		}
	}
}

impl BranchSource for GitBranch {
	/// `None` on a detached HEAD (e.g. mid-rebase).
	fn current_branch(&self) -> Result<Option<String>> {
		git_output(&self.repo_dir, &["symbolic-ref", "--quiet", "--short", "HEAD"])
	}
}

/// The character git treats as starting a comment line in `repo_dir`.
///
/// Falls back to `#` when unset, and when set to `auto`, since the real
/// character is only chosen once git writes the message file.
pub fn comment_char(repo_dir: &Path) -> Result<char> {
	let configured = git_output(repo_dir, &["config", "--get", "core.commentChar"])?;
	Ok(configured
		.filter(|value| value != "auto")
		.and_then(|value| value.chars().next())
		.unwrap_or('#'))
}

/// Directory git runs hooks from for the repository at `repo_dir`.
///
/// Honors `core.hooksPath` and linked worktrees.
pub fn hooks_dir(repo_dir: &Path) -> Result<PathBuf> {
	let path = git_output(repo_dir, &["rev-parse", "--git-path", "hooks"])?.ok_or_else(|| {
		PrefixerError::NotARepository {
			path: repo_dir.to_path_buf(),
		}
	})?;

	Ok(repo_dir.join(path))
}

/// A commit message file as passed to git's message hooks.
#[derive(Debug, Clone)]
pub struct MessageFile {
	pub path: PathBuf,

	/// Lines starting with this character are git comments, not message text.
	pub comment_char: Option<char>,
}

impl MessageFile {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		MessageFile {
			path: path.into(),
			comment_char: None,
		}
	}

	pub fn with_comment_char(mut self, comment_char: char) -> Self {
		self.comment_char = Some(comment_char);
		self
	}
}

impl CommitMessage for MessageFile {
	fn read(&self) -> Result<String> {
		std::fs::read_to_string(&self.path).map_err(|source| PrefixerError::MessageReadError {
			path: self.path.clone(),
			source,
		})
	}

	fn write(&self, message: &str) -> Result<()> {
		std::fs::write(&self.path, message).map_err(|source| PrefixerError::MessageWriteError {
			path: self.path.clone(),
			source,
		})
	}

	fn comment_char(&self) -> Option<char> {
		self.comment_char
	}
}

/// Reports configuration problems through the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
	fn config_error(&self, message: &str) {
		tracing::warn!("{message}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_message_file_read_write() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("COMMIT_EDITMSG");
		std::fs::write(&path, "Initial\n").unwrap();

		let file = MessageFile::new(&path);
		assert_eq!(file.read().unwrap(), "Initial\n");

		file.write("Changed\n").unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "Changed\n");
	}

	#[test]
	fn test_message_file_missing() {
		let file = MessageFile::new("/nonexistent/COMMIT_EDITMSG");
		assert!(matches!(
			file.read(),
			Err(PrefixerError::MessageReadError { .. })
		));
	}

	#[test]
	fn test_message_file_comment_char() {
		let file = MessageFile::new("COMMIT_EDITMSG");
		assert_eq!(file.comment_char(), None);
		assert_eq!(file.with_comment_char(';').comment_char(), Some(';'));
	}

	#[test]
	fn test_branch_outside_repository() {
		// Either git is missing (error) or it reports no branch.
		let temp_dir = tempfile::tempdir().unwrap();
		let branch = GitBranch::new(temp_dir.path()).current_branch();
		assert!(!matches!(branch, Ok(Some(_))));
	}
}
