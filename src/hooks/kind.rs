use crate::config::PrefixingMode;
use std::fmt;
use std::str::FromStr;

/// Git hooks that can drive the transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
	/// Runs before the editor opens; used to pre-fill the message.
	PrepareCommitMsg,

	/// Runs after the message is written; used to rewrite it silently.
	CommitMsg,
}

impl HookKind {
	pub const ALL: [HookKind; 2] = [HookKind::PrepareCommitMsg, HookKind::CommitMsg];

	/// Get the git hook file name.
	pub fn as_str(&self) -> &'static str {
		match self {
			HookKind::PrepareCommitMsg => "prepare-commit-msg",
			HookKind::CommitMsg => "commit-msg",
		}
	}

	/// The hook that applies the format for a given mode.
	pub fn for_mode(mode: PrefixingMode) -> Self {
		match mode {
			PrefixingMode::BeforeCommit => HookKind::CommitMsg,
			PrefixingMode::PreFill => HookKind::PrepareCommitMsg,
		}
	}
}

impl fmt::Display for HookKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for HookKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		HookKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| format!("unsupported hook: {s}"))
	}
}

/// Message sources passed to `prepare-commit-msg` where a message already
/// exists and must not be prefixed again.
const REUSED_MESSAGE_SOURCES: &[&str] = &["merge", "squash", "commit"];

/// Whether a hook invocation should apply the format.
///
/// Both hooks are installed; only the one matching the configured mode acts.
/// `source` is git's second `prepare-commit-msg` argument.
pub fn should_run(kind: HookKind, mode: PrefixingMode, source: Option<&str>) -> bool {
	if HookKind::for_mode(mode) != kind {
		return false;
	}

	match (kind, source) {
		(HookKind::PrepareCommitMsg, Some(source)) => !REUSED_MESSAGE_SOURCES.contains(&source),
		_ => true,
	}
}
