use crate::error::{PrefixerError, Result};
use regex::{Captures, Regex};

/// A branch extraction pattern compiled to match whole branch names only.
#[derive(Debug, Clone)]
pub struct BranchPattern {
	/// The pattern as the user wrote it.
	pub source: String,

	regex: Regex,
}

impl BranchPattern {
	/// Compile a user pattern, anchored at both ends of the branch name.
	pub fn compile(pattern: &str) -> Result<Self> {
		// Wrap in a group so alternations like `a|b` stay fully anchored.
		let anchored = format!("^(?:{pattern})$");
		let regex = Regex::new(&anchored).map_err(|source| PrefixerError::InvalidRegex {
			pattern: pattern.to_string(),
			source,
		})?;

		Ok(BranchPattern {
			source: pattern.to_string(),
			regex,
		})
	}

	/// Number of capture groups, not counting the implicit whole-match group.
	pub fn group_count(&self) -> usize {
		self.regex.captures_len() - 1
	}

	/// Match the whole branch name, returning its capture groups.
	pub fn extract<'b>(&self, branch: &'b str) -> Option<BranchGroups<'b>> {
		self.regex
			.captures(branch)
			.map(|captures| BranchGroups { captures })
	}
}

/// Capture groups of a matched branch name.
#[derive(Debug)]
pub struct BranchGroups<'b> {
	captures: Captures<'b>,
}

impl BranchGroups<'_> {
	/// Highest group index that can be referenced (`$0` is the whole branch).
	pub fn len(&self) -> usize {
		self.captures.len() - 1
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Text of group `index`.
	///
	/// `None` when the pattern has no such group. A group that exists but did
	/// not take part in the match yields an empty string.
	pub fn get(&self, index: usize) -> Option<&str> {
		if index > self.len() {
			return None;
		}

		Some(self.captures.get(index).map_or("", |m| m.as_str()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_compile_invalid_pattern() {
		let result = BranchPattern::compile("(bug|feature/(\\d+");
		match result.unwrap_err() {
			PrefixerError::InvalidRegex { pattern, .. } => {
				assert_eq!(pattern, "(bug|feature/(\\d+");
			}
			other => panic!("Expected InvalidRegex error, got {other:?}"),
		}
	}

	#[test]
	fn test_extract_groups() {
		let pattern = BranchPattern::compile(r"(bug|feature)/(\d+)-(.+)").unwrap();
		assert_eq!(pattern.group_count(), 3);

		let groups = pattern.extract("bug/12345-fix-login").unwrap();
		assert_eq!(groups.len(), 3);
		assert_eq!(groups.get(0), Some("bug/12345-fix-login"));
		assert_eq!(groups.get(1), Some("bug"));
		assert_eq!(groups.get(2), Some("12345"));
		assert_eq!(groups.get(3), Some("fix-login"));
		assert_eq!(groups.get(4), None);
	}

	#[test]
	fn test_requires_full_match() {
		let pattern = BranchPattern::compile(r"(bug|feature)/(\d+)-(.+)").unwrap();

		assert!(pattern.extract("user/bug/12-x").is_none());
		assert!(pattern.extract("bug/12").is_none());
		assert!(pattern.extract("main").is_none());
	}

	#[test]
	fn test_top_level_alternation_is_anchored() {
		let pattern = BranchPattern::compile(r"main|(release)/.*").unwrap();

		assert!(pattern.extract("main").is_some());
		assert!(pattern.extract("release/1.0").is_some());
		assert!(pattern.extract("main-old").is_none());
		assert!(pattern.extract("old/release/1.0").is_none());
	}

	#[test]
	fn test_non_participating_group_is_empty() {
		let pattern = BranchPattern::compile(r"(fix)?(\d+)").unwrap();
		let groups = pattern.extract("42").unwrap();

		assert_eq!(groups.get(1), Some(""));
		assert_eq!(groups.get(2), Some("42"));
	}

	#[test]
	fn test_pattern_without_groups() {
		let pattern = BranchPattern::compile("main").unwrap();
		let groups = pattern.extract("main").unwrap();

		assert!(groups.is_empty());
		assert_eq!(groups.get(1), None);
	}
}
