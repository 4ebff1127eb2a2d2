use crate::prefix::matcher::BranchGroups;

/// Placeholder replaced by the original commit message.
pub const MESSAGE_PLACEHOLDER: &str = "$MESSAGE";

/// One piece of a parsed commit message format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Text copied as-is.
	Literal(String),

	/// `$N`, keeping the original spelling for when group N does not exist.
	Group { index: usize, raw: String },

	/// `$MESSAGE`.
	Message,
}

/// A commit message format parsed into segments.
///
/// Rendering walks the segments once, so text coming from capture groups or
/// from the original message is never scanned for placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormat {
	segments: Vec<Segment>,
}

impl MessageFormat {
	/// Parse a format string. Every input is valid; a `$` that does not start
	/// a placeholder is kept as literal text.
	pub fn parse(format: &str) -> Self {
		let mut segments = Vec::new();
		let mut literal = String::new();
		let mut rest = format;

		while let Some(pos) = rest.find('$') {
			literal.push_str(&rest[..pos]);
			let after = &rest[pos + 1..];

			if after.starts_with(&MESSAGE_PLACEHOLDER[1..]) {
				flush(&mut segments, &mut literal);
				segments.push(Segment::Message);
				rest = &after[MESSAGE_PLACEHOLDER.len() - 1..];
				continue;
			}

			let digits = after.bytes().take_while(u8::is_ascii_digit).count();
			let raw = &rest[pos..pos + 1 + digits];
			let number = &after[..digits];
			match number.parse::<usize>() {
				// `$0` is the whole match; `$01` and friends are not references.
				Ok(index) if !(number.starts_with('0') && digits > 1) => {
					flush(&mut segments, &mut literal);
					segments.push(Segment::Group {
						index,
						raw: raw.to_string(),
					});
				}
				// No digits, a leading zero, or too many to be a real group.
				_ => literal.push_str(raw),
			}
			rest = &after[digits..];
		}

		literal.push_str(rest);
		flush(&mut segments, &mut literal);

		MessageFormat { segments }
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Whether the format keeps the original message.
	pub fn references_message(&self) -> bool {
		self.segments.contains(&Segment::Message)
	}

	/// Group references that a pattern with `group_count` groups cannot fill.
	pub fn unresolved_groups(&self, group_count: usize) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(|segment| match segment {
				Segment::Group { index, raw } if *index > group_count => Some(raw.as_str()),
				_ => None,
			})
			.collect()
	}

	/// Substitute groups and the original message into the format.
	///
	/// A reference to a group the pattern does not have is left as written.
	pub fn render(&self, groups: &BranchGroups<'_>, message: &str) -> String {
		render_segments(&self.segments, groups, message)
	}

	/// Whether `message` already looks like the output of [`Self::render`],
	/// i.e. starts with the text before the first `$MESSAGE` and ends with the
	/// text after the last one.
	///
	/// Always false for a format that is just `$MESSAGE`.
	pub fn is_applied_to(&self, groups: &BranchGroups<'_>, message: &str) -> bool {
		let first = self.segments.iter().position(|s| *s == Segment::Message);
		let last = self.segments.iter().rposition(|s| *s == Segment::Message);

		let (Some(first), Some(last)) = (first, last) else {
			return message == self.render(groups, "");
		};

		let prefix = render_segments(&self.segments[..first], groups, "");
		let suffix = render_segments(&self.segments[last + 1..], groups, "");
		if prefix.is_empty() && suffix.is_empty() {
			return false;
		}

		message.len() >= prefix.len() + suffix.len()
			&& message.starts_with(&prefix)
			&& message.ends_with(&suffix)
	}
}

fn render_segments(segments: &[Segment], groups: &BranchGroups<'_>, message: &str) -> String {
	let mut out = String::new();

	for segment in segments {
		match segment {
			Segment::Literal(text) => out.push_str(text),
			Segment::Message => out.push_str(message),
			Segment::Group { index, raw } => {
				out.push_str(groups.get(*index).unwrap_or(raw));
			}
		}
	}

	out
}

fn flush(segments: &mut Vec<Segment>, literal: &mut String) {
	if !literal.is_empty() {
		segments.push(Segment::Literal(std::mem::take(literal)));
	}
}
