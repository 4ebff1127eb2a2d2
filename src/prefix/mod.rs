//! Branch-driven commit message formatting.
//!
//! This module handles:
//! - Compiling the branch extraction pattern as a whole-name match
//! - Parsing and rendering the commit message format
//! - The pass-through-on-failure transformation itself

pub mod formatter;
pub mod matcher;
pub mod transform;

pub use formatter::{MESSAGE_PLACEHOLDER, MessageFormat, Segment};
pub use matcher::{BranchGroups, BranchPattern};
pub use transform::{Outcome, Transformation, is_already_applied, transform, transform_with};
