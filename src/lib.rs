//! commit-prefixer - prefix commit messages with data taken from the branch name.
//!
//! This library provides the core functionality for commit-prefixer, including:
//! - Settings with defaults, a shared store, and TOML persistence
//! - Whole-name branch matching and commit message formatting
//! - Host traits and git-backed implementations
//! - Git hook generation and installation
//!
//! # Example
//!
//! ```
//! use commit_prefixer::config::Settings;
//! use commit_prefixer::prefix::{Outcome, transform};
//!
//! let settings = Settings::default();
//! let result = transform(&settings, "bug/12345-fix-login", "Fix login bug");
//!
//! assert_eq!(result.message, "#12345 - Fix login bug");
//! assert_eq!(result.outcome, Outcome::Applied);
//! ```

pub mod config;
pub mod error;
pub mod hooks;
pub mod host;
pub mod prefix;

pub use error::{PrefixerError, Result};
