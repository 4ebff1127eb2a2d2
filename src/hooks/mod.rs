//! Git hook integration for commit-prefixer.
//!
//! This module handles:
//! - Mapping the prefixing mode to the git hook that applies it
//! - Deciding whether a hook invocation should act
//! - Generating and installing hook scripts

pub mod install;
pub mod kind;

pub use install::{InstallStatus, generate_hook_script, install_hook, install_hooks};
pub use kind::{HookKind, should_run};
