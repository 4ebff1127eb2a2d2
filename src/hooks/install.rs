use crate::error::{PrefixerError, Result};
use crate::hooks::kind::HookKind;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker identifying hook scripts written by this tool.
const HOOK_MARKER: &str = "# commit-prefixer hook";

/// What happened to one hook during installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
	/// No hook existed; ours was written.
	Installed,

	/// Our hook was already there and left alone.
	AlreadyInstalled,

	/// Our hook was rewritten because of `force`.
	Reinstalled,

	/// A foreign hook was moved aside before ours was written.
	BackedUp { backup: PathBuf },
}

/// Generate the shell script git runs for a hook.
///
/// The script never fails the commit: a missing binary is skipped silently.
pub fn generate_hook_script(kind: HookKind) -> String {
	format!(
		r#"#!/bin/sh
{HOOK_MARKER} ({kind})
# Generated by commit-prefixer; the prefixing-mode setting decides
# whether this hook changes the message.

if ! command -v commit-prefixer > /dev/null 2>&1; then
    exit 0
fi

commit-prefixer hook {kind} "$@"
exit 0
"#
	)
}

/// Install every hook kind into `hooks_dir`.
pub fn install_hooks(hooks_dir: &Path, force: bool) -> Result<Vec<(HookKind, InstallStatus)>> {
	fs::create_dir_all(hooks_dir).map_err(|source| PrefixerError::HookInstallFailed {
		hook_path: hooks_dir.to_path_buf(),
		source,
	})?;

	HookKind::ALL
		.into_iter()
		.map(|kind| install_hook(hooks_dir, kind, force).map(|status| (kind, status)))
		.collect()
}

/// Install a single hook, backing up any hook that is not ours.
pub fn install_hook(hooks_dir: &Path, kind: HookKind, force: bool) -> Result<InstallStatus> {
	let hook_path = hooks_dir.join(kind.as_str());
	let io_err = |source| PrefixerError::HookInstallFailed {
		hook_path: hook_path.clone(),
		source,
	};

	let status = if hook_path.exists() {
		let existing = fs::read_to_string(&hook_path).unwrap_or_default();
		if existing.contains(HOOK_MARKER) {
			if !force {
				return Ok(InstallStatus::AlreadyInstalled);
			}
			InstallStatus::Reinstalled
		} else {
			let backup = hooks_dir.join(format!("{}.backup", kind.as_str()));
			fs::rename(&hook_path, &backup).map_err(io_err)?;
			tracing::info!("Backed up existing {kind} hook to {}", backup.display());
			InstallStatus::BackedUp { backup }
		}
	} else {
		InstallStatus::Installed
	};

	fs::write(&hook_path, generate_hook_script(kind)).map_err(io_err)?;

	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		fs::set_permissions(&hook_path, fs::Permissions::from_mode(0o755)).map_err(io_err)?;
	}

	Ok(status)
}
