use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use commit_prefixer::config::{
	LoadedSettings, SETTING_KEYS, Settings, SettingsStore, discover_settings, display_name,
	load_settings, parse_settings_file, project_settings_path, user_settings_path,
	write_settings_file,
};
use commit_prefixer::hooks::{HookKind, InstallStatus, install_hooks, should_run};
use commit_prefixer::host::{
	BranchSource, FixedBranch, GitBranch, LogNotifier, MessageFile, comment_char, hooks_dir,
	prefix_commit_message,
};
use commit_prefixer::prefix::{BranchPattern, MessageFormat, Outcome, transform};

#[derive(Parser)]
#[command(name = "commit-prefixer")]
#[command(
	author,
	version,
	about = "Prefix commit messages with data extracted from the branch name"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the message that would be committed on the given branch
	Transform {
		/// Branch name to extract groups from
		#[arg(long)]
		branch: String,

		/// Original commit message (read from stdin when omitted)
		message: Option<String>,
	},

	/// Entry point for installed git hooks
	Hook {
		/// Hook being run (prepare-commit-msg or commit-msg)
		kind: HookKind,

		/// Commit message file passed by git
		file: PathBuf,

		/// Message source passed by git to prepare-commit-msg
		source: Option<String>,

		/// Commit object passed by git to prepare-commit-msg
		sha: Option<String>,

		/// Use this branch name instead of asking git
		#[arg(long)]
		branch: Option<String>,
	},

	/// Install the git hooks in the current repository
	Install {
		/// Rewrite hooks that are already installed
		#[arg(long)]
		force: bool,
	},

	/// Settings management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective settings and where they come from
	Show,
	/// Check the settings file and branch extraction pattern for errors
	Validate,
	/// Create a .commit-prefixer.toml with default settings
	Init {
		/// Overwrite an existing settings file
		#[arg(long)]
		force: bool,
	},
	/// Change one setting in the project settings file
	Set {
		/// One of: branch-extraction-pattern, commit-message-format, enabled, prefixing-mode
		key: String,
		value: String,
	},
	/// Print the path project settings are written to
	Path,
}

fn main() -> ExitCode {
	// Logs go to stderr so they never mix with messages printed on stdout.
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
		)
		.init();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Transform { branch, message } => handle_transform(&branch, message),
		Commands::Hook {
			kind,
			file,
			source,
			sha: _,
			branch,
		} => Ok(handle_hook(kind, &file, source.as_deref(), branch)),
		Commands::Install { force } => handle_install(force),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
			ConfigAction::Init { force } => handle_config_init(force),
			ConfigAction::Set { key, value } => handle_config_set(&key, &value),
			ConfigAction::Path => handle_config_path(),
		},
	}
}

fn current_dir() -> Result<PathBuf> {
	std::env::current_dir().context("Failed to get current directory")
}

fn handle_transform(branch: &str, message: Option<String>) -> Result<ExitCode> {
	let message = match message {
		Some(message) => message,
		None => {
			let mut input = String::new();
			std::io::stdin()
				.read_to_string(&mut input)
				.context("Failed to read message from stdin")?;
			input.trim_end_matches(['\r', '\n']).to_string()
		}
	};

	let cwd = current_dir()?;
	let loaded = load_settings(&cwd).context("Failed to load settings")?;
	let result = transform(&loaded.settings, branch, &message);

	match &result.outcome {
		Outcome::InvalidPattern { pattern, reason } => {
			tracing::warn!("Invalid branch extraction pattern {pattern:?}: {reason}");
		}
		outcome => tracing::info!("Outcome: {outcome:?}"),
	}

	println!("{}", result.message);
	Ok(ExitCode::SUCCESS)
}

/// Hooks never block a commit: every failure is logged and swallowed.
fn handle_hook(
	kind: HookKind,
	file: &Path,
	source: Option<&str>,
	branch: Option<String>,
) -> ExitCode {
	if let Err(e) = run_hook(kind, file, source, branch) {
		tracing::warn!("{kind} hook left the commit message unchanged: {e:#}");
	}
	ExitCode::SUCCESS
}

fn run_hook(
	kind: HookKind,
	file: &Path,
	source: Option<&str>,
	branch: Option<String>,
) -> Result<()> {
	let cwd = current_dir()?;
	let loaded = load_settings(&cwd).context("Failed to load settings")?;

	if !should_run(kind, loaded.settings.prefixing_mode, source) {
		tracing::debug!(
			"Skipping {kind} hook (mode {}, source {source:?})",
			loaded.settings.prefixing_mode
		);
		return Ok(());
	}

	let store = SettingsStore::from_settings(loaded.settings);
	let branch_source: Box<dyn BranchSource> = match branch {
		Some(branch) => Box::new(FixedBranch(branch)),
		None => Box::new(GitBranch::new(&cwd)),
	};
	let comment = comment_char(&cwd).unwrap_or('#');
	let message = MessageFile::new(file).with_comment_char(comment);

	let update = prefix_commit_message(&store, branch_source.as_ref(), &message, &LogNotifier)
		.with_context(|| format!("Failed to prefix {}", file.display()))?;
	tracing::debug!("{kind} hook result: {update:?}");

	Ok(())
}

fn handle_install(force: bool) -> Result<ExitCode> {
	let cwd = current_dir()?;
	let dir = hooks_dir(&cwd).context("Failed to locate the git hooks directory")?;
	let report = install_hooks(&dir, force).context("Failed to install hooks")?;

	for (kind, status) in report {
		match status {
			InstallStatus::Installed => println!("Installed {kind} hook"),
			InstallStatus::AlreadyInstalled => println!("{kind} hook already installed"),
			InstallStatus::Reinstalled => println!("Reinstalled {kind} hook"),
			InstallStatus::BackedUp { backup } => println!(
				"Installed {kind} hook (previous hook saved to {})",
				backup.display()
			),
		}
	}

	let loaded = load_settings(&cwd).context("Failed to load settings")?;
	let comment = comment_char(&cwd).unwrap_or('#');
	if loaded.settings.commit_message_format.starts_with(comment) {
		println!();
		println!(
			"note: commit-message-format starts with '{comment}', which git strips as a comment,"
		);
		println!("      so the hooks will leave commit messages unchanged.");
		println!("      Consider `git config core.commentChar \";\"` for this repository.");
	}

	Ok(ExitCode::SUCCESS)
}

fn print_source(loaded: &LoadedSettings) {
	match loaded.path {
		Some(ref path) => println!("# Source: {}", path.display()),
		None => println!("# Source: built-in defaults"),
	}
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = current_dir()?;
	let loaded = load_settings(&cwd).context("Failed to load settings")?;
	let settings = &loaded.settings;

	print_source(&loaded);
	println!(
		"branch-extraction-pattern: {}",
		settings.branch_extraction_pattern
	);
	println!("commit-message-format: {}", settings.commit_message_format);
	println!("enabled: {}", settings.enabled);
	println!(
		"prefixing-mode: {} ({})",
		settings.prefixing_mode,
		display_name(settings.prefixing_mode)
	);
	println!();

	println!(
		"Project settings path: {}",
		project_settings_path(&cwd).display()
	);
	if let Ok(user_path) = user_settings_path() {
		println!("User settings path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = current_dir()?;

	let loaded = match discover_settings(&cwd) {
		Ok(Some(loaded)) => loaded,
		Ok(None) => {
			println!("No settings file found; using defaults.");
			LoadedSettings::default()
		}
		Err(e) => {
			eprintln!("Settings error: {e}");
			return Ok(ExitCode::FAILURE);
		}
	};

	let pattern = match BranchPattern::compile(&loaded.settings.branch_extraction_pattern) {
		Ok(pattern) => pattern,
		Err(e) => {
			eprintln!("Settings error: {e}");
			if let Some(source) = std::error::Error::source(&e) {
				eprintln!("  {source}");
			}
			return Ok(ExitCode::FAILURE);
		}
	};

	let format = MessageFormat::parse(&loaded.settings.commit_message_format);
	for unresolved in format.unresolved_groups(pattern.group_count()) {
		println!(
			"warning: {unresolved} has no matching group ({} groups in pattern); it is kept as written",
			pattern.group_count()
		);
	}
	if !format.references_message() {
		println!("warning: commit-message-format has no $MESSAGE; the original message is dropped");
	}

	match loaded.path {
		Some(path) => println!("Settings are valid: {}", path.display()),
		None => println!("Default settings are valid."),
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_config_init(force: bool) -> Result<ExitCode> {
	let cwd = current_dir()?;
	let path = project_settings_path(&cwd);

	if path.exists() && !force {
		anyhow::bail!("{} already exists. Use --force to overwrite.", path.display());
	}

	write_settings_file(&path, &Settings::default())
		.with_context(|| format!("Failed to write {}", path.display()))?;

	println!("Created {}", path.display());
	Ok(ExitCode::SUCCESS)
}

fn handle_config_set(key: &str, value: &str) -> Result<ExitCode> {
	let cwd = current_dir()?;
	let path = project_settings_path(&cwd);

	let current = if path.exists() {
		parse_settings_file(&path).with_context(|| format!("Failed to read {}", path.display()))?
	} else {
		Settings::default()
	};

	let store = SettingsStore::from_settings(current);
	store.set_field(key, value).with_context(|| {
		format!("Cannot set {key}; known keys: {}", SETTING_KEYS.join(", "))
	})?;

	write_settings_file(&path, &store.state())
		.with_context(|| format!("Failed to write {}", path.display()))?;

	println!("Set {key} in {}", path.display());
	Ok(ExitCode::SUCCESS)
}

fn handle_config_path() -> Result<ExitCode> {
	let cwd = current_dir()?;
	println!("{}", project_settings_path(&cwd).display());
	Ok(ExitCode::SUCCESS)
}
