//! Running the external site generator after an export.

use anyhow::{Context, Result};
use log::{error, info};
use std::time::Duration;
use tokio::process::Command;

use crate::config::ExportSettings;
use crate::notice::Notifier;

/// Site generator invoked by the post-export command.
pub const GENERATOR: &str = "obsidianhtml";

/// Captured result of one subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
	/// Exit code, `None` when the process was killed by a signal.
	pub code: Option<i32>,
	pub stdout: String,
	pub stderr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Success,
	Failure(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
	/// Something was written to stderr.
	Stderr,
	Exit(Option<i32>),
	/// Nothing on either stream.
	NoOutput,
}

impl ShellOutput {
	pub fn outcome(&self) -> Outcome {
		if !self.stderr.is_empty() {
			Outcome::Failure(FailureReason::Stderr)
		} else if self.code != Some(0) {
			Outcome::Failure(FailureReason::Exit(self.code))
		} else if !self.stdout.is_empty() {
			Outcome::Success
		} else {
			Outcome::Failure(FailureReason::NoOutput)
		}
	}
}

/// `cd "<working_dir>"; obsidianhtml -i "<config_path>"`
///
/// Paths are only quoted, not escaped.
pub fn post_export_command(settings: &ExportSettings) -> String {
	format!(
		"cd \"{}\"; {} -i \"{}\"",
		settings.post_export_working_dir, GENERATOR, settings.post_export_config_path
	)
}

/// Runs `command` through the platform shell and waits for it to exit.
pub async fn run(command: &str) -> Result<ShellOutput> {
	let mut process = if cfg!(windows) {
		let mut cmd = Command::new("cmd");
		cmd.arg("/C").arg(command);
		cmd
	} else {
		let mut cmd = Command::new("sh");
		cmd.arg("-c").arg(command);
		cmd
	};

	let output = process
		.output()
		.await
		.with_context(|| format!("Failed to spawn shell for: {}", command))?;

	Ok(ShellOutput {
		code: output.status.code(),
		stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
		stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
	})
}

/// Runs the configured site generator and reports the outcome.
pub async fn run_post_export<N: Notifier>(settings: &ExportSettings, notifier: &N) -> Result<Outcome> {
	notifier.flash(
		"Running ObsidianHtml... (You'll get notified when it's done)",
		Some(Duration::from_secs(7)),
	);

	let command = post_export_command(settings);
	info!("{}", command);

	let output = run(&command).await?;
	let outcome = output.outcome();

	match outcome {
		Outcome::Success => {
			info!("stdout: {}", output.stdout);
			notifier.flash("Running ObsidianHtml --> done!", Some(Duration::from_secs(5)));
		}
		Outcome::Failure(reason) => {
			error!("post-export command failed ({:?}); stderr: {}", reason, output.stderr);
			notifier.flash("Running ObsidianHtml --> failed!", Some(Duration::from_secs(5)));
		}
	}

	Ok(outcome)
}
