use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use crate::config::{settings_path, ExportSettings, SettingKey};
use crate::export::Exporter;
use crate::listing::{dump_file_list, ListKind};
use crate::notice::ConsoleNotifier;
use crate::render::PreviewSurface;
use crate::poll::RetryPolicy;
use crate::shell;
use crate::vault::{FsVault, Vault};

#[derive(Parser)]
#[command(name = "vaultpress")]
#[command(about = "Export a markdown vault to HTML and hand off to a site generator")]
#[command(version)]
pub struct Cli {
	/// Increase log verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Vault directory (default: current directory)
	#[arg(long, default_value = ".", global = true)]
	pub vault: PathBuf,

	/// Settings file (default: <vault>/.vaultpress.toml)
	#[arg(long, global = true)]
	pub settings: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Export every markdown document to HTML under the output root
	Export,

	/// Write the list of markdown file paths to the output root
	ListMarkdown,

	/// Write the list of all file paths to the output root
	ListAll,

	/// Run the post-export site generator command
	Generate,

	/// Show or change export settings
	Settings(SettingsArgs),
}

#[derive(Args)]
pub struct SettingsArgs {
	#[command(subcommand)]
	pub action: SettingsAction,
}

#[derive(Subcommand)]
pub enum SettingsAction {
	/// Print the effective settings
	Show,

	/// Change one setting and save it
	Set {
		#[arg(value_enum)]
		key: SettingKey,
		value: String,
	},

	/// Print the settings file location
	Path,
}

impl Cli {
	pub fn log_level(&self) -> &'static str {
		match self.verbose {
			0 => "warn",
			1 => "info",
			_ => "debug",
		}
	}

	pub async fn run(self) -> Result<()> {
		let settings_file = settings_path(&self.vault, self.settings.as_deref());
		let mut settings = ExportSettings::load(&settings_file)?;
		let notifier = ConsoleNotifier::new();

		match self.command {
			Commands::Export => {
				let vault = open_vault(&self.vault)?;
				let surface = PreviewSurface::new(vault.base_path());
				let documents = vault.markdown_files()?;

				let report = Exporter::new(&vault, &surface, &notifier, RetryPolicy::default())
					.export_all(&documents, &settings)
					.await?;

				println!(
					"Exported {} documents to {} ({} skipped, {} empty)",
					report.exported.len(),
					vault.base_path().join(&settings.output_root).display(),
					report.skipped.len(),
					report.empty.len()
				);
				if let Some(outcome) = report.post_export {
					info!("post-export outcome: {:?}", outcome);
				}
			}
			Commands::ListMarkdown => {
				let vault = open_vault(&self.vault)?;
				dump_file_list(&vault, &settings, ListKind::Markdown, &notifier).await?;
			}
			Commands::ListAll => {
				let vault = open_vault(&self.vault)?;
				dump_file_list(&vault, &settings, ListKind::All, &notifier).await?;
			}
			Commands::Generate => {
				let outcome = shell::run_post_export(&settings, &notifier).await?;
				info!("post-export outcome: {:?}", outcome);
			}
			Commands::Settings(args) => match args.action {
				SettingsAction::Show => {
					print!("{}", toml::to_string_pretty(&settings)?);
				}
				SettingsAction::Set { key, value } => {
					settings.set(key, &value)?;
					settings.save(&settings_file)?;
					println!("Saved settings to {}", settings_file.display());
				}
				SettingsAction::Path => {
					println!("{}", settings_file.display());
				}
			},
		}
		Ok(())
	}
}

fn open_vault(dir: &Path) -> Result<FsVault> {
	if !dir.is_dir() {
		bail!("Vault directory not found: {}", dir.display());
	}
	Ok(FsVault::new(dir))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_export() {
		let cli = Cli::try_parse_from(["vaultpress", "--vault", "/notes", "export"]).unwrap();
		assert!(matches!(cli.command, Commands::Export));
		assert_eq!(cli.vault, PathBuf::from("/notes"));
		assert_eq!(cli.log_level(), "warn");
	}

	#[test]
	fn test_parse_settings_set() {
		let cli = Cli::try_parse_from([
			"vaultpress",
			"-vv",
			"settings",
			"set",
			"run_post_export",
			"true",
		])
		.unwrap();
		assert_eq!(cli.log_level(), "debug");
		let Commands::Settings(args) = cli.command else {
			panic!("expected settings command");
		};
		assert!(matches!(
			args.action,
			SettingsAction::Set {
				key: SettingKey::RunPostExport,
				ref value,
			} if value == "true"
		));
	}

	#[test]
	fn test_unknown_setting_is_rejected() {
		assert!(Cli::try_parse_from(["vaultpress", "settings", "set", "colour", "red"]).is_err());
	}

	#[tokio::test]
	async fn test_settings_set_persists() {
		let dir = tempfile::TempDir::new().unwrap();
		let vault = dir.path().display().to_string();

		Cli::try_parse_from([
			"vaultpress",
			"--vault",
			vault.as_str(),
			"settings",
			"set",
			"output_root",
			"site/out",
		])
		.unwrap()
		.run()
		.await
		.unwrap();

		let saved = ExportSettings::load(&dir.path().join(".vaultpress.toml")).unwrap();
		assert_eq!(saved.output_root, "site/out");
	}

	#[tokio::test]
	async fn test_export_command_writes_html() {
		let dir = tempfile::TempDir::new().unwrap();
		std::fs::write(dir.path().join("a.md"), "# A").unwrap();
		let vault = dir.path().display().to_string();

		Cli::try_parse_from(["vaultpress", "--vault", vault.as_str(), "export"])
			.unwrap()
			.run()
			.await
			.unwrap();

		let html = std::fs::read_to_string(dir.path().join("obs.html/export/a.md.html")).unwrap();
		assert!(html.contains("<h1>A</h1>"));
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn test_failed_generator_run_is_not_a_command_error() {
		let dir = tempfile::TempDir::new().unwrap();
		let vault = dir.path().display().to_string();
		std::fs::write(
			dir.path().join(".vaultpress.toml"),
			format!(
				"post_export_working_dir = \"{}\"\n",
				dir.path().join("missing").display()
			),
		)
		.unwrap();

		let result = Cli::try_parse_from(["vaultpress", "--vault", vault.as_str(), "generate"])
			.unwrap()
			.run()
			.await;

		assert!(result.is_ok());
	}
}
