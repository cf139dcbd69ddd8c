//! Persisted export settings.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file name, relative to the vault root.
pub const SETTINGS_FILE: &str = ".vaultpress.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
	/// Vault-relative folder that receives the exported HTML.
	pub output_root: String,
	pub run_post_export: bool,
	pub post_export_working_dir: String,
	/// Absolute path of the generator's config.yml.
	pub post_export_config_path: String,
	pub pretty_print: bool,
}

impl Default for ExportSettings {
	fn default() -> Self {
		Self {
			output_root: "obs.html/export".to_string(),
			run_post_export: false,
			post_export_working_dir: String::new(),
			post_export_config_path: String::new(),
			pretty_print: true,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum SettingKey {
	OutputRoot,
	RunPostExport,
	PostExportWorkingDir,
	PostExportConfigPath,
	PrettyPrint,
}

impl ExportSettings {
	/// Loads settings from `path`, falling back to defaults for the file or any missing key.
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			return Ok(Self::default());
		}

		let content = fs::read_to_string(path)
			.with_context(|| format!("Failed to read settings file: {}", path.display()))?;
		let mut settings: Self = toml::from_str(&content)
			.with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
		settings.output_root = normalize_output_root(&settings.output_root)
			.with_context(|| format!("Invalid output_root in {}", path.display()))?;
		Ok(settings)
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent)?;
		}

		let content = toml::to_string_pretty(self)?;
		fs::write(path, content)
			.with_context(|| format!("Failed to write settings file: {}", path.display()))
	}

	pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
		match key {
			SettingKey::OutputRoot => self.output_root = normalize_output_root(value)?,
			SettingKey::RunPostExport => self.run_post_export = parse_bool(key, value)?,
			SettingKey::PostExportWorkingDir => self.post_export_working_dir = value.to_string(),
			SettingKey::PostExportConfigPath => self.post_export_config_path = value.to_string(),
			SettingKey::PrettyPrint => self.pretty_print = parse_bool(key, value)?,
		}
		Ok(())
	}
}

/// Reduces an output root to plain vault-relative segments: `./out/` becomes `out`.
fn normalize_output_root(value: &str) -> Result<String> {
	let mut segments = Vec::new();
	for segment in value.trim().split('/') {
		match segment {
			"" | "." => {}
			".." => bail!("output_root must stay inside the vault, got '{}'", value),
			_ => segments.push(segment),
		}
	}

	if segments.is_empty() {
		bail!("output_root must name a folder inside the vault");
	}
	Ok(segments.join("/"))
}

fn parse_bool(key: SettingKey, value: &str) -> Result<bool> {
	match value.to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" => Ok(false),
		_ => bail!("{:?} expects true or false, got '{}'", key, value),
	}
}

/// Resolves the settings file, with an explicit path taking precedence over the vault default.
pub fn settings_path(vault_dir: &Path, explicit: Option<&Path>) -> PathBuf {
	explicit
		.map(Path::to_path_buf)
		.unwrap_or_else(|| vault_dir.join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[test]
	fn test_missing_file_gives_defaults() {
		let dir = TempDir::new().unwrap();
		let settings = ExportSettings::load(&dir.path().join("nope.toml")).unwrap();
		assert_eq!(settings, ExportSettings::default());
		assert_eq!(settings.output_root, "obs.html/export");
	}

	#[test]
	fn test_partial_file_merges_over_defaults() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("settings.toml");
		fs::write(&path, "run_post_export = true\n").unwrap();

		let settings = ExportSettings::load(&path).unwrap();
		assert!(settings.run_post_export);
		assert_eq!(settings.output_root, "obs.html/export");
		assert!(settings.pretty_print);
	}

	#[test]
	fn test_loaded_output_root_is_normalized() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("settings.toml");

		for (raw, expected) in [("out/", "out"), ("./out", "out"), ("/site//out/", "site/out")] {
			fs::write(&path, format!("output_root = \"{}\"\n", raw)).unwrap();
			assert_eq!(ExportSettings::load(&path).unwrap().output_root, expected);
		}
	}

	#[test]
	fn test_loaded_output_root_outside_vault_is_an_error() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("settings.toml");

		fs::write(&path, "output_root = \"../out\"\n").unwrap();
		assert!(ExportSettings::load(&path).is_err());
		fs::write(&path, "output_root = \"./\"\n").unwrap();
		assert!(ExportSettings::load(&path).is_err());
	}

	#[test]
	fn test_malformed_file_is_an_error() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("settings.toml");
		fs::write(&path, "output_root = [").unwrap();
		assert!(ExportSettings::load(&path).is_err());
	}

	#[test]
	fn test_set_and_save_round_trip() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("nested/settings.toml");

		let mut settings = ExportSettings::default();
		settings.set(SettingKey::OutputRoot, "/site/out/").unwrap();
		settings.set(SettingKey::RunPostExport, "yes").unwrap();
		settings.save(&path).unwrap();

		let loaded = ExportSettings::load(&path).unwrap();
		assert_eq!(loaded.output_root, "site/out");
		assert!(loaded.run_post_export);
	}

	#[test]
	fn test_set_rejects_bad_values() {
		let mut settings = ExportSettings::default();
		assert!(settings.set(SettingKey::PrettyPrint, "maybe").is_err());
		assert!(settings.set(SettingKey::OutputRoot, "/").is_err());
		assert_eq!(settings, ExportSettings::default());
	}

	#[test]
	fn test_settings_path_precedence() {
		let vault = Path::new("/vault");
		assert_eq!(
			settings_path(vault, None),
			PathBuf::from("/vault/.vaultpress.toml")
		);
		assert_eq!(
			settings_path(vault, Some(Path::new("/etc/vp.toml"))),
			PathBuf::from("/etc/vp.toml")
		);
	}
}
