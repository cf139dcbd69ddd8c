use anyhow::Result;
use log::debug;
use serde::Serialize;

use crate::config::ExportSettings;
use crate::notice::Notifier;
use crate::vault::{overwrite, Vault};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
	Markdown,
	All,
}

impl ListKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ListKind::Markdown => "markdown",
			ListKind::All => "all",
		}
	}
}

/// Writes the vault paths of `kind` as a JSON array to `<output_root>/<kind>_files.json`.
///
/// Returns the vault path of the written list.
pub async fn dump_file_list<V: Vault, N: Notifier>(
	vault: &V,
	settings: &ExportSettings,
	kind: ListKind,
	notifier: &N,
) -> Result<String> {
	let files = match kind {
		ListKind::Markdown => vault.markdown_files()?,
		ListKind::All => vault.files()?,
	};

	let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
	for path in &paths {
		debug!("{}", path);
	}

	let export_path = format!("{}/{}_files.json", settings.output_root, kind.as_str());
	overwrite(vault, &export_path, &to_json(&paths)?).await?;

	notifier.flash(
		&format!(
			"Wrote list of {} files to {}/{}",
			kind.as_str(),
			vault.base_path().display(),
			export_path
		),
		None,
	);

	Ok(export_path)
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
	let mut buf = Vec::new();
	let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
	let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
	value.serialize(&mut serializer)?;
	Ok(buf)
}
