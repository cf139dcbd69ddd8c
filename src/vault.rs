//! Vault access: enumerating documents and writing entries by vault path.

use log::debug;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::paths;

/// Errors raised by vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
	#[error("invalid vault path: {path}")]
	InvalidPath { path: String },

	#[error("not a folder: {path}")]
	NotAFolder { path: String },

	#[error("I/O error for {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to walk vault: {0}")]
	Walk(#[from] walkdir::Error),
}

/// A vault entry, identified by its slash-delimited path relative to the vault root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	pub path: String,
}

impl Document {
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	File,
	Folder,
}

/// Document store the exporter reads from and writes into.
pub trait Vault {
	/// Absolute location of the vault on disk, used in user-facing messages.
	fn base_path(&self) -> &Path;

	/// Every markdown document, in enumeration order.
	fn markdown_files(&self) -> Result<Vec<Document>, VaultError>;

	/// Every file regardless of type, in enumeration order.
	fn files(&self) -> Result<Vec<Document>, VaultError>;

	async fn entry(&self, path: &str) -> Result<Option<EntryKind>, VaultError>;

	async fn create_folder(&self, path: &str) -> Result<(), VaultError>;

	async fn create(&self, path: &str, data: &[u8]) -> Result<(), VaultError>;

	async fn delete(&self, path: &str) -> Result<(), VaultError>;
}

/// Replaces whatever lives at `path` with a fresh file holding `data`.
///
/// Missing ancestor folders are created one level at a time, so the final
/// state is the same no matter how often this runs.
pub async fn overwrite<V: Vault>(vault: &V, path: &str, data: &[u8]) -> Result<(), VaultError> {
	for folder in paths::ancestors(path) {
		match vault.entry(folder).await? {
			Some(EntryKind::Folder) => {}
			Some(EntryKind::File) => {
				return Err(VaultError::NotAFolder {
					path: folder.to_string(),
				})
			}
			None => {
				debug!("Folder {} does not yet exist, creating (parent of {})", folder, path);
				vault.create_folder(folder).await?;
			}
		}
	}

	if vault.entry(path).await?.is_some() {
		vault.delete(path).await?;
	}

	vault.create(path, data).await
}

/// Vault backed by a directory on the local file system.
///
/// Entries whose name starts with a dot are invisible to enumeration.
pub struct FsVault {
	root: PathBuf,
}

impl FsVault {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		let root = root.into();
		let root = std::fs::canonicalize(&root).unwrap_or(root);
		Self { root }
	}

	fn resolve(&self, path: &str) -> Result<PathBuf, VaultError> {
		let relative = Path::new(path);
		let valid = !path.is_empty()
			&& relative
				.components()
				.all(|c| matches!(c, Component::Normal(_)));

		if !valid {
			return Err(VaultError::InvalidPath {
				path: path.to_string(),
			});
		}

		Ok(path.split('/').fold(self.root.clone(), |acc, part| acc.join(part)))
	}

	fn collect(&self, keep: impl Fn(&Path) -> bool) -> Result<Vec<Document>, VaultError> {
		let mut documents = Vec::new();

		let walker = WalkDir::new(&self.root)
			.sort_by_file_name()
			.into_iter()
			.filter_entry(|e| e.depth() == 0 || !is_hidden(e));

		for entry in walker {
			let entry = entry?;
			if !entry.file_type().is_file() || !keep(entry.path()) {
				continue;
			}

			let Ok(relative) = entry.path().strip_prefix(&self.root) else {
				continue;
			};

			let path = relative
				.components()
				.map(|c| c.as_os_str().to_string_lossy())
				.collect::<Vec<_>>()
				.join("/");
			documents.push(Document::new(path));
		}

		Ok(documents)
	}
}

fn is_hidden(entry: &DirEntry) -> bool {
	entry.file_name().to_string_lossy().starts_with('.')
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> VaultError + '_ {
	move |source| VaultError::Io {
		path: path.to_path_buf(),
		source,
	}
}

impl Vault for FsVault {
	fn base_path(&self) -> &Path {
		&self.root
	}

	fn markdown_files(&self) -> Result<Vec<Document>, VaultError> {
		self.collect(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
	}

	fn files(&self) -> Result<Vec<Document>, VaultError> {
		self.collect(|_| true)
	}

	async fn entry(&self, path: &str) -> Result<Option<EntryKind>, VaultError> {
		let full = self.resolve(path)?;
		match tokio::fs::metadata(&full).await {
			Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Folder)),
			Ok(_) => Ok(Some(EntryKind::File)),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(io_error(&full)(e)),
		}
	}

	async fn create_folder(&self, path: &str) -> Result<(), VaultError> {
		let full = self.resolve(path)?;
		tokio::fs::create_dir(&full).await.map_err(io_error(&full))
	}

	async fn create(&self, path: &str, data: &[u8]) -> Result<(), VaultError> {
		let full = self.resolve(path)?;
		tokio::fs::write(&full, data).await.map_err(io_error(&full))
	}

	async fn delete(&self, path: &str) -> Result<(), VaultError> {
		let full = self.resolve(path)?;
		match self.entry(path).await? {
			Some(EntryKind::Folder) => tokio::fs::remove_dir_all(&full).await.map_err(io_error(&full)),
			Some(EntryKind::File) => tokio::fs::remove_file(&full).await.map_err(io_error(&full)),
			None => Ok(()),
		}
	}
}
