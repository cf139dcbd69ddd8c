use anyhow::Result;
use log::{debug, warn};
use std::collections::HashSet;
use std::time::Duration;

use crate::config::ExportSettings;
use crate::notice::Notifier;
use crate::paths::{export_path, segment_prefix_match};
use crate::poll::{poll_until_ready, Readiness, RetryPolicy};
use crate::pretty;
use crate::render::{RenderSurface, ViewMode};
use crate::shell::{self, Outcome};
use crate::vault::{overwrite, Document, Vault};

/// What a batch export did.
#[derive(Debug, Default)]
pub struct ExportReport {
	/// Vault paths of the HTML files written.
	pub exported: Vec<String>,
	/// Documents inside the output root.
	pub skipped: Vec<String>,
	/// Documents whose render never produced any HTML.
	pub empty: Vec<String>,
	pub post_export: Option<Outcome>,
}

/// Drives a render surface over vault documents and writes the HTML back into the vault.
pub struct Exporter<'a, V, S, N> {
	vault: &'a V,
	surface: &'a S,
	notifier: &'a N,
	policy: RetryPolicy,
}

impl<'a, V, S, N> Exporter<'a, V, S, N>
where
	V: Vault,
	S: RenderSurface,
	N: Notifier,
{
	pub fn new(vault: &'a V, surface: &'a S, notifier: &'a N, policy: RetryPolicy) -> Self {
		Self {
			vault,
			surface,
			notifier,
			policy,
		}
	}

	/// Exports every document, one at a time, then optionally runs the site generator.
	///
	/// The surface's view state is restored afterwards even when a write fails.
	pub async fn export_all(
		&self,
		documents: &[Document],
		settings: &ExportSettings,
	) -> Result<ExportReport> {
		let original = self.surface.view_state();
		self.notifier
			.flash("Exporting files, hang on...", Some(Duration::from_secs(5)));

		let mut report = ExportReport::default();
		let result = self.export_documents(documents, settings, &mut report).await;

		self.surface.set_view_state(original).await;
		result?;

		self.notifier.flash("Export done", None);

		if settings.run_post_export {
			report.post_export = Some(shell::run_post_export(settings, self.notifier).await?);
		}

		Ok(report)
	}

	async fn export_documents(
		&self,
		documents: &[Document],
		settings: &ExportSettings,
		report: &mut ExportReport,
	) -> Result<()> {
		let mut written = HashSet::new();

		for document in documents {
			debug!("------------ {}", document.path);

			if segment_prefix_match(&settings.output_root, &document.path) {
				debug!("\tskipped");
				report.skipped.push(document.path.clone());
				continue;
			}

			let html = match self.render(&document.path).await {
				Readiness::Ready(html) => html,
				Readiness::TimedOut => {
					self.notifier.flash(
						&format!("Error: returned html is empty for {}", document.path),
						None,
					);
					report.empty.push(document.path.clone());
					String::new()
				}
			};
			let html = if settings.pretty_print {
				pretty::format_html(&html)
			} else {
				html
			};

			let target = export_path(&settings.output_root, &document.path);
			if !written.insert(target.clone()) {
				warn!("{} was already written in this export, overwriting", target);
			}
			overwrite(self.vault, &target, html.as_bytes()).await?;
			report.exported.push(target);
		}

		Ok(())
	}

	async fn render(&self, path: &str) -> Readiness {
		self.surface.open(path).await;
		let mut state = self.surface.view_state();
		state.mode = ViewMode::Preview;
		self.surface.set_view_state(state).await;

		let surface = self.surface;
		poll_until_ready(&self.policy, || surface.rendered_html()).await
	}
}
