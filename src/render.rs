//! The rendering surface: a single shared view that turns the open document
//! into HTML in the background.

use log::{debug, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::content;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
	#[default]
	Source,
	Preview,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
	/// Vault path of the open document.
	pub path: Option<String>,
	pub mode: ViewMode,
}

/// A view that can display one document at a time and expose its rendered HTML.
///
/// Rendering may finish after `set_view_state` returns; callers observe
/// progress only through `rendered_html`.
pub trait RenderSurface {
	fn view_state(&self) -> ViewState;

	async fn set_view_state(&self, state: ViewState);

	async fn open(&self, path: &str);

	/// HTML rendered so far for the open document, empty until ready.
	fn rendered_html(&self) -> String;
}

#[derive(Default)]
struct Pane {
	state: ViewState,
	generation: u64,
	html: String,
}

/// Offscreen preview pane that renders vault documents with pulldown-cmark.
pub struct PreviewSurface {
	root: PathBuf,
	pane: Arc<Mutex<Pane>>,
}

impl PreviewSurface {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			pane: Arc::new(Mutex::new(Pane::default())),
		}
	}

	fn lock(&self) -> MutexGuard<'_, Pane> {
		lock_pane(&self.pane)
	}

	/// Drops stale output and, in preview mode, starts rendering the open document.
	fn refresh(&self) {
		let (generation, path) = {
			let mut pane = self.lock();
			pane.generation += 1;
			pane.html.clear();
			match (&pane.state.path, pane.state.mode) {
				(Some(path), ViewMode::Preview) => (pane.generation, path.clone()),
				_ => return,
			}
		};

		let file = path.split('/').fold(self.root.clone(), |acc, part| acc.join(part));
		let pane = Arc::clone(&self.pane);

		tokio::spawn(async move {
			let source = match tokio::fs::read_to_string(&file).await {
				Ok(source) => source,
				Err(e) => {
					warn!("Failed to read {}: {}", file.display(), e);
					return;
				}
			};
			let html = content::render_markdown(&source);

			let mut pane = lock_pane(&pane);
			if pane.generation == generation {
				pane.html = html;
			} else {
				debug!("discarding stale render of {}", path);
			}
		});
	}
}

fn lock_pane(pane: &Mutex<Pane>) -> MutexGuard<'_, Pane> {
	pane.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RenderSurface for PreviewSurface {
	fn view_state(&self) -> ViewState {
		self.lock().state.clone()
	}

	async fn set_view_state(&self, state: ViewState) {
		self.lock().state = state;
		self.refresh();
	}

	async fn open(&self, path: &str) {
		self.lock().state.path = Some(path.to_string());
		self.refresh();
	}

	fn rendered_html(&self) -> String {
		self.lock().html.clone()
	}
}
