use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Transient user-facing messages.
pub trait Notifier {
	fn flash(&self, message: &str, timeout: Option<Duration>);
}

/// Writes notices to stderr; the timeout has no meaning on a terminal.
pub struct ConsoleNotifier<W: Write = io::Stderr> {
	prefix: &'static str,
	out: Mutex<W>,
}

impl ConsoleNotifier {
	pub fn new() -> Self {
		Self::with_writer(io::stderr())
	}
}

impl<W: Write> ConsoleNotifier<W> {
	pub fn with_writer(out: W) -> Self {
		Self {
			prefix: "[vaultpress]",
			out: Mutex::new(out),
		}
	}
}

impl Default for ConsoleNotifier {
	fn default() -> Self {
		Self::new()
	}
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
	fn flash(&self, message: &str, _timeout: Option<Duration>) {
		let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
		let _ = writeln!(out, "{} {}", self.prefix, message);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_flash_writes_each_notice_once() {
		let notifier = ConsoleNotifier::with_writer(Vec::new());
		notifier.flash("Export done", None);
		notifier.flash("Running ObsidianHtml --> done!", Some(Duration::from_secs(5)));

		let written = String::from_utf8(notifier.out.into_inner().unwrap()).unwrap();
		assert_eq!(
			written,
			"[vaultpress] Export done\n[vaultpress] Running ObsidianHtml --> done!\n"
		);
	}
}
