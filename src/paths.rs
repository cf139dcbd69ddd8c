/// Returns true when every `/`-separated segment of `root` matches the
/// corresponding leading segment of `path`.
///
/// `a/b` contains `a/b/c` but not `a/bc`.
pub fn segment_prefix_match(root: &str, path: &str) -> bool {
	let root_parts: Vec<&str> = root.split('/').collect();
	let path_parts: Vec<&str> = path.split('/').collect();

	if root_parts.len() > path_parts.len() {
		return false;
	}

	root_parts
		.iter()
		.zip(path_parts.iter())
		.all(|(r, p)| r == p)
}

/// Location of the rendered HTML for a vault document.
pub fn export_path(output_root: &str, document_path: &str) -> String {
	format!("{}/{}.html", output_root, document_path)
}

/// Folder part of a slash-delimited path, or `None` at the vault root.
pub fn parent(path: &str) -> Option<&str> {
	path.rsplit_once('/').map(|(folder, _)| folder).filter(|f| !f.is_empty())
}

/// Every ancestor folder of `path`, outermost first.
///
/// `out/notes/b.md.html` yields `out`, `out/notes`.
pub fn ancestors(path: &str) -> Vec<&str> {
	let Some(folder) = parent(path) else {
		return Vec::new();
	};

	folder
		.match_indices('/')
		.map(|(idx, _)| &folder[..idx])
		.filter(|prefix| !prefix.is_empty())
		.chain(std::iter::once(folder))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_segment_prefix_match_nested() {
		assert!(segment_prefix_match("a/b", "a/b/c"));
		assert!(segment_prefix_match("a/b", "a/b"));
		assert!(segment_prefix_match("out", "out/a.md"));
	}

	#[test]
	fn test_segment_prefix_match_rejects_partial_segment() {
		assert!(!segment_prefix_match("a/b", "a/bc"));
		assert!(!segment_prefix_match("out", "outline.md"));
	}

	#[test]
	fn test_segment_prefix_match_root_longer_than_path() {
		assert!(!segment_prefix_match("a/b/c", "a/b"));
	}

	#[test]
	fn test_export_path() {
		assert_eq!(export_path("out", "a.md"), "out/a.md.html");
		assert_eq!(export_path("out", "notes/b.md"), "out/notes/b.md.html");
	}

	#[test]
	fn test_parent() {
		assert_eq!(parent("a.md"), None);
		assert_eq!(parent("notes/b.md"), Some("notes"));
		assert_eq!(parent("x/y/z.md"), Some("x/y"));
	}

	#[test]
	fn test_ancestors() {
		assert!(ancestors("a.md").is_empty());
		assert_eq!(ancestors("out/a.md.html"), vec!["out"]);
		assert_eq!(
			ancestors("obs.html/export/notes/b.md.html"),
			vec!["obs.html", "obs.html/export", "obs.html/export/notes"]
		);
	}
}
