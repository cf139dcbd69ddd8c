//! Whitespace-only reformatting of rendered HTML.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"<!--[\s\S]*?-->|<[^>]+>").expect("tag pattern is valid"));

const BLOCK_TAGS: &[&str] = &[
	"address", "article", "aside", "blockquote", "body", "dd", "details", "div", "dl", "dt",
	"figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hr",
	"html", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tbody", "td",
	"tfoot", "th", "thead", "tr", "ul",
];

const VOID_TAGS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// Elements whose contents are copied byte for byte.
const VERBATIM_TAGS: &[&str] = &["pre", "script", "style", "textarea"];

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
	Start,
	Text,
	Inline,
	BlockOpen,
	BlockClose,
}

struct Tag<'a> {
	name: String,
	closing: bool,
	raw: &'a str,
}

impl<'a> Tag<'a> {
	fn parse(raw: &'a str) -> Self {
		let inner = raw.trim_start_matches('<');
		let closing = inner.starts_with('/');
		let name = inner
			.trim_start_matches('/')
			.split(|c: char| c.is_whitespace() || c == '>' || c == '/')
			.next()
			.unwrap_or_default()
			.to_ascii_lowercase();
		Self { name, closing, raw }
	}

	fn is_block(&self) -> bool {
		BLOCK_TAGS.contains(&self.name.as_str())
	}

	fn is_verbatim(&self) -> bool {
		VERBATIM_TAGS.contains(&self.name.as_str())
	}

	fn is_void(&self) -> bool {
		VOID_TAGS.contains(&self.name.as_str()) || self.raw.ends_with("/>")
	}
}

struct Formatter {
	out: String,
	depth: usize,
	/// Open verbatim element and how deeply it nests (only `pre` can nest).
	verbatim: Option<(String, usize)>,
	last: Token,
}

impl Formatter {
	fn new(capacity: usize) -> Self {
		Self {
			out: String::with_capacity(capacity),
			depth: 0,
			verbatim: None,
			last: Token::Start,
		}
	}

	fn break_line(&mut self) {
		if self.out.is_empty() {
			return;
		}
		self.out.truncate(self.out.trim_end().len());
		self.out.push('\n');
		for _ in 0..self.depth {
			self.out.push_str(INDENT);
		}
	}

	fn text(&mut self, text: &str) {
		if text.is_empty() {
			return;
		}
		if self.verbatim.is_some() {
			self.out.push_str(text);
			return;
		}
		let after_block = matches!(self.last, Token::Start | Token::BlockOpen | Token::BlockClose);
		if after_block {
			let trimmed = text.trim_start();
			if trimmed.is_empty() {
				return;
			}
			self.out.push_str(trimmed);
		} else {
			self.out.push_str(text);
		}
		self.last = Token::Text;
	}

	fn tag(&mut self, tag: Tag<'_>) {
		if let Some((name, depth)) = self.verbatim.as_mut() {
			self.out.push_str(tag.raw);
			if tag.name != *name {
				return;
			}
			if !tag.closing {
				if tag.name == "pre" {
					*depth += 1;
				}
				return;
			}
			*depth -= 1;
			if *depth == 0 {
				self.last = if tag.name == "pre" {
					Token::BlockClose
				} else {
					Token::Inline
				};
				self.verbatim = None;
			}
			return;
		}

		if tag.is_verbatim() && !tag.closing && !tag.is_block() {
			self.out.push_str(tag.raw);
			self.verbatim = Some((tag.name, 1));
			return;
		}

		if !tag.is_block() {
			self.out.push_str(tag.raw);
			self.last = Token::Inline;
			return;
		}

		if tag.closing {
			self.depth = self.depth.saturating_sub(1);
			if self.last == Token::BlockClose {
				self.break_line();
			}
			self.out.push_str(tag.raw);
			self.last = Token::BlockClose;
			return;
		}

		self.break_line();
		self.out.push_str(tag.raw);
		if tag.is_verbatim() {
			self.verbatim = Some((tag.name, 1));
			return;
		}
		if tag.is_void() {
			self.last = Token::BlockClose;
		} else {
			self.depth += 1;
			self.last = Token::BlockOpen;
		}
	}

	fn finish(mut self) -> String {
		let trimmed = self.out.trim_end().len();
		self.out.truncate(trimmed);
		if !self.out.is_empty() {
			self.out.push('\n');
		}
		self.out
	}
}

/// Puts block-level elements on their own indented lines.
///
/// Inline runs and the contents of `<pre>`, `<script>`, `<style>` and
/// `<textarea>` are left untouched, so only whitespace
/// between block boundaries changes.
pub fn format_html(html: &str) -> String {
	let mut formatter = Formatter::new(html.len() + html.len() / 4);
	let mut cursor = 0;

	for found in TAG.find_iter(html) {
		formatter.text(&html[cursor..found.start()]);
		if found.as_str().starts_with("<!--") {
			formatter.out.push_str(found.as_str());
		} else {
			formatter.tag(Tag::parse(found.as_str()));
		}
		cursor = found.end();
	}
	formatter.text(&html[cursor..]);

	formatter.finish()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn squash(s: &str) -> String {
		s.chars().filter(|c| !c.is_whitespace()).collect()
	}

	#[test]
	fn test_empty_stays_empty() {
		assert_eq!(format_html(""), "");
		assert_eq!(format_html("  \n "), "");
	}

	#[test]
	fn test_nested_lists_are_indented() {
		let html = "<ul>\n<li>one</li>\n<li>two\n<ul>\n<li>inner</li>\n</ul>\n</li>\n</ul>\n";
		let expected = "<ul>\n  <li>one</li>\n  <li>two\n    <ul>\n      <li>inner</li>\n    </ul>\n  </li>\n</ul>\n";
		assert_eq!(format_html(html), expected);
	}

	#[test]
	fn test_inline_whitespace_is_preserved() {
		let html = "<p><em>a</em> <strong>b</strong> and  c</p>\n";
		assert_eq!(format_html(html), "<p><em>a</em> <strong>b</strong> and  c</p>\n");
	}

	#[test]
	fn test_pre_contents_are_untouched() {
		let html = "<h1>Code</h1>\n<pre><code>fn main() {\n    let x = 1;\n}\n</code></pre>\n<p>after</p>\n";
		let formatted = format_html(html);
		assert!(formatted.contains("<pre><code>fn main() {\n    let x = 1;\n}\n</code></pre>"));
		assert!(formatted.ends_with("</pre>\n<p>after</p>\n"));
	}

	#[test]
	fn test_script_style_and_textarea_are_untouched() {
		let html = "<div><script>if (a <b) {\n  x = \"<p>\";\n}\n  </script><style>\n  p > em { color: red }\n</style><p>x</p><textarea>\n  <div>keep</div>\n</textarea></div>";
		let formatted = format_html(html);

		assert!(formatted.contains("<script>if (a <b) {\n  x = \"<p>\";\n}\n  </script>"));
		assert!(formatted.contains("<style>\n  p > em { color: red }\n</style>"));
		assert!(formatted.contains("<textarea>\n  <div>keep</div>\n</textarea>"));
		assert!(formatted.contains("\n  <p>x</p>"));
		assert_eq!(squash(&formatted), squash(html));
	}

	#[test]
	fn test_only_whitespace_changes() {
		let html = "<h2>Title</h2><p>Text with <a href=\"x.html\">link</a>.</p><hr /><table><thead><tr><th>A</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table><!-- note -->";
		let formatted = format_html(html);
		assert_eq!(squash(&formatted), squash(html));
		assert!(formatted.contains("\n<hr />\n"));
		assert!(formatted.contains("\n    <tr>\n      <th>A</th>\n    </tr>"));
	}
}
