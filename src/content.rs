use regex::Regex;
use std::sync::LazyLock;

static WIKI_LINK: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").expect("wiki link pattern is valid")
});

/// Renders a vault document's markdown source to an HTML fragment.
pub fn render_markdown(source: &str) -> String {
	let (_, body) = split_frontmatter(source);
	let linked = link_wiki_references(body);
	markdown_to_html(&linked)
}

/// Splits leading YAML (`---`) or TOML (`+++`) frontmatter from the body.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
	for fence in ["---", "+++"] {
		let opening = format!("{fence}\n");
		let closing = format!("\n{fence}\n");

		if let Some(rest) = content.strip_prefix(opening.as_str()) {
			if let Some(end) = rest.find(closing.as_str()) {
				return (Some(&rest[..end]), &rest[end + closing.len()..]);
			}
			if let Some(front) = rest.strip_suffix(&format!("\n{fence}")) {
				return (Some(front), "");
			}
		}
	}

	(None, content)
}

/// Turns `[[target]]` and `[[target|alias]]` into markdown links that point at
/// the exported HTML of the target note.
pub fn link_wiki_references(content: &str) -> String {
	WIKI_LINK
		.replace_all(content, |caps: &regex::Captures| {
			let target = caps[1].trim();
			let label = caps.get(2).map(|m| m.as_str().trim()).unwrap_or(target);
			format!("[{}](<{}>)", label, link_target(target))
		})
		.into_owned()
}

fn link_target(target: &str) -> String {
	let (page, anchor) = match target.split_once('#') {
		Some((page, heading)) => (page, Some(heading)),
		None => (target, None),
	};

	let file_name = page.rsplit('/').next().unwrap_or(page);
	let href = match file_name.rsplit_once('.') {
		Some((_, "md")) => format!("{page}.html"),
		Some(_) => page.to_string(),
		None => format!("{page}.md.html"),
	};

	match anchor {
		Some(heading) => format!("{}#{}", href, heading.to_lowercase().replace(' ', "-")),
		None => href,
	}
}

fn markdown_to_html(markdown: &str) -> String {
	use pulldown_cmark::{html, Options, Parser};

	let mut options = Options::empty();
	options.insert(Options::ENABLE_STRIKETHROUGH);
	options.insert(Options::ENABLE_TABLES);
	options.insert(Options::ENABLE_TASKLISTS);
	options.insert(Options::ENABLE_FOOTNOTES);
	options.insert(Options::ENABLE_SMART_PUNCTUATION);

	let parser = Parser::new_ext(markdown, options);
	let mut html_output = String::new();
	html::push_html(&mut html_output, parser);

	html_output
}
