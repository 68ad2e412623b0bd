//! Markdown rendering for the documentation site.
//!
//! Renders page source to HTML with ids injected on headings, extracts
//! title/description metadata, and builds a table of contents from the
//! h2/h3 headings.

use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// One table-of-contents entry (h2 or h3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// A rendered page: HTML body plus its heading outline.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Title and lead paragraph pulled from page source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Render markdown source to HTML. Headings get slug ids so the table of
/// contents can anchor to them.
pub fn render(source: &str) -> RenderedPage {
    // First pass: collect heading text in document order.
    let mut headings: Vec<(u8, String)> = Vec::new();
    {
        let mut current: Option<(u8, String)> = None;
        for event in Parser::new_ext(source, parser_options()) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current = Some((heading_depth(level), String::new()));
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push_str(&text);
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(heading) = current.take() {
                        headings.push(heading);
                    }
                }
                _ => {}
            }
        }
    }

    // Second pass: emit HTML with slug ids injected into the headings.
    let mut index = 0;
    let events = Parser::new_ext(source, parser_options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id: None,
            classes,
            attrs,
        }) => {
            let slug = headings
                .get(index)
                .map(|(_, text)| slugify(text))
                .unwrap_or_default();
            index += 1;
            Event::Start(Tag::Heading {
                level,
                id: Some(slug.into()),
                classes,
                attrs,
            })
        }
        Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) => {
            // Explicit id in the source wins.
            index += 1;
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            })
        }
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, events);

    let toc = headings
        .iter()
        .filter(|(level, _)| (2..=3).contains(level))
        .map(|(level, text)| TocEntry {
            level: *level,
            id: slugify(text),
            text: text.clone(),
        })
        .collect();

    RenderedPage { html: out, toc }
}

/// Render the table of contents, or an empty string when there is nothing
/// to outline.
pub fn toc_html(toc: &[TocEntry]) -> String {
    if toc.is_empty() {
        return String::new();
    }

    let mut out = String::from("<div class=\"toc-container\"><h4>Table of Contents</h4><ul class=\"toc\">");
    for entry in toc {
        let indent = if entry.level == 3 { " class=\"toc-indent\"" } else { "" };
        out.push_str(&format!(
            "<li{indent}><a href=\"#{}\">{}</a></li>",
            entry.id, entry.text
        ));
    }
    out.push_str("</ul></div>");
    out
}

/// Extract the title (first `#` heading) and description (first paragraph
/// after it) from page source.
pub fn extract_metadata(source: &str) -> PageMeta {
    let mut meta = PageMeta::default();
    let mut lines = source.lines();

    for line in lines.by_ref() {
        if let Some(title) = line.strip_prefix("# ") {
            meta.title = Some(title.trim().to_string());
            break;
        }
    }

    if meta.title.is_some() {
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            meta.description = Some(line.to_string());
            break;
        }
    }

    meta
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Lowercase, alphanumerics kept, everything else collapsed to hyphens.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
