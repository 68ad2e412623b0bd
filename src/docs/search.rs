//! Documentation search.
//!
//! Case-insensitive substring search over the markdown content files behind
//! the documented sections. Unreadable files are skipped, never fatal.

use std::path::Path;

use crate::docs::markdown;

/// Queries shorter than this return no results.
pub const MIN_QUERY_LEN: usize = 2;

/// Context window, in characters, on each side of the first match.
const SNIPPET_RADIUS: usize = 50;

#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchHit {
    pub section: String,
    pub page: String,
    pub title: String,
    pub snippet: String,
}

/// Scan every allow-listed page for `query`.
///
/// A page matches when its title or content contains the query,
/// case-insensitively. Hits carry a snippet of the surrounding text.
pub fn search_docs(docs_dir: &Path, query: &str) -> Vec<SearchHit> {
    let query = query.trim().to_lowercase();
    if query.len() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for (section, pages) in super::SECTIONS {
        for page in *pages {
            let path = docs_dir.join(section).join(format!("{page}.md"));
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable page");
                    continue;
                }
            };

            let title = markdown::extract_metadata(&content)
                .title
                .unwrap_or_else(|| super::title_case(page));

            let content_lower = content.to_lowercase();
            let content_match = content_lower.find(&query);
            if content_match.is_none() && !title.to_lowercase().contains(&query) {
                continue;
            }

            let snippet = match content_match {
                Some(at) => snippet_around(&content, at, query.len()),
                None => snippet_around(&content, 0, 0),
            };

            hits.push(SearchHit {
                section: (*section).to_string(),
                page: (*page).to_string(),
                title,
                snippet,
            });
        }
    }

    hits
}

/// Cut a window of text around a byte offset, respecting char boundaries
/// and marking truncation with ellipses.
fn snippet_around(content: &str, at: usize, match_len: usize) -> String {
    let mut start = at.saturating_sub(SNIPPET_RADIUS);
    while start > 0 && !content.is_char_boundary(start) {
        start -= 1;
    }

    let mut end = (at + match_len + SNIPPET_RADIUS).min(content.len());
    while end < content.len() && !content.is_char_boundary(end) {
        end += 1;
    }

    let mut snippet = content[start..end].replace('\n', " ");
    if start > 0 {
        snippet = format!("...{snippet}");
    }
    if end < content.len() {
        snippet = format!("{snippet}...");
    }
    snippet
}
