use std::collections::HashMap;

use crate::core::config::Config;
use crate::core::types::DocId;

const UNAVAILABLE_TEXT: &str = "document text unavailable";

/// Source of raw document text for snippet extraction. Kept separate from
/// `IndexStore`, which only retains `|d|` after indexing.
pub trait DocumentSource: Send + Sync {
    fn get(&self, doc_id: &DocId) -> Option<String>;
}

impl DocumentSource for HashMap<DocId, String> {
    fn get(&self, doc_id: &DocId) -> Option<String> {
        HashMap::get(self, doc_id).cloned()
    }
}

/// Query-focused context extraction over raw document text. Shares
/// the positional index's case-folding semantics but matches on raw byte
/// offsets rather than tokenized positions.
pub struct SnippetGenerator<'a> {
    source: &'a dyn DocumentSource,
    context_size: usize,
    max_snippet_length: usize,
}

impl<'a> SnippetGenerator<'a> {
    pub fn new(source: &'a dyn DocumentSource, config: &Config) -> Self {
        SnippetGenerator {
            source,
            context_size: config.context_size,
            max_snippet_length: config.max_snippet_length,
        }
    }

    /// Builds a context window around the first cluster of query-term hits
    /// in `doc_id`'s text. Case is preserved in the returned text; matching
    /// is case-folded.
    pub fn snippet(&self, doc_id: &DocId, query_terms: &[String]) -> String {
        let text = match self.source.get(doc_id) {
            Some(t) => t,
            None => return UNAVAILABLE_TEXT.to_string(),
        };

        let text_lower = text.to_lowercase();
        let terms_lower: Vec<String> = query_terms.iter().map(|t| t.to_lowercase()).collect();

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for term in &terms_lower {
            if term.is_empty() {
                continue;
            }
            let mut start = 0usize;
            while let Some(found) = text_lower[start..].find(term.as_str()) {
                let abs_start = start + found;
                ranges.push((abs_start, abs_start + term.len()));
                start = abs_start + 1;
                if start >= text_lower.len() {
                    break;
                }
            }
        }

        if ranges.is_empty() {
            return truncate_with_ellipsis(&text, self.max_snippet_length);
        }

        ranges.sort_unstable();
        let merged = merge_ranges(&ranges, self.context_size);

        let (mut start, mut end) = merged[0];
        start = start.saturating_sub(self.context_size);
        end = (end + self.context_size).min(text.len());

        if end - start > self.max_snippet_length {
            let half = self.max_snippet_length / 2;
            let center = (merged[0].0 + merged[0].1) / 2;
            start = center.saturating_sub(half);
            end = (start + self.max_snippet_length).min(text.len());
        }

        let start = floor_char_boundary(&text, start);
        let end = ceil_char_boundary(&text, end);

        let mut snippet = text[start..end].to_string();
        if start > 0 {
            snippet = format!("...{}", snippet);
        }
        if end < text.len() {
            snippet.push_str("...");
        }
        snippet
    }

    /// Wraps each case-insensitive term occurrence in `<b>…</b>`. Terms are
    /// claimed longest-first so a short term can't carve up a longer match
    /// it's a substring of: once a span is claimed by a term, later
    /// (shorter) terms skip any occurrence overlapping it.
    pub fn highlight(&self, snippet: &str, query_terms: &[String]) -> String {
        let mut terms: Vec<&String> = query_terms.iter().filter(|t| !t.is_empty()).collect();
        terms.sort_by_key(|t| std::cmp::Reverse(t.len()));

        let lower = snippet.to_lowercase();
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        for term in terms {
            let term_lower = term.to_lowercase();
            let mut cursor = 0usize;
            while let Some(found) = lower[cursor..].find(term_lower.as_str()) {
                let start = cursor + found;
                let end = start + term.len();
                cursor = start + 1;
                if claimed.iter().any(|&(s, e)| start < e && s < end) {
                    continue;
                }
                claimed.push((start, end));
            }
        }

        claimed.sort_unstable();

        let mut out = String::with_capacity(snippet.len());
        let mut cursor = 0usize;
        for (start, end) in claimed {
            out.push_str(&snippet[cursor..start]);
            out.push_str("<b>");
            out.push_str(&snippet[start..end]);
            out.push_str("</b>");
            cursor = end;
        }
        out.push_str(&snippet[cursor..]);
        out
    }
}

fn merge_ranges(ranges: &[(usize, usize)], context_size: usize) -> Vec<(usize, usize)> {
    let mut merged = Vec::new();
    let (mut cur_start, mut cur_end) = ranges[0];

    for &(start, end) in &ranges[1..] {
        if start <= cur_end + context_size {
            cur_end = cur_end.max(end);
        } else {
            merged.push((cur_start, cur_end));
            cur_start = start;
            cur_end = end;
        }
    }
    merged.push((cur_start, cur_end));
    merged
}

fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    let end = ceil_char_boundary(text, max_len.min(text.len()));
    format!("{}...", &text[..end])
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> HashMap<DocId, String> {
        pairs
            .iter()
            .map(|(id, text)| (DocId::new(*id), text.to_string()))
            .collect()
    }

    #[test]
    fn merges_nearby_hits_and_adds_ellipses() {
        let mut config = Config::default();
        config.context_size = 10;
        config.max_snippet_length = 250;
        let docs = source(&[(
            "d1",
            "A long prefix padding out this sentence. The hurricane george struck the coast today, more text follows after that to pad the tail end out long enough.",
        )]);
        let gen = SnippetGenerator::new(&docs, &config);
        let snippet = gen.snippet(&DocId::new("d1"), &["hurricane".to_string(), "george".to_string()]);
        assert!(snippet.contains("hurricane george"));
        assert!(snippet.starts_with("..."));
    }

    #[test]
    fn returns_prefix_when_no_match() {
        let config = Config::default();
        let docs = source(&[("d1", "nothing relevant here at all")]);
        let gen = SnippetGenerator::new(&docs, &config);
        let snippet = gen.snippet(&DocId::new("d1"), &["zebra".to_string()]);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn missing_document_yields_placeholder() {
        let config = Config::default();
        let docs: HashMap<DocId, String> = HashMap::new();
        let gen = SnippetGenerator::new(&docs, &config);
        let snippet = gen.snippet(&DocId::new("missing"), &["term".to_string()]);
        assert_eq!(snippet, UNAVAILABLE_TEXT);
    }

    #[test]
    fn highlight_wraps_terms_longest_first() {
        let config = Config::default();
        let docs: HashMap<DocId, String> = HashMap::new();
        let gen = SnippetGenerator::new(&docs, &config);
        let highlighted = gen.highlight("the new york times", &["new york".to_string(), "new".to_string()]);
        assert_eq!(highlighted, "the <b>new york</b> times");
    }
}
