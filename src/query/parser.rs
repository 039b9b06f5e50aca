use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;

/// The two halves a query string splits into: loose terms to be OR'd and
/// quoted phrases that must match adjacently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub terms: Vec<String>,
    pub phrases: Vec<Vec<String>>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.phrases.is_empty()
    }
}

/// Splits a raw query string into free terms and quoted phrases, each
/// tokenized with the normalization a document was indexed with.
pub struct QueryParser {
    term_analyzer: Analyzer,
    phrase_analyzer: Analyzer,
}

impl QueryParser {
    pub fn new(config: &Config) -> Self {
        QueryParser {
            term_analyzer: Analyzer::from_config(config),
            phrase_analyzer: Analyzer::from_config_for_phrase(config),
        }
    }

    /// Extracts every complete `"..."` span as a phrase, tokenizes the
    /// remainder as free terms. An opening quote with no matching close is
    /// left untouched in the free-text remainder.
    pub fn parse(&self, query: &str) -> ParsedQuery {
        let mut phrases = Vec::new();
        let mut remainder = String::with_capacity(query.len());
        let mut chars = query.char_indices().peekable();
        let mut cursor = 0usize;

        while let Some((start, c)) = chars.next() {
            if c != '"' {
                continue;
            }

            if let Some(end) = query[start + 1..].find('"') {
                let close = start + 1 + end;
                remainder.push_str(&query[cursor..start]);
                let phrase_text = &query[start + 1..close];

                let phrase_tokens: Vec<String> = self
                    .phrase_analyzer
                    .analyze(phrase_text)
                    .into_iter()
                    .map(|t| t.text)
                    .collect();
                if !phrase_tokens.is_empty() {
                    phrases.push(phrase_tokens);
                }

                cursor = close + 1;
                while let Some(&(idx, _)) = chars.peek() {
                    if idx < cursor {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
        }
        remainder.push_str(&query[cursor..]);

        let terms: Vec<String> = self
            .term_analyzer
            .analyze(&remainder)
            .into_iter()
            .map(|t| t.text)
            .collect();

        ParsedQuery { terms, phrases }
    }
}

/// True if `positions` contains at least one ascending run of `len`
/// consecutive integers with step 1. `positions` need not be sorted
/// on entry; sorting is part of the check.
pub fn is_exact_match(positions: &[u32], len: usize) -> bool {
    if len == 0 {
        return true;
    }
    if positions.len() < len {
        return false;
    }

    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut run = 1usize;
    for window in sorted.windows(2) {
        if window[1] == window[0] + 1 {
            run += 1;
            if run >= len {
                return true;
            }
        } else {
            run = 1;
        }
    }

    len == 1 && !sorted.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_phrase_and_free_terms() {
        let parser = QueryParser::new(&Config::default());
        let parsed = parser.parse(r#"breaking "state of the union" news"#);
        assert_eq!(parsed.terms, vec!["breaking", "news"]);
        assert_eq!(parsed.phrases, vec![vec!["state", "of", "the", "union"]]);
    }

    #[test]
    fn unbalanced_quote_is_treated_as_literal() {
        let parser = QueryParser::new(&Config::default());
        let parsed = parser.parse(r#"say "hello"#);
        assert!(parsed.phrases.is_empty());
        assert_eq!(parsed.terms, vec!["say", "hello"]);
    }

    #[test]
    fn empty_phrase_is_discarded() {
        let parser = QueryParser::new(&Config::default());
        let parsed = parser.parse(r#"news "" today"#);
        assert!(parsed.phrases.is_empty());
        assert_eq!(parsed.terms, vec!["news", "today"]);
    }

    #[test]
    fn exact_match_finds_consecutive_run() {
        assert!(is_exact_match(&[5, 9, 10, 11, 20], 3));
        assert!(!is_exact_match(&[5, 9, 12, 20], 3));
    }
}
