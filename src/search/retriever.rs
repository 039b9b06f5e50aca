use std::collections::HashSet;

use crate::core::config::Config;
use crate::core::types::DocId;
use crate::index::store::IndexStore;
use crate::query::parser::QueryParser;
use crate::scoring::scorer::Scorer;
use crate::search::snippet::SnippetGenerator;

/// One ranked result: a candidate document, its score, and (if a
/// `SnippetGenerator` was supplied) a query-focused excerpt.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
    pub snippet: Option<String>,
}

/// Candidate union, scoring, and top-k selection. Owns a
/// `QueryParser` and a `Scorer`; reads through an `IndexStore` it does not
/// own.
pub struct Retriever<'a> {
    store: &'a IndexStore,
    parser: QueryParser,
    scorer: Scorer,
}

impl<'a> Retriever<'a> {
    pub fn new(store: &'a IndexStore, config: &Config) -> Self {
        Retriever {
            store,
            parser: QueryParser::new(config),
            scorer: Scorer::new(config, store),
        }
    }

    /// Returns the top `k` documents matching `query`, scored highest
    /// first; ties break by smaller `doc_id`. `k` must be > 0.
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit> {
        self.search_with_snippets(query, k, None)
    }

    pub fn search_with_snippets(
        &self,
        query: &str,
        k: usize,
        snippets: Option<&SnippetGenerator<'_>>,
    ) -> Vec<SearchHit> {
        assert!(k > 0, "k must be > 0");

        let parsed = self.parser.parse(query);
        if parsed.is_empty() {
            return Vec::new();
        }

        let mut query_terms: Vec<&String> = parsed.terms.iter().collect();
        for phrase in &parsed.phrases {
            query_terms.extend(phrase.iter());
        }

        let mut candidates: HashSet<DocId> = HashSet::new();
        for term in &query_terms {
            for doc_id in self.store.get_term_info(term).keys() {
                candidates.insert(doc_id.clone());
            }
        }

        let mut scored: Vec<(DocId, f32)> = candidates
            .into_iter()
            .map(|doc_id| {
                let score = self
                    .scorer
                    .score(self.store, &parsed.terms, &parsed.phrases, &doc_id);
                (doc_id, score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);

        let all_query_terms: Vec<String> = query_terms.into_iter().cloned().collect();

        scored
            .into_iter()
            .map(|(doc_id, score)| {
                let snippet = snippets.map(|gen| gen.snippet(&doc_id, &all_query_terms));
                SearchHit {
                    doc_id,
                    score,
                    snippet,
                }
            })
            .collect()
    }
}
