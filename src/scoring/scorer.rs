use std::collections::HashSet;

use crate::core::config::Config;
use crate::core::types::DocId;
use crate::index::store::IndexStore;

/// BM25 with a multiplicative boost for exact phrase occurrences.
pub struct Scorer {
    k1: f32,
    b: f32,
    phrase_boost: f32,
    total_docs: usize,
    avg_doc_len: f32,
}

impl Scorer {
    /// `avg_doc_len` is computed once here from the store's current
    /// `doc_lengths`; it does not change after indexing completes.
    pub fn new(config: &Config, store: &IndexStore) -> Self {
        let doc_lengths = store.doc_lengths_snapshot();
        let total_docs = store.total_docs();

        let avg_doc_len = if doc_lengths.is_empty() {
            0.0
        } else {
            let sum: u64 = doc_lengths.values().map(|&l| l as u64).sum();
            sum as f32 / doc_lengths.len() as f32
        };

        Scorer {
            k1: config.bm25_k1,
            b: config.bm25_b,
            phrase_boost: config.phrase_boost,
            total_docs,
            avg_doc_len,
        }
    }

    /// BM25 contribution of a single term in a single document. Returns 0
    /// for a term absent from the index or an empty corpus.
    pub fn term_score(&self, store: &IndexStore, term: &str, doc_id: &DocId) -> f32 {
        if self.avg_doc_len == 0.0 {
            return 0.0;
        }

        let df = store.get_doc_frequency(term);
        if df == 0 {
            return 0.0;
        }

        let posting = match store.get_term_info(term).remove(doc_id) {
            Some(p) => p,
            None => return 0.0,
        };

        let doc_len = store.doc_length(doc_id).unwrap_or(0) as f32;
        let n = self.total_docs as f32;
        let df = df as f32;

        let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
        let tf = posting.tf as f32;
        let tf_score = tf * (self.k1 + 1.0)
            / (tf + self.k1 * (1.0 - self.b + self.b * doc_len / self.avg_doc_len));

        tf_score * idf
    }

    /// Sum of per-term BM25 contributions over `phrase`, multiplied by
    /// `phrase_boost` if an exact adjacent occurrence exists in `doc_id`.
    pub fn phrase_score(&self, store: &IndexStore, phrase: &[String], doc_id: &DocId) -> f32 {
        if phrase.is_empty() {
            return 0.0;
        }

        let base: f32 = phrase
            .iter()
            .map(|term| self.term_score(store, term, doc_id))
            .sum();

        if base == 0.0 {
            return 0.0;
        }

        if self.has_exact_occurrence(store, phrase, doc_id) {
            self.phrase_boost * base
        } else {
            base
        }
    }

    /// Offset-intersection phrase probe: a term at relative
    /// offset `i` occupies position `p`, so an exact run starting at `p0`
    /// satisfies `p - i == p0` for every term. Intersecting `{pos - i}`
    /// across all terms is equivalent to, and cheaper than, a per-position
    /// merge walk.
    fn has_exact_occurrence(&self, store: &IndexStore, phrase: &[String], doc_id: &DocId) -> bool {
        let mut candidates: Option<HashSet<i64>> = None;

        for (i, term) in phrase.iter().enumerate() {
            let positions = store.get_term_positions(term, doc_id);
            if positions.is_empty() {
                return false;
            }

            let shifted: HashSet<i64> = positions.iter().map(|&p| p as i64 - i as i64).collect();

            candidates = Some(match candidates {
                None => shifted,
                Some(existing) => existing.intersection(&shifted).copied().collect(),
            });

            if candidates.as_ref().map(|c| c.is_empty()).unwrap_or(false) {
                return false;
            }
        }

        candidates.map(|c| !c.is_empty()).unwrap_or(false)
    }

    /// Total score for `doc_id`: sum of free-term contributions plus
    /// per-phrase contributions.
    pub fn score(
        &self,
        store: &IndexStore,
        free_terms: &[String],
        phrases: &[Vec<String>],
        doc_id: &DocId,
    ) -> f32 {
        let term_total: f32 = free_terms
            .iter()
            .map(|t| self.term_score(store, t, doc_id))
            .sum();
        let phrase_total: f32 = phrases
            .iter()
            .map(|p| self.phrase_score(store, p, doc_id))
            .sum();
        term_total + phrase_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_store() -> IndexStore {
        let config = Config::default();
        let store = IndexStore::new(&config);

        let d1 = DocId::new("d1");
        let d2 = DocId::new("d2");

        for (pos, term) in ["the", "quick", "brown", "fox"].iter().enumerate() {
            store.add_term(term, &d1, pos as u32);
        }
        store.update_doc_length(&d1, 4);

        for (pos, term) in ["the", "slow", "fox"].iter().enumerate() {
            store.add_term(term, &d2, pos as u32);
        }
        store.update_doc_length(&d2, 3);

        store.flush();
        store.set_total_docs(2);
        store
    }

    #[test]
    fn term_absent_from_index_scores_zero() {
        let config = Config::default();
        let store = build_store();
        let scorer = Scorer::new(&config, &store);
        let score = scorer.term_score(&store, "zebra", &DocId::new("d1"));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn rarer_term_scores_higher() {
        let config = Config::default();
        let store = build_store();
        let scorer = Scorer::new(&config, &store);

        let fox_score = scorer.term_score(&store, "fox", &DocId::new("d1"));
        let the_score = scorer.term_score(&store, "the", &DocId::new("d1"));
        assert!(fox_score > the_score || (fox_score - the_score).abs() < 1e-6);
    }

    #[test]
    fn phrase_boost_applies_only_on_exact_adjacency() {
        let config = Config::default();
        let store = build_store();
        let scorer = Scorer::new(&config, &store);

        let quick_fox = vec!["quick".to_string(), "fox".to_string()];
        let d1_score = scorer.phrase_score(&store, &quick_fox, &DocId::new("d1"));
        let base: f32 = quick_fox
            .iter()
            .map(|t| scorer.term_score(&store, t, &DocId::new("d1")))
            .sum();
        assert_eq!(d1_score, base);

        let quick_brown = vec!["quick".to_string(), "brown".to_string()];
        let boosted = scorer.phrase_score(&store, &quick_brown, &DocId::new("d1"));
        let base: f32 = quick_brown
            .iter()
            .map(|t| scorer.term_score(&store, t, &DocId::new("d1")))
            .sum();
        assert_eq!(boosted, config.phrase_boost * base);
    }
}
