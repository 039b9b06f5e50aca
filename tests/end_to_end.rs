use std::collections::HashMap;
use std::sync::Arc;

use newsdex::core::config::Config;
use newsdex::core::types::DocId;
use newsdex::index::store::IndexStore;
use newsdex::parallel::indexer::Indexer;
use newsdex::search::retriever::Retriever;
use newsdex::search::snippet::SnippetGenerator;

fn build(documents: HashMap<DocId, String>, config: &Config) -> Arc<IndexStore> {
    let store = Arc::new(IndexStore::new(config));
    let indexer = Indexer::new(config.clone(), Arc::clone(&store));
    indexer.build(documents, None).unwrap();
    store
}

/// Free terms match both documents; the phrase query
/// only matches the one with adjacent positions.
#[test]
fn free_term_and_phrase_query_scenario() {
    let config = Config::default();
    let mut documents = HashMap::new();
    documents.insert(DocId::new("d1"), "new york city".to_string());
    documents.insert(DocId::new("d2"), "new jersey".to_string());

    let store = build(documents, &config);
    let retriever = Retriever::new(&store, &config);

    let free_hits = retriever.search("new", 10);
    let free_ids: std::collections::HashSet<_> =
        free_hits.iter().map(|h| h.doc_id.clone()).collect();
    assert_eq!(
        free_ids,
        std::collections::HashSet::from([DocId::new("d1"), DocId::new("d2")])
    );

    let phrase_hits = retriever.search(r#""new york""#, 10);
    assert_eq!(phrase_hits.len(), 1);
    assert_eq!(phrase_hits[0].doc_id, DocId::new("d1"));
}

/// Position lists and document length for a document
/// with repeated terms.
#[test]
fn repeated_terms_produce_expected_postings_and_length() {
    let config = Config::default();
    let mut documents = HashMap::new();
    documents.insert(DocId::new("d"), "a b a b a".to_string());

    let store = build(documents, &config);

    let a_info = store.get_term_info("a");
    assert_eq!(a_info[&DocId::new("d")].tf, 3);
    assert_eq!(a_info[&DocId::new("d")].positions, vec![0, 2, 4]);

    let b_info = store.get_term_info("b");
    assert_eq!(b_info[&DocId::new("d")].tf, 2);
    assert_eq!(b_info[&DocId::new("d")].positions, vec![1, 3]);

    assert_eq!(store.doc_length(&DocId::new("d")), Some(5));
}

/// `get_docs_with_terms` is strict intersection
/// semantics.
#[test]
fn get_docs_with_terms_is_strict_intersection() {
    let config = Config::default();
    let mut documents = HashMap::new();
    documents.insert(DocId::new("d1"), "a b".to_string());
    documents.insert(DocId::new("d2"), "a".to_string());

    let store = build(documents, &config);

    assert!(store.get_docs_with_terms(&[]).is_empty());
    assert_eq!(
        store.get_docs_with_terms(&["a".to_string()]),
        std::collections::HashSet::from([DocId::new("d1"), DocId::new("d2")])
    );
    assert_eq!(
        store.get_docs_with_terms(&["a".to_string(), "b".to_string()]),
        std::collections::HashSet::from([DocId::new("d1")])
    );
    assert!(store
        .get_docs_with_terms(&["a".to_string(), "zzz".to_string()])
        .is_empty());
}

/// Save then load round-trips every invariant.
#[test]
fn save_and_load_round_trip() {
    let config = Config::default();
    let mut documents = HashMap::new();
    documents.insert(DocId::new("d1"), "new york city".to_string());
    documents.insert(DocId::new("d2"), "new jersey".to_string());
    documents.insert(DocId::new("d3"), "the hurricane struck".to_string());

    let store = build(documents, &config);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.bin");
    store.save(&path).unwrap();

    let reloaded = IndexStore::new(&config);
    assert!(reloaded.load(&path).unwrap());

    assert_eq!(reloaded.total_docs(), store.total_docs());
    assert_eq!(reloaded.vocabulary_len(), store.vocabulary_len());
    assert_eq!(
        reloaded.doc_lengths_snapshot(),
        store.doc_lengths_snapshot()
    );

    for term in ["new", "york", "hurricane"] {
        assert_eq!(
            reloaded.get_term_info(term).len(),
            store.get_term_info(term).len()
        );
    }
}

/// Snippet generation merges nearby hits and bounds
/// the excerpt with ellipses.
#[test]
fn snippet_merges_adjacent_query_terms() {
    let mut config = Config::default();
    config.context_size = 10;

    let mut documents: HashMap<DocId, String> = HashMap::new();
    documents.insert(
        DocId::new("d"),
        "Padding text before the interesting part. The hurricane george struck the coast. \
         Padding text after to push the document well past the snippet window on both sides."
            .to_string(),
    );

    let generator = SnippetGenerator::new(&documents, &config);
    let snippet = generator.snippet(
        &DocId::new("d"),
        &["hurricane".to_string(), "george".to_string()],
    );

    assert!(snippet.contains("hurricane george"));
    assert!(snippet.starts_with("..."));
}

/// Indexing an empty corpus aborts with `CorpusEmpty`, not a panic.
#[test]
fn empty_corpus_aborts_cleanly() {
    let config = Config::default();
    let store = Arc::new(IndexStore::new(&config));
    let indexer = Indexer::new(config, store);
    let err = indexer.build(HashMap::new(), None).unwrap_err();
    assert!(matches!(err.kind, newsdex::core::error::ErrorKind::CorpusEmpty));
}
