//! A minimal end-to-end walkthrough: build an in-memory index over a
//! handful of documents, then run a free-term and a phrase query against
//! it. Mirrors the shape of the CLI's `index`/`search` subcommands without
//! touching disk.

use std::collections::HashMap;
use std::sync::Arc;

use newsdex::core::config::Config;
use newsdex::core::types::DocId;
use newsdex::index::store::IndexStore;
use newsdex::parallel::indexer::Indexer;
use newsdex::search::retriever::Retriever;

fn main() {
    println!("Building an in-memory index...");

    let config = Config::default();
    let store = Arc::new(IndexStore::new(&config));
    let indexer = Indexer::new(config.clone(), Arc::clone(&store));

    let mut documents = HashMap::new();
    documents.insert(DocId::new("d1"), "New York City held a hurricane drill today.".to_string());
    documents.insert(DocId::new("d2"), "New Jersey reported clear skies all week.".to_string());
    documents.insert(DocId::new("d3"), "The hurricane George struck the coast yesterday.".to_string());

    indexer.build(documents, None).expect("corpus is non-empty");
    println!(
        "Indexed {} document(s), {} distinct term(s)\n",
        store.total_docs(),
        store.vocabulary_len()
    );

    let retriever = Retriever::new(&store, &config);

    for query in ["new", r#""new york""#, "hurricane"] {
        println!("query: {}", query);
        let hits = retriever.search(query, 5);
        if hits.is_empty() {
            println!("  no results");
        }
        for hit in &hits {
            println!("  {:>8.4}  {}", hit.score, hit.doc_id);
        }
        println!();
    }
}
