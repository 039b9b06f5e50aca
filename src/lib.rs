//! A small-scale full-text search engine over a static corpus of SGML
//! news documents: a positional inverted index with a buffered,
//! concurrent write path, a query processor mixing free terms with exact
//! phrase clauses, and a BM25 ranker with a phrase-match boost.
//!
//! The core modules are `analysis` (tokenization), `index` (the
//! positional inverted index and its persistence format), `parallel`
//! (the concurrent indexer), `query` (query parsing), `scoring` (BM25 +
//! phrase boost), and `search` (candidate retrieval and snippets).
//! `corpus` and `core` are the surrounding scaffolding: SGML corpus
//! loading, configuration, error types, and shared data types.

pub mod analysis;
pub mod compression;
pub mod core;
pub mod corpus;
pub mod index;
pub mod parallel;
pub mod query;
pub mod scoring;
pub mod search;

pub use core::config::Config;
pub use core::error::{Error, ErrorKind, Result};
pub use core::types::{DocId, Document};
pub use index::store::IndexStore;
pub use parallel::indexer::Indexer;
pub use query::parser::{ParsedQuery, QueryParser};
pub use scoring::scorer::Scorer;
pub use search::retriever::{Retriever, SearchHit};
pub use search::snippet::{DocumentSource, SnippetGenerator};
