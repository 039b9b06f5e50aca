use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::index::store::IndexStore;

/// Parallel document ingestion into an `IndexStore`. Partitions the
/// corpus into fixed-size batches, fans them out to a bounded worker pool,
/// and funnels each worker's per-document output into the store's buffered
/// write path.
pub struct Indexer {
    config: Config,
    store: Arc<IndexStore>,
    analyzer: Analyzer,
}

impl Indexer {
    pub fn new(config: Config, store: Arc<IndexStore>) -> Self {
        let analyzer = Analyzer::from_config(&config);
        Indexer {
            config,
            store,
            analyzer,
        }
    }

    /// Indexes every document in `documents`, then forces a final flush and
    /// (if `save_path` is given) persists the store. Aborts with
    /// `CorpusEmpty` if there is nothing to index.
    pub fn build(
        &self,
        documents: HashMap<DocId, String>,
        save_path: Option<&std::path::Path>,
    ) -> Result<()> {
        if documents.is_empty() {
            return Err(Error::new(ErrorKind::CorpusEmpty, "no documents to index"));
        }

        let total = documents.len();
        let batch_size = self.config.batch_size.max(1);
        let workers = self.config.resolve_threads();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::new(ErrorKind::Io, e.to_string()))?;

        let entries: Vec<(DocId, String)> = documents.into_iter().collect();
        let batches: Vec<&[(DocId, String)]> = entries.chunks(batch_size).collect();

        log::info!(
            "indexing {} document(s) in {} batch(es) across {} worker(s)",
            total,
            batches.len(),
            workers
        );

        let progress = Arc::new(AtomicUsize::new(0));

        pool.install(|| {
            batches.par_iter().for_each(|batch| {
                // Each worker owns its batch for its whole lifetime and scans
                // documents sequentially, so positions within one document
                // are added in ascending order.
                for (doc_id, text) in batch.iter() {
                    let tokens = self.analyzer.analyze(text);
                    let doc_len = tokens.len() as u32;

                    let mut term_positions: HashMap<String, Vec<u32>> = HashMap::new();
                    for token in tokens {
                        term_positions.entry(token.text).or_default().push(token.position);
                    }

                    self.store.update_doc_length(doc_id, doc_len);

                    let mut batch_map: HashMap<String, HashMap<DocId, Vec<u32>>> = HashMap::new();
                    for (term, positions) in term_positions {
                        batch_map
                            .entry(term)
                            .or_default()
                            .insert(doc_id.clone(), positions);
                    }
                    self.store.batch_add_terms(batch_map);

                    let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % 1_000 == 0 || done == total {
                        log::info!("indexing progress: {}/{}", done, total);
                    }
                }
            });
        });

        self.store.set_total_docs(total);
        self.store.flush();

        if let Some(path) = save_path {
            self.store.save(path)?;
        }

        Ok(())
    }
}
