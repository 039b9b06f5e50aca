/// Process-wide tunables, threaded explicitly into every component's
/// constructor rather than read from globals.
#[derive(Debug, Clone)]
pub struct Config {
    // Tokenizer
    pub min_token_len: usize,
    pub remove_stopwords: bool,
    pub use_stemming: bool,
    pub filter_digits: bool,

    // IndexStore write buffer
    pub index_buffer_size: usize,
    pub index_flush_interval_secs: u64,

    // Indexer
    pub batch_size: usize,
    pub max_threads: usize,

    // Scorer
    pub bm25_k1: f32,
    pub bm25_b: f32,
    pub phrase_boost: f32,

    // SnippetGenerator
    pub context_size: usize,
    pub max_snippet_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_token_len: 2,
            remove_stopwords: true,
            use_stemming: true,
            filter_digits: false,

            index_buffer_size: 100_000,
            index_flush_interval_secs: 30,

            batch_size: 1_000,
            max_threads: 0, // 0 => min(cpu_count, 8)

            bm25_k1: 1.5,
            bm25_b: 0.75,
            phrase_boost: 2.0,

            context_size: 100,
            max_snippet_length: 250,
        }
    }
}

impl Config {
    /// Resolve the effective worker count, honoring `INDEXER_THREADS` and
    /// falling back to `min(cpu_count, 8)` when unset or zero.
    pub fn resolve_threads(&self) -> usize {
        if let Ok(v) = std::env::var("INDEXER_THREADS") {
            if let Ok(n) = v.parse::<usize>() {
                if n > 0 {
                    return n;
                }
            }
        }

        if self.max_threads > 0 {
            return self.max_threads;
        }

        num_cpus::get().min(8)
    }
}
