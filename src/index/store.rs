use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::compression::compress::CompressedBlock;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::index::posting::Posting;

const MAGIC: &[u8; 4] = b"NDX1";
const FORMAT_VERSION: u32 = 1;

type TermIndex = HashMap<String, HashMap<DocId, Posting>>;

/// Everything an `IndexStore` persists, serialized as the payload of the
/// blob.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    index: TermIndex,
    doc_lengths: HashMap<DocId, u32>,
    total_docs: usize,
}

struct StoreState {
    index: TermIndex,
    doc_lengths: HashMap<DocId, u32>,
    total_docs: usize,
    buffer: TermIndex,
    buffered_positions: usize,
    last_flush: Instant,
}

/// The positional inverted index, guarded by a single lock around a
/// write buffer. Reads always see a fully flushed view of any term
/// they touch; writes land in the buffer and are merged in bulk.
pub struct IndexStore {
    state: Mutex<StoreState>,
    buffer_size: usize,
    flush_interval_secs: u64,
}

impl IndexStore {
    pub fn new(config: &Config) -> Self {
        IndexStore {
            state: Mutex::new(StoreState {
                index: HashMap::new(),
                doc_lengths: HashMap::new(),
                total_docs: 0,
                buffer: HashMap::new(),
                buffered_positions: 0,
                last_flush: Instant::now(),
            }),
            buffer_size: config.index_buffer_size,
            flush_interval_secs: config.index_flush_interval_secs,
        }
    }

    pub fn add_term(&self, term: &str, doc_id: &DocId, position: u32) {
        let mut state = self.state.lock();
        let posting = state
            .buffer
            .entry(term.to_string())
            .or_default()
            .entry(doc_id.clone())
            .or_default();
        posting.tf += 1;
        posting.positions.push(position);
        state.buffered_positions += 1;
        Self::maybe_flush(&mut state, self.buffer_size, self.flush_interval_secs);
    }

    /// Insert a whole batch of `term -> doc_id -> positions` produced by one
    /// indexer worker in a single locked section.
    pub fn batch_add_terms(&self, batch: HashMap<String, HashMap<DocId, Vec<u32>>>) {
        let mut state = self.state.lock();
        for (term, docs) in batch {
            let term_entry = state.buffer.entry(term).or_default();
            for (doc_id, positions) in docs {
                state.buffered_positions += positions.len();
                term_entry
                    .entry(doc_id)
                    .or_default()
                    .merge(Posting::from_positions(positions));
            }
        }
        Self::maybe_flush(&mut state, self.buffer_size, self.flush_interval_secs);
    }

    pub fn update_doc_length(&self, doc_id: &DocId, length: u32) {
        let mut state = self.state.lock();
        state.doc_lengths.insert(doc_id.clone(), length);
    }

    fn maybe_flush(state: &mut StoreState, buffer_size: usize, flush_interval_secs: u64) {
        let due_by_size = state.buffered_positions >= buffer_size;
        let due_by_time = state.last_flush.elapsed().as_secs() >= flush_interval_secs;
        if due_by_size || due_by_time {
            Self::flush_locked(state);
        }
    }

    fn flush_locked(state: &mut StoreState) {
        for (term, docs) in state.buffer.drain() {
            let term_entry = state.index.entry(term).or_default();
            for (doc_id, posting) in docs {
                term_entry.entry(doc_id).or_default().merge(posting);
            }
        }
        state.buffered_positions = 0;
        state.last_flush = Instant::now();
    }

    /// Force a flush regardless of the size/time thresholds. Used at the
    /// end of a build pass and before every read (read-your-writes) and
    /// before serialization.
    pub fn flush(&self) {
        let mut state = self.state.lock();
        Self::flush_locked(&mut state);
    }

    fn flush_term_locked(state: &mut StoreState, term: &str) {
        if let Some(docs) = state.buffer.remove(term) {
            let positions: usize = docs.values().map(|p| p.positions.len()).sum();
            let term_entry = state.index.entry(term.to_string()).or_default();
            for (doc_id, posting) in docs {
                term_entry.entry(doc_id).or_default().merge(posting);
            }
            state.buffered_positions = state.buffered_positions.saturating_sub(positions);
        }
    }

    pub fn get_term_info(&self, term: &str) -> HashMap<DocId, Posting> {
        let mut state = self.state.lock();
        Self::flush_term_locked(&mut state, term);
        state.index.get(term).cloned().unwrap_or_default()
    }

    pub fn get_doc_frequency(&self, term: &str) -> usize {
        let mut state = self.state.lock();
        Self::flush_term_locked(&mut state, term);
        state.index.get(term).map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn get_term_positions(&self, term: &str, doc_id: &DocId) -> Vec<u32> {
        let mut state = self.state.lock();
        Self::flush_term_locked(&mut state, term);
        state
            .index
            .get(term)
            .and_then(|docs| docs.get(doc_id))
            .map(|p| p.positions.clone())
            .unwrap_or_default()
    }

    /// Intersection of the doc_id sets for every term. Empty if `terms` is
    /// empty or any term is absent from the index.
    pub fn get_docs_with_terms(&self, terms: &[String]) -> HashSet<DocId> {
        if terms.is_empty() {
            return HashSet::new();
        }

        let mut state = self.state.lock();
        for term in terms {
            Self::flush_term_locked(&mut state, term);
        }

        let mut sets = Vec::with_capacity(terms.len());
        for term in terms {
            match state.index.get(term) {
                Some(docs) => sets.push(docs.keys().cloned().collect::<HashSet<_>>()),
                None => return HashSet::new(),
            }
        }

        let mut result = sets.remove(0);
        for set in sets {
            result.retain(|d| set.contains(d));
        }
        result
    }

    pub fn doc_length(&self, doc_id: &DocId) -> Option<u32> {
        self.state.lock().doc_lengths.get(doc_id).copied()
    }

    pub fn doc_lengths_snapshot(&self) -> HashMap<DocId, u32> {
        self.state.lock().doc_lengths.clone()
    }

    pub fn total_docs(&self) -> usize {
        self.state.lock().total_docs
    }

    pub fn set_total_docs(&self, total_docs: usize) {
        self.state.lock().total_docs = total_docs;
    }

    pub fn vocabulary_len(&self) -> usize {
        self.state.lock().index.len()
    }

    /// Serialize `{index, doc_lengths, total_docs}` as a self-describing
    /// compressed blob: `MAGIC | version:u32 | payload_len:u64 | crc32:u32 |
    /// lz4(bincode(Snapshot))`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.flush();

        let snapshot = {
            let state = self.state.lock();
            Snapshot {
                index: state.index.clone(),
                doc_lengths: state.doc_lengths.clone(),
                total_docs: state.total_docs,
            }
        };

        let payload = bincode::serialize(&snapshot)?;
        let checksum = crc32fast::hash(&payload);
        let compressed = CompressedBlock::compress(&payload)?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = std::fs::File::create(path)?;
        file.write_all(MAGIC)?;
        file.write_all(&FORMAT_VERSION.to_le_bytes())?;
        file.write_all(&(payload.len() as u64).to_le_bytes())?;
        file.write_all(&checksum.to_le_bytes())?;
        file.write_all(&(compressed.data.len() as u64).to_le_bytes())?;
        file.write_all(&compressed.data)?;

        Ok(())
    }

    /// Returns `Ok(false)` if `path` does not exist, `Ok(true)` after a
    /// successful load, `Err(CorruptIndex)` on a malformed payload.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<bool> {
        if !path.as_ref().exists() {
            return Ok(false);
        }

        let mut file = std::fs::File::open(path)?;
        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::new(ErrorKind::CorruptIndex, "bad magic bytes"));
        }

        let mut u32_buf = [0u8; 4];
        file.read_exact(&mut u32_buf)?;
        let version = u32::from_le_bytes(u32_buf);
        if version != FORMAT_VERSION {
            return Err(Error::new(
                ErrorKind::CorruptIndex,
                format!("unsupported index format version {}", version),
            ));
        }

        let mut u64_buf = [0u8; 8];
        file.read_exact(&mut u64_buf)?;
        let payload_len = u64::from_le_bytes(u64_buf);

        file.read_exact(&mut u32_buf)?;
        let expected_checksum = u32::from_le_bytes(u32_buf);

        file.read_exact(&mut u64_buf)?;
        let compressed_len = u64::from_le_bytes(u64_buf);

        let mut compressed_data = vec![0u8; compressed_len as usize];
        file.read_exact(&mut compressed_data)?;

        let compressed = CompressedBlock {
            data: compressed_data,
            original_size: payload_len as usize,
        };
        let payload = compressed.decompress()?;

        if crc32fast::hash(&payload) != expected_checksum {
            return Err(Error::new(ErrorKind::CorruptIndex, "checksum mismatch"));
        }

        let snapshot: Snapshot = bincode::deserialize(&payload)?;

        let mut state = self.state.lock();
        state.index = snapshot.index;
        state.doc_lengths = snapshot.doc_lengths;
        state.total_docs = snapshot.total_docs;
        state.buffer.clear();
        state.buffered_positions = 0;
        state.last_flush = Instant::now();

        Ok(true)
    }
}
