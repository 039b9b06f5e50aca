use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::DocId;

/// `<DOC> … <DOCNO> id </DOCNO> … </DOC>` capture, DOTALL. Group 1 is
/// the doc id, group 2 the document body.
static DOC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<DOC>.*?<DOCNO>\s*(.*?)\s*</DOCNO>(.*?)</DOC>").unwrap());

static TEXT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<TEXT>(.*?)</TEXT>").unwrap());

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Corpus file walker and SGML extractor. Kept outside the tightly
/// coupled indexing/query core, but implemented here since the CLI and
/// tests need something to feed the Indexer with.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Loads every document reachable from `path`: a single file, or a
    /// directory walked recursively. Per-file failures are logged and
    /// skipped, never fatal.
    pub fn load_documents(path: impl AsRef<Path>, config: &Config) -> Result<HashMap<DocId, String>> {
        let path = path.as_ref();
        let files = if path.is_dir() {
            collect_files(path)
        } else {
            vec![path.to_path_buf()]
        };

        log::info!("loading corpus from {} ({} file(s))", path.display(), files.len());

        let workers = config.resolve_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| crate::core::error::Error::new(crate::core::error::ErrorKind::Io, e.to_string()))?;

        let per_file: Vec<HashMap<DocId, String>> = pool.install(|| {
            files
                .par_iter()
                .map(|file| match load_file(file) {
                    Ok(docs) => docs,
                    Err(e) => {
                        log::warn!("skipping {}: {}", file.display(), e);
                        HashMap::new()
                    }
                })
                .collect()
        });

        let mut documents = HashMap::new();
        for docs in per_file {
            documents.extend(docs);
        }

        log::info!("corpus loaded: {} document(s)", documents.len());
        Ok(documents)
    }
}

fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let entries = match std::fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("cannot read directory {}: {}", current.display(), e);
                continue;
            }
        };

        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                stack.push(entry_path);
            } else {
                files.push(entry_path);
            }
        }
    }

    files.sort();
    files
}

fn load_file(path: &Path) -> Result<HashMap<DocId, String>> {
    let raw = read_raw_bytes(path)?;
    // Try a strict decode first so a genuinely malformed file is visible in
    // the logs; fall back to lossy replacement rather than skipping the
    // file outright, since a few bad bytes shouldn't cost a whole document.
    let content = match std::str::from_utf8(&raw) {
        Ok(s) => s.to_string(),
        Err(e) => {
            let err: crate::core::error::Error = e.into();
            log::warn!("{}: {}, falling back to lossy decoding", path.display(), err);
            String::from_utf8_lossy(&raw).into_owned()
        }
    };

    let mut documents = HashMap::new();
    for captures in DOC_PATTERN.captures_iter(&content) {
        let doc_id = captures[1].trim().to_string();
        let body = &captures[2];

        let extracted = match TEXT_PATTERN.captures(body) {
            Some(text_match) => text_match[1].to_string(),
            None => body.to_string(),
        };

        let stripped = TAG_PATTERN.replace_all(&extracted, " ");
        let normalized = WHITESPACE_PATTERN.replace_all(&stripped, " ");
        let normalized = normalized.trim().to_string();

        if !normalized.is_empty() {
            documents.insert(DocId::new(doc_id), normalized);
        }
    }

    Ok(documents)
}

fn read_raw_bytes(path: &Path) -> Result<Vec<u8>> {
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let file = std::fs::File::open(path)?;
        let mut decoder = flate2::read::GzDecoder::new(file);
        let mut buf = Vec::new();
        decoder.read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(path)?)
    }
}
