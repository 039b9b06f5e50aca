use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use newsdex::core::config::Config;
use newsdex::core::types::DocId;
use newsdex::corpus::loader::DocumentLoader;
use newsdex::index::store::IndexStore;
use newsdex::parallel::indexer::Indexer;
use newsdex::search::retriever::Retriever;
use newsdex::search::snippet::SnippetGenerator;

#[derive(Parser)]
#[command(name = "newsdex", about = "Positional full-text search over a static SGML news corpus", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from a corpus directory or file
    Index {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Run a single query against a saved index
    Search {
        query: Vec<String>,
        #[arg(long = "index")]
        index: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
    /// Read queries from stdin in a loop until `exit`/`quit`/EOF
    Interactive {
        #[arg(long = "index")]
        index: PathBuf,
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Index { corpus, output, threads } => run_index(corpus, output, threads),
        Commands::Search { query, index, top, corpus } => {
            run_search(query.join(" "), index, top, corpus)
        }
        Commands::Interactive { index, corpus } => run_interactive(index, corpus),
    };
    std::process::exit(code);
}

fn run_index(corpus: PathBuf, output: PathBuf, threads: Option<usize>) -> i32 {
    let mut config = Config::default();
    if let Some(n) = threads {
        config.max_threads = n;
    }

    let documents = match DocumentLoader::load_documents(&corpus, &config) {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("error: failed to load corpus {}: {}", corpus.display(), e);
            return 1;
        }
    };

    let store = Arc::new(IndexStore::new(&config));
    let indexer = Indexer::new(config, Arc::clone(&store));

    match indexer.build(documents, Some(&output)) {
        Ok(()) => {
            println!(
                "indexed {} document(s), {} term(s) into {}",
                store.total_docs(),
                store.vocabulary_len(),
                output.display()
            );
            0
        }
        Err(e) => {
            eprintln!("error: index build failed: {}", e);
            1
        }
    }
}

fn run_search(query: String, index_path: PathBuf, top: usize, corpus: Option<PathBuf>) -> i32 {
    let config = Config::default();
    let store = IndexStore::new(&config);
    match store.load(&index_path) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("error: index file not found: {}", index_path.display());
            return 1;
        }
        Err(e) => {
            eprintln!("error: failed to load index: {}", e);
            return 1;
        }
    }

    let documents = match load_corpus_for_snippets(corpus.as_ref(), &config) {
        Ok(docs) => docs,
        Err(code) => return code,
    };

    let retriever = Retriever::new(&store, &config);
    let snippet_gen = documents.as_ref().map(|docs| SnippetGenerator::new(docs, &config));
    let hits = retriever.search_with_snippets(&query, top.max(1), snippet_gen.as_ref());

    print_hits(&hits);
    0
}

fn run_interactive(index_path: PathBuf, corpus: Option<PathBuf>) -> i32 {
    let config = Config::default();
    let store = IndexStore::new(&config);
    match store.load(&index_path) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("error: index file not found: {}", index_path.display());
            return 1;
        }
        Err(e) => {
            eprintln!("error: failed to load index: {}", e);
            return 1;
        }
    }

    let documents = match load_corpus_for_snippets(corpus.as_ref(), &config) {
        Ok(docs) => docs,
        Err(code) => return code,
    };

    let retriever = Retriever::new(&store, &config);
    let snippet_gen = documents.as_ref().map(|docs| SnippetGenerator::new(docs, &config));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("query> ");
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: failed to read query: {}", e);
                break;
            }
        }

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }

        let hits = retriever.search_with_snippets(query, 10, snippet_gen.as_ref());
        print_hits(&hits);
    }
    0
}

fn load_corpus_for_snippets(
    corpus: Option<&PathBuf>,
    config: &Config,
) -> Result<Option<HashMap<DocId, String>>, i32> {
    match corpus {
        None => Ok(None),
        Some(path) => match DocumentLoader::load_documents(path, config) {
            Ok(docs) => Ok(Some(docs)),
            Err(e) => {
                eprintln!("error: failed to load corpus {}: {}", path.display(), e);
                Err(1)
            }
        },
    }
}

fn print_hits(hits: &[newsdex::search::retriever::SearchHit]) {
    if hits.is_empty() {
        println!("no results");
        return;
    }
    for (rank, hit) in hits.iter().enumerate() {
        println!("{:>2}. {:>8.4}  {}", rank + 1, hit.score, hit.doc_id);
        if let Some(snippet) = &hit.snippet {
            println!("      {}", snippet);
        }
    }
}
