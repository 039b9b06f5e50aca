use rust_stemmers::Algorithm;

use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::digits::DigitFilter;
use crate::analysis::filters::min_length::MinLengthFilter;
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::config::Config;

/// Text analysis pipeline: a tokenizer followed by a chain of filters.
pub struct Analyzer {
    tokenizer: Box<dyn Tokenizer>,
    filters: Vec<Box<dyn TokenFilter>>,
}

impl Analyzer {
    pub fn new(tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Tokenizes `text` and runs it through the filter chain. Positions are
    /// renumbered after filtering so they index into the *surviving* token
    /// sequence: positions must land in `[0, |d|)`, and `|d|` is the
    /// post-filter token count, not the raw word count.
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        for (position, token) in tokens.iter_mut().enumerate() {
            token.position = position as u32;
        }

        tokens
    }

    /// Build the analyzer the indexer and the free-term side of a query use:
    /// the full pipeline, honoring every knob in `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut analyzer = Analyzer::new(Box::new(StandardTokenizer::default()))
            .add_filter(Box::new(MinLengthFilter::new(config.min_token_len)));

        if config.remove_stopwords {
            analyzer = analyzer.add_filter(Box::new(StopWordFilter::english()));
        }
        if config.use_stemming {
            analyzer = analyzer.add_filter(Box::new(StemmerFilter::new(Algorithm::English)));
        }
        if config.filter_digits {
            analyzer = analyzer.add_filter(Box::new(DigitFilter));
        }

        analyzer
    }

    /// Build the analyzer a quoted phrase is tokenized with: same
    /// normalization as `from_config`, but stopwords survive so that
    /// adjacency in the phrase still matches the document's own positions.
    pub fn from_config_for_phrase(config: &Config) -> Self {
        let mut analyzer = Analyzer::new(Box::new(StandardTokenizer::default()))
            .add_filter(Box::new(MinLengthFilter::new(config.min_token_len)));

        if config.use_stemming {
            analyzer = analyzer.add_filter(Box::new(StemmerFilter::new(Algorithm::English)));
        }
        if config.filter_digits {
            analyzer = analyzer.add_filter(Box::new(DigitFilter));
        }

        analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_strips_stopwords_and_stems() {
        let config = Config::default();
        let analyzer = Analyzer::from_config(&config);
        let tokens = analyzer.analyze("The runners are running quickly");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert!(!texts.contains(&"the"));
        assert!(!texts.contains(&"are"));
        assert!(texts.contains(&"runner") || texts.contains(&"run"));
    }

    #[test]
    fn phrase_pipeline_keeps_stopwords() {
        let config = Config::default();
        let analyzer = Analyzer::from_config_for_phrase(&config);
        let tokens = analyzer.analyze("the state of the union");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert!(texts.contains(&"the"));
    }
}
