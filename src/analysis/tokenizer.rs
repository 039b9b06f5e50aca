use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::Token;

/// Text → normalized term sequence.
///
/// Pipeline, in order: case fold, word segmentation, punctuation strip,
/// min-length filter, stopword filter, stemming, digit filter. This type
/// owns case folding, segmentation and the ASCII-punctuation strip; the
/// remaining stages live on the `TokenFilter` chain an `Analyzer` wraps it
/// with.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Standard word tokenizer: Unicode word segmentation with optional
/// lowercasing.
#[derive(Clone)]
pub struct StandardTokenizer {
    pub lowercase: bool,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        StandardTokenizer { lowercase: true }
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let folded;
        let text_to_process: &str = if self.lowercase {
            folded = text.to_lowercase();
            &folded
        } else {
            text
        };

        let mut tokens = Vec::new();
        let mut position = 0u32;

        for word in text_to_process.unicode_words() {
            let stripped = strip_ascii_punctuation(word);
            if stripped.is_empty() {
                continue;
            }
            tokens.push(Token::new(stripped, position));
            position += 1;
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }
}

/// Strip ASCII punctuation from a single word.
/// `unicode_words` already drops most punctuation at segment boundaries,
/// but apostrophes, hyphens, and stray symbols inside a "word" survive it.
fn strip_ascii_punctuation(word: &str) -> String {
    word.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_segments() {
        let tok = StandardTokenizer::default();
        let tokens = tok.tokenize("New York City");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["new", "york", "city"]);
    }

    #[test]
    fn positions_are_sequential() {
        let tok = StandardTokenizer::default();
        let tokens = tok.tokenize("a b a b a");
        let positions: Vec<u32> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn strips_punctuation() {
        let tok = StandardTokenizer::default();
        let tokens = tok.tokenize("hello, world!");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "world"]);
    }
}
