use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Drops tokens that are purely numeric.
pub struct DigitFilter;

impl TokenFilter for DigitFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|token| !token.text.chars().all(|c| c.is_ascii_digit()))
            .collect()
    }

    fn name(&self) -> &str {
        "digits"
    }

    fn clone_box(&self) -> Box<dyn TokenFilter> {
        Box::new(DigitFilter)
    }
}
