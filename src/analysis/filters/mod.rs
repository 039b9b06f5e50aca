pub mod digits;
pub mod min_length;
pub mod stemmer;
pub mod stopword;
