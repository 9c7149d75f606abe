//! Multinomial Naive Bayes text classification, trained one document at a
//! time so it can learn from a stream.

#[macro_use]
extern crate log;

mod naive_bayes;
mod tokenizer;

pub use naive_bayes::NaiveBayes;
pub use tokenizer::{strip_punctuation, tokenize};
