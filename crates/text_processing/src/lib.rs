//! Text processing for the 311 intake agent
//!
//! Normalization, street-abbreviation expansion, and keyword-based intent
//! classification. This crate is domain-agnostic: the actual keyword table
//! is supplied by the caller.

pub mod abbreviations;
pub mod intent;
pub mod normalizer;

pub use abbreviations::expand_street_abbreviations;
pub use intent::{ClassifierRule, IntentClassifier, IntentTag};
pub use normalizer::{contains_any, normalize};
