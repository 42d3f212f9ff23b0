//! Question Module - The multiple-choice question bank
//!
//! - [`Question`] - Immutable prompt + ordered choices + correct index
//! - [`QuestionBank`] - Ordered collection with uniform random pick
//! - [`default_bank`] - Built-in science questions

mod bank;

pub use bank::*;
