//! Faux Texte — French placeholder text generation.
//!
//! Builds paragraphs, sentences, word lists and list items from a small
//! grammar of sentence structures and categorized word pools, with
//! gender/number agreement, repeat avoidance and ligature post-processing.

pub mod core;
pub mod schema;
