//! Subjective answer grading engine.
//!
//! Pure functions only: no I/O, no shared state. Everything here is safe to
//! call concurrently and cheap enough to recompute on every request.

pub mod accepted;
pub mod alphabet;
pub mod draft;
pub mod labels;
pub mod matcher;
pub mod normalize;
pub mod shape;

pub use accepted::{AcceptedAnswerSet, build_accepted_set, reference_for};
pub use alphabet::{Symbol, SymbolAlphabet};
pub use draft::{Draft, sanitize_sequence_token};
pub use labels::{LabeledSegment, extract_sequence_tokens, find_labeled_segments};
pub use matcher::{Strategy, grade, grade_with, is_match};
pub use normalize::normalize;
pub use shape::{ClassifyOptions, ShapeMetadata, classify, classify_with};
