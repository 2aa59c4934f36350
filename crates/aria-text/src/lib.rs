//! Sentence segmentation for streaming synthesis.
//!
//! Splits incoming text into units small enough to synthesize one at a time
//! while keeping prosody-relevant punctuation attached, and buffers streamed
//! partial text until a sentence boundary arrives.

pub mod segment;

pub use segment::{SegmentBuffer, Segmenter, DEFAULT_MIN_UNIT_LENGTH, SENTENCE_TERMINATORS};
