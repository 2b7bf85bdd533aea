//! Image sequence backends

pub mod png_sequence;

pub use png_sequence::{read_fragments, PngSequenceCapture, PngSequenceWriter};
