#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc
)]
//! Glyph records for Unifont style `.hex` bitmap fonts.
//!
//! A font file holds one glyph per line:
//!
//! ```text
//! 41:0000000018242442427E424242420000; name="LATIN CAPITAL LETTER A"
//! ; Missing >5:00000000000000000000000000000000; np name="space"
//! ```
//!
//! [`codec`] converts a single line into a [`Glyph`] and back, [`GlyphFile`]
//! handles whole files.
use thiserror::Error;

pub mod bitmap;
pub use bitmap::*;

pub mod names;
pub use names::*;

pub mod glyph;
pub use glyph::*;

pub mod codec;
pub use codec::{parse_codepoint_hex, parse_line, write_line, GlyphCodec, MISSING_PREFIX};

pub mod font_file;
pub use font_file::*;

pub type Result<T> = std::result::Result<T, GlyphError>;

/// Highest valid unicode scalar position.
pub const MAX_CODEPOINT: u32 = 0x10_FFFF;

/// Errors raised by the bitmap and the glyph record.
///
/// `OutOfBounds` signals a bug in the caller, the other variants invalid input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlyphError {
    #[error("Invalid bitmap dimensions {width}x{height}: width must be a positive multiple of 4 and height must be {expected}", expected = GLYPH_HEIGHT)]
    InvalidDimensions { width: usize, height: usize },

    #[error("Pixel ({x}, {y}) is outside of the {width}x{height} bitmap")]
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },

    #[error("Codepoint U+{0:X} is out of range (max U+10FFFF)")]
    CodepointOutOfRange(u32),
}

/// Errors raised while parsing or writing a glyph line.
///
/// Parse errors keep the offending line, write errors the codepoint of the glyph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Missing '{separator}' separator in `{line}`")]
    MissingSeparator { separator: char, line: String },

    #[error("Malformed codepoint `{text}` in `{line}`")]
    MalformedCodepoint { text: String, line: String },

    #[error("Malformed bitmap hex `{text}` (invalid digit at offset {offset}) in `{line}`")]
    MalformedBitmapHex { text: String, offset: usize, line: String },

    #[error("Bitmap hex length {length} is not a multiple of 4 in `{line}`")]
    InvalidBitmapLength { length: usize, line: String },

    #[error("{source} in `{line}`")]
    InvalidGlyph { source: GlyphError, line: String },

    #[error("U+{codepoint:04X}: name `{name}` can't be written as a metadata token")]
    UnwritableName { codepoint: u32, name: String },

    #[error("U+{codepoint:04X}: value `{value}` of `{name}` can't be written without escaping")]
    UnwritableValue { codepoint: u32, name: String, value: String },

    #[error("U+{codepoint:04X}: {category:?} name was interned by another registry")]
    ForeignName { codepoint: u32, category: NameCategory },
}

impl CodecError {
    /// The line that failed to parse, `None` for write errors.
    pub fn line(&self) -> Option<&str> {
        match self {
            CodecError::MissingSeparator { line, .. }
            | CodecError::MalformedCodepoint { line, .. }
            | CodecError::MalformedBitmapHex { line, .. }
            | CodecError::InvalidBitmapLength { line, .. }
            | CodecError::InvalidGlyph { line, .. } => Some(line),
            CodecError::UnwritableName { .. } | CodecError::UnwritableValue { .. } | CodecError::ForeignName { .. } => None,
        }
    }
}

/// Errors raised while reading or writing whole font files.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line_number}: {source}")]
    InvalidLine { line_number: usize, source: CodecError },

    #[error("Line {line_number}: duplicate glyph for U+{codepoint:04X}")]
    DuplicateCodepoint { line_number: usize, codepoint: u32 },

    #[error("{0}")]
    UnwritableGlyph(#[source] CodecError),
}
