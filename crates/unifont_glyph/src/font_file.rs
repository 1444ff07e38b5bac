use std::{
    collections::{btree_map, BTreeMap},
    fs,
    path::Path,
};

use crate::{FontError, Glyph, GlyphCodec, GlyphError};

/// All glyphs of one `.hex` file, ordered by codepoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphFile {
    glyphs: BTreeMap<u32, Glyph>,
}

impl GlyphFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whole file, failing on the first bad line. Blank lines are skipped.
    pub fn parse(codec: GlyphCodec<'_>, text: &str) -> Result<Self, FontError> {
        let mut result = Self::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let glyph = codec.parse(line).map_err(|source| FontError::InvalidLine { line_number: i + 1, source })?;
            result.insert_new(glyph, i + 1)?;
        }
        log::debug!("parsed {} glyphs", result.len());
        Ok(result)
    }

    /// Parses a whole file, skipping bad lines. The skipped lines are returned
    /// next to the glyphs that could be read.
    pub fn parse_lenient(codec: GlyphCodec<'_>, text: &str) -> (Self, Vec<FontError>) {
        let mut result = Self::new();
        let mut errors = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let res = match codec.parse(line) {
                Ok(glyph) => result.insert_new(glyph, i + 1),
                Err(source) => Err(FontError::InvalidLine { line_number: i + 1, source }),
            };
            if let Err(err) = res {
                log::warn!("skipping line: {err}");
                errors.push(err);
            }
        }
        log::debug!("parsed {} glyphs, skipped {} lines", result.len(), errors.len());
        (result, errors)
    }

    pub fn read(codec: GlyphCodec<'_>, path: &Path) -> Result<Self, FontError> {
        let text = fs::read_to_string(path)?;
        Self::parse(codec, &text)
    }

    /// Canonical text, one line per glyph in codepoint order.
    pub fn to_text(&self, codec: GlyphCodec<'_>) -> Result<String, FontError> {
        let mut result = String::new();
        for glyph in self.glyphs.values() {
            result.push_str(&codec.serialize(glyph).map_err(FontError::UnwritableGlyph)?);
            result.push('\n');
        }
        Ok(result)
    }

    /// Writes the canonical text. Nothing is written if a glyph can't be serialized.
    pub fn write(&self, codec: GlyphCodec<'_>, path: &Path) -> Result<(), FontError> {
        fs::write(path, self.to_text(codec)?)?;
        log::debug!("wrote {} glyphs to {}", self.len(), path.display());
        Ok(())
    }

    pub fn get(&self, codepoint: u32) -> Option<&Glyph> {
        self.glyphs.get(&codepoint)
    }

    pub fn get_mut(&mut self, codepoint: u32) -> Option<&mut Glyph> {
        self.glyphs.get_mut(&codepoint)
    }

    /// Returns the glyph for `codepoint`, creating a blank 8x16 one on first use.
    pub fn get_or_insert(&mut self, codepoint: u32) -> Result<&mut Glyph, GlyphError> {
        match self.glyphs.entry(codepoint) {
            btree_map::Entry::Occupied(entry) => Ok(entry.into_mut()),
            btree_map::Entry::Vacant(entry) => Ok(entry.insert(Glyph::new(codepoint)?)),
        }
    }

    /// Inserts a glyph, replacing and returning the one with the same codepoint.
    pub fn insert(&mut self, glyph: Glyph) -> Option<Glyph> {
        self.glyphs.insert(glyph.codepoint(), glyph)
    }

    pub fn remove(&mut self, codepoint: u32) -> Option<Glyph> {
        self.glyphs.remove(&codepoint)
    }

    /// The first glyph after `codepoint`.
    pub fn next_after(&self, codepoint: u32) -> Option<&Glyph> {
        self.glyphs.range(codepoint.saturating_add(1)..).next().map(|(_, glyph)| glyph).filter(|glyph| glyph.codepoint() > codepoint)
    }

    /// The last glyph before `codepoint`.
    pub fn previous_before(&self, codepoint: u32) -> Option<&Glyph> {
        self.glyphs.range(..codepoint).next_back().map(|(_, glyph)| glyph)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }

    fn insert_new(&mut self, glyph: Glyph, line_number: usize) -> Result<(), FontError> {
        let codepoint = glyph.codepoint();
        if self.glyphs.contains_key(&codepoint) {
            return Err(FontError::DuplicateCodepoint { line_number, codepoint });
        }
        self.glyphs.insert(codepoint, glyph);
        Ok(())
    }
}
