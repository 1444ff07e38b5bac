use std::collections::{HashMap, HashSet};

use crate::{AttributeName, Bitmap, GlyphError, Rect, Result, TagName, MAX_CODEPOINT};

/// One codepoint's bitmap and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    codepoint: u32,
    pub bitmap: Bitmap,
    /// Missing glyphs are saved as a blank 8x16 placeholder.
    pub missing: bool,
    attributes: HashMap<AttributeName, String>,
    tags: HashSet<TagName>,
}

impl Glyph {
    /// Creates a glyph with a blank 8x16 bitmap.
    pub fn new(codepoint: u32) -> Result<Self> {
        Self::with_bitmap(codepoint, Bitmap::blank())
    }

    pub fn with_bitmap(codepoint: u32, bitmap: Bitmap) -> Result<Self> {
        if codepoint > MAX_CODEPOINT {
            return Err(GlyphError::CodepointOutOfRange(codepoint));
        }
        Ok(Self {
            codepoint,
            bitmap,
            missing: false,
            attributes: HashMap::new(),
            tags: HashSet::new(),
        })
    }

    pub fn codepoint(&self) -> u32 {
        self.codepoint
    }

    /// The character for the codepoint, `None` for surrogates.
    pub fn character(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }

    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    pub fn height(&self) -> usize {
        self.bitmap.height()
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Result<bool> {
        self.bitmap.get(x, y)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        self.bitmap.set(x, y, value)
    }

    /// Ink bounds of the bitmap.
    pub fn bounds(&self) -> Option<Rect> {
        self.bitmap.bounds()
    }

    pub fn tags(&self) -> impl Iterator<Item = TagName> + '_ {
        self.tags.iter().copied()
    }

    pub fn has_tag(&self, tag: TagName) -> bool {
        self.tags.contains(&tag)
    }

    /// Returns `false` if the tag was already set.
    pub fn add_tag(&mut self, tag: TagName) -> bool {
        self.tags.insert(tag)
    }

    pub fn remove_tag(&mut self, tag: TagName) -> bool {
        self.tags.remove(&tag)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (AttributeName, &str)> + '_ {
        self.attributes.iter().map(|(name, value)| (*name, value.as_str()))
    }

    pub fn attribute(&self, name: AttributeName) -> Option<&str> {
        self.attributes.get(&name).map(String::as_str)
    }

    /// Sets an attribute and returns the previous value.
    pub fn set_attribute(&mut self, name: AttributeName, value: impl Into<String>) -> Option<String> {
        self.attributes.insert(name, value.into())
    }

    pub fn remove_attribute(&mut self, name: AttributeName) -> Option<String> {
        self.attributes.remove(&name)
    }

    pub fn name(&self) -> Option<&str> {
        self.attribute(AttributeName::NAME)
    }

    pub fn is_non_printing(&self) -> bool {
        self.has_tag(TagName::NON_PRINTING)
    }

    pub fn ignore_empty(&self) -> bool {
        self.has_tag(TagName::IGNORE_EMPTY)
    }

    pub fn combining(&self) -> Option<i32> {
        self.numeric_attribute(AttributeName::COMBINING)
    }

    pub fn blank_width(&self) -> Option<i32> {
        self.numeric_attribute(AttributeName::BLANK_WIDTH)
    }

    pub fn width_override(&self) -> Option<i32> {
        self.numeric_attribute(AttributeName::WIDTH_OVERRIDE)
    }

    fn numeric_attribute(&self, name: AttributeName) -> Option<i32> {
        self.attribute(name)?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_attributes() {
        let mut glyph = Glyph::new(0x301).unwrap();
        assert_eq!(glyph.combining(), None);
        glyph.set_attribute(AttributeName::COMBINING, "-8");
        assert_eq!(glyph.combining(), Some(-8));
        glyph.set_attribute(AttributeName::BLANK_WIDTH, "wide");
        assert_eq!(glyph.blank_width(), None);
    }
}
