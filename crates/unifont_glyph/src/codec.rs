//! Line codec for glyph records.
//!
//! ```text
//! [; Missing >]<codepoint hex>:<bitmap hex>;[ tag][ attribute=value]...
//! ```
//!
//! The bitmap hex is the packed bit stream of [`Bitmap`] with two uppercase
//! digits per byte. An empty bitmap field stands for the blank 8x16 bitmap.
//!
//! Metadata names run up to whitespace, `=` or `"`. Values are bare or
//! double quoted; there is no escaping, a backslash only keeps the character
//! after it from closing the quotes. Glyphs whose names or values can't be
//! expressed that way are rejected by [`GlyphCodec::serialize`].
use regex::Regex;

use crate::{AttributeName, Bitmap, CodecError, Glyph, GlyphError, NameId, NameRegistry, DEFAULT_GLYPH_WIDTH, GLYPH_HEIGHT, MAX_CODEPOINT};

pub const MISSING_PREFIX: &str = "; Missing >";

lazy_static::lazy_static! {
    static ref META_TOKEN: Regex = Regex::new(r#"([^\s="]+)(?:\s*=\s*("(?:[^"\\]|\\.)*"|[^"\s]\S*))?"#).unwrap();
}

/// Parses a line with the global [`NameRegistry`].
pub fn parse_line(line: &str) -> Result<Glyph, CodecError> {
    GlyphCodec::global().parse(line)
}

/// Writes a glyph interned with the global [`NameRegistry`].
pub fn write_line(glyph: &Glyph) -> Result<String, CodecError> {
    GlyphCodec::global().serialize(glyph)
}

/// Converts glyph lines to [`Glyph`] records and back.
///
/// Tag and attribute names are resolved through `registry`; a glyph must be
/// written with the registry it was parsed or built with, names from other
/// registries fail with [`CodecError::ForeignName`].
#[derive(Clone, Copy)]
pub struct GlyphCodec<'a> {
    registry: &'a NameRegistry,
}

impl GlyphCodec<'static> {
    pub fn global() -> Self {
        Self {
            registry: NameRegistry::global(),
        }
    }
}

impl<'a> GlyphCodec<'a> {
    pub fn new(registry: &'a NameRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a NameRegistry {
        self.registry
    }

    pub fn parse(&self, line: &str) -> Result<Glyph, CodecError> {
        let (missing, rest) = match line.strip_prefix(MISSING_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let Some((codepoint_hex, rest)) = rest.split_once(':') else {
            return Err(CodecError::MissingSeparator {
                separator: ':',
                line: line.to_string(),
            });
        };
        let hex_start = line.len() - rest.len();
        let Some((bitmap_hex, meta)) = rest.split_once(';') else {
            return Err(CodecError::MissingSeparator {
                separator: ';',
                line: line.to_string(),
            });
        };

        let codepoint = parse_codepoint(codepoint_hex, line)?;
        let bitmap = parse_bitmap(bitmap_hex, hex_start, line)?;
        let mut glyph = Glyph::with_bitmap(codepoint, bitmap).map_err(|source| CodecError::InvalidGlyph {
            source,
            line: line.to_string(),
        })?;
        glyph.missing = missing;
        self.parse_meta(meta, &mut glyph);
        Ok(glyph)
    }

    /// Writes `glyph` as one line that [`GlyphCodec::parse`] reads back unchanged.
    pub fn serialize(&self, glyph: &Glyph) -> Result<String, CodecError> {
        let mut result = String::new();
        if glyph.missing {
            result.push_str(MISSING_PREFIX);
        }
        result.push_str(&format!("{:X}:", glyph.codepoint()));
        if glyph.missing {
            result.push_str(&"0".repeat(DEFAULT_GLYPH_WIDTH * GLYPH_HEIGHT / 4));
        } else {
            for b in glyph.bitmap.packed_bytes() {
                result.push_str(&format!("{b:02X}"));
            }
        }
        result.push(';');

        let mut tags = glyph.tags().map(|tag| self.token_name(tag.id(), glyph)).collect::<Result<Vec<_>, _>>()?;
        tags.sort();
        for tag in tags {
            result.push(' ');
            result.push_str(&tag);
        }

        let mut attributes = glyph
            .attributes()
            .map(|(name, value)| Ok((self.token_name(name.id(), glyph)?, name == AttributeName::NAME, value)))
            .collect::<Result<Vec<_>, CodecError>>()?;
        attributes.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, prefer_quotes, value) in attributes {
            let value = write_value(&key, value, prefer_quotes, glyph.codepoint())?;
            result.push(' ');
            result.push_str(&key);
            result.push('=');
            result.push_str(&value);
        }
        Ok(result)
    }

    fn parse_meta(&self, meta: &str, glyph: &mut Glyph) {
        let mut last_end = 0;
        for captures in META_TOKEN.captures_iter(meta) {
            let Some(token) = captures.get(0) else {
                continue;
            };
            warn_skipped(&meta[last_end..token.start()], glyph.codepoint());
            last_end = token.end();

            let name = &captures[1];
            match captures.get(2) {
                Some(value) => {
                    let value = value.as_str();
                    let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                        &value[1..value.len() - 1]
                    } else {
                        value
                    };
                    // last occurrence wins
                    glyph.set_attribute(self.registry.attribute(name), value);
                }
                None => {
                    glyph.add_tag(self.registry.tag(name));
                }
            }
        }
        warn_skipped(&meta[last_end..], glyph.codepoint());
    }

    fn token_name(&self, id: NameId, glyph: &Glyph) -> Result<String, CodecError> {
        let Some(name) = self.registry.resolve(id) else {
            return Err(CodecError::ForeignName {
                codepoint: glyph.codepoint(),
                category: id.category,
            });
        };
        if !is_token_name(&name) {
            return Err(CodecError::UnwritableName {
                codepoint: glyph.codepoint(),
                name,
            });
        }
        Ok(name)
    }
}

/// Parses codepoint hex digits in either case, without sign or prefix.
/// Returns `None` for anything else and for values above [`MAX_CODEPOINT`].
pub fn parse_codepoint_hex(text: &str) -> Option<u32> {
    // from_str_radix would accept a leading '+'
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(text, 16).ok().filter(|&codepoint| codepoint <= MAX_CODEPOINT)
}

fn parse_codepoint(text: &str, line: &str) -> Result<u32, CodecError> {
    parse_codepoint_hex(text).ok_or_else(|| CodecError::MalformedCodepoint {
        text: text.to_string(),
        line: line.to_string(),
    })
}

fn parse_bitmap(hex: &str, hex_start: usize, line: &str) -> Result<Bitmap, CodecError> {
    if hex.is_empty() {
        return Ok(Bitmap::blank());
    }
    if let Some((i, _)) = hex.char_indices().find(|(_, ch)| !ch.is_ascii_hexdigit()) {
        return Err(CodecError::MalformedBitmapHex {
            text: hex.to_string(),
            offset: hex_start + i,
            line: line.to_string(),
        });
    }
    if hex.len() % 4 != 0 {
        return Err(CodecError::InvalidBitmapLength {
            length: hex.len(),
            line: line.to_string(),
        });
    }
    let width = hex.len() / 4;
    let bytes: Vec<u8> = hex.as_bytes().chunks(2).map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1])).collect();
    Bitmap::from_packed_bytes(&bytes, width, GLYPH_HEIGHT).map_err(|source: GlyphError| CodecError::InvalidGlyph {
        source,
        line: line.to_string(),
    })
}

fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|ch| ch.is_whitespace() || ch == '=' || ch == '"')
}

/// Quoted if the value can't stand bare or `prefer_quotes` is set, bare if quoting is impossible.
fn write_value(name: &str, value: &str, prefer_quotes: bool, codepoint: u32) -> Result<String, CodecError> {
    if is_quotable(value) && (prefer_quotes || !is_bare_value(value)) {
        Ok(format!("\"{value}\""))
    } else if is_bare_value(value) {
        Ok(value.to_string())
    } else {
        Err(CodecError::UnwritableValue {
            codepoint,
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Empty values would read back as a tag, a leading quote as the start of a quoted value.
fn is_bare_value(value: &str) -> bool {
    !value.is_empty() && !value.starts_with('"') && !value.chars().any(char::is_whitespace)
}

/// A quoted value ends at the first `"` that isn't preceded by a backslash.
fn is_quotable(value: &str) -> bool {
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' | '\n' => return false,
            '\\' => {
                if matches!(chars.next(), None | Some('\n')) {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

fn warn_skipped(text: &str, codepoint: u32) {
    let text = text.trim();
    if !text.is_empty() {
        log::warn!("U+{codepoint:04X}: skipping unrecognized metadata `{text}`");
    }
}
