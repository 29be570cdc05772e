//! GFX font model and parser.
//!
//! Fonts arrive as exported Adafruit GFX font headers: a C source file with a
//! bitmap byte array, a glyph table, and a `GFXfont` struct tying them
//! together. [`Font::parse`] reads that source directly, so the same `.h`
//! files that ship to the firmware feed the software renderer.
//!
//! Glyph bitmaps are 1 bit per pixel, packed row-major, MSB first, starting
//! at the glyph's byte offset into the shared bitmap array.

use std::collections::HashMap;

use thiserror::Error;

/// Errors from parsing a GFX font source file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontError {
    #[error("no `GFXfont` declaration found")]
    NoFont,
    #[error("no bitmap array found")]
    NoBitmaps,
    #[error("no glyph table found")]
    NoGlyphs,
    #[error("malformed font source: {0}")]
    Malformed(String),
}

// =============================================================================
// Glyph
// =============================================================================

/// One entry of a GFX glyph table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Offset of the glyph's first byte in the font bitmap array.
    pub byte_offset: usize,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Cursor advance after drawing.
    pub x_advance: i32,
    /// Horizontal offset from the cursor to the bitmap's left edge.
    pub dx: i32,
    /// Vertical offset from the baseline to the bitmap's top edge
    /// (negative above the baseline).
    pub dy: i32,
}

// =============================================================================
// Font
// =============================================================================

/// A parsed GFX font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub name: String,
    /// Shared glyph bitmap data, 1 bit per pixel, MSB first.
    pub bitmap: Vec<u8>,
    /// Glyph table indexed by `char code - first`.
    pub glyphs: Vec<Glyph>,
    /// First character code covered by the glyph table.
    pub first: u32,
    /// Last character code covered by the glyph table.
    pub last: u32,
    /// Newline advance in pixels.
    pub y_advance: i32,
    /// Distance from the top of a text run to the baseline, derived from the
    /// tallest ascender in the glyph table.
    pub baseline: i32,
}

impl Font {
    /// Parse the C source of an exported GFX font header.
    pub fn parse(source: &str) -> Result<Self, FontError> {
        let name = font_name(source).ok_or(FontError::NoFont)?;

        let bitmap: Vec<u8> = brace_block(source, "Bitmaps")
            .ok_or(FontError::NoBitmaps)?
            .split(',')
            .filter_map(parse_int)
            .map(|v| (v & 0xff) as u8)
            .collect();
        if bitmap.is_empty() {
            return Err(FontError::NoBitmaps);
        }

        let glyph_block = brace_block(source, "Glyphs").ok_or(FontError::NoGlyphs)?;
        let mut glyphs = Vec::new();
        for group in inner_groups(glyph_block) {
            let fields: Vec<i64> = group.split(',').filter_map(parse_int).collect();
            let &[byte_offset, width, height, x_advance, dx, dy] = &fields[..] else {
                return Err(FontError::Malformed(format!(
                    "glyph entry `{{{group}}}` does not have 6 fields"
                )));
            };
            if byte_offset < 0 || width < 0 || height < 0 {
                return Err(FontError::Malformed(format!(
                    "glyph entry `{{{group}}}` has negative dimensions"
                )));
            }
            glyphs.push(Glyph {
                byte_offset: byte_offset as usize,
                width: width as u32,
                height: height as u32,
                x_advance: x_advance as i32,
                dx: dx as i32,
                dy: dy as i32,
            });
        }
        if glyphs.is_empty() {
            return Err(FontError::NoGlyphs);
        }

        // The font struct carries casts and array names next to the scalar
        // fields; the numbers in declaration order are first, last, yAdvance.
        let font_block = brace_block(source, &format!("GFXfont {name}"))
            .or_else(|| brace_block(source, "GFXfont"))
            .ok_or(FontError::NoFont)?;
        let scalars: Vec<i64> = font_block.split(',').filter_map(parse_int).collect();
        let &[first, last, y_advance] = &scalars[..] else {
            return Err(FontError::Malformed(
                "font struct does not have first/last/yAdvance fields".into(),
            ));
        };

        let baseline = glyphs.iter().map(|g| -g.dy).max().unwrap_or(0).max(0);

        Ok(Self {
            name,
            bitmap,
            glyphs,
            first: first as u32,
            last: last as u32,
            y_advance: y_advance as i32,
            baseline,
        })
    }

    /// Look up the glyph for a character, if the font covers it.
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        let code = c as u32;
        if code > self.last {
            return None;
        }
        let index = code.checked_sub(self.first)?;
        self.glyphs.get(index as usize)
    }

    /// Read one pixel of a glyph's bitmap.
    pub fn glyph_pixel(&self, glyph: &Glyph, x: u32, y: u32) -> bool {
        let i = (y * glyph.width + x) as usize;
        let byte = match self.bitmap.get(glyph.byte_offset + i / 8) {
            Some(byte) => *byte,
            None => return false,
        };
        byte & (1 << (7 - i % 8)) != 0
    }
}

// =============================================================================
// FontLibrary
// =============================================================================

/// A name-keyed set of loaded fonts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontLibrary {
    fonts: HashMap<String, Font>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font under its own name, replacing any previous one.
    pub fn add(&mut self, font: Font) {
        self.fonts.insert(font.name.clone(), font);
    }

    /// Parse a GFX font source and register it. Returns the font's name.
    pub fn add_source(&mut self, source: &str) -> Result<String, FontError> {
        let font = Font::parse(source)?;
        let name = font.name.clone();
        self.add(font);
        Ok(name)
    }

    pub fn get(&self, name: &str) -> Option<&Font> {
        self.fonts.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Font> {
        self.fonts.remove(name)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

// =============================================================================
// Source scanning
// =============================================================================

/// Parse a decimal or hex integer token, ignoring surrounding whitespace.
fn parse_int(token: &str) -> Option<i64> {
    let token = token.trim();
    let (negative, token) = match token.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, token),
    };
    let value = if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        token.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}

/// Find the identifier following the first `GFXfont` declaration that is not
/// the glyph-table typedef.
fn font_name(source: &str) -> Option<String> {
    let mut search = source;
    while let Some(at) = search.find("GFXfont") {
        let rest = &search[at + "GFXfont".len()..];
        let ident: String = rest
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if !ident.is_empty() {
            return Some(ident);
        }
        search = rest;
    }
    None
}

/// The content between the outermost braces following `marker`.
fn brace_block<'src>(source: &'src str, marker: &str) -> Option<&'src str> {
    let at = source.find(marker)?;
    let rest = &source[at..];
    let open = rest.find('{')?;
    let mut depth = 0usize;
    for (i, c) in rest[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Iterate the `{...}` groups inside a brace block.
fn inner_groups(block: &str) -> impl Iterator<Item = &str> {
    let mut rest = block;
    std::iter::from_fn(move || {
        let open = rest.find('{')?;
        let close = rest[open..].find('}')? + open;
        let group = &rest[open + 1..close];
        rest = &rest[close + 1..];
        Some(group)
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Glyph '0' is a 3x3 ring (rows 111/101/111), glyph '1' a 2x3 right
    // column (01/01/01); bits pack as one continuous MSB-first stream.
    const TINY_FONT: &str = r#"
const uint8_t tiny3ptBitmaps[] PROGMEM = {
  0xF7, 0x80, 0x54,
};

const GFXglyph tiny3ptGlyphs[] PROGMEM = {
  {0, 3, 3, 4, 0, -3}, // 0x30 '0'
  {2, 2, 3, 3, 0, -3}, // 0x31 '1'
};

const GFXfont tiny3pt PROGMEM = {
  (uint8_t *)tiny3ptBitmaps, (GFXglyph *)tiny3ptGlyphs, 0x30, 0x31, 5,
};
"#;

    #[test]
    fn test_parse_font() {
        let font = Font::parse(TINY_FONT).unwrap();
        assert_eq!(font.name, "tiny3pt");
        assert_eq!(font.bitmap, vec![0xF7, 0x80, 0x54]);
        assert_eq!(font.glyphs.len(), 2);
        assert_eq!(font.first, 0x30);
        assert_eq!(font.last, 0x31);
        assert_eq!(font.y_advance, 5);
        assert_eq!(font.baseline, 3);

        let zero = font.glyphs[0];
        assert_eq!(zero.byte_offset, 0);
        assert_eq!(zero.width, 3);
        assert_eq!(zero.height, 3);
        assert_eq!(zero.x_advance, 4);
        assert_eq!(zero.dy, -3);
    }

    #[test]
    fn test_glyph_lookup() {
        let font = Font::parse(TINY_FONT).unwrap();
        assert!(font.glyph('0').is_some());
        assert!(font.glyph('1').is_some());
        assert!(font.glyph('2').is_none());
        assert!(font.glyph(' ').is_none());
    }

    #[test]
    fn test_glyph_pixels() {
        let font = Font::parse(TINY_FONT).unwrap();
        let zero = *font.glyph('0').unwrap();

        assert!(font.glyph_pixel(&zero, 0, 0));
        assert!(font.glyph_pixel(&zero, 1, 0));
        assert!(font.glyph_pixel(&zero, 2, 0));
        assert!(font.glyph_pixel(&zero, 0, 1));
        assert!(!font.glyph_pixel(&zero, 1, 1));
        assert!(font.glyph_pixel(&zero, 2, 1));

        let one = *font.glyph('1').unwrap();
        assert!(!font.glyph_pixel(&one, 0, 0));
        assert!(font.glyph_pixel(&one, 1, 0));
        assert!(font.glyph_pixel(&one, 1, 1));
        assert!(font.glyph_pixel(&one, 1, 2));
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert_eq!(Font::parse("int main() {}"), Err(FontError::NoFont));
        assert_eq!(
            Font::parse("const GFXfont empty PROGMEM = {0x20, 0x7E, 13};"),
            Err(FontError::NoBitmaps)
        );
    }

    #[test]
    fn test_library() {
        let mut fonts = FontLibrary::new();
        let name = fonts.add_source(TINY_FONT).unwrap();
        assert_eq!(name, "tiny3pt");
        assert!(fonts.get("tiny3pt").is_some());
        assert_eq!(fonts.len(), 1);

        fonts.remove("tiny3pt");
        assert!(fonts.is_empty());
    }
}
