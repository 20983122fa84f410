//! Top-level glyph resolution entry point (§4.7.1): dispatches a character
//! code to the simple-font or composite-font path by the font's `Subtype`.
//!
//! Grounded on `pypdfproc/fontcache.py`'s `FontCache.CharToGlyph`, which
//! switches on the same two-way split before delegating to per-kind logic.

use crate::error::Result;
use crate::font::{simple, type0};
use crate::object::cache::ObjectCache;
use crate::object::types::{Font, FontKind, Glyph};

/// Resolves `code` (a one-byte code for simple fonts, a two-byte code for
/// `Type0` fonts) against `font` to a `Glyph`.
pub fn resolve_glyph(font: &Font, code: u32, cache: &ObjectCache) -> Result<Glyph> {
    match font.kind {
        FontKind::Type0 => type0::resolve_type0_glyph(font, code, cache),
        FontKind::Type1 | FontKind::Type3 | FontKind::TrueType | FontKind::CidType0 | FontKind::CidType2 => {
            simple::resolve_simple_glyph(font, code, cache)
        }
    }
}

/// Byte width of one character code under this font: two bytes for `Type0`
/// (every built-in and embedded CMap in this scope uses 2-byte codespaces),
/// one byte otherwise.
pub fn code_byte_width(font: &Font) -> usize {
    if font.kind == FontKind::Type0 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Dict, Name, Object};

    #[test]
    fn simple_fonts_use_one_byte_codes() {
        let mut dict = Dict::new();
        dict.insert(Name::new("Subtype"), Object::Name(Name::new("Type1")));
        let font = Font::from_dict(dict).unwrap();
        assert_eq!(code_byte_width(&font), 1);
    }

    #[test]
    fn type0_fonts_use_two_byte_codes() {
        let mut dict = Dict::new();
        dict.insert(Name::new("Subtype"), Object::Name(Name::new("Type0")));
        dict.insert(Name::new("Encoding"), Object::Name(Name::new("Identity-H")));
        dict.insert(Name::new("DescendantFonts"), Object::Array(vec![]));
        let font = Font::from_dict(dict).unwrap();
        assert_eq!(code_byte_width(&font), 2);
    }
}
