//! The composite, CID-keyed font path (§4.7.2): `Type0` fonts and their
//! single `CIDFontType0`/`CIDFontType2` descendant.
//!
//! Grounded on `pypdfproc/fontcache.py`'s `CIDFontCharToCID`/
//! `CIDFontCharWidth` pair: a two-byte character code is first mapped to a
//! CID through the font's encoding CMap (`Identity-H`/`Identity-V`, or an
//! embedded CMap stream), then the CID indexes the descendant's `W` width
//! table, and separately the *original* character code (not the CID) is
//! looked up in `ToUnicode` to recover displayable text.

use crate::error::{Error, Result};
use crate::font::{cmap_builtin, width};
use crate::lex::cmap::build_mapper;
use crate::object::cache::ObjectCache;
use crate::object::types::Font;
use crate::object::types::Glyph;

const DEFAULT_DW: f64 = 1000.0;

/// Resolves one two-byte character code against a `Type0` font.
pub fn resolve_type0_glyph(font: &Font, code: u32, cache: &ObjectCache) -> Result<Glyph> {
    let descendant = font.descendant(cache)?.ok_or_else(|| {
        Error::UnknownEncoding("Type0 font has no DescendantFonts entry".to_string())
    })?;

    let cid = resolve_cid(font, code, cache)?;
    let width = resolve_width(&descendant, cid);
    let unicode = resolve_unicode(font, code, cache)?;

    Ok(Glyph {
        cid,
        unicode,
        width,
    })
}

fn resolve_cid(font: &Font, code: u32, cache: &ObjectCache) -> Result<u32> {
    match font.encoding_name() {
        Some(name) if cmap_builtin::is_identity(name) => Ok(code),
        Some(_) | None => match font.encoding_dict_id() {
            Some(id) => {
                let bytes = cache.get_decoded_stream(id)?;
                let text = String::from_utf8_lossy(&bytes).into_owned();
                let (_, cidranges) = build_mapper(&text);
                Ok(cidranges.lookup(code).unwrap_or(code))
            }
            None => Ok(code),
        },
    }
}

fn resolve_width(descendant: &Font, cid: u32) -> f64 {
    let dw = descendant.dw.unwrap_or(DEFAULT_DW);
    descendant
        .w_array
        .as_ref()
        .map(width::build_cid_widths)
        .and_then(|map| map.get(&cid).copied())
        .unwrap_or(dw)
}

/// Resolves `code` to Unicode via the font's `ToUnicode` CMap, falling back
/// to the built-in identity CMap both when `ToUnicode` is absent and when
/// it's present but misses on this code (spec.md §4.7.2).
fn resolve_unicode(font: &Font, code: u32, cache: &ObjectCache) -> Result<String> {
    match font.to_unicode(cache)? {
        Some(to_unicode) => to_unicode
            .lookup(code)
            .or_else(|_| cmap_builtin::identity_unicode(code)),
        None => cmap_builtin::identity_unicode(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Dict, Name, Number, Object};

    fn identity_type0_font() -> Font {
        let mut descendant_dict = Dict::new();
        descendant_dict.insert(Name::new("Subtype"), Object::Name(Name::new("CIDFontType2")));
        descendant_dict.insert(Name::new("DW"), Object::Number(Number::Int(500)));
        descendant_dict.insert(
            Name::new("W"),
            Object::Array(vec![
                Object::Number(Number::Int(65)),
                Object::Array(vec![Object::Number(Number::Int(700))]),
            ]),
        );

        let mut dict = Dict::new();
        dict.insert(Name::new("Subtype"), Object::Name(Name::new("Type0")));
        dict.insert(Name::new("Encoding"), Object::Name(Name::new("Identity-H")));
        dict.insert(
            Name::new("DescendantFonts"),
            Object::Array(vec![Object::Dict(descendant_dict)]),
        );
        Font::from_dict(dict).unwrap()
    }

    #[test]
    fn identity_encoding_maps_code_to_itself_as_cid() {
        let font = identity_type0_font();
        let cache = ObjectCache::open(minimal_pdf_bytes()).unwrap();
        let cid = resolve_cid(&font, 65, &cache).unwrap();
        assert_eq!(cid, 65);
    }

    #[test]
    fn width_falls_back_to_descendant_dw_outside_w_array() {
        let font = identity_type0_font();
        let descendant = font.descendant(&ObjectCache::open(minimal_pdf_bytes()).unwrap()).unwrap().unwrap();
        assert_eq!(resolve_width(&descendant, 65), 700.0);
        assert_eq!(resolve_width(&descendant, 999), 500.0);
    }

    #[test]
    fn missing_to_unicode_falls_back_to_identity() {
        let font = identity_type0_font();
        let cache = ObjectCache::open(minimal_pdf_bytes()).unwrap();
        let glyph = resolve_type0_glyph(&font, 65, &cache).unwrap();
        assert_eq!(glyph.unicode, "A");
    }

    fn minimal_pdf_bytes() -> Vec<u8> {
        let obj1 = b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n";
        let obj2 = b"2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"%PDF-1.7\n");
        let off1 = bytes.len();
        bytes.extend_from_slice(obj1);
        let off2 = bytes.len();
        bytes.extend_from_slice(obj2);
        let xref_offset = bytes.len();
        bytes.extend_from_slice(b"xref\n0 3\n");
        bytes.extend_from_slice(b"0000000000 65535 f \n");
        bytes.extend_from_slice(format!("{off1:010} 00000 n \n").as_bytes());
        bytes.extend_from_slice(format!("{off2:010} 00000 n \n").as_bytes());
        bytes.extend_from_slice(b"trailer\n<< /Size 3 /Root 1 0 R >>\n");
        bytes.extend_from_slice(format!("startxref\n{xref_offset}\n%%EOF").as_bytes());
        bytes
    }
}
