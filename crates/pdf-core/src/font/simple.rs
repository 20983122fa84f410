//! The simple, single-byte-code font path (§4.7.3): `Type1`, `MMType1`,
//! `TrueType`, `Type3`: any font whose codes index directly into
//! `FirstChar`/`Widths` rather than going through a CMap.
//!
//! Grounded on `pypdfproc/fontcache.py`'s `SimpleFontCharToGlyphName`/
//! `SimpleFontCharWidth` pair: glyph name resolution checks a font's own
//! `Differences` override before falling back to its named base encoding,
//! and width resolution checks the font's own `Widths` array before falling
//! back to the standard-14 AFM metrics.

use crate::error::{Error, Result};
use crate::font::encodings::{glyph_name_to_unicode, NamedEncoding};
use crate::font::{differences, standard_fonts};
use crate::object::cache::ObjectCache;
use crate::object::types::{Font, FontEncoding, Glyph};
use crate::object::Object;

/// Resolves one single-byte character code against a simple font, applying
/// the `Differences` override, falling back to the font's (or document
/// default's) named encoding, then mapping the resulting glyph name to
/// Unicode and looking up its advance width.
pub fn resolve_simple_glyph(font: &Font, code: u32, cache: &ObjectCache) -> Result<Glyph> {
    let encoding = load_encoding(font, cache)?;
    let glyph_name = glyph_name_for_code(font, code, encoding.as_ref());

    let base_font = font.base_font.as_deref().unwrap_or("");
    let unicode = match glyph_name.as_deref().and_then(glyph_name_to_unicode) {
        Some(unicode) => unicode,
        // The glyph name itself has no known Unicode mapping: consult the
        // ToUnicode CMap before falling back to the per-BaseFont
        // remediation tables (spec.md §4.7.4's fallback order).
        None => match font
            .to_unicode(cache)?
            .and_then(|to_unicode| to_unicode.lookup(code).ok())
        {
            Some(unicode) => unicode,
            None => glyph_name
                .as_deref()
                .and_then(|n| differences::remediate_glyph_name(base_font, n))
                .ok_or_else(|| Error::MissingGlyph {
                    code,
                    name: glyph_name.clone(),
                })?,
        },
    };

    let width = width_for_code(font, code, glyph_name.as_deref(), base_font);
    Ok(Glyph {
        cid: code,
        unicode,
        width,
    })
}

fn load_encoding(font: &Font, cache: &ObjectCache) -> Result<Option<FontEncoding>> {
    let Some(id) = font.encoding_dict_id() else {
        return Ok(None);
    };
    let resolved = cache.resolve(id)?;
    let Some(dict) = resolved.as_dict() else {
        return Ok(None);
    };
    Ok(Some(FontEncoding::from_dict(dict.clone())))
}

fn named_encoding_for(font: &Font, encoding: Option<&FontEncoding>) -> NamedEncoding {
    let name = encoding
        .and_then(|e| e.base_encoding.as_deref())
        .or_else(|| font.encoding_name())
        .unwrap_or("StandardEncoding");
    NamedEncoding::from_name(name).unwrap_or(NamedEncoding::Standard)
}

fn glyph_name_for_code(font: &Font, code: u32, encoding: Option<&FontEncoding>) -> Option<String> {
    if code > u8::MAX as u32 {
        return None;
    }
    if let Some(enc) = encoding {
        if let Some(name) = enc.differences().get(&(code as i64)) {
            return Some(name.clone());
        }
    }
    named_encoding_for(font, encoding)
        .glyph_name(code as u8)
        .map(str::to_string)
}

fn width_for_code(font: &Font, code: u32, glyph_name: Option<&str>, base_font: &str) -> f64 {
    if let (Some(first), Some(code_i)) = (font.first_char, Some(code as i64)) {
        let idx = code_i - first;
        if idx >= 0 {
            if let Some(w) = font.widths.get(idx as usize) {
                return *w;
            }
        }
    }
    if let Some(name) = glyph_name {
        if let Some(w) = standard_fonts::width_for_glyph(base_font, name) {
            return w;
        }
    }
    font.dict
        .get(&crate::object::Name::new("MissingWidth"))
        .and_then(Object::as_f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Dict, Name, Number};

    fn helvetica_font() -> Font {
        let mut dict = Dict::new();
        dict.insert(Name::new("Subtype"), Object::Name(Name::new("Type1")));
        dict.insert(Name::new("BaseFont"), Object::Name(Name::new("Helvetica")));
        Font::from_dict(dict).unwrap()
    }

    #[test]
    fn resolves_ascii_code_through_standard_encoding() {
        let font = helvetica_font();
        let cache = ObjectCache::open(minimal_pdf_bytes()).unwrap();
        let glyph = resolve_simple_glyph(&font, b'A' as u32, &cache).unwrap();
        assert_eq!(glyph.unicode, "A");
        assert_eq!(glyph.width, 667.0);
    }

    #[test]
    fn explicit_widths_array_overrides_standard_metrics() {
        let mut dict = Dict::new();
        dict.insert(Name::new("Subtype"), Object::Name(Name::new("Type1")));
        dict.insert(Name::new("BaseFont"), Object::Name(Name::new("Helvetica")));
        dict.insert(Name::new("FirstChar"), Object::Number(Number::Int(65)));
        dict.insert(
            Name::new("Widths"),
            Object::Array(vec![Object::Number(Number::Int(999))]),
        );
        let font = Font::from_dict(dict).unwrap();
        let cache = ObjectCache::open(minimal_pdf_bytes()).unwrap();
        let glyph = resolve_simple_glyph(&font, b'A' as u32, &cache).unwrap();
        assert_eq!(glyph.width, 999.0);
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
