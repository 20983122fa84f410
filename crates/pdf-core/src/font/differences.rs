//! Glyph-name remediation for fonts whose `Differences` array uses private,
//! non-Adobe-Glyph-List names.
//!
//! Grounded on `pypdfproc/fontcache.py`'s `MissingGlyphName`: a couple of
//! commonly-embedded symbol fonts (`AdvP4C4E74`, `AdvPSSym`) ship
//! `Differences` glyph names (`C0`, `C6`, `C14`, `C15`, `C211`) that don't
//! resolve through the standard Adobe Glyph List at all. The original keeps
//! a small per-font override table keyed on a `BaseFont` suffix match for
//! exactly these, falling back to a generic `gNN`/`cidNN`/`indexNN`
//! numeric-suffix parse for anything else editors commonly emit for
//! unnamed glyphs.

use std::collections::HashMap;
use std::sync::OnceLock;

fn adv_p4c4e74() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("C0", "\u{2212}"),  // minus sign
            ("C6", "\u{00B1}"),  // plus-minus sign
            ("C14", "\u{00B0}"), // degree symbol
            ("C15", "\u{2022}"), // bullet
            ("C211", "\u{00A9}"), // copyright
        ])
    })
}

fn adv_ps_sym() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| HashMap::from([("C211", "\u{00A9}")])) // copyright
}

/// `base_font.endswith(...)` in the original, since subset-tagged names
/// (`ABCDEF+AdvP4C4E74`) still carry the bare family name as a suffix.
fn base_font_table(base_font: &str) -> Option<&'static HashMap<&'static str, &'static str>> {
    if base_font.ends_with("AdvP4C4E74") {
        Some(adv_p4c4e74())
    } else if base_font.ends_with("AdvPSSym") {
        Some(adv_ps_sym())
    } else {
        None
    }
}

/// Parses a generic unnamed-glyph suffix (`g42`, `cid42`, `index42`) as a
/// raw Unicode scalar value, the convention most font-subsetting tools fall
/// back to for glyphs with no real PostScript name.
fn numeric_suffix_codepoint(name: &str) -> Option<String> {
    for prefix in ["g", "cid", "index"] {
        if let Some(digits) = name.strip_prefix(prefix) {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(n) = digits.parse::<u32>() {
                    return char::from_u32(n).map(String::from);
                }
            }
        }
    }
    None
}

/// Attempts to resolve a `Differences` glyph name that wasn't found in the
/// standard glyph-name table, using `base_font` to pick a known override
/// table before falling back to the generic numeric-suffix convention.
pub fn remediate_glyph_name(base_font: &str, name: &str) -> Option<String> {
    if let Some(table) = base_font_table(base_font) {
        if let Some(&unicode) = table.get(name) {
            return Some(unicode.to_string());
        }
    }
    numeric_suffix_codepoint(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_symbol_font_override_wins() {
        assert_eq!(
            remediate_glyph_name("AdvP4C4E74", "C0"),
            Some("\u{2212}".to_string())
        );
    }

    #[test]
    fn subset_tagged_base_font_still_matches_by_suffix() {
        assert_eq!(
            remediate_glyph_name("ABCDEF+AdvPSSym", "C211"),
            Some("\u{00A9}".to_string())
        );
    }

    #[test]
    fn generic_fonts_fall_back_to_numeric_suffix() {
        assert_eq!(remediate_glyph_name("SomeSubsetFont", "g65"), Some("A".to_string()));
    }

    #[test]
    fn unrecognized_name_returns_none() {
        assert_eq!(remediate_glyph_name("SomeSubsetFont", "weirdname"), None);
    }
}
