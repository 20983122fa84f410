//! The two built-in identity CMaps every Type0 font can reference by name
//! instead of an embedded CMap stream.
//!
//! Grounded on `pypdfproc/cmap_identity_v.py`: both `Identity-H` and
//! `Identity-V` map a two-byte code directly to the identical CID; they
//! differ only in writing direction, which this text-extraction engine
//! never renders, so one analytic range table serves both names rather than
//! embedding the original's full PostScript CMap program.

use crate::error::{Error, Result};
use crate::lex::cmap::CidRanges;

/// CID-range table for `Identity-H`/`Identity-V`: every code in the full
/// two-byte space maps to the CID of the same value.
pub fn identity_cid_ranges() -> CidRanges {
    CidRanges(vec![(0x0000, 0xFFFF, 0x0000)])
}

pub fn is_identity(name: &str) -> bool {
    matches!(name, "Identity-H" | "Identity-V")
}

/// The `ToUnicode` fallback every `Type0` font gets when it carries no
/// `ToUnicode` CMap, or when the one it does carry misses: treats the
/// character code itself as the Unicode scalar value, the same identity
/// relationship `Identity-H`/`Identity-V` already apply between code and
/// CID.
pub fn identity_unicode(code: u32) -> Result<String> {
    char::from_u32(code)
        .map(String::from)
        .ok_or(Error::CMapMiss(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_maps_code_to_itself() {
        let ranges = identity_cid_ranges();
        assert_eq!(ranges.lookup(0x1234), Some(0x1234));
    }

    #[test]
    fn recognizes_both_identity_names() {
        assert!(is_identity("Identity-H"));
        assert!(is_identity("Identity-V"));
        assert!(!is_identity("Custom-CMap"));
    }

    #[test]
    fn identity_unicode_treats_code_as_scalar() {
        assert_eq!(identity_unicode(0x48).unwrap(), "H");
    }

    #[test]
    fn identity_unicode_rejects_surrogate_codes() {
        assert!(identity_unicode(0xD800).is_err());
    }
}
