//! CMap lexer and mapper builder.
//!
//! Builds the mapping as a plain two-table record,
//! `{ single: Map<u32, String>, ranges: Vec<(u32, u32, u32)> }`, rather than
//! a closure, so a lookup is a cheap data read with no captured state.

use std::collections::HashMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum CMapTok {
    Code(u32),
    Int(i64),
    Keyword(String),
    ArrStart,
    ArrEnd,
}

fn tokenize(text: &str) -> Vec<CMapTok> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let mut out = Vec::new();
    while pos < bytes.len() {
        let b = bytes[pos];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' | 0 => pos += 1,
            b'%' => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
            }
            b'[' => {
                out.push(CMapTok::ArrStart);
                pos += 1;
            }
            b']' => {
                out.push(CMapTok::ArrEnd);
                pos += 1;
            }
            b'<' => {
                let start = pos + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end] != b'>' {
                    end += 1;
                }
                let hex = std::str::from_utf8(&bytes[start..end]).unwrap_or("0");
                let value = u32::from_str_radix(hex, 16).unwrap_or(0);
                out.push(CMapTok::Code(value));
                pos = end + 1;
            }
            b'/' => {
                let start = pos;
                pos += 1;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                out.push(CMapTok::Keyword(
                    String::from_utf8_lossy(&bytes[start..pos]).into_owned(),
                ));
            }
            b'(' => {
                // Literal strings appear in CMap headers (comments, titles)
                // but never inside the blocks this builder reads; skip past.
                let mut depth = 1;
                pos += 1;
                while pos < bytes.len() && depth > 0 {
                    match bytes[pos] {
                        b'(' => depth += 1,
                        b')' => depth -= 1,
                        _ => {}
                    }
                    pos += 1;
                }
            }
            b'+' | b'-' | b'0'..=b'9' => {
                let start = pos;
                if matches!(b, b'+' | b'-') {
                    pos += 1;
                }
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
                let text = std::str::from_utf8(&bytes[start..pos]).unwrap_or("0");
                out.push(CMapTok::Int(text.parse().unwrap_or(0)));
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                out.push(CMapTok::Keyword(
                    String::from_utf8_lossy(&bytes[start..pos]).into_owned(),
                ));
            }
        }
    }
    out
}

/// The built mapping function, realized as a plain data record.
#[derive(Debug, Clone, Default)]
pub struct CMapData {
    single: HashMap<u32, String>,
    ranges: Vec<(u32, u32, u32)>,
}

impl CMapData {
    /// Maps a source character code to a Unicode string, honoring
    /// single-char mappings before range tables.
    pub fn lookup(&self, code: u32) -> Result<String> {
        if let Some(s) = self.single.get(&code) {
            return Ok(s.clone());
        }
        for &(lo, hi, base) in &self.ranges {
            if code >= lo && code <= hi {
                let scalar = base + (code - lo);
                return char::from_u32(scalar)
                    .map(String::from)
                    .ok_or(Error::CMapMiss(code));
            }
        }
        Err(Error::CMapMiss(code))
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.ranges.is_empty()
    }
}

/// CID-range table from `begincidrange` blocks: `(lo-code, hi-code, base-cid)`.
#[derive(Debug, Clone, Default)]
pub struct CidRanges(pub Vec<(u32, u32, u32)>);

impl CidRanges {
    pub fn lookup(&self, code: u32) -> Option<u32> {
        self.0
            .iter()
            .find(|&&(lo, hi, _)| code >= lo && code <= hi)
            .map(|&(lo, _, base)| base + (code - lo))
    }
}

/// Parses a complete CMap program, building both the Unicode mapper
/// (`bfchar`/`bfrange`) and the CID-range table (`cidrange`) in one pass.
pub fn build_mapper(text: &str) -> (CMapData, CidRanges) {
    let toks = tokenize(text);
    let mut single = HashMap::new();
    let mut ranges = Vec::new();
    let mut cidranges = Vec::new();

    let mut i = 0;
    while i < toks.len() {
        match &toks[i] {
            CMapTok::Keyword(kw) if kw == "beginbfchar" => {
                i += 1;
                let mut codes = Vec::new();
                while i < toks.len() {
                    match &toks[i] {
                        CMapTok::Keyword(k) if k == "endbfchar" => {
                            i += 1;
                            break;
                        }
                        CMapTok::Code(c) => {
                            codes.push(*c);
                            i += 1;
                        }
                        _ => i += 1,
                    }
                }
                for pair in codes.chunks_exact(2) {
                    if let Some(ch) = char::from_u32(pair[1]) {
                        single.insert(pair[0], ch.to_string());
                    }
                }
            }
            CMapTok::Keyword(kw) if kw == "beginbfrange" => {
                i += 1;
                let mut codes = Vec::new();
                while i < toks.len() {
                    match &toks[i] {
                        CMapTok::Keyword(k) if k == "endbfrange" => {
                            i += 1;
                            break;
                        }
                        CMapTok::Code(c) => {
                            codes.push(*c);
                            i += 1;
                        }
                        // Array destination form is out of scope; we simply
                        // skip the array body rather than fault the whole
                        // CMap over one unsupported range entry.
                        CMapTok::ArrStart => {
                            i += 1;
                            while i < toks.len() && toks[i] != CMapTok::ArrEnd {
                                i += 1;
                            }
                            i += 1;
                        }
                        _ => i += 1,
                    }
                }
                for triple in codes.chunks_exact(3) {
                    ranges.push((triple[0], triple[1], triple[2]));
                }
            }
            CMapTok::Keyword(kw) if kw == "begincidrange" => {
                i += 1;
                let mut pending = Vec::new();
                while i < toks.len() {
                    match &toks[i] {
                        CMapTok::Keyword(k) if k == "endcidrange" => {
                            i += 1;
                            break;
                        }
                        CMapTok::Code(c) => {
                            pending.push(*c);
                            i += 1;
                        }
                        CMapTok::Int(n) => {
                            if pending.len() >= 2 {
                                let hi = pending.pop().unwrap();
                                let lo = pending.pop().unwrap();
                                cidranges.push((lo, hi, *n as u32));
                            }
                            i += 1;
                        }
                        _ => i += 1,
                    }
                }
            }
            _ => i += 1,
        }
    }

    (CMapData { single, ranges }, CidRanges(cidranges))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bfchar_single_mappings() {
        let program = "beginbfchar\n<0048> <0065>\nendbfchar";
        let (map, _) = build_mapper(program);
        assert_eq!(map.lookup(0x48).unwrap(), "e");
    }

    #[test]
    fn bfrange_expands_to_unicode_sequence() {
        let program = "beginbfrange\n<0000> <0004> <0048>\nendbfrange";
        let (map, _) = build_mapper(program);
        assert_eq!(map.lookup(0).unwrap(), "H");
        assert_eq!(map.lookup(4).unwrap(), "L");
    }

    #[test]
    fn cidrange_builds_lo_hi_base_table() {
        let program = "begincidrange\n<0000> <00FF> 0\nendcidrange";
        let (_, cids) = build_mapper(program);
        assert_eq!(cids.lookup(0x10), Some(0x10));
    }

    #[test]
    fn miss_raises_cmap_miss() {
        let (map, _) = build_mapper("beginbfchar\n<0048> <0065>\nendbfchar");
        assert!(map.lookup(0x99).is_err());
    }
}
