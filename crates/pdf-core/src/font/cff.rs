//! Compact Font Format parser, just far enough to recover a CID-keyed CFF's
//! CID -> glyph-name mapping (`charset`) for embedded `Type0` descendant
//! fonts whose `CIDToGIDMap` is `Identity` and whose widths/Unicode this
//! crate already gets from `W`/`ToUnicode`.
//!
//! Grounded on `pypdfproc/parser/cff.py`: the same Header -> Name INDEX ->
//! Top DICT INDEX -> String INDEX -> Global Subr INDEX -> charset layout,
//! the same variable-length DICT number encoding, and charset format 0
//! only (formats 1/2's range-compressed charsets are out of scope, per the
//! same limitation the original documents).

use crate::error::{Error, Result};

mod standard_strings;
pub use standard_strings::STANDARD_STRINGS;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DictValue {
    Int(i64),
    Real(f64),
}

impl DictValue {
    fn as_i64(self) -> i64 {
        match self {
            Self::Int(n) => n,
            Self::Real(f) => f as i64,
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn u8(&mut self) -> Result<u8> {
        let b = self.bytes.get(self.pos).copied().ok_or_else(eof)?;
        self.pos += 1;
        Ok(b)
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes([self.u8()?, self.u8()?]))
    }

    fn offset(&mut self, off_size: u8) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..off_size {
            value = (value << 8) | u32::from(self.u8()?);
        }
        Ok(value)
    }

}

fn eof() -> Error {
    Error::MalformedToken {
        offset: 0,
        reason: "unexpected end of CFF data".to_string(),
    }
}

/// A parsed CFF INDEX: each entry's raw bytes, offsets resolved.
struct CffIndex<'a> {
    entries: Vec<&'a [u8]>,
}

fn read_index<'a>(r: &mut Reader<'a>) -> Result<CffIndex<'a>> {
    let count = r.u16()?;
    if count == 0 {
        return Ok(CffIndex { entries: Vec::new() });
    }
    let off_size = r.u8()?;
    let mut offsets = Vec::with_capacity(count as usize + 1);
    for _ in 0..=count {
        offsets.push(r.offset(off_size)?);
    }
    let data_start = r.pos;
    let mut entries = Vec::with_capacity(count as usize);
    for w in offsets.windows(2) {
        let (start, end) = (w[0] as usize, w[1] as usize);
        let slice = r
            .bytes
            .get(data_start + start - 1..data_start + end - 1)
            .ok_or_else(eof)?;
        entries.push(slice);
    }
    r.pos = data_start + (*offsets.last().unwrap_or(&1) as usize).saturating_sub(1);
    Ok(CffIndex { entries })
}

/// Parses one Top DICT's operand/operator stream, returning `(operator,
/// operands)` pairs. Operators `0..=21` are single-byte; `12` escapes a
/// two-byte operator encoded as `1200 + second_byte`.
fn parse_dict(bytes: &[u8]) -> Result<Vec<(u16, Vec<DictValue>)>> {
    let mut out = Vec::new();
    let mut operands = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        match b0 {
            0..=11 | 13..=21 => {
                out.push((u16::from(b0), std::mem::take(&mut operands)));
                i += 1;
            }
            12 => {
                let b1 = *bytes.get(i + 1).ok_or_else(eof)?;
                out.push((1200 + u16::from(b1), std::mem::take(&mut operands)));
                i += 2;
            }
            28 => {
                let v = i16::from_be_bytes([
                    *bytes.get(i + 1).ok_or_else(eof)?,
                    *bytes.get(i + 2).ok_or_else(eof)?,
                ]);
                operands.push(DictValue::Int(i64::from(v)));
                i += 3;
            }
            29 => {
                let v = i32::from_be_bytes([
                    *bytes.get(i + 1).ok_or_else(eof)?,
                    *bytes.get(i + 2).ok_or_else(eof)?,
                    *bytes.get(i + 3).ok_or_else(eof)?,
                    *bytes.get(i + 4).ok_or_else(eof)?,
                ]);
                operands.push(DictValue::Int(i64::from(v)));
                i += 5;
            }
            30 => {
                let (value, consumed) = parse_real(&bytes[i + 1..]);
                operands.push(DictValue::Real(value));
                i += 1 + consumed;
            }
            32..=246 => {
                operands.push(DictValue::Int(i64::from(b0) - 139));
                i += 1;
            }
            247..=250 => {
                let b1 = *bytes.get(i + 1).ok_or_else(eof)?;
                operands.push(DictValue::Int((i64::from(b0) - 247) * 256 + i64::from(b1) + 108));
                i += 2;
            }
            251..=254 => {
                let b1 = *bytes.get(i + 1).ok_or_else(eof)?;
                operands.push(DictValue::Int(-(i64::from(b0) - 251) * 256 - i64::from(b1) - 108));
                i += 2;
            }
            255 => {
                // Not used by DICT operands (reserved for CharString fixed
                // values); treat as malformed rather than guessing a width.
                return Err(Error::MalformedToken {
                    offset: i,
                    reason: "byte 255 is not valid in a CFF DICT".to_string(),
                });
            }
        }
    }
    Ok(out)
}

/// Decodes a CFF "real" number: packed BCD nibbles terminated by nibble
/// `0xf`. Returns the value and the number of bytes consumed.
fn parse_real(bytes: &[u8]) -> (f64, usize) {
    let mut s = String::new();
    let mut consumed = 0;
    'outer: for &byte in bytes {
        consumed += 1;
        for nibble in [byte >> 4, byte & 0x0f] {
            match nibble {
                0..=9 => s.push((b'0' + nibble) as char),
                0xa => s.push('.'),
                0xb => s.push('E'),
                0xc => s.push_str("E-"),
                0xe => s.push('-'),
                0xf => break 'outer,
                _ => {}
            }
        }
    }
    (s.parse().unwrap_or(0.0), consumed)
}

/// A CFF's charset, read far enough to answer either of the two questions
/// that matter for text extraction: for a CID-keyed font (`ROS` present in
/// the Top DICT), "what CID is this GID?"; for an ordinary name-keyed font,
/// "what glyph name is this GID?".
pub enum Charset {
    Cid(Vec<u32>),
    Names(Vec<String>),
}

pub struct CffFont {
    pub charset: Charset,
}

impl CffFont {
    pub fn glyph_name_for_cid(&self, cid: u32) -> Option<String> {
        match &self.charset {
            Charset::Cid(gid_to_cid) => gid_to_cid
                .iter()
                .position(|&c| c == cid)
                .map(|gid| format!("cid{gid:05}")),
            Charset::Names(names) => names.get(cid as usize).cloned(),
        }
    }
}

/// Parses a complete CFF table and extracts its charset.
pub fn parse_cff(data: &[u8]) -> Result<CffFont> {
    let mut r = Reader::new(data);
    let _major = r.u8()?;
    let _minor = r.u8()?;
    let hdr_size = r.u8()?;
    let _off_size = r.u8()?;
    r.pos = hdr_size as usize;

    let _name_index = read_index(&mut r)?;
    let top_dict_index = read_index(&mut r)?;
    let string_index = read_index(&mut r)?;
    let _global_subr_index = read_index(&mut r)?;

    let top_dict_bytes = top_dict_index.entries.first().ok_or_else(|| Error::MalformedToken {
        offset: 0,
        reason: "CFF has no Top DICT".to_string(),
    })?;
    let entries = parse_dict(top_dict_bytes)?;
    let is_cid = entries.iter().any(|(op, _)| *op == 1230); // ROS operator

    let charset_offset = entries
        .iter()
        .find(|(op, _)| *op == 15)
        .and_then(|(_, v)| v.first())
        .map(|v| v.as_i64() as usize);
    let charstrings_offset = entries
        .iter()
        .find(|(op, _)| *op == 17)
        .and_then(|(_, v)| v.first())
        .map(|v| v.as_i64() as usize)
        .ok_or_else(|| Error::MalformedToken {
            offset: 0,
            reason: "Top DICT has no CharStrings offset".to_string(),
        })?;

    let mut cs_reader = Reader::new(data);
    cs_reader.pos = charstrings_offset;
    let charstrings = read_index(&mut cs_reader)?;
    let glyph_count = charstrings.entries.len();

    let sids = match charset_offset {
        None | Some(0) => (0..glyph_count as u32).collect(), // ISOAdobe predefined: identity
        Some(offset) => parse_charset_format0(data, offset, glyph_count)?,
    };

    let charset = if is_cid {
        Charset::Cid(sids)
    } else {
        Charset::Names(
            sids.iter()
                .map(|&sid| sid_to_name(sid, &string_index))
                .collect(),
        )
    };

    Ok(CffFont { charset })
}

/// Resolves a string ID: the first 391 SIDs are the CFF Standard Strings;
/// anything past that indexes the font's own String INDEX.
fn sid_to_name(sid: u32, string_index: &CffIndex<'_>) -> String {
    let sid = sid as usize;
    if sid < STANDARD_STRINGS.len() {
        return STANDARD_STRINGS[sid].to_string();
    }
    string_index
        .entries
        .get(sid - STANDARD_STRINGS.len())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_else(|| format!("sid{sid}"))
}

fn parse_charset_format0(data: &[u8], offset: usize, glyph_count: usize) -> Result<Vec<u32>> {
    let mut r = Reader::new(data);
    r.pos = offset;
    let format = r.u8()?;
    if format != 0 {
        return Err(Error::Unsupported(format!(
            "CFF charset format {format} (only format 0 is supported)"
        )));
    }
    let mut gid_to_sid = vec![0u32]; // GID 0 is always .notdef
    for _ in 1..glyph_count {
        gid_to_sid.push(u32::from(r.u16()?));
    }
    Ok(gid_to_sid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_byte_dict_operand() {
        // 139 encodes operand value 0 (32..=246 maps to value-139).
        let dict = [139u8, 15]; // "0 charset" (operator 15)
        let parsed = parse_dict(&dict).unwrap();
        assert_eq!(parsed[0].0, 15);
        assert_eq!(parsed[0].1[0].as_i64(), 0);
    }

    #[test]
    fn parses_two_byte_escape_operator() {
        let dict = [139u8, 12, 30]; // ROS operator, value 0
        let parsed = parse_dict(&dict).unwrap();
        assert_eq!(parsed[0].0, 1230);
    }

    #[test]
    fn parses_negative_two_byte_operand() {
        // 251 range encodes negative values; with no trailing operator byte
        // the operand is pushed but never flushed into an entry.
        let dict = [251u8, 0];
        let parsed = parse_dict(&dict).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn real_number_parses_decimal_value() {
        // 1.5 => nibbles [1, 0xa(.), 5, 0xf(end)]
        let bytes = [0x1a, 0x5f];
        let (value, consumed) = parse_real(&bytes);
        assert!((value - 1.5).abs() < 1e-9);
        assert_eq!(consumed, 2);
    }
}
