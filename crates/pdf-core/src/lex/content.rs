//! Content-stream lexer: the per-page drawing-operator stream.
//!
//! The original tokenizer emits a flat postfix stream and regroups it into
//! prefix (operator, operands) form in a second pass over raw token indices.
//! Token composites (arrays, inline dictionaries) are parsed recursively
//! here instead, which makes the regrouping pass a straight "how many
//! trailing operands does this operator bind" lookup rather than a
//! backward index scan; same arity table, same bound result, an
//! idiomatic-Rust realization of the same regrouping step.

use indexmap::IndexMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    Int(i64),
    Float(f64),
    Name(String),
    Str(Vec<u8>),
    Array(Vec<ContentValue>),
    Dict(IndexMap<String, ContentValue>),
}

impl ContentValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ContentValue]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Str(b) => Some(b),
            _ => None,
        }
    }
}

/// A fully-bound content-stream operator: an operator name plus exactly the
/// operands it consumes, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub op: String,
    pub operands: Vec<ContentValue>,
    pub offset: usize,
}

enum Arity {
    Fixed(usize),
    Variable,
}

fn arity_of(op: &str) -> Option<Arity> {
    const ZERO: &[&str] = &[
        "q", "Q", "h", "S", "s", "F", "f", "f*", "B", "B*", "b", "b*", "n", "W", "W*", "BT", "ET",
        "T*", "EMC",
    ];
    const ONE: &[&str] = &[
        "w", "J", "j", "M", "ri", "i", "gs", "CS", "cs", "G", "g", "Do", "Tc", "Tw", "Tz", "TL",
        "Tr", "Ts", "Tj", "'", "MP", "BMC", "TJ",
    ];
    const TWO: &[&str] = &["m", "l", "Tf", "Td", "TD", "DP", "BDC", "d"];
    const THREE: &[&str] = &["RG", "rg", "\""];
    const FOUR: &[&str] = &["v", "y", "re", "K", "k"];
    const SIX: &[&str] = &["cm", "c", "Tm"];
    const VARIABLE: &[&str] = &["SC", "sc", "SCN", "scn"];

    if ZERO.contains(&op) {
        Some(Arity::Fixed(0))
    } else if ONE.contains(&op) {
        Some(Arity::Fixed(1))
    } else if TWO.contains(&op) {
        Some(Arity::Fixed(2))
    } else if THREE.contains(&op) {
        Some(Arity::Fixed(3))
    } else if FOUR.contains(&op) {
        Some(Arity::Fixed(4))
    } else if SIX.contains(&op) {
        Some(Arity::Fixed(6))
    } else if VARIABLE.contains(&op) {
        Some(Arity::Variable)
    } else {
        None
    }
}

pub fn lex_content(bytes: &[u8]) -> Result<Vec<ContentOp>> {
    let mut p = ContentParser { bytes, pos: 0 };
    let mut ops = Vec::new();
    let mut pending: Vec<ContentValue> = Vec::new();

    loop {
        p.skip_ws();
        let Some(b) = p.peek() else { break };
        let start = p.pos;

        if let Some(value) = p.try_parse_operand(b)? {
            pending.push(value);
            continue;
        }

        let word = p.read_word();
        if word.is_empty() {
            return Err(Error::MalformedToken {
                offset: start,
                reason: format!("unexpected byte {b:#04x} in content stream"),
            });
        }
        let Some(arity) = arity_of(&word) else {
            return Err(Error::MalformedToken {
                offset: start,
                reason: format!("unknown content operator {word:?}"),
            });
        };
        let operands = match arity {
            Arity::Fixed(n) => {
                if pending.len() != n {
                    return Err(Error::MalformedToken {
                        offset: start,
                        reason: format!(
                            "operator {word:?} expects {n} operands, found {}",
                            pending.len()
                        ),
                    });
                }
                std::mem::take(&mut pending)
            }
            Arity::Variable => std::mem::take(&mut pending),
        };
        ops.push(ContentOp {
            op: word,
            operands,
            offset: start,
        });
    }

    Ok(ops)
}

struct ContentParser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

fn is_ws(b: u8) -> bool {
    matches!(b, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

fn is_delim(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

impl<'a> ContentParser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        loop {
            match self.peek() {
                Some(b) if is_ws(b) => self.pos += 1,
                Some(b'%') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_ws(b) || is_delim(b) {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    /// Attempts to parse a single operand value at the cursor. Returns
    /// `None` (consuming nothing) when the next byte starts a bare word
    /// (an operator), since operators are handled by the caller.
    fn try_parse_operand(&mut self, b: u8) -> Result<Option<ContentValue>> {
        match b {
            b'+' | b'-' | b'.' | b'0'..=b'9' => Ok(Some(self.parse_number())),
            b'/' => Ok(Some(self.parse_name())),
            b'(' => Ok(Some(self.parse_literal_string()?)),
            b'[' => Ok(Some(self.parse_array()?)),
            b'<' => {
                if self.bytes.get(self.pos + 1) == Some(&b'<') {
                    Ok(Some(self.parse_dict()?))
                } else {
                    Ok(Some(self.parse_hex_string()?))
                }
            }
            _ => Ok(None),
        }
    }

    fn parse_number(&mut self) -> ContentValue {
        let start = self.pos;
        let mut is_float = false;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' => {
                    is_float = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("0");
        if is_float {
            ContentValue::Float(text.parse().unwrap_or(0.0))
        } else {
            ContentValue::Int(text.parse().unwrap_or(0))
        }
    }

    fn parse_name(&mut self) -> ContentValue {
        self.pos += 1; // '/'
        let mut name = Vec::new();
        while let Some(b) = self.peek() {
            if is_ws(b) || is_delim(b) {
                break;
            }
            if b == b'#' && self.pos + 2 < self.bytes.len() {
                let hi = hex_val(self.bytes[self.pos + 1]);
                let lo = hex_val(self.bytes[self.pos + 2]);
                if let (Some(hi), Some(lo)) = (hi, lo) {
                    name.push(hi * 16 + lo);
                    self.pos += 3;
                    continue;
                }
            }
            name.push(b);
            self.pos += 1;
        }
        ContentValue::Name(String::from_utf8_lossy(&name).into_owned())
    }

    fn parse_literal_string(&mut self) -> Result<ContentValue> {
        let start = self.pos;
        self.pos += 1; // '('
        let mut depth = 1i32;
        let mut out = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(Error::MalformedToken {
                    offset: start,
                    reason: "unterminated literal string".to_string(),
                });
            };
            self.pos += 1;
            match b {
                b'\\' => {
                    let Some(esc) = self.peek() else { break };
                    self.pos += 1;
                    match esc {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0c),
                        b'(' => out.push(b'('),
                        b')' => out.push(b')'),
                        b'\\' => out.push(b'\\'),
                        b'\r' | b'\n' => {}
                        d @ b'0'..=b'7' => {
                            let mut val = (d - b'0') as u32;
                            for _ in 0..2 {
                                match self.peek() {
                                    Some(o @ b'0'..=b'7') => {
                                        val = val * 8 + (o - b'0') as u32;
                                        self.pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            out.push((val & 0xFF) as u8);
                        }
                        other => out.push(other),
                    }
                }
                b'(' => {
                    depth += 1;
                    out.push(b'(');
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    out.push(b')');
                }
                other => out.push(other),
            }
        }
        Ok(ContentValue::Str(out))
    }

    fn parse_hex_string(&mut self) -> Result<ContentValue> {
        let start = self.pos;
        self.pos += 1; // '<'
        let mut digits = Vec::new();
        loop {
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b) if is_ws(b) => self.pos += 1,
                Some(b) if b.is_ascii_hexdigit() => {
                    digits.push(b);
                    self.pos += 1;
                }
                _ => {
                    return Err(Error::MalformedToken {
                        offset: start,
                        reason: "unterminated hex string".to_string(),
                    });
                }
            }
        }
        if digits.len() % 2 == 1 {
            digits.push(b'0');
        }
        let bytes = digits
            .chunks(2)
            .map(|pair| hex_val(pair[0]).unwrap_or(0) * 16 + hex_val(pair[1]).unwrap_or(0))
            .collect();
        Ok(ContentValue::Str(bytes))
    }

    fn parse_array(&mut self) -> Result<ContentValue> {
        self.pos += 1; // '['
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b) => {
                    if let Some(v) = self.try_parse_operand(b)? {
                        items.push(v);
                    } else {
                        return Err(Error::MalformedToken {
                            offset: self.pos,
                            reason: "unexpected token inside array".to_string(),
                        });
                    }
                }
                None => {
                    return Err(Error::MalformedToken {
                        offset: self.pos,
                        reason: "unterminated array".to_string(),
                    });
                }
            }
        }
        Ok(ContentValue::Array(items))
    }

    fn parse_dict(&mut self) -> Result<ContentValue> {
        self.pos += 2; // '<<'
        let mut map = IndexMap::new();
        loop {
            self.skip_ws();
            if self.bytes.get(self.pos) == Some(&b'>') && self.bytes.get(self.pos + 1) == Some(&b'>')
            {
                self.pos += 2;
                break;
            }
            let Some(b'/') = self.peek() else {
                return Err(Error::MalformedToken {
                    offset: self.pos,
                    reason: "expected name key in inline dictionary".to_string(),
                });
            };
            let key = match self.parse_name() {
                ContentValue::Name(n) => n,
                _ => unreachable!(),
            };
            self.skip_ws();
            let Some(b) = self.peek() else {
                return Err(Error::MalformedToken {
                    offset: self.pos,
                    reason: "unterminated inline dictionary".to_string(),
                });
            };
            let value = self.try_parse_operand(b)?.ok_or_else(|| Error::MalformedToken {
                offset: self.pos,
                reason: "expected value in inline dictionary".to_string(),
            })?;
            map.insert(key, value);
        }
        Ok(ContentValue::Dict(map))
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_text_showing_sequence() {
        let ops = lex_content(b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET").unwrap();
        let names: Vec<_> = ops.iter().map(|o| o.op.as_str()).collect();
        assert_eq!(names, ["BT", "Tf", "Td", "Tj", "ET"]);
        assert_eq!(ops[1].operands.len(), 2);
        assert_eq!(ops[2].operands[0], ContentValue::Int(72));
    }

    #[test]
    fn tj_array_groups_strings_and_numbers() {
        let ops = lex_content(b"[(Hi) -500 (there)] TJ").unwrap();
        assert_eq!(ops[0].op, "TJ");
        let arr = ops[0].operands[0].as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr[1], ContentValue::Int(-500));
    }

    #[test]
    fn variable_arity_scn_with_trailing_name() {
        let ops = lex_content(b"0.2 0.4 0.6 /Sep1 scn").unwrap();
        assert_eq!(ops[0].op, "scn");
        assert_eq!(ops[0].operands.len(), 4);
    }

    #[test]
    fn state_save_restore_are_zero_arity() {
        let ops = lex_content(b"q 1 0 0 1 100 200 cm Q").unwrap();
        assert_eq!(ops[0].op, "q");
        assert!(ops[0].operands.is_empty());
        assert_eq!(ops[1].operands.len(), 6);
    }
}
