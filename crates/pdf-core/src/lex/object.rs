//! PDF object lexer: dictionaries, arrays, indirect references, streams,
//! xref tables, trailers.

use super::token::{Token, TokenKind, TokenValue};
use crate::error::{Error, Result};

/// Result of a lexing pass. `NeedsStreamLength` is the explicit, non-exception
/// realization of restartable stream lexing: the lexer never raises a
/// recoverable error from inside a partially-consumed stream, it just hands
/// back what it has and asks to be called again.
pub enum LexOutcome {
    Done(Vec<Token>),
    NeedsStreamLength { tokens_so_far: Vec<Token> },
}

/// Lex a region of PDF-object-layer bytes, starting at `base_offset` within
/// the whole file (so token offsets are absolute). `stream_length`, when
/// known, lets the lexer slice a `stream`/`endstream` body without pausing.
pub fn lex(bytes: &[u8], base_offset: usize, stream_length: Option<usize>) -> Result<LexOutcome> {
    let mut lexer = ObjectLexer {
        bytes,
        pos: 0,
        base_offset,
        line: 1,
        tokens: Vec::new(),
    };
    lexer.run(stream_length)
}

struct ObjectLexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    base_offset: usize,
    line: usize,
    tokens: Vec<Token>,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

fn is_delim(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

impl<'a> ObjectLexer<'a> {
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b) if is_whitespace(b) => {
                    self.advance();
                }
                Some(b'%') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn emit(&mut self, kind: TokenKind, value: TokenValue, offset: usize) {
        self.tokens
            .push(Token::new(kind, value, self.base_offset + offset, self.line));
    }

    fn run(&mut self, mut stream_length: Option<usize>) -> Result<LexOutcome> {
        loop {
            self.skip_whitespace_and_comments();
            let Some(b) = self.peek_byte() else {
                self.emit(TokenKind::Eof, TokenValue::None, self.pos);
                return Ok(LexOutcome::Done(std::mem::take(&mut self.tokens)));
            };
            let start = self.pos;

            match b {
                b'<' => {
                    if self.bytes.get(self.pos + 1) == Some(&b'<') {
                        self.pos += 2;
                        self.emit(TokenKind::DictStart, TokenValue::None, start);
                    } else {
                        self.lex_hex_string(start)?;
                    }
                }
                b'>' => {
                    if self.bytes.get(self.pos + 1) == Some(&b'>') {
                        self.pos += 2;
                        self.emit(TokenKind::DictEnd, TokenValue::None, start);
                    } else {
                        return Err(Error::MalformedToken {
                            offset: self.base_offset + start,
                            reason: "bare '>' outside dict/hex-string".to_string(),
                        });
                    }
                }
                b'[' => {
                    self.pos += 1;
                    self.emit(TokenKind::ArrStart, TokenValue::None, start);
                }
                b']' => {
                    self.pos += 1;
                    self.emit(TokenKind::ArrEnd, TokenValue::None, start);
                }
                b'/' => self.lex_name(start),
                b'(' => self.lex_literal_string(start)?,
                b'+' | b'-' | b'.' | b'0'..=b'9' => self.lex_number(start)?,
                _ => {
                    let word = self.read_bare_word();
                    if word.is_empty() {
                        return Err(Error::MalformedToken {
                            offset: self.base_offset + start,
                            reason: format!("unexpected byte {b:#04x}"),
                        });
                    }
                    match word.as_str() {
                        "obj" => self.emit(TokenKind::Obj, TokenValue::None, start),
                        "endobj" => self.emit(TokenKind::EndObj, TokenValue::None, start),
                        "R" => self.emit(TokenKind::Ref, TokenValue::None, start),
                        "true" => self.emit(TokenKind::True, TokenValue::None, start),
                        "false" => self.emit(TokenKind::False, TokenValue::None, start),
                        "null" => self.emit(TokenKind::Null, TokenValue::None, start),
                        "xref" => self.emit(TokenKind::Xref, TokenValue::None, start),
                        "startxref" => self.emit(TokenKind::StartXref, TokenValue::None, start),
                        "trailer" => self.emit(TokenKind::Trailer, TokenValue::None, start),
                        "f" => self.emit(TokenKind::XrefFree, TokenValue::None, start),
                        "n" => self.emit(TokenKind::XrefUsed, TokenValue::None, start),
                        "stream" => {
                            // Optional CRLF or LF right after the `stream` keyword.
                            if self.bytes.get(self.pos) == Some(&b'\r')
                                && self.bytes.get(self.pos + 1) == Some(&b'\n')
                            {
                                self.pos += 2;
                            } else if self.bytes.get(self.pos) == Some(&b'\n') {
                                self.pos += 1;
                            }
                            let Some(len) = stream_length.take() else {
                                return Ok(LexOutcome::NeedsStreamLength {
                                    tokens_so_far: std::mem::take(&mut self.tokens),
                                });
                            };
                            let data_start = self.pos;
                            let data_end = (data_start + len).min(self.bytes.len());
                            let raw = self.bytes[data_start..data_end].to_vec();
                            self.pos = data_end;
                            self.emit(TokenKind::Stream, TokenValue::Bytes(raw), data_start);
                            self.skip_whitespace_and_comments();
                            let trailing = self.read_bare_word();
                            if trailing != "endstream" {
                                return Err(Error::MalformedToken {
                                    offset: self.base_offset + self.pos,
                                    reason: format!(
                                        "expected 'endstream', found {trailing:?}"
                                    ),
                                });
                            }
                            self.emit(TokenKind::EndStream, TokenValue::None, self.pos);
                        }
                        other => {
                            return Err(Error::MalformedToken {
                                offset: self.base_offset + start,
                                reason: format!("unrecognized keyword {other:?}"),
                            });
                        }
                    }
                }
            }
        }
    }

    fn read_bare_word(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek_byte() {
            if is_whitespace(b) || is_delim(b) {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    fn lex_name(&mut self, start: usize) {
        self.pos += 1; // skip '/'
        let mut name = Vec::new();
        while let Some(b) = self.peek_byte() {
            if is_whitespace(b) || is_delim(b) {
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
        self.emit(
            TokenKind::Name,
            TokenValue::Name(String::from_utf8_lossy(&name).into_owned()),
            start,
        );
    }

    fn lex_number(&mut self, start: usize) -> Result<()> {
        let mut is_float = false;
        if matches!(self.peek_byte(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        while let Some(b) = self.peek_byte() {
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
            let v: f64 = text.parse().unwrap_or(0.0);
            self.emit(TokenKind::Float, TokenValue::Float(v), start);
        } else {
            let v: i64 = text.parse().unwrap_or(0);
            self.emit(TokenKind::Int, TokenValue::Int(v), start);
        }
        Ok(())
    }

    fn lex_hex_string(&mut self, start: usize) -> Result<()> {
        self.pos += 1; // skip '<'
        let mut digits = Vec::new();
        loop {
            match self.peek_byte() {
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b) if is_whitespace(b) => {
                    self.pos += 1;
                }
                Some(b) if b.is_ascii_hexdigit() => {
                    digits.push(b);
                    self.pos += 1;
                }
                Some(b) => {
                    return Err(Error::MalformedToken {
                        offset: self.base_offset + self.pos,
                        reason: format!("invalid hex digit {b:#04x}"),
                    });
                }
                None => {
                    return Err(Error::MalformedToken {
                        offset: self.base_offset + start,
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
        self.emit(TokenKind::HexString, TokenValue::Bytes(bytes), start);
        Ok(())
    }

    fn lex_literal_string(&mut self, start: usize) -> Result<()> {
        self.pos += 1; // skip '('
        let mut depth = 1i32;
        let mut out = Vec::new();
        loop {
            let Some(b) = self.advance() else {
                return Err(Error::MalformedToken {
                    offset: self.base_offset + start,
                    reason: "unterminated literal string".to_string(),
                });
            };
            match b {
                b'\\' => {
                    let Some(esc) = self.advance() else {
                        break;
                    };
                    match esc {
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0c),
                        // Open/close-paren escapes must round-trip as the
                        // literal character itself.
                        b'(' => out.push(b'('),
                        b')' => out.push(b')'),
                        b'\\' => out.push(b'\\'),
                        b'\r' | b'\n' => {
                            // Escaped line break: ignore (line continuation).
                            if esc == b'\r' && self.peek_byte() == Some(b'\n') {
                                self.advance();
                            }
                        }
                        d @ b'0'..=b'7' => {
                            let mut val = (d - b'0') as u32;
                            for _ in 0..2 {
                                match self.peek_byte() {
                                    Some(o @ b'0'..=b'7') => {
                                        val = val * 8 + (o - b'0') as u32;
                                        self.advance();
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
        self.emit(TokenKind::Lit, TokenValue::Bytes(out), start);
        Ok(())
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

    fn lex_ok(bytes: &[u8]) -> Vec<Token> {
        match lex(bytes, 0, None).unwrap() {
            LexOutcome::Done(tokens) => tokens,
            LexOutcome::NeedsStreamLength { .. } => panic!("unexpected stream pause"),
        }
    }

    #[test]
    fn lexes_dict_and_refs() {
        let tokens = lex_ok(b"<< /Type /Catalog /Pages 2 0 R >>");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::DictStart);
        assert!(kinds.contains(&TokenKind::Ref));
        assert_eq!(*kinds.last().unwrap(), TokenKind::Eof);
    }

    #[test]
    fn hex_string_odd_length_pads_zero() {
        let a = lex_ok(b"<A1B>");
        let b = lex_ok(b"<A1B0>");
        assert_eq!(a[0].value, b[0].value);
    }

    #[test]
    fn literal_string_preserves_balanced_parens() {
        let tokens = lex_ok(b"(ab(c)d)");
        match &tokens[0].value {
            TokenValue::Bytes(bytes) => assert_eq!(bytes, b"ab(c)d"),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn stream_without_known_length_pauses() {
        let bytes = b"<< /Length 5 >>\nstream\nhello\nendstream";
        match lex(bytes, 0, None).unwrap() {
            LexOutcome::NeedsStreamLength { tokens_so_far } => {
                assert!(tokens_so_far
                    .iter()
                    .any(|t| t.kind == TokenKind::DictStart));
            }
            LexOutcome::Done(_) => panic!("expected pause"),
        }
    }

    #[test]
    fn stream_with_known_length_captures_bytes() {
        let bytes = b"<< /Length 5 >>\nstream\nhello\nendstream";
        let tokens = match lex(bytes, 0, Some(5)).unwrap() {
            LexOutcome::Done(tokens) => tokens,
            LexOutcome::NeedsStreamLength { .. } => panic!("should not pause"),
        };
        let stream_tok = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Stream)
            .unwrap();
        assert_eq!(stream_tok.value, TokenValue::Bytes(b"hello".to_vec()));
    }
}
