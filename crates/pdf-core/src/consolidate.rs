//! Token consolidator: rewrites the flat PDF-object token stream into
//! nested composite values: dictionaries, arrays, indirect-reference
//! triples, and `obj ... endobj` bodies.
//!
//! Classic xref/trailer collapsing is realized directly in `xref.rs`
//! instead of here: xref rows are fixed-width lines, not general
//! PDF-object syntax, so the chain walker scans them with its own line
//! reader rather than routing them through this value-shaped consolidator.

use crate::error::{Error, Result};
use crate::lex::token::{Token, TokenKind, TokenValue};
use crate::object::{Dict, Name, Number, Object, ObjectId, PdfString, Stream};

struct Consolidator<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Consolidator<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        self.pos += 1;
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(Error::MalformedToken {
                offset: self.peek().offset,
                reason: format!("expected {kind:?}, found {:?}", self.peek().kind),
            })
        }
    }

    /// Parses exactly one value at the cursor, collapsing `INT INT R` into a
    /// reference and a dict immediately followed by a `stream` token into a
    /// `Stream` value.
    fn parse_value(&mut self) -> Result<Object> {
        match self.peek().kind {
            TokenKind::Int => {
                if let (Some(a), Some(b)) = (self.peek_at(1), self.peek_at(2)) {
                    if a.kind == TokenKind::Int && b.kind == TokenKind::Ref {
                        let id = self.advance().as_int().unwrap_or(0) as u32;
                        let gen = self.advance().as_int().unwrap_or(0) as u16;
                        self.advance(); // R
                        return Ok(Object::Reference(ObjectId::new(id, gen)));
                    }
                }
                let n = self.advance().as_int().unwrap_or(0);
                Ok(Object::Number(Number::Int(n)))
            }
            TokenKind::Float => {
                let tok = self.advance();
                let v = match tok.value {
                    TokenValue::Float(f) => f,
                    _ => 0.0,
                };
                Ok(Object::Number(Number::Real(v)))
            }
            TokenKind::Name => {
                let tok = self.advance();
                let name = tok.as_name().unwrap_or_default().to_string();
                Ok(Object::Name(Name::new(name)))
            }
            TokenKind::Lit | TokenKind::HexString => {
                let tok = self.advance();
                match &tok.value {
                    TokenValue::Bytes(b) => Ok(Object::String(PdfString(b.clone()))),
                    _ => Ok(Object::String(PdfString(Vec::new()))),
                }
            }
            TokenKind::True => {
                self.advance();
                Ok(Object::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Object::Bool(false))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Object::Null)
            }
            TokenKind::ArrStart => self.parse_array(),
            TokenKind::DictStart => self.parse_dict_or_stream(),
            other => Err(Error::MalformedToken {
                offset: self.peek().offset,
                reason: format!("unexpected token {other:?} where a value was expected"),
            }),
        }
    }

    fn parse_array(&mut self) -> Result<Object> {
        self.expect(TokenKind::ArrStart)?;
        let mut items = Vec::new();
        while self.peek().kind != TokenKind::ArrEnd {
            if self.peek().kind == TokenKind::Eof {
                return Err(Error::MalformedToken {
                    offset: self.peek().offset,
                    reason: "unterminated array".to_string(),
                });
            }
            items.push(self.parse_value()?);
        }
        self.expect(TokenKind::ArrEnd)?;
        Ok(Object::Array(items))
    }

    fn parse_dict_or_stream(&mut self) -> Result<Object> {
        let dict = self.parse_dict()?;
        if self.peek().kind == TokenKind::Stream {
            let tok = self.advance();
            let raw = match &tok.value {
                TokenValue::Bytes(b) => b.clone(),
                _ => Vec::new(),
            };
            self.expect(TokenKind::EndStream)?;
            Ok(Object::Stream(Stream { dict, raw }))
        } else {
            Ok(Object::Dict(dict))
        }
    }

    fn parse_dict(&mut self) -> Result<Dict> {
        self.expect(TokenKind::DictStart)?;
        let mut entries: Vec<Object> = Vec::new();
        let mut dict = Dict::new();
        while self.peek().kind != TokenKind::DictEnd {
            if self.peek().kind == TokenKind::Eof {
                return Err(Error::MalformedToken {
                    offset: self.peek().offset,
                    reason: "unterminated dictionary".to_string(),
                });
            }
            if self.peek().kind != TokenKind::Name {
                return Err(Error::MalformedToken {
                    offset: self.peek().offset,
                    reason: format!("expected dictionary key, found {:?}", self.peek().kind),
                });
            }
            let key = self.advance().as_name().unwrap_or_default().to_string();
            entries.push(Object::Name(Name::new(key)));
            entries.push(self.parse_value()?);
        }
        self.expect(TokenKind::DictEnd)?;

        // An odd entry count forces a trailing implicit null.
        if entries.len() % 2 != 0 {
            entries.push(Object::Null);
        }
        for pair in entries.chunks(2) {
            if let Object::Name(key) = &pair[0] {
                dict.insert(key.clone(), pair[1].clone());
            }
        }
        Ok(dict)
    }
}

/// Consolidates the body of an `id gen obj ... endobj` sequence, returning
/// the object's identity and its consolidated value.
pub fn consolidate_object(tokens: &[Token]) -> Result<(ObjectId, Object)> {
    let mut c = Consolidator { tokens, pos: 0 };
    let id = c.expect(TokenKind::Int)?.as_int().unwrap_or(0) as u32;
    let gen = c.expect(TokenKind::Int)?.as_int().unwrap_or(0) as u16;
    c.expect(TokenKind::Obj)?;
    let value = c.parse_value()?;
    c.expect(TokenKind::EndObj)?;
    Ok((ObjectId::new(id, gen), value))
}

/// Consolidates an `id gen obj <dict>` header without requiring a matching
/// `endobj`/`stream` tail; used by the xref-stream bootstrap, which only
/// needs the dictionary's `Prev` entry and must not assume the stream's
/// `Length` is resolvable yet.
pub fn consolidate_object_header(tokens: &[Token]) -> Result<(ObjectId, Dict)> {
    let mut c = Consolidator { tokens, pos: 0 };
    let id = c.expect(TokenKind::Int)?.as_int().unwrap_or(0) as u32;
    let gen = c.expect(TokenKind::Int)?.as_int().unwrap_or(0) as u16;
    c.expect(TokenKind::Obj)?;
    let dict = c.parse_dict()?;
    Ok((ObjectId::new(id, gen), dict))
}

/// Consolidates a single free-standing value (used when resolving a nested
/// value, e.g. the body of a compressed object pulled from an object
/// stream, which has no surrounding `obj`/`endobj` wrapper).
pub fn consolidate_value(tokens: &[Token]) -> Result<Object> {
    let mut c = Consolidator { tokens, pos: 0 };
    c.parse_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::object::{lex, LexOutcome};

    fn lex_tokens(bytes: &[u8]) -> Vec<Token> {
        match lex(bytes, 0, Some(0)).unwrap() {
            LexOutcome::Done(t) => t,
            LexOutcome::NeedsStreamLength { tokens_so_far } => tokens_so_far,
        }
    }

    #[test]
    fn consolidates_simple_object() {
        let tokens = lex_tokens(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj");
        let (id, value) = consolidate_object(&tokens).unwrap();
        assert_eq!(id, ObjectId::new(1, 0));
        let dict = value.as_dict().unwrap();
        assert_eq!(
            dict.get(&Name::new("Pages")).unwrap().as_reference(),
            Some(ObjectId::new(2, 0))
        );
    }

    #[test]
    fn odd_entry_count_gets_trailing_null() {
        let tokens = {
            let mut t = lex_tokens(b"<< /Foo");
            // Drop trailing EOF-only tail and append DictEnd manually to
            // simulate a truncated-but-otherwise-odd-keyed dictionary body.
            t.pop();
            t.push(Token::new(TokenKind::DictEnd, TokenValue::None, 0, 1));
            t.push(Token::new(TokenKind::Eof, TokenValue::None, 0, 1));
            t
        };
        let mut c = Consolidator {
            tokens: &tokens,
            pos: 0,
        };
        let dict = c.parse_dict().unwrap();
        assert_eq!(dict.get(&Name::new("Foo")).unwrap(), &Object::Null);
    }

    #[test]
    fn second_consolidation_is_a_fixed_point() {
        let tokens = lex_tokens(b"1 0 obj << /N 1 >> endobj");
        let (_, first) = consolidate_object(&tokens).unwrap();
        let tokens2 = lex_tokens(b"1 0 obj << /N 1 >> endobj");
        let (_, second) = consolidate_object(&tokens2).unwrap();
        assert_eq!(first, second);
    }
}
