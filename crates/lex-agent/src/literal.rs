//! Permissive decoder for literal-style tool arguments.
//!
//! Some models emit tool arguments as a loose literal rather than strict JSON:
//! single-quoted strings, tuples, trailing commas. This parser accepts exactly
//! mappings, sequences (lists and tuples), strings and numbers. Anything else,
//! including `True`, `False` and `None`, is rejected.

use serde_json::{Map, Number, Value};

/// Why a literal could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("unsupported literal {word:?} at offset {offset}")]
    Unsupported { word: String, offset: usize },

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),
}

/// Decode one literal spanning the whole of `text` (surrounding whitespace allowed).
///
/// # Errors
///
/// Returns a [`LiteralError`] describing the first offending position.
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { src: text, pos: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(value),
        Some(found) => Err(LiteralError::Unexpected {
            found,
            offset: parser.pos,
        }),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), LiteralError> {
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(found) => Err(LiteralError::Unexpected {
                found,
                offset: self.pos - found.len_utf8(),
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('{') => self.mapping(),
            Some('[') => self.sequence('[', ']').map(|(items, _)| Value::Array(items)),
            Some('(') => self.tuple(),
            Some('\'' | '"') => self.string().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => Err(self.unsupported_word()),
            Some(found) => Err(LiteralError::Unexpected {
                found,
                offset: self.pos,
            }),
        }
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }

            let key = match self.value()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => {
                    return Err(LiteralError::Unsupported {
                        word: "non-scalar key".to_string(),
                        offset: self.pos,
                    });
                }
            };
            self.skip_ws();
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);

            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Value::Object(map)),
                Some(found) => {
                    return Err(LiteralError::Unexpected {
                        found,
                        offset: self.pos - found.len_utf8(),
                    });
                }
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    /// Comma-separated items between `open` and `close`. The flag reports
    /// whether a trailing comma followed the last item.
    fn sequence(&mut self, open: char, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, trailing_comma));
            }

            items.push(self.value()?);
            trailing_comma = false;

            self.skip_ws();
            match self.bump() {
                Some(',') => trailing_comma = true,
                Some(c) if c == close => return Ok((items, false)),
                Some(found) => {
                    return Err(LiteralError::Unexpected {
                        found,
                        offset: self.pos - found.len_utf8(),
                    });
                }
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    /// `(x)` is just `x`; `()`, `(x,)` and `(x, y)` are sequences.
    fn tuple(&mut self) -> Result<Value, LiteralError> {
        let (mut items, trailing_comma) = self.sequence('(', ')')?;
        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let start = self.pos - 1;
        let c = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        match c {
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\n' => {}
            'x' => out.push(self.hex_char(2, start)?),
            'u' => out.push(self.hex_char(4, start)?),
            'U' => out.push(self.hex_char(8, start)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_char(&mut self, digits: usize, start: usize) -> Result<char, LiteralError> {
        let end = self.pos + digits;
        let hex = self
            .src
            .get(self.pos..end)
            .ok_or(LiteralError::InvalidEscape(start))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| LiteralError::InvalidEscape(start))?;
        let c = char::from_u32(code).ok_or(LiteralError::InvalidEscape(start))?;
        self.pos = end;
        Ok(c)
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
            self.skip_ws();
        }
        let digits_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_'))
            || (self.src[..self.pos].ends_with(['e', 'E'])
                && matches!(self.peek(), Some('-' | '+')))
        {
            self.bump();
        }

        let raw = &self.src[start..self.pos];
        let sign = if raw.starts_with('-') { "-" } else { "" };
        let body = self.src[digits_start..self.pos].replace('_', "");
        let invalid = || LiteralError::InvalidNumber(raw.to_string());

        if body.is_empty() || !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return Err(invalid());
        }

        let is_float = body.contains(['.', 'e', 'E']);
        if !is_float && let Ok(int) = format!("{sign}{body}").parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }

        let float: f64 = format!("{sign}{body}").parse().map_err(|_| invalid())?;
        Number::from_f64(float).map(Value::Number).ok_or_else(invalid)
    }

    fn unsupported_word(&self) -> LiteralError {
        let word: String = self.src[self.pos..]
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        LiteralError::Unsupported {
            word,
            offset: self.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("{'query': 'culpable homicide'}", json!({"query": "culpable homicide"}))]
    #[case("{\"reference_id\": \"CA1961-160-1\",}", json!({"reference_id": "CA1961-160-1"}))]
    #[case("  { 'a' : [1, 2.5, -3,], 'b': ('x',), 'c': () }  ", json!({"a": [1, 2.5, -3], "b": ["x"], "c": []}))]
    #[case("('only')", json!("only"))]
    #[case("{1: 'one'}", json!({"1": "one"}))]
    #[case("'it\\'s \\n here'", json!("it's \n here"))]
    #[case("'\\u00e9t\\q'", json!("\u{e9}t\\q"))]
    #[case("{'q': \"mixed 'quotes'\"}", json!({"q": "mixed 'quotes'"}))]
    #[case("1_000", json!(1000))]
    #[case("1e3", json!(1000.0))]
    fn accepts_supported_literals(#[case] text: &str, #[case] expected: Value) {
        assert_eq!(parse_literal(text).unwrap(), expected);
    }

    #[rstest]
    #[case("{'flag': True}")]
    #[case("None")]
    #[case("{'a': 1")]
    #[case("{'a' 1}")]
    #[case("'unterminated")]
    #[case("{'a': 1} extra")]
    #[case("")]
    #[case("{['list']: 1}")]
    #[case("12abc")]
    #[case("'\\uZZZZ'")]
    fn rejects_everything_else(#[case] text: &str) {
        assert!(parse_literal(text).is_err(), "{text:?} should be rejected");
    }

    #[test]
    fn errors_name_the_offending_word() {
        assert_eq!(
            parse_literal("{'flag': False}").unwrap_err(),
            LiteralError::Unsupported {
                word: "False".to_string(),
                offset: 9
            }
        );
    }
}
