//! Composite (row) literal parser.
//!
//! `(10.0,USD)`, `(,"a \"b\"")`. An empty field is null; quoted fields only
//! know the backslash escape; there is no `NULL` keyword.

use super::cursor::Cursor;
use crate::error::{LiteralError, LiteralResult};

/// Parser for `(...)` row literals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeParser;

/// Structured types are PostgreSQL composite types under another name.
pub type StructuredParser = CompositeParser;

impl CompositeParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a row literal into positional fields.
    ///
    /// Text that does not start with `(` (a cast expression used as a column
    /// default, say) gives `Ok(None)`.
    pub fn parse(&self, text: &str) -> LiteralResult<Option<Vec<Option<String>>>> {
        let mut cursor = Cursor::new(text);
        if cursor.peek() != Some('(') {
            tracing::trace!(text, "not a composite literal");
            return Ok(None);
        }
        cursor.bump();

        tracing::trace!(text, "parsing composite literal");

        let mut fields = Vec::new();
        loop {
            let field = match cursor.peek() {
                None => return Err(LiteralError::eof(cursor.position(), "composite")),
                Some(',' | ')') => None,
                Some('"') => Some(parse_quoted(&mut cursor)?),
                Some(_) => Some(parse_unquoted(&mut cursor)?),
            };
            fields.push(field);

            match cursor.bump() {
                Some(')') => break,
                Some(',') => {}
                Some(_) => {
                    tracing::debug!(
                        text,
                        position = cursor.position(),
                        "garbage after quoted field"
                    );
                    return Err(LiteralError::unsupported("composite", text));
                }
                None => return Err(LiteralError::eof(cursor.position(), "composite")),
            }
        }

        if !cursor.is_eof() {
            tracing::debug!(text, position = cursor.position(), "trailing text after composite");
            return Err(LiteralError::unsupported("composite", cursor.input()));
        }
        Ok(Some(fields))
    }

    /// Render positional fields as a row literal. `None` is an empty field.
    pub fn encode(&self, fields: &[Option<String>]) -> String {
        let mut out = String::from("(");
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let Some(text) = field else {
                continue;
            };
            let needs_quotes = text.is_empty()
                || text
                    .chars()
                    .any(|c| matches!(c, ',' | '(' | ')' | '"' | '\\') || c.is_whitespace());
            if !needs_quotes {
                out.push_str(text);
                continue;
            }
            out.push('"');
            for c in text.chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        }
        out.push(')');
        out
    }
}

/// Enters on the opening quote, leaves past the closing one.
fn parse_quoted(cursor: &mut Cursor<'_>) -> LiteralResult<String> {
    cursor.bump();
    let mut text = String::new();
    loop {
        match cursor.bump() {
            Some('\\') => match cursor.bump() {
                Some(c) => text.push(c),
                None => return Err(LiteralError::eof(cursor.position(), "quoted composite field")),
            },
            Some('"') => return Ok(text),
            Some(c) => text.push(c),
            None => return Err(LiteralError::eof(cursor.position(), "quoted composite field")),
        }
    }
}

/// Leaves the cursor on the `,` or `)` that ended the field.
fn parse_unquoted(cursor: &mut Cursor<'_>) -> LiteralResult<String> {
    let mut text = String::new();
    loop {
        match cursor.peek() {
            Some(',' | ')') => return Ok(text),
            Some(c) => {
                text.push(c);
                cursor.bump();
            }
            None => return Err(LiteralError::eof(cursor.position(), "composite field")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Option<Vec<Option<String>>> {
        CompositeParser::new().parse(text).unwrap()
    }

    fn fields(items: &[Option<&str>]) -> Option<Vec<Option<String>>> {
        Some(items.iter().map(|f| f.map(str::to_string)).collect())
    }

    #[test]
    fn test_single_empty_field() {
        assert_eq!(parse("()"), fields(&[None]));
    }

    #[test]
    fn test_two_empty_fields() {
        assert_eq!(parse("(,)"), fields(&[None, None]));
    }

    #[test]
    fn test_unquoted_fields() {
        assert_eq!(parse("(10.0,USD)"), fields(&[Some("10.0"), Some("USD")]));
    }

    #[test]
    fn test_not_a_composite() {
        assert_eq!(parse("not-starting-with-paren"), None);
        assert_eq!(parse("'(10.0,USD)'::currency_money"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_quoted_fields() {
        assert_eq!(
            parse(r#"("a,b","say \"hi\"",x)"#),
            fields(&[Some("a,b"), Some("say \"hi\""), Some("x")])
        );
        assert_eq!(parse(r#"("")"#), fields(&[Some("")]));
    }

    #[test]
    fn test_null_is_plain_text() {
        assert_eq!(parse("(NULL,)"), fields(&[Some("NULL"), None]));
    }

    #[test]
    fn test_trailing_empty_field() {
        assert_eq!(parse("(1,)"), fields(&[Some("1"), None]));
        assert_eq!(parse("(,2)"), fields(&[None, Some("2")]));
    }

    #[test]
    fn test_unquoted_keeps_backslash() {
        assert_eq!(parse(r"(a\b)"), fields(&[Some(r"a\b")]));
    }

    #[test]
    fn test_encode() {
        let parser = CompositeParser::new();
        let row = fields(&[Some("10.0"), None, Some("a, \"b\""), Some("")]).unwrap();
        let text = parser.encode(&row);
        assert_eq!(text, r#"(10.0,,"a, \"b\"","")"#);
        assert_eq!(parser.parse(&text).unwrap(), Some(row));
    }

    #[test]
    fn test_missing_closing_paren() {
        let err = CompositeParser::new().parse("(1,2").unwrap_err();
        assert!(matches!(err, LiteralError::UnexpectedEndOfInput { .. }));

        let err = CompositeParser::new().parse("(\"abc").unwrap_err();
        assert!(matches!(err, LiteralError::UnexpectedEndOfInput { .. }));

        let err = CompositeParser::new().parse("(").unwrap_err();
        assert!(matches!(err, LiteralError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn test_garbage_after_quote() {
        let err = CompositeParser::new().parse(r#"("a"b)"#).unwrap_err();
        assert!(matches!(err, LiteralError::UnsupportedFormat { kind: "composite", .. }));
    }

    #[test]
    fn test_trailing_text() {
        let err = CompositeParser::new().parse("(1,2)::money").unwrap_err();
        assert!(matches!(err, LiteralError::UnsupportedFormat { kind: "composite", .. }));
    }
}
