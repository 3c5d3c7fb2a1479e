//! Array literal parser.
//!
//! ```text
//! {{1,2},{3,NULL}}      nested dimensions
//! {"a,b","say \"hi\""}  quoted elements, backslash escapes
//! {NULL,"NULL"}         bare NULL is null, quoted NULL is text
//! ```

use serde::Serialize;

use super::cursor::Cursor;
use crate::error::{LiteralError, LiteralResult};

/// One element of a parsed array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Null,
    Text(String),
    Array(Vec<Element>),
}

impl Element {
    pub fn is_null(&self) -> bool {
        matches!(self, Element::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Element]> {
        match self {
            Element::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::Text(s.to_string())
    }
}

impl<T: Into<Element>> From<Vec<T>> for Element {
    fn from(items: Vec<T>) -> Self {
        Element::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Parser for `{...}` array literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayParser {
    delimiter: char,
}

impl Default for ArrayParser {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl ArrayParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another element delimiter (`box[]` uses `;`).
    pub fn with_delimiter(self, delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse an array literal. `None` input gives `None`.
    pub fn parse(&self, text: Option<&str>) -> LiteralResult<Option<Vec<Element>>> {
        let Some(text) = text else {
            return Ok(None);
        };
        if text == "{}" {
            return Ok(Some(Vec::new()));
        }

        tracing::trace!(text, "parsing array literal");

        let mut cursor = Cursor::new(text);
        if cursor.bump() != Some('{') {
            tracing::debug!(text, "array literal does not start with '{{'");
            return Err(LiteralError::unsupported("array", text));
        }

        let items = self.parse_array(&mut cursor)?;
        if !cursor.is_eof() {
            tracing::debug!(text, position = cursor.position(), "trailing text after array");
            return Err(LiteralError::unsupported("array", text));
        }
        Ok(Some(items))
    }

    /// Render elements as an array literal using this parser's delimiter.
    pub fn encode(&self, items: &[Element]) -> String {
        let mut out = String::new();
        encode_into(&mut out, items, self.delimiter);
        out
    }

    /// Enters just past `{`, leaves just past the matching `}`.
    fn parse_array(&self, cursor: &mut Cursor<'_>) -> LiteralResult<Vec<Element>> {
        let mut items = Vec::new();

        loop {
            let Some(c) = cursor.peek() else {
                return Err(LiteralError::eof(cursor.position(), "array"));
            };

            match c {
                '{' => {
                    cursor.bump();
                    items.push(Element::Array(self.parse_array(cursor)?));
                }
                '}' => {
                    cursor.bump();
                    return Ok(items);
                }
                c if c == self.delimiter => {
                    // Leading delimiter: the first element was empty.
                    if items.is_empty() {
                        items.push(Element::Null);
                    }
                    match cursor.peek_second() {
                        Some(next) if next == self.delimiter || next == '}' => {
                            items.push(Element::Null);
                        }
                        Some(_) => {}
                        None => {
                            return Err(LiteralError::eof(cursor.position() + 1, "array"));
                        }
                    }
                    cursor.bump();
                }
                '"' => {
                    items.push(self.parse_string(cursor)?);
                    match cursor.peek() {
                        Some(next) if next == self.delimiter || next == '}' => {}
                        Some(_) => {
                            tracing::debug!(
                                position = cursor.position(),
                                "garbage after quoted array element"
                            );
                            return Err(LiteralError::unsupported("array", cursor.input()));
                        }
                        None => return Err(LiteralError::eof(cursor.position(), "array")),
                    }
                }
                _ => items.push(self.parse_string(cursor)?),
            }
        }
    }

    /// Quoted elements leave the cursor past the closing quote, unquoted ones
    /// on the delimiter or `}` that ended them.
    fn parse_string(&self, cursor: &mut Cursor<'_>) -> LiteralResult<Element> {
        let quoted = cursor.peek() == Some('"');
        if quoted {
            cursor.bump();
        }
        let context = if quoted {
            "quoted array element"
        } else {
            "array element"
        };

        let mut text = String::new();
        loop {
            let Some(c) = cursor.peek() else {
                return Err(LiteralError::eof(cursor.position(), context));
            };

            let escaped = match (c, cursor.peek_second()) {
                ('\\', Some(next @ ('\\' | '"'))) => Some(next),
                ('"', Some('"')) => Some('"'),
                _ => None,
            };
            if let Some(ch) = escaped {
                cursor.bump();
                cursor.bump();
                text.push(ch);
                continue;
            }

            if quoted && c == '"' {
                cursor.bump();
                return Ok(Element::Text(text));
            }
            if !quoted && (c == self.delimiter || c == '}') {
                return Ok(if text == "NULL" {
                    Element::Null
                } else {
                    Element::Text(text)
                });
            }

            text.push(c);
            cursor.bump();
        }
    }
}

fn encode_into(out: &mut String, items: &[Element], delimiter: char) {
    out.push('{');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        match item {
            Element::Null => out.push_str("NULL"),
            Element::Array(nested) => encode_into(out, nested, delimiter),
            Element::Text(text) => {
                let needs_quotes = text.is_empty()
                    || text.eq_ignore_ascii_case("NULL")
                    || text.chars().any(|c| {
                        c == delimiter || matches!(c, '{' | '}' | '"' | '\\') || c.is_whitespace()
                    });
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
        }
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Vec<Element> {
        ArrayParser::new().parse(Some(text)).unwrap().unwrap()
    }

    #[test]
    fn test_null_input() {
        assert_eq!(ArrayParser::new().parse(None).unwrap(), None);
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(parse("{}"), vec![]);
    }

    #[test]
    fn test_null_elements() {
        assert_eq!(parse("{NULL,NULL}"), vec![Element::Null, Element::Null]);
    }

    #[test]
    fn test_unquoted_elements() {
        assert_eq!(
            parse("{1,2,3}"),
            vec![Element::from("1"), Element::from("2"), Element::from("3")]
        );
    }

    #[test]
    fn test_nested_arrays() {
        assert_eq!(
            parse("{{text},{NULL},{1}}"),
            vec![
                Element::from(vec!["text"]),
                Element::Array(vec![Element::Null]),
                Element::from(vec!["1"]),
            ]
        );
    }

    #[test]
    fn test_nested_empty_arrays() {
        assert_eq!(
            parse("{{},{}}"),
            vec![Element::Array(vec![]), Element::Array(vec![])]
        );
    }

    #[test]
    fn test_quoted_elements() {
        assert_eq!(
            parse(r#"{"a,b","say \"hi\"","back\\slash","NULL",""}"#),
            vec![
                Element::from("a,b"),
                Element::from("say \"hi\""),
                Element::from("back\\slash"),
                Element::from("NULL"),
                Element::from(""),
            ]
        );
    }

    #[test]
    fn test_doubled_quote_escape() {
        assert_eq!(parse(r#"{"a""b"}"#), vec![Element::from("a\"b")]);
    }

    #[test]
    fn test_empty_fields_are_null() {
        assert_eq!(parse("{,a}"), vec![Element::Null, Element::from("a")]);
        assert_eq!(
            parse("{a,,b}"),
            vec![Element::from("a"), Element::Null, Element::from("b")]
        );
        assert_eq!(parse("{a,}"), vec![Element::from("a"), Element::Null]);
        assert_eq!(parse("{,}"), vec![Element::Null, Element::Null]);
    }

    #[test]
    fn test_null_keyword_is_case_sensitive() {
        assert_eq!(parse("{null,Null}"), vec![Element::from("null"), Element::from("Null")]);
    }

    #[test]
    fn test_multibyte_elements() {
        assert_eq!(
            parse("{héllo,\"wörld, ok\"}"),
            vec![Element::from("héllo"), Element::from("wörld, ok")]
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = ArrayParser::new().with_delimiter(';');
        assert_eq!(
            parser.parse(Some("{(1,1),(0,0);(2,2),(1,1)}")).unwrap().unwrap(),
            vec![Element::from("(1,1),(0,0)"), Element::from("(2,2),(1,1)")]
        );
    }

    #[test]
    fn test_encode() {
        let parser = ArrayParser::new();
        let items = vec![
            Element::from("plain"),
            Element::Null,
            Element::from("NULL"),
            Element::from("a,b"),
            Element::from("say \"hi\""),
            Element::from(""),
            Element::from(vec!["x y"]),
        ];
        let text = parser.encode(&items);
        assert_eq!(text, r#"{plain,NULL,"NULL","a,b","say \"hi\"","",{"x y"}}"#);
        assert_eq!(parser.parse(Some(&text)).unwrap().unwrap(), items);
    }

    #[test]
    fn test_encode_custom_delimiter() {
        let parser = ArrayParser::new().with_delimiter(';');
        let items = vec![Element::from("(1,1)"), Element::from("a;b")];
        let text = parser.encode(&items);
        assert_eq!(text, r#"{(1,1);"a;b"}"#);
        assert_eq!(parser.parse(Some(&text)).unwrap().unwrap(), items);
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = ArrayParser::new().parse(Some("{1,2")).unwrap_err();
        assert!(matches!(err, LiteralError::UnexpectedEndOfInput { .. }));

        let err = ArrayParser::new().parse(Some("{{1},{2}")).unwrap_err();
        assert!(matches!(err, LiteralError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = ArrayParser::new().parse(Some("{\"abc}")).unwrap_err();
        assert!(matches!(
            err,
            LiteralError::UnexpectedEndOfInput { context: "quoted array element", .. }
        ));
    }

    #[test]
    fn test_not_an_array() {
        let err = ArrayParser::new().parse(Some("1,2")).unwrap_err();
        assert!(matches!(err, LiteralError::UnsupportedFormat { kind: "array", .. }));

        let err = ArrayParser::new().parse(Some("{1}x")).unwrap_err();
        assert!(matches!(err, LiteralError::UnsupportedFormat { kind: "array", .. }));
    }

    #[test]
    fn test_text_after_quoted_element() {
        for text in [r#"{"a"b,c}"#, r#"{{"a"x}}"#, r#"{"a" ,b}"#] {
            let err = ArrayParser::new().parse(Some(text)).unwrap_err();
            assert!(
                matches!(err, LiteralError::UnsupportedFormat { kind: "array", .. }),
                "{} should be rejected",
                text
            );
        }

        let parser = ArrayParser::new().with_delimiter(';');
        assert_eq!(
            parser.parse(Some(r#"{"a,b";c}"#)).unwrap().unwrap(),
            vec![Element::from("a,b"), Element::from("c")]
        );
        assert!(parser.parse(Some(r#"{"a",b}"#)).is_err());
    }
}
