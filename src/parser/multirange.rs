//! Multirange literal parser.

use super::range::{RangeParser, split_multirange};
use crate::error::{LiteralError, LiteralResult};
use crate::types::{RangeBounds, RangeKind};

/// Parser for multirange literals; each member goes through a [`RangeParser`]
/// of the matching range kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiRangeParser {
    range: RangeParser,
}

impl MultiRangeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a parser from a multirange type name such as `int4multirange`.
    pub fn from_db_type(name: &str) -> LiteralResult<Self> {
        RangeKind::from_multirange_type(name)
            .map(|kind| Self::new().with_kind(Some(kind)))
            .ok_or_else(|| {
                LiteralError::NotSupported(format!("Unsupported multirange type: '{}'", name))
            })
    }

    /// Set the range kind of the members.
    pub fn with_kind(self, kind: Option<RangeKind>) -> Self {
        Self {
            range: self.range.with_kind(kind),
        }
    }

    pub fn as_multi_int(self) -> Self {
        self.with_kind(Some(RangeKind::Int4))
    }

    pub fn as_multi_big_int(self) -> Self {
        self.with_kind(Some(RangeKind::Int8))
    }

    pub fn as_multi_numeric(self) -> Self {
        self.with_kind(Some(RangeKind::Numeric))
    }

    pub fn as_multi_date(self) -> Self {
        self.with_kind(Some(RangeKind::Date))
    }

    pub fn as_multi_timestamp(self) -> Self {
        self.with_kind(Some(RangeKind::Timestamp))
    }

    pub fn as_multi_timestamp_tz(self) -> Self {
        self.with_kind(Some(RangeKind::TimestampTz))
    }

    pub fn as_custom(self) -> Self {
        self.with_kind(None)
    }

    pub fn with_native_int64(self, native_int64: bool) -> Self {
        Self {
            range: self.range.with_native_int64(native_int64),
        }
    }

    /// Kind of the member ranges.
    pub fn kind(&self) -> Option<RangeKind> {
        self.range.kind()
    }

    /// The parser applied to each member range.
    pub fn range_parser(&self) -> RangeParser {
        self.range
    }

    pub fn parse(&self, text: Option<&str>) -> LiteralResult<Option<Vec<RangeBounds>>> {
        let Some(text) = text else {
            return Ok(None);
        };

        tracing::trace!(text, kind = ?self.kind(), "parsing multirange literal");

        let mut ranges = Vec::new();
        for part in split_multirange(text)? {
            if let Some(bounds) = self.range.parse(Some(part))? {
                ranges.push(bounds);
            }
        }
        Ok(Some(ranges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn int_range(lower: Option<i64>, upper: Option<i64>) -> RangeBounds {
        RangeBounds::new(lower, upper)
    }

    #[test]
    fn test_multirange() {
        let parser = MultiRangeParser::new().as_multi_int();
        assert_eq!(parser.parse(None).unwrap(), None);
        assert_eq!(parser.parse(Some("{}")).unwrap(), Some(vec![]));
        assert_eq!(
            parser.parse(Some("{[3,7)}")).unwrap(),
            Some(vec![int_range(Some(3), Some(6))])
        );
        assert_eq!(
            parser.parse(Some("{[1,3),[5,7),[10,)}")).unwrap(),
            Some(vec![
                int_range(Some(1), Some(2)),
                int_range(Some(5), Some(6)),
                int_range(Some(10), None),
            ])
        );
    }

    #[test]
    fn test_multirange_malformed() {
        let parser = MultiRangeParser::new().as_multi_int();
        for text in ["{,2147483649)}", "{[1,2)", "{[1,2)x,[3,4)}", "[1,2)", "{[1,2),}"] {
            let err = parser.parse(Some(text)).unwrap_err();
            assert!(
                matches!(err, LiteralError::UnsupportedFormat { kind: "range", .. }),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_multirange_dates() {
        let parser = MultiRangeParser::from_db_type("datemultirange").unwrap();
        let d = |m, dd| NaiveDate::from_ymd_opt(2024, m, dd).unwrap();
        assert_eq!(
            parser.parse(Some("{[2024-01-01,2024-01-10),[2024-02-01,2024-02-05)}")).unwrap(),
            Some(vec![
                RangeBounds::new(d(1, 1), d(1, 9)),
                RangeBounds::new(d(2, 1), d(2, 4)),
            ])
        );
    }

    #[test]
    fn test_with_native_int64() {
        let parser = MultiRangeParser::new().as_multi_big_int().with_native_int64(false);
        assert_eq!(
            parser.parse(Some("{[1,3)}")).unwrap(),
            Some(vec![RangeBounds::new(1.0, 2.0)])
        );
        assert_eq!(parser.range_parser().kind(), Some(RangeKind::Int8));
    }
}
