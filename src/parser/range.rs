//! Range literal parser using nom.
//!
//! # Syntax Overview
//!
//! ```text
//! [3,7)          inclusive lower, exclusive upper
//! (,"2024-01-01 10:00:00"]   unbounded lower, quoted upper
//! empty          the empty range
//! {[1,3),[5,7)}  multirange
//! ```

use std::cmp::Ordering;

use nom::{
    IResult,
    bytes::complete::take_while,
    character::complete::{char, one_of},
    combinator::{all_consuming, recognize},
    multi::separated_list0,
    sequence::{delimited, tuple},
};

use crate::column::{ColumnFactory, ScalarColumn};
use crate::error::{LiteralError, LiteralResult};
use crate::types::{EMPTY, RangeBounds, RangeKind, Value};

/// The raw pieces of one range literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeLiteral<'a> {
    pub lower: Option<&'a str>,
    pub upper: Option<&'a str>,
    pub include_lower: bool,
    pub include_upper: bool,
}

impl<'a> RangeLiteral<'a> {
    /// Split `[lower,upper)` into its parts. Blank sides are unbounded,
    /// surrounding double quotes are trimmed.
    pub fn parse(text: &'a str) -> LiteralResult<Self> {
        let (_, (open, lower, _, upper, close)) = all_consuming(range_parts)(text).map_err(|_| {
            tracing::debug!(text, "unsupported range literal");
            LiteralError::unsupported("range", text)
        })?;

        Ok(Self {
            lower: bound_text(lower),
            upper: bound_text(upper),
            include_lower: open == '[',
            include_upper: close == ']',
        })
    }

    /// Convert both sides through the bound column. Discrete kinds are
    /// normalized to inclusive bounds on both sides.
    pub fn bounds(&self, column: &ScalarColumn) -> LiteralResult<RangeBounds> {
        let mut lower = match self.lower {
            Some(text) => column.parse_bound(text)?,
            None => Value::Null,
        };
        let mut upper = match self.upper {
            Some(text) => column.parse_bound(text)?,
            None => Value::Null,
        };

        if column.is_discrete() {
            if !lower.is_null() && !self.include_lower {
                lower = column.step(lower, true)?;
            }
            if !upper.is_null() && !self.include_upper {
                upper = column.step(upper, false)?;
            }
        }

        Ok(RangeBounds { lower, upper })
    }
}

fn bound_text(text: &str) -> Option<&str> {
    if text.is_empty() {
        None
    } else {
        Some(text.trim_matches('"'))
    }
}

/// `(\[|\()([^,]*),([^)\]]*)(\)|\])`
fn range_parts(input: &str) -> IResult<&str, (char, &str, char, &str, char)> {
    tuple((
        one_of("[("),
        take_while(|c: char| c != ','),
        char(','),
        take_while(|c: char| c != ')' && c != ']'),
        one_of(")]"),
    ))(input)
}

/// `{range,range,...}`, yielding each range substring.
fn multirange_parts(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        char('{'),
        separated_list0(char(','), recognize(range_parts)),
        char('}'),
    )(input)
}

/// Split a multirange literal into its range substrings.
pub fn split_multirange(text: &str) -> LiteralResult<Vec<&str>> {
    if text == "{}" {
        return Ok(Vec::new());
    }
    all_consuming(multirange_parts)(text)
        .map(|(_, ranges)| ranges)
        .map_err(|_| {
            tracing::debug!(text, "unsupported multirange literal");
            LiteralError::unsupported("range", text)
        })
}

/// Parser for single range literals.
///
/// Without a kind the bounds come back as raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeParser {
    kind: Option<RangeKind>,
    native_int64: bool,
}

impl Default for RangeParser {
    fn default() -> Self {
        Self {
            kind: None,
            native_int64: true,
        }
    }
}

impl RangeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a parser from a range type name such as `daterange`.
    pub fn from_db_type(name: &str) -> LiteralResult<Self> {
        RangeKind::from_range_type(name)
            .map(|kind| Self::new().with_kind(Some(kind)))
            .ok_or_else(|| {
                LiteralError::NotSupported(format!("Unsupported range type: '{}'", name))
            })
    }

    pub fn with_kind(self, kind: Option<RangeKind>) -> Self {
        Self { kind, ..self }
    }

    pub fn as_int(self) -> Self {
        self.with_kind(Some(RangeKind::Int4))
    }

    pub fn as_big_int(self) -> Self {
        self.with_kind(Some(RangeKind::Int8))
    }

    pub fn as_numeric(self) -> Self {
        self.with_kind(Some(RangeKind::Numeric))
    }

    pub fn as_date(self) -> Self {
        self.with_kind(Some(RangeKind::Date))
    }

    pub fn as_timestamp(self) -> Self {
        self.with_kind(Some(RangeKind::Timestamp))
    }

    pub fn as_timestamp_tz(self) -> Self {
        self.with_kind(Some(RangeKind::TimestampTz))
    }

    pub fn as_custom(self) -> Self {
        self.with_kind(None)
    }

    /// With `false`, `int8range` bounds are returned as floats.
    pub fn with_native_int64(self, native_int64: bool) -> Self {
        Self {
            native_int64,
            ..self
        }
    }

    pub fn kind(&self) -> Option<RangeKind> {
        self.kind
    }

    /// Parse a range literal to `[lower, upper]`.
    ///
    /// `None` and `empty` give `None`. Discrete kinds are returned inclusive on
    /// both sides, so `[3,7)` gives `[3, 6]`. A discrete range whose
    /// canonical bounds cross collapses to `[null, null]`.
    pub fn parse(&self, text: Option<&str>) -> LiteralResult<Option<RangeBounds>> {
        let Some(text) = text else {
            return Ok(None);
        };
        if text == EMPTY {
            return Ok(None);
        }

        tracing::trace!(text, kind = ?self.kind, "parsing range literal");

        let literal = RangeLiteral::parse(text)?;
        if literal.lower.is_none() && literal.upper.is_none() {
            return Ok(Some(RangeBounds::unbounded()));
        }

        let Some(kind) = self.kind else {
            return Ok(Some(RangeBounds::new(literal.lower, literal.upper)));
        };

        let column = ColumnFactory::new()
            .with_native_int64(self.native_int64)
            .bound_column(kind);
        let bounds = literal.bounds(&column)?;

        if column.is_discrete() && bounds.lower.compare(&bounds.upper) == Some(Ordering::Greater) {
            return Ok(Some(RangeBounds::unbounded()));
        }
        Ok(Some(bounds))
    }
}
