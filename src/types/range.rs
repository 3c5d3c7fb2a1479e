//! Range kinds and range value objects.
//!
//! PostgreSQL canonicalizes discrete ranges (`int4range`, `int8range`,
//! `daterange`) to the inclusive-lower / exclusive-upper form, so `[1,5]` is
//! stored and printed as `[1,6)`. Continuous ranges keep the bounds they were
//! given.

use std::borrow::Cow;
use std::cmp::Ordering;

use super::value::Value;
use crate::column::{ColumnFactory, ScalarColumn};
use crate::error::{LiteralError, LiteralResult};

/// The six built-in range types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Int4,
    Int8,
    Numeric,
    Date,
    Timestamp,
    TimestampTz,
}

impl RangeKind {
    pub const ALL: [RangeKind; 6] = [
        RangeKind::Int4,
        RangeKind::Int8,
        RangeKind::Numeric,
        RangeKind::Date,
        RangeKind::Timestamp,
        RangeKind::TimestampTz,
    ];

    /// Resolve a range type name such as `int4range`.
    pub fn from_range_type(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.range_type() == name)
    }

    /// Resolve a multirange type name such as `int4multirange` to its range kind.
    pub fn from_multirange_type(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.multirange_type() == name)
    }

    pub fn range_type(&self) -> &'static str {
        match self {
            RangeKind::Int4 => "int4range",
            RangeKind::Int8 => "int8range",
            RangeKind::Numeric => "numrange",
            RangeKind::Date => "daterange",
            RangeKind::Timestamp => "tsrange",
            RangeKind::TimestampTz => "tstzrange",
        }
    }

    pub fn multirange_type(&self) -> &'static str {
        match self {
            RangeKind::Int4 => "int4multirange",
            RangeKind::Int8 => "int8multirange",
            RangeKind::Numeric => "nummultirange",
            RangeKind::Date => "datemultirange",
            RangeKind::Timestamp => "tsmultirange",
            RangeKind::TimestampTz => "tstzmultirange",
        }
    }

    /// Name of the element type, e.g. `int4` for `int4range`.
    pub fn subtype(&self) -> &'static str {
        match self {
            RangeKind::Int4 => "int4",
            RangeKind::Int8 => "int8",
            RangeKind::Numeric => "numeric",
            RangeKind::Date => "date",
            RangeKind::Timestamp => "timestamp",
            RangeKind::TimestampTz => "timestamptz",
        }
    }

    /// Discrete kinds have a canonical `[)` form.
    pub fn is_discrete(&self) -> bool {
        matches!(self, RangeKind::Int4 | RangeKind::Int8 | RangeKind::Date)
    }
}

impl std::fmt::Display for RangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.range_type())
    }
}

/// A `[lower, upper]` pair. `Value::Null` on a side means unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBounds {
    pub lower: Value,
    pub upper: Value,
}

impl RangeBounds {
    pub fn new(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    /// Both sides unbounded.
    pub fn unbounded() -> Self {
        Self::new(Value::Null, Value::Null)
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_null() && self.upper.is_null()
    }
}

/// A range as supplied by the caller, before canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeValue {
    kind: RangeKind,
    lower: Value,
    upper: Value,
    include_lower: bool,
    include_upper: bool,
}

impl RangeValue {
    /// Create a `[lower,upper)` range.
    pub fn new(kind: RangeKind, lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self {
            kind,
            lower: lower.into(),
            upper: upper.into(),
            include_lower: true,
            include_upper: false,
        }
    }

    pub fn int4(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(RangeKind::Int4, lower, upper)
    }

    pub fn int8(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(RangeKind::Int8, lower, upper)
    }

    pub fn numeric(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(RangeKind::Numeric, lower, upper)
    }

    pub fn date(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(RangeKind::Date, lower, upper)
    }

    pub fn timestamp(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(RangeKind::Timestamp, lower, upper)
    }

    pub fn timestamp_tz(lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self::new(RangeKind::TimestampTz, lower, upper)
    }

    /// Set both inclusivity flags.
    pub fn with_bounds(mut self, include_lower: bool, include_upper: bool) -> Self {
        self.include_lower = include_lower;
        self.include_upper = include_upper;
        self
    }

    pub fn include_lower(mut self, include: bool) -> Self {
        self.include_lower = include;
        self
    }

    pub fn include_upper(mut self, include: bool) -> Self {
        self.include_upper = include;
        self
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    pub fn lower(&self) -> &Value {
        &self.lower
    }

    pub fn upper(&self) -> &Value {
        &self.upper
    }

    pub fn is_lower_inclusive(&self) -> bool {
        self.include_lower
    }

    pub fn is_upper_inclusive(&self) -> bool {
        self.include_upper
    }

    /// Normalize the bounds against the kind's bound column.
    ///
    /// Returns `None` when the range is empty. Discrete kinds always come
    /// back as `[)`; unbounded sides are never inclusive.
    pub fn canonical(&self, native_int64: bool) -> LiteralResult<Option<CanonicalRange>> {
        let column = ColumnFactory::new()
            .with_native_int64(native_int64)
            .bound_column(self.kind);

        let mut lower = column.bound_from_value(&self.lower)?;
        let mut upper = column.bound_from_value(&self.upper)?;
        let mut include_lower = self.include_lower && !lower.is_null();
        let mut include_upper = self.include_upper && !upper.is_null();

        match lower.compare(&upper) {
            Some(Ordering::Greater) => {
                return Err(LiteralError::invalid(format!(
                    "{} lower bound must be less than or equal to upper bound",
                    self.kind
                )));
            }
            Some(Ordering::Equal) if !(include_lower && include_upper) => return Ok(None),
            _ => {}
        }

        if column.is_discrete() {
            if !lower.is_null() && !include_lower {
                lower = column.step(lower, true)?;
            }
            if !upper.is_null() && include_upper {
                upper = column.step(upper, true)?;
            }
            include_lower = !lower.is_null();
            include_upper = false;

            if matches!(
                lower.compare(&upper),
                Some(Ordering::Equal | Ordering::Greater)
            ) {
                return Ok(None);
            }
        }

        Ok(Some(CanonicalRange {
            kind: self.kind,
            column,
            lower,
            upper,
            include_lower,
            include_upper,
        }))
    }

    /// Encode as a range literal such as `[1,6)`, or `empty`.
    pub fn to_literal(&self) -> LiteralResult<String> {
        self.to_literal_with(true)
    }

    pub fn to_literal_with(&self, native_int64: bool) -> LiteralResult<String> {
        Ok(match self.canonical(native_int64)? {
            Some(range) => range.to_literal(),
            None => EMPTY.to_string(),
        })
    }
}

/// The `empty` range literal.
pub const EMPTY: &str = "empty";

/// A range after bound conversion and canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRange {
    kind: RangeKind,
    column: ScalarColumn,
    pub lower: Value,
    pub upper: Value,
    pub include_lower: bool,
    pub include_upper: bool,
}

impl CanonicalRange {
    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    /// The bracket pair, e.g. `[)`, as passed to range constructor functions.
    pub fn bounds_flag(&self) -> &'static str {
        match (self.include_lower, self.include_upper) {
            (true, true) => "[]",
            (true, false) => "[)",
            (false, true) => "(]",
            (false, false) => "()",
        }
    }

    pub fn to_literal(&self) -> String {
        let flag = self.bounds_flag();
        let mut out = String::new();
        out.push_str(&flag[..1]);
        if !self.lower.is_null() {
            out.push_str(&quote_bound(&self.column.render_bound(&self.lower)));
        }
        out.push(',');
        if !self.upper.is_null() {
            out.push_str(&quote_bound(&self.column.render_bound(&self.upper)));
        }
        out.push_str(&flag[1..]);
        out
    }
}

/// Quote a bound the way `range_out` does: double quotes around text with
/// special characters, embedded `"` and `\` doubled.
pub(crate) fn quote_bound(text: &str) -> Cow<'_, str> {
    let needs_quotes = text.is_empty()
        || text
            .chars()
            .any(|c| matches!(c, '"' | '\\' | ',' | '(' | ')' | '[' | ']') || c.is_whitespace());

    if !needs_quotes {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push(c);
        }
        out.push(c);
    }
    out.push('"');
    Cow::Owned(out)
}
