use super::range::{RangeKind, RangeValue};
use crate::error::{LiteralError, LiteralResult};

/// An ordered set of ranges of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiRangeValue {
    kind: RangeKind,
    ranges: Vec<RangeValue>,
}

impl MultiRangeValue {
    pub fn new(kind: RangeKind) -> Self {
        Self {
            kind,
            ranges: Vec::new(),
        }
    }

    pub fn from_ranges(kind: RangeKind, ranges: Vec<RangeValue>) -> Self {
        Self { kind, ranges }
    }

    /// Append a range. Its kind is checked when the value is encoded.
    pub fn push(mut self, range: RangeValue) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    pub fn ranges(&self) -> &[RangeValue] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub(crate) fn check_kinds(&self) -> LiteralResult<()> {
        match self.ranges.iter().find(|r| r.kind() != self.kind) {
            Some(range) => Err(LiteralError::invalid(format!(
                "{} cannot hold a {} value",
                self.kind.multirange_type(),
                range.kind()
            ))),
            None => Ok(()),
        }
    }

    /// Encode as `{[1,3),[5,7)}`. Empty member ranges are dropped, as
    /// PostgreSQL does.
    pub fn to_literal(&self) -> LiteralResult<String> {
        self.to_literal_with(true)
    }

    pub fn to_literal_with(&self, native_int64: bool) -> LiteralResult<String> {
        self.check_kinds()?;
        let mut parts = Vec::with_capacity(self.ranges.len());
        for range in &self.ranges {
            if let Some(canonical) = range.canonical(native_int64)? {
                parts.push(canonical.to_literal());
            }
        }
        Ok(format!("{{{}}}", parts.join(",")))
    }
}
