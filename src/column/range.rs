//! Range and multirange columns.

use std::cmp::Ordering;

use super::{ColumnFactory, ColumnType, ScalarColumn};
use crate::builder::Expression;
use crate::error::{LiteralError, LiteralResult};
use crate::parser::{RangeLiteral, split_multirange};
use crate::types::{EMPTY, MultiRangeValue, RangeKind, RangeValue, Value};

/// A column of one of the built-in range types.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeColumn {
    kind: RangeKind,
    bound: ScalarColumn,
    native_int64: bool,
}

impl RangeColumn {
    /// Column for a range type name such as `tstzrange`.
    pub fn new(db_type: &str) -> LiteralResult<Self> {
        let kind = RangeKind::from_range_type(db_type).ok_or_else(|| {
            LiteralError::NotSupported(format!("Unsupported range type: '{}'", db_type))
        })?;
        Ok(Self::from_kind(kind, &ColumnFactory::new()))
    }

    pub fn from_kind(kind: RangeKind, factory: &ColumnFactory) -> Self {
        Self {
            kind,
            bound: factory.bound_column(kind),
            native_int64: factory.native_int64(),
        }
    }

    pub fn with_native_int64(self, native_int64: bool) -> Self {
        let factory = ColumnFactory::new().with_native_int64(native_int64);
        Self::from_kind(self.kind, &factory)
    }

    pub fn kind(&self) -> RangeKind {
        self.kind
    }

    pub fn bound_column(&self) -> &ScalarColumn {
        &self.bound
    }

    /// Decode one range literal.
    ///
    /// `empty` and discrete ranges with no members give `None`. Discrete
    /// bounds come back inclusive.
    pub fn decode(&self, text: &str) -> LiteralResult<Option<RangeValue>> {
        if text == EMPTY {
            return Ok(None);
        }

        let literal = RangeLiteral::parse(text)?;
        let bounds = literal.bounds(&self.bound)?;

        let (include_lower, include_upper) = if self.bound.is_discrete() {
            if bounds.lower.compare(&bounds.upper) == Some(Ordering::Greater) {
                return Ok(None);
            }
            (!bounds.lower.is_null(), !bounds.upper.is_null())
        } else {
            (
                literal.include_lower && literal.lower.is_some(),
                literal.include_upper && literal.upper.is_some(),
            )
        };

        Ok(Some(
            RangeValue::new(self.kind, bounds.lower, bounds.upper)
                .with_bounds(include_lower, include_upper),
        ))
    }

    fn encode(&self, range: &RangeValue) -> LiteralResult<Value> {
        if range.kind() != self.kind {
            return Err(LiteralError::invalid(format!(
                "{} column cannot hold a {} value",
                self.kind,
                range.kind()
            )));
        }
        Ok(Value::Text(range.to_literal_with(self.native_int64)?))
    }

    /// A `[lower, upper]` pair becomes a `[)` range.
    fn range_from_pair(&self, items: Vec<Value>) -> LiteralResult<RangeValue> {
        let [lower, upper]: [Value; 2] = items.try_into().map_err(|items: Vec<Value>| {
            LiteralError::invalid(format!(
                "a {} needs exactly two bounds, got {}",
                self.kind,
                items.len()
            ))
        })?;
        Ok(RangeValue::new(self.kind, lower, upper))
    }
}

impl ColumnType for RangeColumn {
    fn db_type(&self) -> &str {
        self.kind.range_type()
    }

    fn db_typecast(&self, value: Value) -> LiteralResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Text(text) => Ok(Value::Text(text)),
            Value::Array(items) => self.encode(&self.range_from_pair(items)?),
            Value::Expr(expr) => match *expr {
                Expression::Range(range) => self.encode(&range),
                other => Ok(Value::expr(other)),
            },
            other => Err(LiteralError::NotSupported(format!(
                "cannot encode a {} value as {}",
                other.type_name(),
                self.kind
            ))),
        }
    }

    fn typecast(&self, text: Option<&str>) -> LiteralResult<Value> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };
        Ok(self.decode(text)?.map(Value::expr).unwrap_or(Value::Null))
    }
}

/// A column of one of the built-in multirange types.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiRangeColumn {
    range: RangeColumn,
}

impl MultiRangeColumn {
    /// Column for a multirange type name such as `datemultirange`.
    pub fn new(db_type: &str) -> LiteralResult<Self> {
        let kind = RangeKind::from_multirange_type(db_type).ok_or_else(|| {
            LiteralError::NotSupported(format!("Unsupported multirange type: '{}'", db_type))
        })?;
        Ok(Self::from_kind(kind, &ColumnFactory::new()))
    }

    pub fn from_kind(kind: RangeKind, factory: &ColumnFactory) -> Self {
        Self {
            range: RangeColumn::from_kind(kind, factory),
        }
    }

    pub fn kind(&self) -> RangeKind {
        self.range.kind()
    }

    pub fn range_column(&self) -> &RangeColumn {
        &self.range
    }

    /// Decode a multirange literal. Empty members are skipped.
    pub fn decode(&self, text: &str) -> LiteralResult<MultiRangeValue> {
        let mut value = MultiRangeValue::new(self.kind());
        for part in split_multirange(text)? {
            if let Some(range) = self.range.decode(part)? {
                value = value.push(range);
            }
        }
        Ok(value)
    }

    fn encode(&self, value: &MultiRangeValue) -> LiteralResult<Value> {
        if value.kind() != self.kind() {
            return Err(LiteralError::invalid(format!(
                "{} column cannot hold a {} value",
                self.kind().multirange_type(),
                value.kind().multirange_type()
            )));
        }
        Ok(Value::Text(value.to_literal_with(self.range.native_int64)?))
    }
}

impl ColumnType for MultiRangeColumn {
    fn db_type(&self) -> &str {
        self.kind().multirange_type()
    }

    fn db_typecast(&self, value: Value) -> LiteralResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Text(text) => Ok(Value::Text(text)),
            Value::Array(items) => {
                let mut multi = MultiRangeValue::new(self.kind());
                for item in items {
                    let range = match item {
                        Value::Array(pair) => self.range.range_from_pair(pair)?,
                        Value::Expr(expr) => match *expr {
                            Expression::Range(range) => range,
                            _ => {
                                return Err(LiteralError::NotSupported(format!(
                                    "cannot use an expression as a member of {}",
                                    self.db_type()
                                )));
                            }
                        },
                        other => {
                            return Err(LiteralError::NotSupported(format!(
                                "cannot use a {} value as a member of {}",
                                other.type_name(),
                                self.db_type()
                            )));
                        }
                    };
                    multi = multi.push(range);
                }
                self.encode(&multi)
            }
            Value::Expr(expr) => match *expr {
                Expression::MultiRange(multi) => self.encode(&multi),
                other => Ok(Value::expr(other)),
            },
            other => Err(LiteralError::NotSupported(format!(
                "cannot encode a {} value as {}",
                other.type_name(),
                self.db_type()
            ))),
        }
    }

    fn typecast(&self, text: Option<&str>) -> LiteralResult<Value> {
        match text {
            Some(text) => Ok(Value::expr(self.decode(text)?)),
            None => Ok(Value::Null),
        }
    }
}
