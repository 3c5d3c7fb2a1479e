//! Range constructor builders: `int4range(:qp0,:qp1,'[)')`.

use super::{Params, QueryBuilder};
use crate::error::LiteralResult;
use crate::types::{CanonicalRange, EMPTY, MultiRangeValue, RangeValue, Value};

/// Builds a range constructor call from a [`RangeValue`].
pub struct RangeValueBuilder<'a> {
    query_builder: &'a dyn QueryBuilder,
    native_int64: bool,
}

impl<'a> RangeValueBuilder<'a> {
    pub fn new(query_builder: &'a dyn QueryBuilder) -> Self {
        Self {
            query_builder,
            native_int64: true,
        }
    }

    pub fn with_native_int64(self, native_int64: bool) -> Self {
        Self {
            native_int64,
            ..self
        }
    }

    /// Discrete kinds are canonicalized first, so `[1,5]` builds as
    /// `int4range(:qp0,:qp1,'[)')` with 1 and 6 bound. Empty ranges build as
    /// `'empty'::int4range`.
    pub fn build(&self, range: &RangeValue, params: &mut Params) -> LiteralResult<String> {
        match range.canonical(self.native_int64)? {
            Some(canonical) => Ok(self.constructor(&canonical, params)),
            None => Ok(format!("'{}'::{}", EMPTY, range.kind().range_type())),
        }
    }

    fn constructor(&self, range: &CanonicalRange, params: &mut Params) -> String {
        let lower = self.bound(&range.lower, params);
        let upper = self.bound(&range.upper, params);
        format!(
            "{}({},{},'{}')",
            range.kind().range_type(),
            lower,
            upper,
            range.bounds_flag()
        )
    }

    fn bound(&self, value: &Value, params: &mut Params) -> String {
        if value.is_null() {
            "NULL".to_string()
        } else {
            self.query_builder.bind_param(value.clone(), params)
        }
    }
}

/// Builds a multirange constructor call from a [`MultiRangeValue`].
pub struct MultiRangeValueBuilder<'a> {
    range: RangeValueBuilder<'a>,
}

impl<'a> MultiRangeValueBuilder<'a> {
    pub fn new(query_builder: &'a dyn QueryBuilder) -> Self {
        Self {
            range: RangeValueBuilder::new(query_builder),
        }
    }

    pub fn with_native_int64(self, native_int64: bool) -> Self {
        Self {
            range: self.range.with_native_int64(native_int64),
        }
    }

    /// `int4multirange(int4range(...),...)`. Empty members are dropped.
    pub fn build(&self, value: &MultiRangeValue, params: &mut Params) -> LiteralResult<String> {
        value.check_kinds()?;

        let mut parts = Vec::with_capacity(value.ranges().len());
        for range in value.ranges() {
            if let Some(canonical) = range.canonical(self.range.native_int64)? {
                parts.push(self.range.constructor(&canonical, params));
            }
        }
        Ok(format!("{}({})", value.kind().multirange_type(), parts.join(",")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PgQueryBuilder;
    use crate::error::LiteralError;
    use crate::types::RangeKind;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn build(range: RangeValue) -> (String, Params) {
        let mut params = Params::new();
        let sql = RangeValueBuilder::new(&PgQueryBuilder::new())
            .build(&range, &mut params)
            .unwrap();
        (sql, params)
    }

    #[test]
    fn test_int4_canonicalized() {
        let (sql, params) = build(RangeValue::int4(1, 5).with_bounds(true, true));
        assert_eq!(sql, "int4range(:qp0,:qp1,'[)')");
        assert_eq!(params.get(":qp0"), Some(&Value::Int(1)));
        assert_eq!(params.get(":qp1"), Some(&Value::Int(6)));
    }

    #[test]
    fn test_unbounded_side_is_inline_null() {
        let (sql, params) = build(RangeValue::int8(Value::Null, 10));
        assert_eq!(sql, "int8range(NULL,:qp0,'()')");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_continuous_keeps_flags() {
        let (sql, _) = build(RangeValue::numeric(0.5, 1.5).with_bounds(false, true));
        assert_eq!(sql, "numrange(:qp0,:qp1,'(]')");
    }

    #[test]
    fn test_empty() {
        let (sql, params) = build(RangeValue::date(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        assert_eq!(sql, "'empty'::daterange");
        assert!(params.is_empty());
    }

    #[test]
    fn test_big_int_as_float() {
        let mut params = Params::new();
        let sql = RangeValueBuilder::new(&PgQueryBuilder::new())
            .with_native_int64(false)
            .build(&RangeValue::int8(1, 9007199254740990i64).with_bounds(true, true), &mut params)
            .unwrap();
        assert_eq!(sql, "int8range(:qp0,:qp1,'[)')");
        assert_eq!(params.get(":qp1"), Some(&Value::Float(9007199254740991.0)));
    }

    #[test]
    fn test_multirange() {
        let value = MultiRangeValue::new(RangeKind::Int4)
            .push(RangeValue::int4(1, 3))
            .push(RangeValue::int4(4, 4))
            .push(RangeValue::int4(5, 7).with_bounds(true, true));
        let mut params = Params::new();
        let sql = MultiRangeValueBuilder::new(&PgQueryBuilder::new())
            .build(&value, &mut params)
            .unwrap();
        assert_eq!(
            sql,
            "int4multirange(int4range(:qp0,:qp1,'[)'),int4range(:qp2,:qp3,'[)'))"
        );
        assert_eq!(params.get(":qp3"), Some(&Value::Int(8)));
    }

    #[test]
    fn test_multirange_kind_mismatch() {
        let value = MultiRangeValue::new(RangeKind::Int4).push(RangeValue::int8(1, 2));
        let err = MultiRangeValueBuilder::new(&PgQueryBuilder::new())
            .build(&value, &mut Params::new())
            .unwrap_err();
        assert!(matches!(err, LiteralError::InvalidValue(_)));
    }
}
