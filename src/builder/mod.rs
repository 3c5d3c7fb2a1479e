//! SQL fragment builders.
//!
//! Builders turn value objects into SQL text such as
//! `ARRAY[:qp0,:qp1]::int4[]` or `int4range(:qp0,:qp1,'[)')`. Scalar values
//! never appear in the SQL; they are bound into [`Params`] under generated
//! placeholder names.

pub mod array;
pub mod composite;
pub mod range;

pub use array::{ArrayExpression, ArrayExpressionBuilder, TypeHint};
pub use composite::{CompositeExpression, CompositeExpressionBuilder, CompositeField};
pub use range::{MultiRangeValueBuilder, RangeValueBuilder};

use crate::error::LiteralResult;
use crate::types::{MultiRangeValue, RangeValue, Value};

/// Default placeholder prefix.
pub const PARAM_PREFIX: &str = ":qp";

/// Anything a builder can turn into SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// SQL inserted verbatim.
    Raw(String),
    Subquery(Subquery),
    Array(ArrayExpression),
    Composite(CompositeExpression),
    Range(RangeValue),
    MultiRange(MultiRangeValue),
}

impl Expression {
    pub fn raw(sql: impl Into<String>) -> Self {
        Expression::Raw(sql.into())
    }

    /// Build with the default PostgreSQL builder.
    pub fn to_sql(&self, params: &mut Params) -> LiteralResult<String> {
        PgQueryBuilder::new().build_expression(self, params)
    }
}

impl From<Subquery> for Expression {
    fn from(query: Subquery) -> Self {
        Expression::Subquery(query)
    }
}

impl From<ArrayExpression> for Expression {
    fn from(expr: ArrayExpression) -> Self {
        Expression::Array(expr)
    }
}

impl From<CompositeExpression> for Expression {
    fn from(expr: CompositeExpression) -> Self {
        Expression::Composite(expr)
    }
}

impl From<RangeValue> for Expression {
    fn from(range: RangeValue) -> Self {
        Expression::Range(range)
    }
}

impl From<MultiRangeValue> for Expression {
    fn from(value: MultiRangeValue) -> Self {
        Expression::MultiRange(value)
    }
}

/// A prepared query used as a value, e.g. `ARRAY(SELECT id FROM t)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subquery {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl Subquery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Attach a named parameter used by the query text.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

/// Ordered placeholder to value map filled while building.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    prefix: String,
    next: usize,
    entries: Vec<(String, Value)>,
}

impl Default for Params {
    fn default() -> Self {
        Self::with_prefix(PARAM_PREFIX)
    }
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            entries: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Bind a value under the next generated name and return that name.
    pub fn bind(&mut self, value: Value) -> String {
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        self.entries.push((name.clone(), value));
        name
    }

    /// Add a named value, replacing an earlier one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn into_inner(self) -> Vec<(String, Value)> {
        self.entries
    }
}

/// The query builder the fragment builders call back into.
pub trait QueryBuilder {
    /// Build any expression, dispatching to the matching fragment builder.
    fn build_expression(&self, expr: &Expression, params: &mut Params) -> LiteralResult<String>;

    /// Bind a value and return its placeholder.
    fn bind_param(&self, value: Value, params: &mut Params) -> String {
        params.bind(value)
    }

    /// Merge a subquery's parameters and return its SQL.
    fn build(&self, query: &Subquery, params: &mut Params) -> LiteralResult<String> {
        for (name, value) in &query.params {
            params.insert(name.clone(), value.clone());
        }
        Ok(query.sql.clone())
    }
}

/// PostgreSQL query builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgQueryBuilder {
    native_int64: bool,
}

impl Default for PgQueryBuilder {
    fn default() -> Self {
        Self { native_int64: true }
    }
}

impl PgQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// With `false`, `int8range` bounds are bound as floats.
    pub fn with_native_int64(self, native_int64: bool) -> Self {
        Self { native_int64 }
    }
}

impl QueryBuilder for PgQueryBuilder {
    fn build_expression(&self, expr: &Expression, params: &mut Params) -> LiteralResult<String> {
        match expr {
            Expression::Raw(sql) => Ok(sql.clone()),
            Expression::Subquery(query) => Ok(format!("({})", self.build(query, params)?)),
            Expression::Array(array) => ArrayExpressionBuilder::new(self).build(array, params),
            Expression::Composite(composite) => {
                CompositeExpressionBuilder::new(self).build(composite, params)
            }
            Expression::Range(range) => RangeValueBuilder::new(self)
                .with_native_int64(self.native_int64)
                .build(range, params),
            Expression::MultiRange(value) => MultiRangeValueBuilder::new(self)
                .with_native_int64(self.native_int64)
                .build(value, params),
        }
    }
}
