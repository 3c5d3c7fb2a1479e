//! `ARRAY[...]` builder.

use std::sync::Arc;

use super::{Expression, Params, QueryBuilder};
use crate::column::ColumnType;
use crate::error::LiteralResult;
use crate::types::Value;

/// The element type of an array expression: a bare name or a column that
/// also converts each element.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeHint {
    Name(String),
    Column(Arc<dyn ColumnType>),
}

impl TypeHint {
    pub fn name(&self) -> &str {
        match self {
            TypeHint::Name(name) => name,
            TypeHint::Column(column) => column.db_type(),
        }
    }

    fn is_json(&self) -> bool {
        matches!(self.name(), "json" | "jsonb")
    }
}

impl From<&str> for TypeHint {
    fn from(name: &str) -> Self {
        TypeHint::Name(name.to_string())
    }
}

impl From<String> for TypeHint {
    fn from(name: String) -> Self {
        TypeHint::Name(name)
    }
}

impl From<Arc<dyn ColumnType>> for TypeHint {
    fn from(column: Arc<dyn ColumnType>) -> Self {
        TypeHint::Column(column)
    }
}

/// An array value headed for SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    value: Value,
    element_type: Option<TypeHint>,
    dimension: usize,
}

impl ArrayExpression {
    /// A one-dimensional array with no type hint.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            element_type: None,
            dimension: 1,
        }
    }

    /// Element type, e.g. `int4` for `int4[]`.
    pub fn with_type(mut self, element_type: impl Into<TypeHint>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension.max(1);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn element_type(&self) -> Option<&TypeHint> {
        self.element_type.as_ref()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// `::int4[][]`, or nothing when the element type is unknown.
    pub fn type_hint(&self) -> String {
        match &self.element_type {
            Some(hint) => format!("::{}{}", hint.name(), "[]".repeat(self.dimension)),
            None => String::new(),
        }
    }

    fn nested(&self, value: Value) -> Self {
        Self {
            value,
            element_type: self.element_type.clone(),
            dimension: self.dimension - 1,
        }
    }
}

/// Builds `ARRAY[...]` and `ARRAY(subquery)` fragments.
pub struct ArrayExpressionBuilder<'a> {
    query_builder: &'a dyn QueryBuilder,
}

impl<'a> ArrayExpressionBuilder<'a> {
    pub fn new(query_builder: &'a dyn QueryBuilder) -> Self {
        Self { query_builder }
    }

    pub fn build(&self, expr: &ArrayExpression, params: &mut Params) -> LiteralResult<String> {
        let items = match expr.value() {
            Value::Null => return Ok("NULL".to_string()),
            Value::Expr(inner) => {
                return match inner.as_ref() {
                    Expression::Subquery(query) => Ok(format!(
                        "ARRAY({}){}",
                        self.query_builder.build(query, params)?,
                        expr.type_hint()
                    )),
                    other => self.query_builder.build_expression(other, params),
                };
            }
            Value::Array(items) => items.clone(),
            Value::Map(fields) => fields.iter().map(|(_, v)| v.clone()).collect(),
            // Already-encoded literal text, or a lone scalar.
            scalar => {
                let placeholder = self.query_builder.bind_param(scalar.clone(), params);
                return Ok(format!("{}{}", placeholder, expr.type_hint()));
            }
        };

        let mut parts = Vec::with_capacity(items.len());
        if expr.dimension() > 1 {
            for item in items {
                parts.push(self.build(&expr.nested(item), params)?);
            }
        } else {
            for item in items {
                let item = typecast_element(expr.element_type(), item)?;
                let part = match item {
                    Value::Expr(inner) => self.query_builder.build_expression(&inner, params)?,
                    value => self.query_builder.bind_param(value, params),
                };
                parts.push(part);
            }
        }

        Ok(format!("ARRAY[{}]{}", parts.join(","), expr.type_hint()))
    }
}

fn typecast_element(hint: Option<&TypeHint>, item: Value) -> LiteralResult<Value> {
    match hint {
        Some(TypeHint::Column(column)) => column.db_typecast(item),
        Some(hint) if hint.is_json() && !item.is_null() && item.as_expr().is_none() => {
            Ok(Value::Json(item.to_json()?))
        }
        _ => Ok(item),
    }
}
