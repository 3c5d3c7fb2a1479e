//! `ROW(...)` builder for composite types.

use std::sync::Arc;

use super::{Expression, Params, QueryBuilder};
use crate::column::ColumnType;
use crate::error::LiteralResult;
use crate::types::Value;

/// A named field of a composite type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeField {
    name: String,
    column: Option<Arc<dyn ColumnType>>,
}

impl CompositeField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: None,
        }
    }

    pub fn with_column(mut self, column: Arc<dyn ColumnType>) -> Self {
        self.column = Some(column);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self) -> Option<&Arc<dyn ColumnType>> {
        self.column.as_ref()
    }

    fn default_value(&self) -> Value {
        self.column
            .as_ref()
            .map(|c| c.default_value())
            .unwrap_or(Value::Null)
    }
}

/// A composite value headed for SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeExpression {
    value: Value,
    type_name: Option<String>,
    fields: Vec<CompositeField>,
}

impl CompositeExpression {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            type_name: None,
            fields: Vec::new(),
        }
    }

    /// Composite type name used as the `::type` cast.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<CompositeField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn fields(&self) -> &[CompositeField] {
        &self.fields
    }

    /// Field values in declaration order.
    ///
    /// Each field is looked up by name, then by position, then falls back to
    /// its column default. Without fields the payload order is kept.
    pub fn normalized_value(&self) -> Vec<Value> {
        match &self.value {
            Value::Map(entries) if self.fields.is_empty() => {
                entries.iter().map(|(_, v)| v.clone()).collect()
            }
            Value::Array(items) if self.fields.is_empty() => items.clone(),
            Value::Map(entries) => self
                .fields
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    let position = i.to_string();
                    entries
                        .iter()
                        .find(|(name, _)| name == field.name())
                        .or_else(|| entries.iter().find(|(name, _)| *name == position))
                        .map(|(_, v)| v.clone())
                        .unwrap_or_else(|| field.default_value())
                })
                .collect(),
            Value::Array(items) => self
                .fields
                .iter()
                .enumerate()
                .map(|(i, field)| items.get(i).cloned().unwrap_or_else(|| field.default_value()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn type_hint(&self) -> String {
        self.type_name
            .as_ref()
            .map(|name| format!("::{}", name))
            .unwrap_or_default()
    }
}

/// Builds `ROW(...)::type` fragments.
pub struct CompositeExpressionBuilder<'a> {
    query_builder: &'a dyn QueryBuilder,
}

impl<'a> CompositeExpressionBuilder<'a> {
    pub fn new(query_builder: &'a dyn QueryBuilder) -> Self {
        Self { query_builder }
    }

    pub fn build(&self, expr: &CompositeExpression, params: &mut Params) -> LiteralResult<String> {
        match expr.value() {
            Value::Null => return Ok("NULL".to_string()),
            Value::Array(items) if items.is_empty() => return Ok("NULL".to_string()),
            Value::Map(entries) if entries.is_empty() => return Ok("NULL".to_string()),
            Value::Text(text) if text.is_empty() => return Ok("NULL".to_string()),
            Value::Expr(inner) => {
                return match inner.as_ref() {
                    Expression::Subquery(query) => Ok(format!(
                        "({}){}",
                        self.query_builder.build(query, params)?,
                        expr.type_hint()
                    )),
                    other => self.query_builder.build_expression(other, params),
                };
            }
            Value::Array(_) | Value::Map(_) => {}
            scalar => {
                let placeholder = self.query_builder.bind_param(scalar.clone(), params);
                return Ok(format!("{}{}", placeholder, expr.type_hint()));
            }
        }

        let values = expr.normalized_value();
        if values.is_empty() {
            return Ok("NULL".to_string());
        }

        let mut parts = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            let value = match expr.fields().get(i).and_then(CompositeField::column) {
                Some(column) => column.db_typecast(value)?,
                None => value,
            };
            let part = match value {
                Value::Expr(inner) => self.query_builder.build_expression(&inner, params)?,
                value => self.query_builder.bind_param(value, params),
            };
            parts.push(part);
        }

        Ok(format!("ROW({}){}", parts.join(","), expr.type_hint()))
    }
}
