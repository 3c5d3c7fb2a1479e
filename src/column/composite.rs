//! Composite (row type) columns.

use super::ColumnType;
use crate::builder::{CompositeExpression, CompositeField, Expression};
use crate::error::LiteralResult;
use crate::parser::CompositeParser;
use crate::types::Value;

/// A user-defined composite type such as `currency_money`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeColumn {
    db_type: String,
    fields: Vec<CompositeField>,
    default: Value,
}

impl CompositeColumn {
    pub fn new(db_type: impl Into<String>, fields: Vec<CompositeField>) -> Self {
        Self {
            db_type: db_type.into(),
            fields,
            default: Value::Null,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn fields(&self) -> &[CompositeField] {
        &self.fields
    }
}

impl ColumnType for CompositeColumn {
    fn db_type(&self) -> &str {
        &self.db_type
    }

    fn default_value(&self) -> Value {
        self.default.clone()
    }

    fn db_typecast(&self, value: Value) -> LiteralResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Expr(expr) if !matches!(*expr, Expression::Subquery(_)) => Ok(Value::Expr(expr)),
            value => Ok(Value::expr(
                CompositeExpression::new(value)
                    .with_type(self.db_type.clone())
                    .with_fields(self.fields.clone()),
            )),
        }
    }

    /// Fields map to their names; extra positions are keyed by index.
    fn typecast(&self, text: Option<&str>) -> LiteralResult<Value> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };
        let Some(raw) = CompositeParser::new().parse(text)? else {
            return Ok(Value::Null);
        };

        let mut entries = Vec::with_capacity(raw.len());
        for (i, raw) in raw.into_iter().enumerate() {
            let entry = match self.fields.get(i) {
                Some(field) => {
                    let value = match field.column() {
                        Some(column) => column.typecast(raw.as_deref())?,
                        None => raw.map(Value::Text).unwrap_or(Value::Null),
                    };
                    (field.name().to_string(), value)
                }
                None => (i.to_string(), raw.map(Value::Text).unwrap_or(Value::Null)),
            };
            entries.push(entry);
        }
        Ok(Value::Map(entries))
    }
}
