//! Array columns.

use std::sync::Arc;

use super::ColumnType;
use crate::builder::{ArrayExpression, Expression};
use crate::error::LiteralResult;
use crate::parser::{ArrayParser, Element};
use crate::types::Value;

/// `<element>[]` with any number of dimensions.
#[derive(Debug, Clone)]
pub struct ArrayColumn {
    element: Arc<dyn ColumnType>,
    dimension: usize,
    parser: ArrayParser,
    db_type: String,
}

impl ArrayColumn {
    pub fn new(element: Arc<dyn ColumnType>) -> Self {
        let db_type = format!("{}[]", element.db_type());
        Self {
            element,
            dimension: 1,
            parser: ArrayParser::new(),
            db_type,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension.max(1);
        self.db_type = format!("{}{}", self.element.db_type(), "[]".repeat(self.dimension));
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.parser = self.parser.with_delimiter(delimiter);
        self
    }

    pub fn element(&self) -> &Arc<dyn ColumnType> {
        &self.element
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn typecast_elements(&self, items: Vec<Element>) -> LiteralResult<Value> {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(match item {
                Element::Null => Value::Null,
                Element::Text(text) => self.element.typecast(Some(&text))?,
                Element::Array(nested) => self.typecast_elements(nested)?,
            });
        }
        Ok(Value::Array(values))
    }
}

impl ColumnType for ArrayColumn {
    fn db_type(&self) -> &str {
        &self.db_type
    }

    fn db_typecast(&self, value: Value) -> LiteralResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Expr(expr) if !matches!(*expr, Expression::Subquery(_)) => Ok(Value::Expr(expr)),
            value => Ok(Value::expr(
                ArrayExpression::new(value)
                    .with_type(self.element.clone())
                    .with_dimension(self.dimension),
            )),
        }
    }

    fn typecast(&self, text: Option<&str>) -> LiteralResult<Value> {
        match self.parser.parse(text)? {
            Some(items) => self.typecast_elements(items),
            None => Ok(Value::Null),
        }
    }
}
