//! Column types: per-type conversion between PostgreSQL text and [`Value`].
//!
//! `typecast` decodes what the server sent, `db_typecast` prepares a value
//! for a query. Columns are shared as `Arc<dyn ColumnType>`.

pub mod array;
pub mod composite;
pub mod range;
pub mod scalar;

use std::sync::Arc;

pub use array::ArrayColumn;
pub use composite::CompositeColumn;
pub use range::{MultiRangeColumn, RangeColumn};
pub use scalar::{ScalarColumn, ScalarKind};

use crate::error::LiteralResult;
use crate::types::{RangeKind, Value};

/// A column type known to the parsers and builders.
pub trait ColumnType: std::fmt::Debug + Send + Sync {
    /// Database type name, e.g. `int4` or `int4range`.
    fn db_type(&self) -> &str;

    fn default_value(&self) -> Value {
        Value::Null
    }

    /// Convert a caller value into what gets bound or built.
    fn db_typecast(&self, value: Value) -> LiteralResult<Value>;

    /// Convert the server's text output. `None` is SQL NULL.
    fn typecast(&self, text: Option<&str>) -> LiteralResult<Value>;
}

impl PartialEq for dyn ColumnType {
    fn eq(&self, other: &Self) -> bool {
        self.db_type() == other.db_type()
    }
}

/// Maps type names to columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFactory {
    native_int64: bool,
}

impl Default for ColumnFactory {
    fn default() -> Self {
        Self { native_int64: true }
    }
}

impl ColumnFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// With `false`, `int8` columns hold floats.
    pub fn with_native_int64(self, native_int64: bool) -> Self {
        Self { native_int64 }
    }

    pub fn native_int64(&self) -> bool {
        self.native_int64
    }

    pub fn bigint_column(&self) -> ScalarColumn {
        if self.native_int64 {
            ScalarColumn::new(ScalarKind::Integer, "int8")
        } else {
            ScalarColumn::bigint()
        }
    }

    /// The column for bounds of a range kind.
    pub fn bound_column(&self, kind: RangeKind) -> ScalarColumn {
        match kind {
            RangeKind::Int4 => ScalarColumn::integer(),
            RangeKind::Int8 => self.bigint_column(),
            RangeKind::Numeric => ScalarColumn::new(ScalarKind::Double, "numeric"),
            RangeKind::Date => ScalarColumn::date(),
            RangeKind::Timestamp => ScalarColumn::datetime(),
            RangeKind::TimestampTz => ScalarColumn::datetime_tz(),
        }
    }

    /// Scalar column for a type name. Unknown names map to a text column
    /// carrying that name.
    pub fn scalar(&self, db_type: &str) -> ScalarColumn {
        let lower = db_type.trim().to_ascii_lowercase();
        let name = lower.as_str();
        match name {
            "int2" | "smallint" | "int4" | "int" | "integer" | "serial" => {
                ScalarColumn::new(ScalarKind::Integer, name)
            }
            "int8" | "bigint" | "bigserial" => self.bigint_column(),
            "float4" | "real" | "float8" | "double precision" | "numeric" | "decimal" => {
                ScalarColumn::new(ScalarKind::Double, name)
            }
            "bool" | "boolean" => ScalarColumn::boolean(),
            "json" | "jsonb" => ScalarColumn::new(ScalarKind::Json, name),
            "date" => ScalarColumn::date(),
            "timestamp" | "timestamp without time zone" => ScalarColumn::datetime(),
            "timestamptz" | "timestamp with time zone" => ScalarColumn::datetime_tz(),
            _ => ScalarColumn::new(ScalarKind::Text, name),
        }
    }

    /// Column for any supported type name, including `<type>[]`, range and
    /// multirange types.
    pub fn from_db_type(&self, db_type: &str) -> Arc<dyn ColumnType> {
        let name = db_type.trim();

        if let Some(element) = name.strip_suffix("[]") {
            let mut dimension = 1;
            let mut element = element;
            while let Some(inner) = element.strip_suffix("[]") {
                element = inner;
                dimension += 1;
            }
            let column = ArrayColumn::new(self.from_db_type(element)).with_dimension(dimension);
            return Arc::new(column);
        }
        if let Some(kind) = RangeKind::from_multirange_type(name) {
            return Arc::new(MultiRangeColumn::from_kind(kind, self));
        }
        if let Some(kind) = RangeKind::from_range_type(name) {
            return Arc::new(RangeColumn::from_kind(kind, self));
        }
        Arc::new(self.scalar(name))
    }
}
