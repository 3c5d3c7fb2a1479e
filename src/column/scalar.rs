//! Scalar columns. They also serve as the bound column of range types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::ColumnType;
use crate::error::{LiteralError, LiteralResult};
use crate::types::Value;
use crate::types::value::{
    DATE_FORMAT, TIMESTAMP_FORMAT, TIMESTAMP_TZ_FORMAT, TIMESTAMP_TZ_PARSE_FORMAT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Integer,
    /// `int8` held as `f64`, for targets configured without native 64-bit
    /// integers.
    BigInt,
    Double,
    Boolean,
    Text,
    Json,
    Date,
    DateTime,
    DateTimeTz,
}

/// A scalar column: type name, conversion rules and a default value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarColumn {
    kind: ScalarKind,
    db_type: String,
    default: Value,
}

impl ScalarColumn {
    pub fn new(kind: ScalarKind, db_type: impl Into<String>) -> Self {
        Self {
            kind,
            db_type: db_type.into(),
            default: Value::Null,
        }
    }

    pub fn integer() -> Self {
        Self::new(ScalarKind::Integer, "int4")
    }

    /// Float-backed `int8`.
    pub fn bigint() -> Self {
        Self::new(ScalarKind::BigInt, "int8")
    }

    pub fn double() -> Self {
        Self::new(ScalarKind::Double, "float8")
    }

    pub fn boolean() -> Self {
        Self::new(ScalarKind::Boolean, "bool")
    }

    pub fn text() -> Self {
        Self::new(ScalarKind::Text, "text")
    }

    pub fn json() -> Self {
        Self::new(ScalarKind::Json, "jsonb")
    }

    pub fn date() -> Self {
        Self::new(ScalarKind::Date, "date")
    }

    pub fn datetime() -> Self {
        Self::new(ScalarKind::DateTime, "timestamp")
    }

    pub fn datetime_tz() -> Self {
        Self::new(ScalarKind::DateTimeTz, "timestamptz")
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Integer and date bounds have a successor.
    pub fn is_discrete(&self) -> bool {
        matches!(
            self.kind,
            ScalarKind::Integer | ScalarKind::BigInt | ScalarKind::Date
        )
    }

    fn is_temporal(&self) -> bool {
        matches!(
            self.kind,
            ScalarKind::Date | ScalarKind::DateTime | ScalarKind::DateTimeTz
        )
    }

    /// Value range of an integer column, from its type name.
    fn integer_limits(&self) -> (i64, i64) {
        match self.db_type.as_str() {
            "int2" | "smallint" => (i16::MIN.into(), i16::MAX.into()),
            "int4" | "int" | "integer" | "serial" => (i32::MIN.into(), i32::MAX.into()),
            _ => (i64::MIN, i64::MAX),
        }
    }

    fn check_integer(&self, n: i64) -> LiteralResult<Value> {
        let (min, max) = self.integer_limits();
        if (min..=max).contains(&n) {
            Ok(Value::Int(n))
        } else {
            Err(self.out_of_range(n))
        }
    }

    fn invalid_text(&self, text: &str, reason: impl std::fmt::Display) -> LiteralError {
        LiteralError::invalid(format!("'{}' is not a valid {}: {}", text, self.db_type, reason))
    }

    fn out_of_range(&self, value: impl std::fmt::Display) -> LiteralError {
        LiteralError::invalid(format!("{} bound {} is out of range", self.db_type, value))
    }

    /// Parse one value as PostgreSQL prints it. `infinity` and `-infinity`
    /// of date/time kinds stay text.
    pub fn parse_bound(&self, text: &str) -> LiteralResult<Value> {
        if self.is_temporal() && matches!(text, "infinity" | "-infinity") {
            return Ok(Value::Text(text.to_string()));
        }

        match self.kind {
            ScalarKind::Integer => {
                let n = text.parse::<i64>().map_err(|e| self.invalid_text(text, e))?;
                self.check_integer(n)
            }
            ScalarKind::BigInt | ScalarKind::Double => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| self.invalid_text(text, e)),
            ScalarKind::Boolean => match text {
                "t" | "true" | "TRUE" | "y" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "f" | "false" | "FALSE" | "n" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err(self.invalid_text(text, "expected t or f")),
            },
            ScalarKind::Text => Ok(Value::Text(text.to_string())),
            ScalarKind::Json => serde_json::from_str(text)
                .map(Value::Json)
                .map_err(|e| self.invalid_text(text, e)),
            ScalarKind::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|e| self.invalid_text(text, e)),
            ScalarKind::DateTime => NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
                .map(Value::Timestamp)
                .map_err(|e| self.invalid_text(text, e)),
            ScalarKind::DateTimeTz => DateTime::parse_from_str(text, TIMESTAMP_TZ_PARSE_FORMAT)
                .map(Value::TimestampTz)
                .map_err(|e| self.invalid_text(text, e)),
        }
    }

    /// Normalize a caller-supplied range bound.
    pub fn bound_from_value(&self, value: &Value) -> LiteralResult<Value> {
        match value {
            Value::Expr(_) | Value::Array(_) | Value::Map(_) | Value::Json(_) => {
                Err(LiteralError::NotSupported(format!(
                    "a {} value cannot be used as a {} range bound",
                    value.type_name(),
                    self.db_type
                )))
            }
            Value::Text(text) => self.parse_bound(text),
            other => self.convert(other.clone()),
        }
    }

    /// Move a discrete bound to its successor or predecessor.
    pub fn step(&self, value: Value, forward: bool) -> LiteralResult<Value> {
        match value {
            Value::Int(n) => {
                let next = if forward { n.checked_add(1) } else { n.checked_sub(1) };
                match next {
                    Some(next) if self.kind == ScalarKind::Integer => self.check_integer(next),
                    Some(next) => Ok(Value::Int(next)),
                    None => Err(self.out_of_range(n)),
                }
            }
            Value::Float(f) => Ok(Value::Float(if forward { f + 1.0 } else { f - 1.0 })),
            Value::Date(d) => {
                let next = if forward { d.succ_opt() } else { d.pred_opt() };
                next.map(Value::Date).ok_or_else(|| self.out_of_range(d))
            }
            other => Ok(other),
        }
    }

    /// Text of a normalized bound, unquoted.
    pub fn render_bound(&self, value: &Value) -> String {
        match value {
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => if *b { "t" } else { "f" }.to_string(),
            Value::Text(s) => s.clone(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
            Value::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
            Value::TimestampTz(ts) => ts.format(TIMESTAMP_TZ_FORMAT).to_string(),
            Value::Json(json) => json.to_string(),
            other => other.to_string(),
        }
    }

    fn convert(&self, value: Value) -> LiteralResult<Value> {
        let kind = self.kind;
        match (kind, value) {
            (_, Value::Null) => Ok(Value::Null),
            (_, v @ Value::Expr(_)) => Ok(v),
            (ScalarKind::Json, v @ Value::Json(_)) => Ok(v),
            (ScalarKind::Json, v) => Ok(Value::Json(v.to_json()?)),
            (ScalarKind::Text, Value::Text(s)) => Ok(Value::Text(s)),
            (_, Value::Text(s)) if s.is_empty() => Ok(Value::Null),
            (_, Value::Text(s)) => self.parse_bound(&s),
            (ScalarKind::Integer, Value::Int(n)) => self.check_integer(n),
            (ScalarKind::Integer, Value::Bool(b)) => Ok(Value::Int(b as i64)),
            (ScalarKind::Integer, Value::Float(f)) if f.fract() == 0.0 => {
                if f < i64::MIN as f64 || f >= i64::MAX as f64 {
                    return Err(self.out_of_range(f));
                }
                self.check_integer(f as i64)
            }
            (ScalarKind::BigInt | ScalarKind::Double, Value::Int(n)) => Ok(Value::Float(n as f64)),
            (ScalarKind::BigInt | ScalarKind::Double, v @ Value::Float(_)) => Ok(v),
            (ScalarKind::Boolean, v @ Value::Bool(_)) => Ok(v),
            (ScalarKind::Boolean, Value::Int(n)) => Ok(Value::Bool(n != 0)),
            (ScalarKind::Text, v) if !matches!(v, Value::Array(_) | Value::Map(_)) => {
                Ok(Value::Text(self.render_bound(&v)))
            }
            (ScalarKind::Date, v @ Value::Date(_)) => Ok(v),
            (ScalarKind::Date, Value::Timestamp(ts)) => Ok(Value::Date(ts.date())),
            (ScalarKind::DateTime, v @ Value::Timestamp(_)) => Ok(v),
            (ScalarKind::DateTime, Value::Date(d)) => {
                Ok(Value::Timestamp(d.and_time(NaiveTime::default())))
            }
            (ScalarKind::DateTimeTz, v @ Value::TimestampTz(_)) => Ok(v),
            (_, v) => Err(LiteralError::invalid(format!(
                "cannot convert {} value {} to {}",
                v.type_name(),
                v,
                self.db_type
            ))),
        }
    }
}

impl ColumnType for ScalarColumn {
    fn db_type(&self) -> &str {
        &self.db_type
    }

    fn default_value(&self) -> Value {
        self.default.clone()
    }

    fn db_typecast(&self, value: Value) -> LiteralResult<Value> {
        self.convert(value)
    }

    fn typecast(&self, text: Option<&str>) -> LiteralResult<Value> {
        match text {
            Some(text) => self.parse_bound(text),
            None => Ok(Value::Null),
        }
    }
}
