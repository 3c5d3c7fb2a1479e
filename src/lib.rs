//! # pgliteral
//!
//! Read and write PostgreSQL array, composite, range and multirange values.
//!
//! The parsers decode the server's text output. The builders produce SQL
//! fragments with bound parameters.
//!
//! ## Quick Example
//!
//! ```
//! use pgliteral::prelude::*;
//!
//! // Parse text output
//! let bounds = RangeParser::new().as_int().parse(Some("[3,7)")).unwrap();
//! assert_eq!(bounds, Some(RangeBounds::new(3, 6)));
//!
//! // Build a constructor call
//! let mut params = Params::new();
//! let sql = Expression::from(RangeValue::int4(1, 5).with_bounds(true, true))
//!     .to_sql(&mut params)
//!     .unwrap();
//! assert_eq!(sql, "int4range(:qp0,:qp1,'[)')");
//! ```
//!
//! ## Literal forms
//!
//! | Kind       | Example                    |
//! |------------|----------------------------|
//! | array      | `{{1,2},{3,NULL}}`         |
//! | composite  | `(10.0,USD)`               |
//! | range      | `[3,7)`, `empty`           |
//! | multirange | `{[1,3),[5,7)}`            |

pub mod builder;
pub mod column;
pub mod config;
pub mod error;
pub mod parser;
pub mod types;

pub mod prelude {
    pub use crate::builder::{
        ArrayExpression, ArrayExpressionBuilder, CompositeExpression, CompositeExpressionBuilder,
        CompositeField, Expression, MultiRangeValueBuilder, Params, PgQueryBuilder, QueryBuilder,
        RangeValueBuilder, Subquery, TypeHint,
    };
    pub use crate::column::{
        ArrayColumn, ColumnFactory, ColumnType, CompositeColumn, MultiRangeColumn, RangeColumn,
        ScalarColumn, ScalarKind,
    };
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::parser::{
        ArrayParser, CompositeParser, Element, MultiRangeParser, RangeParser, StructuredParser,
    };
    pub use crate::types::{MultiRangeValue, RangeBounds, RangeKind, RangeValue, Value};
}

/// Parse an array literal with the default `,` delimiter.
///
/// # Example
///
/// ```
/// use pgliteral::{parse_array, parser::Element};
///
/// let items = parse_array("{a,NULL}").unwrap();
/// assert_eq!(items, vec![Element::from("a"), Element::Null]);
/// ```
pub fn parse_array(text: &str) -> error::LiteralResult<Vec<parser::Element>> {
    Ok(parser::ArrayParser::new()
        .parse(Some(text))?
        .unwrap_or_default())
}

/// Parse a range literal of the named range type, e.g. `daterange`.
pub fn parse_range(text: &str, db_type: &str) -> error::LiteralResult<Option<types::RangeBounds>> {
    parser::RangeParser::from_db_type(db_type)?.parse(Some(text))
}

/// Parse a multirange literal of the named multirange type.
pub fn parse_multirange(
    text: &str,
    db_type: &str,
) -> error::LiteralResult<Option<Vec<types::RangeBounds>>> {
    parser::MultiRangeParser::from_db_type(db_type)?.parse(Some(text))
}
