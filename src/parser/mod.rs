//! Parsers for PostgreSQL's textual array, composite, range and multirange
//! output.
//!
//! Each parser is a small recursive-descent engine over a single string.
//! Configuration is immutable: `with_*` / `as_*` methods return a new parser.

pub mod array;
pub mod composite;
mod cursor;
pub mod multirange;
pub mod range;

pub use array::{ArrayParser, Element};
pub use composite::{CompositeParser, StructuredParser};
pub use multirange::MultiRangeParser;
pub use range::{RangeLiteral, RangeParser, split_multirange};
