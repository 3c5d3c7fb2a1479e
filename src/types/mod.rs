//! Value objects shared by the parsers, columns and builders.

pub mod multirange;
pub mod range;
pub mod value;

pub use multirange::MultiRangeValue;
pub use range::{CanonicalRange, EMPTY, RangeBounds, RangeKind, RangeValue};
pub use value::Value;
