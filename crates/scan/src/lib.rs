//! Line classifier for Monte Carlo transport reports
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but everything is re-exported
mod line;
mod number;
mod parsers;

#[doc(inline)]
pub use line::{classify, Axis, BinKind, ColumnKind, Line};

#[doc(inline)]
pub use number::{is_number, is_unsigned, number, tokens, vector_of_f64};
