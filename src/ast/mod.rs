//! Canonical AST - the shared vocabulary between source parsers and
//! target generators
//!
//! Every source parser produces these nodes and every target generator
//! consumes them. Pure data: construction only, no behavior beyond small
//! classification helpers.

mod exprs;
mod location;
mod nodes;
mod ops;

pub use exprs::*;
pub use location::*;
pub use nodes::*;
pub use ops::*;
