//! A Sparse Vector Tree storage engine for multi-dimensional sparse arrays:
//! a recursive, copy-on-write tree of per-axis fan-out nodes bottoming out
//! in compressed sparse 1-D vectors, plus COO/CSC/dense converters and a
//! two-pass bulk subassignment engine.

pub mod cli;
pub mod coo;
pub mod csc;
pub mod dense;
pub mod dim;
pub mod error;
pub mod leaf;
pub mod reader;
pub mod subassign;
pub mod svt;
pub mod utils;
pub mod value;

#[cfg(test)]
pub(crate) mod testing_utils;

pub use dim::{Coord, Shape};
pub use error::{SvtError, SvtResult};
pub use leaf::Leaf;
pub use svt::{SparseVectorTree, Svt};
pub use value::{ElementKind, Value};
