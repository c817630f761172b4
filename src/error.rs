//! Crate-wide error taxonomy.
//!
//! Every fallible operation in this crate returns `Result<T, SvtError>`.
//! There is no partial-mutation case: a call either returns the full new
//! tree/array or leaves the input untouched and returns `Err`.

use displaydoc::Display;
use thiserror::Error;

use crate::value::ElementKind;

/// Single error type for the whole crate, one variant per taxonomy row.
#[derive(Debug, Display, Error)]
pub enum SvtError {
    /// type tag {0:?} is not one of the seven supported element kinds
    UnsupportedElementType(String),
    /// vals kind {actual:?} does not match the SVT's element kind {expected:?}
    TypeMismatch {
        expected: ElementKind,
        actual: ElementKind,
    },
    /// coordinate at row {row}, axis {axis} is out of bounds (axis size {axis_size}, allowed 1..={axis_size})
    InvalidCoordinate {
        row: usize,
        axis: usize,
        axis_size: i64,
    },
    /// linear index at row {row} is invalid (must satisfy 1 <= idx <= {max}, and not NA/NaN)
    InvalidLinearIndex { row: usize, max: i64 },
    /// COO coordinate at row {row}, axis {axis} lies outside dim[{axis}] = {axis_size}
    OutOfBoundCoord {
        row: usize,
        axis: usize,
        axis_size: i64,
    },
    /// total non-zero count {0} exceeds the maximum representable count (2^31 - 1)
    TooManyNonZeros(u64),
    /// incoming updates landing on a single leaf ({0}) exceed the maximum IDS size (2^31 - 1)
    IDSTooLarge(u64),
    /// structural error in {component}: {detail}
    StructuralError { component: &'static str, detail: String },
    /// dimension error: {0}
    DimensionError(String),
    /// error reading sparse data: {0}
    ReadError(String),
}

impl SvtError {
    pub(crate) fn structural(component: &'static str, detail: impl Into<String>) -> Self {
        SvtError::StructuralError {
            component,
            detail: detail.into(),
        }
    }
}

impl From<csv::Error> for SvtError {
    fn from(err: csv::Error) -> Self {
        SvtError::ReadError(err.to_string())
    }
}

pub type SvtResult<T> = Result<T, SvtError>;
