//! Shape (dimension vector) handling and linear-index arithmetic.
//!
//! Mirrors the lineage's convention of wrapping a bare integer in a small
//! validated type (see this crate's `Height` ancestor) rather than passing
//! raw `Vec<i64>` around uninspected.

use crate::error::{SvtError, SvtResult};

/// A coordinate, axis size, or linear index. `i64` throughout because axis
/// sizes and linear indices may exceed 2^31 even though leaf lengths and IDS
/// sizes may not (§1, §4.2, §4.5).
pub type Coord = i64;

/// The upper bound on leaf length / IDS size: `2^31 - 1`.
pub const MAX_I32_LEN: u64 = (i32::MAX) as u64;

/// A validated shape `dim[0..N)`, `N >= 1`, every axis `>= 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    dim: Vec<Coord>,
}

impl Shape {
    /// Validates `dim`: rejects `N = 0` and any zero-size axis (§9 Open
    /// Question: zero-size axes are rejected at entry with `DimensionError`,
    /// rather than the unsafe behaviour the original left as a FIXME).
    pub fn new(dim: Vec<Coord>) -> SvtResult<Self> {
        if dim.is_empty() {
            return Err(SvtError::DimensionError(
                "N = 0 is not supported".to_string(),
            ));
        }
        if let Some((axis, size)) = dim.iter().enumerate().find(|(_, &d)| d < 1) {
            return Err(SvtError::DimensionError(format!(
                "axis {axis} has non-positive size {size}; zero/negative-size axes are rejected"
            )));
        }
        Ok(Shape { dim })
    }

    pub fn ndim(&self) -> usize {
        self.dim.len()
    }

    pub fn as_slice(&self) -> &[Coord] {
        &self.dim
    }

    pub fn axis(&self, j: usize) -> Coord {
        self.dim[j]
    }

    /// `cumdim[j] = prod_{k<=j} dim[k]`, 0-indexed, length `ndim()`.
    /// `cumdim[ndim()-1]` is the total element count of the dense array.
    pub fn cumdim(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.dim.len());
        let mut acc: Coord = 1;
        for &d in &self.dim {
            acc = acc.saturating_mul(d);
            out.push(acc);
        }
        out
    }

    pub fn total_len(&self) -> Coord {
        self.dim.iter().product()
    }

    /// Validates a full coordinate `coord[0..N)` (1-based) against this
    /// shape, row `row` is used purely for error reporting.
    pub fn check_coord(&self, row: usize, coord: &[Coord]) -> SvtResult<()> {
        if coord.len() != self.ndim() {
            return Err(SvtError::DimensionError(format!(
                "coordinate row {row} has {} entries, expected {}",
                coord.len(),
                self.ndim()
            )));
        }
        for (axis, (&c, &size)) in coord.iter().zip(self.dim.iter()).enumerate() {
            if c < 1 || c > size {
                return Err(SvtError::InvalidCoordinate {
                    row,
                    axis,
                    axis_size: size,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dim() {
        assert!(Shape::new(vec![]).is_err());
    }

    #[test]
    fn rejects_zero_axis() {
        assert!(Shape::new(vec![3, 0]).is_err());
    }

    #[test]
    fn cumdim_is_running_product() {
        let shape = Shape::new(vec![3, 4, 2]).unwrap();
        assert_eq!(shape.cumdim(), vec![3, 12, 24]);
        assert_eq!(shape.total_len(), 24);
    }

    #[test]
    fn check_coord_bounds() {
        let shape = Shape::new(vec![3, 4]).unwrap();
        assert!(shape.check_coord(0, &[1, 1]).is_ok());
        assert!(shape.check_coord(0, &[3, 4]).is_ok());
        assert!(shape.check_coord(0, &[0, 1]).is_err());
        assert!(shape.check_coord(0, &[4, 1]).is_err());
    }
}
