//! SVT ↔ CSC (Compressed Sparse Column / `dgCMatrix`) conversion, N = 2 only
//! (§4.4).

use std::rc::Rc;

use log::debug;
use logging_timer::time;

use crate::dim::{Coord, Shape, MAX_I32_LEN};
use crate::error::{SvtError, SvtResult};
use crate::leaf::Leaf;
use crate::svt::{Svt, SparseVectorTree};
use crate::value::{ElementKind, Value};

/// `colptr[ncol+1]`, `rowidx[k]` (0-based rows), `x[k]`, as exposed at the
/// external boundary (§6).
pub struct Csc {
    pub colptr: Vec<i64>,
    pub rowidx: Vec<Coord>,
    pub x: Vec<Value>,
}

fn require_2d(shape: &Shape) -> SvtResult<()> {
    if shape.ndim() != 2 {
        return Err(SvtError::DimensionError(format!(
            "CSC conversion requires N = 2, got N = {}",
            shape.ndim()
        )));
    }
    Ok(())
}

/// `svt_to_csc`: walk columns `0..ncol`, append each populated column's
/// `(pos - 1, val)` pairs (§4.4).
#[time("debug")]
pub fn svt_to_csc(svt: &SparseVectorTree) -> SvtResult<Csc> {
    require_2d(svt.shape())?;
    let ncol = svt.shape().axis(1) as usize;
    debug!("svt_to_csc over {} columns", ncol);

    let children: &[Rc<Svt>] = match svt.root() {
        Svt::Absent => &[],
        Svt::Node(children) => children,
        Svt::Leaf(_) => unreachable!("N=2 root cannot itself be a Leaf"),
    };

    let mut colptr = vec![0i64; ncol + 1];
    let mut rowidx = Vec::new();
    let mut x = Vec::new();

    for j in 0..ncol {
        if let Some(Svt::Leaf(leaf)) = children.get(j).map(Rc::as_ref) {
            for (&p, v) in leaf.pos().iter().zip(leaf.vals().iter()) {
                rowidx.push(p - 1);
                x.push(v.clone());
            }
        }
        colptr[j + 1] = rowidx.len() as i64;
    }

    if x.len() as u64 > MAX_I32_LEN {
        return Err(SvtError::TooManyNonZeros(x.len() as u64));
    }

    Ok(Csc { colptr, rowidx, x })
}

/// `csc_to_svt`: build a column per `colptr` range; an empty range leaves
/// the column absent (§4.4).
#[time("debug")]
pub fn csc_to_svt(
    shape: Shape,
    kind: ElementKind,
    colptr: &[i64],
    rowidx: &[Coord],
    x: &[Value],
) -> SvtResult<SparseVectorTree> {
    require_2d(&shape)?;
    let ncol = shape.axis(1) as usize;
    if colptr.len() != ncol + 1 {
        return Err(SvtError::DimensionError(format!(
            "colptr has {} entries, expected ncol + 1 = {}",
            colptr.len(),
            ncol + 1
        )));
    }
    if colptr[0] != 0 {
        return Err(SvtError::StructuralError {
            component: "csc_to_svt",
            detail: "colptr[0] must be 0".to_string(),
        });
    }
    debug!("csc_to_svt over {} columns", ncol);

    let mut children = Vec::with_capacity(ncol);
    for j in 0..ncol {
        let (start, end) = (colptr[j] as usize, colptr[j + 1] as usize);
        if end < start {
            return Err(SvtError::StructuralError {
                component: "csc_to_svt",
                detail: format!("colptr[{}] = {end} < colptr[{j}] = {start}", j + 1),
            });
        }
        if start == end {
            children.push(Rc::new(Svt::Absent));
            continue;
        }
        let pos: Vec<Coord> = rowidx[start..end].iter().map(|&r| r + 1).collect();
        for (i, &p) in pos.iter().enumerate() {
            let row = start + i;
            if p < 1 || p > shape.axis(0) {
                return Err(SvtError::OutOfBoundCoord {
                    row,
                    axis: 0,
                    axis_size: shape.axis(0),
                });
            }
        }
        let vals = x[start..end].to_vec();
        children.push(Rc::new(Svt::Leaf(Leaf::new(pos, vals)?)));
    }

    SparseVectorTree::from_root(shape, kind, Svt::Node(children).collapse())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ival(v: i32) -> Value {
        Value::Integer(v)
    }

    #[test]
    fn scenario_csc_roundtrip() {
        // spec.md §8 scenario 3: 4x3 integer dgCMatrix.
        let shape = Shape::new(vec![4, 3]).unwrap();
        let colptr = vec![0, 1, 1, 3];
        let rowidx = vec![2, 0, 3];
        let x = vec![ival(10), ival(20), ival(30)];

        let svt = csc_to_svt(shape, ElementKind::Integer, &colptr, &rowidx, &x).unwrap();
        assert_eq!(svt.nz_count(), 3);

        let csc = svt_to_csc(&svt).unwrap();
        assert_eq!(csc.colptr, colptr);
        assert_eq!(csc.rowidx, rowidx);
        assert_eq!(csc.x.len(), x.len());
    }

    #[test]
    fn rejects_non_2d() {
        let shape = Shape::new(vec![2, 2, 2]).unwrap();
        let svt = SparseVectorTree::empty(shape, ElementKind::Integer);
        assert!(svt_to_csc(&svt).is_err());
    }
}
