//! Bulk subassignment (§4.5): `svt[Mindex] <- values` and `svt[Lindex] <-
//! values`, both implemented as one path-copying recursive descent that
//! dispatches each incoming row to its bottom leaf and absorbs it there in
//! the same pass. A subtree that receives no rows is returned unchanged —
//! an `Rc::clone` of the original node, never a reallocation — which is
//! what makes `subassign(svt, index, [])` return the exact same shared
//! root as `svt` (§8).

use std::rc::Rc;

use logging_timer::time;
use log::debug;

use crate::dim::{Coord, Shape, MAX_I32_LEN};
use crate::error::{SvtError, SvtResult};
use crate::leaf::Leaf;
use crate::svt::{check_linear_index, linear_to_coord, Svt, SparseVectorTree};
use crate::value::Value;

/// `svt[Mindex] <- values`: `mindex` is column-major `k x N`, §4.5.
#[time("debug")]
pub fn subassign_mindex(
    svt: &SparseVectorTree,
    mindex: &[Coord],
    values: &[Value],
) -> SvtResult<SparseVectorTree> {
    let shape = svt.shape().clone();
    let ndim = shape.ndim();
    let l = values.len();
    if mindex.len() != l * ndim {
        return Err(SvtError::DimensionError(format!(
            "mindex has {} entries, expected {} ({l} rows x {ndim} cols)",
            mindex.len(),
            l * ndim
        )));
    }
    debug!("subassign_mindex: {l} updates over shape {:?}", shape.as_slice());

    let mut coords = Vec::with_capacity(l);
    for i in 0..l {
        let coord: Vec<Coord> = (0..ndim).map(|c| mindex[c * l + i]).collect();
        shape.check_coord(i, &coord)?;
        check_kind(i, svt, &values[i])?;
        coords.push(coord);
    }

    apply(svt, ndim, &shape, &coords, values)
}

/// `svt[Lindex] <- values`: `lindex` is a 1-based flat index into the dense
/// array, converted to a full coordinate via the same arithmetic used for
/// `linear_to_coord` elsewhere (§4.2, §4.5).
#[time("debug")]
pub fn subassign_lindex(
    svt: &SparseVectorTree,
    lindex: &[Coord],
    values: &[Value],
) -> SvtResult<SparseVectorTree> {
    let shape = svt.shape().clone();
    let ndim = shape.ndim();
    let l = values.len();
    if lindex.len() != l {
        return Err(SvtError::DimensionError(format!(
            "lindex has {} entries, expected {l}",
            lindex.len()
        )));
    }
    debug!("subassign_lindex: {l} updates over shape {:?}", shape.as_slice());

    let cumdim = shape.cumdim();
    let max_xlen = shape.total_len();
    let mut coords = Vec::with_capacity(l);
    for i in 0..l {
        let lidx = check_linear_index(i, max_xlen, Some(lindex[i]))?;
        check_kind(i, svt, &values[i])?;
        coords.push(linear_to_coord(&shape, &cumdim, lidx));
    }

    apply(svt, ndim, &shape, &coords, values)
}

fn check_kind(row: usize, svt: &SparseVectorTree, value: &Value) -> SvtResult<()> {
    if value.kind() != svt.kind() {
        debug!("subassign: kind mismatch at row {row}");
        return Err(SvtError::TypeMismatch {
            expected: svt.kind(),
            actual: value.kind(),
        });
    }
    Ok(())
}

fn apply(
    svt: &SparseVectorTree,
    ndim: usize,
    shape: &Shape,
    coords: &[Vec<Coord>],
    values: &[Value],
) -> SvtResult<SparseVectorTree> {
    let rows: Vec<usize> = (0..values.len()).collect();
    let mut scratch = Vec::new();
    let new_root = update_rec(&svt.root_rc(), ndim, shape, coords, &rows, values, &mut scratch)?;
    Ok(SparseVectorTree::from_root_rc(shape.clone(), svt.kind(), new_root))
}

/// Recurses from `depth` (the number of axes at and above the current
/// cell; `1` means the current cell is the bottom leaf/absent slot) down
/// to `1`, partitioning `rows` by child index at each `Node` layer and
/// only ever rebuilding the children that received at least one row.
fn update_rec(
    cell: &Rc<Svt>,
    depth: usize,
    shape: &Shape,
    coords: &[Vec<Coord>],
    rows: &[usize],
    values: &[Value],
    scratch: &mut Vec<usize>,
) -> SvtResult<Rc<Svt>> {
    if rows.is_empty() {
        return Ok(Rc::clone(cell));
    }

    if depth == 1 {
        let existing = match cell.as_ref() {
            Svt::Leaf(leaf) => Some(leaf),
            Svt::Absent => None,
            Svt::Node(_) => unreachable!("Node cell found at the bottom layer"),
        };
        return leaf_from_ids(existing, rows, coords, values, scratch);
    }

    let axis = depth - 1;
    let size = shape.axis(axis) as usize;
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); size];
    for &r in rows {
        groups[(coords[r][axis] - 1) as usize].push(r);
    }

    let mut new_children = Vec::with_capacity(size);
    match cell.as_ref() {
        Svt::Node(children) => {
            for (idx, group) in groups.into_iter().enumerate() {
                new_children.push(update_rec(&children[idx], depth - 1, shape, coords, &group, values, scratch)?);
            }
        }
        Svt::Absent => {
            let absent = Rc::new(Svt::Absent);
            for group in groups {
                new_children.push(update_rec(&absent, depth - 1, shape, coords, &group, values, scratch)?);
            }
        }
        Svt::Leaf(_) => unreachable!("Leaf cell found above the bottom layer"),
    }

    Ok(Rc::new(Svt::Node(new_children).collapse()))
}

/// Builds the new bottom cell from an existing leaf (if any) plus the
/// incoming `rows`: stably sort by coordinate — which, because existing
/// entries are listed before incoming ones and incoming ones keep their
/// original batch order, preserves insertion order among ties — then keep
/// only the last entry of each equal-coordinate run, so the latest write
/// always wins (§4.5). A final compaction drops any position that a write
/// zeroed out.
fn leaf_from_ids(
    existing: Option<&Leaf>,
    rows: &[usize],
    coords: &[Vec<Coord>],
    values: &[Value],
    scratch: &mut Vec<usize>,
) -> SvtResult<Rc<Svt>> {
    if rows.len() as u64 > MAX_I32_LEN {
        return Err(SvtError::IDSTooLarge(rows.len() as u64));
    }

    let cap = existing.map_or(0, Leaf::len) + rows.len();
    let mut entries: Vec<(Coord, Value)> = Vec::with_capacity(cap);
    if let Some(leaf) = existing {
        for (&p, v) in leaf.pos().iter().zip(leaf.vals().iter()) {
            entries.push((p, v.clone()));
        }
    }
    for &r in rows {
        entries.push((coords[r][0], values[r].clone()));
    }

    entries.sort_by_key(|(p, _)| *p);

    let mut pos = Vec::with_capacity(entries.len());
    let mut vals = Vec::with_capacity(entries.len());
    let mut i = 0;
    while i < entries.len() {
        let mut j = i;
        while j + 1 < entries.len() && entries[j + 1].0 == entries[i].0 {
            j += 1;
        }
        let (p, v) = entries[j].clone();
        pos.push(p);
        vals.push(v);
        i = j + 1;
    }

    if pos.is_empty() {
        return Ok(Rc::new(Svt::Absent));
    }
    let leaf = Leaf::new(pos, vals)?;
    Ok(match leaf.compact_into(scratch) {
        Some(l) => Rc::new(Svt::Leaf(l)),
        None => Rc::new(Svt::Absent),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::Shape;
    use crate::value::ElementKind;

    fn ival(v: i32) -> Value {
        Value::Integer(v)
    }

    fn shape(dim: &[Coord]) -> Shape {
        Shape::new(dim.to_vec()).unwrap()
    }

    #[test]
    fn empty_batch_shares_the_same_root() {
        let svt = SparseVectorTree::empty(shape(&[3, 3]), ElementKind::Integer);
        let out = subassign_mindex(&svt, &[], &[]).unwrap();
        assert!(svt.shares_root_with(&out));
    }

    #[test]
    fn untouched_subtrees_are_shared_after_a_partial_update() {
        let svt = SparseVectorTree::empty(shape(&[2, 3]), ElementKind::Integer);
        // write only into column 1; column 0 and 2 should stay absent and,
        // if the original had any structure there, would stay shared.
        let mindex: Vec<Coord> = vec![1, 2]; // row (1,2)
        let values = vec![ival(9)];
        let out = subassign_mindex(&svt, &mindex, &values).unwrap();
        assert_eq!(out.nz_count(), 1);

        let second = subassign_mindex(&out, &[], &[]).unwrap();
        assert!(out.shares_root_with(&second));
    }

    #[test]
    fn last_write_wins_on_duplicate_coordinate() {
        let svt = SparseVectorTree::empty(shape(&[5]), ElementKind::Integer);
        let mindex: Vec<Coord> = vec![2, 2, 2];
        let values = vec![ival(1), ival(2), ival(3)];
        let out = subassign_mindex(&svt, &mindex, &values).unwrap();
        assert_eq!(out.nz_count(), 1);

        let coo = crate::coo::svt_to_coo(&out).unwrap();
        assert_eq!(coo.nzdata[0], ival(3));
    }

    #[test]
    fn zero_assignment_removes_an_existing_entry() {
        let svt = SparseVectorTree::empty(shape(&[4]), ElementKind::Integer);
        let with_value = subassign_mindex(&svt, &[2], &[ival(7)]).unwrap();
        assert_eq!(with_value.nz_count(), 1);

        let cleared = subassign_mindex(&with_value, &[2], &[ival(0)]).unwrap();
        assert_eq!(cleared.nz_count(), 0);
        assert!(cleared.root().is_absent());
    }

    #[test]
    fn lindex_matches_mindex_for_equivalent_updates() {
        let svt = SparseVectorTree::empty(shape(&[3, 2]), ElementKind::Integer);
        // linear index 4 = coord (1,2) for dim [3,2]: (4-1)=3, axis1: 3/3=1 -> coord1=2, rem=0 -> coord0=1
        let by_lindex = subassign_lindex(&svt, &[4], &[ival(11)]).unwrap();
        let by_mindex = subassign_mindex(&svt, &[1, 2], &[ival(11)]).unwrap();
        assert_eq!(by_lindex.nz_count(), 1);
        let a = crate::coo::svt_to_coo(&by_lindex).unwrap();
        let b = crate::coo::svt_to_coo(&by_mindex).unwrap();
        assert_eq!(a.nzindex, b.nzindex);
        assert_eq!(a.nzdata, b.nzdata);
    }

    #[test]
    fn out_of_bound_coordinate_is_rejected() {
        let svt = SparseVectorTree::empty(shape(&[2, 2]), ElementKind::Integer);
        let err = subassign_mindex(&svt, &[3, 1], &[ival(1)]).unwrap_err();
        assert!(matches!(err, SvtError::InvalidCoordinate { .. }));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let svt = SparseVectorTree::empty(shape(&[2]), ElementKind::Integer);
        let err = subassign_mindex(&svt, &[1], &[Value::Double(1.0)]).unwrap_err();
        assert!(matches!(err, SvtError::TypeMismatch { .. }));
    }
}
