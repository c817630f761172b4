//! SVT ↔ COO conversion (§4.3).
//!
//! `coo_to_svt` is a genuine two-pass algorithm: a *grow* pass that
//! dispatches every incoming row to its bottom position, recording the
//! last row to touch each one, and a *freeze* pass that turns each
//! populated bottom cell into a `Leaf` directly from those recorded rows.
//! The transient cell kind it needs (`GrowCell`) is private to this
//! module, per the design note in §9 — callers only ever see
//! `Svt::{Absent, Leaf, Node}`.

use std::rc::Rc;

use log::debug;
use logging_timer::time;

use crate::dim::Coord;
use crate::error::{SvtError, SvtResult};
use crate::leaf::Leaf;
use crate::svt::{Svt, SparseVectorTree};
use crate::value::{ElementKind, Value};

/// Column-major `k x N` non-zero index matrix plus its parallel value
/// vector, as exposed at the external boundary (§6).
pub struct Coo {
    pub nzindex: Vec<Coord>,
    pub nzdata: Vec<Value>,
    pub nrow: usize,
    pub ncol: usize,
}

impl Coo {
    /// Row `i`'s coordinate, assembled from the column-major storage.
    pub fn row(&self, i: usize) -> Vec<Coord> {
        (0..self.ncol).map(|c| self.nzindex[c * self.nrow + i]).collect()
    }
}

/// `svt_to_coo`: walk the SVT depth-first, emitting one COO row per
/// non-zero entry in traversal order (slowest axis first, then leaf
/// position order), §4.3.
#[time("debug")]
pub fn svt_to_coo(svt: &SparseVectorTree) -> SvtResult<Coo> {
    let ndim = svt.shape().ndim();
    debug!("svt_to_coo over shape {:?}", svt.shape().as_slice());

    let mut rows: Vec<Vec<Coord>> = Vec::new();
    let mut vals: Vec<Value> = Vec::new();
    let mut rowbuf = vec![0 as Coord; ndim];
    walk_coo(svt.root(), ndim, ndim, &mut rowbuf, &mut rows, &mut vals);

    let nrow = rows.len();
    if nrow as u64 > crate::dim::MAX_I32_LEN {
        return Err(SvtError::TooManyNonZeros(nrow as u64));
    }

    let mut nzindex = vec![0 as Coord; nrow * ndim];
    for (i, row) in rows.iter().enumerate() {
        for (c, &coord) in row.iter().enumerate() {
            nzindex[c * nrow + i] = coord;
        }
    }

    Ok(Coo {
        nzindex,
        nzdata: vals,
        nrow,
        ncol: ndim,
    })
}

/// `depth` counts remaining axes above the current cell (`ndim` at the
/// root, `1` once we reach a Leaf/Absent bottom cell representing axis 0).
fn walk_coo(
    cell: &Svt,
    ndim: usize,
    depth: usize,
    rowbuf: &mut Vec<Coord>,
    rows: &mut Vec<Vec<Coord>>,
    vals: &mut Vec<Value>,
) {
    match cell {
        Svt::Absent => {}
        Svt::Node(children) => {
            let axis = depth - 1;
            for (i, child) in children.iter().enumerate() {
                rowbuf[axis] = (i + 1) as Coord;
                walk_coo(child, ndim, depth - 1, rowbuf, rows, vals);
            }
        }
        Svt::Leaf(leaf) => {
            for (&p, v) in leaf.pos().iter().zip(leaf.vals().iter()) {
                let mut row = rowbuf.clone();
                row[0] = p;
                rows.push(row);
                vals.push(v.clone());
            }
        }
    }
}

/// Transient growth cell: shadows `Svt`'s shape but replaces the bottom
/// `Leaf`/`Absent` slot with, per axis-0 position, the row index of the
/// *last* incoming entry landing there (§4.3 Pass 1 "grow"). Keeping only
/// the last index rather than a raw count means a later duplicate
/// coordinate in the input naturally overrides an earlier one, the same
/// last-write-wins rule the subassignment engine uses.
enum GrowCell {
    Absent,
    Node(Vec<GrowCell>),
    Last(Vec<Option<usize>>),
}

fn descend_grow_mut<'a>(
    cell: &'a mut GrowCell,
    dim: &[Coord],
    coord: &[Coord],
) -> &'a mut GrowCell {
    let ndim = dim.len();
    let mut cur = cell;
    for j in (1..ndim).rev() {
        let size = dim[j] as usize;
        if matches!(cur, GrowCell::Absent) {
            *cur = GrowCell::Node((0..size).map(|_| GrowCell::Absent).collect());
        }
        let idx = (coord[j] - 1) as usize;
        match cur {
            GrowCell::Node(children) => cur = &mut children[idx],
            _ => unreachable!("descend_grow_mut: non-Node above the bottom layer"),
        }
    }
    cur
}

/// Pass 2 "freeze": turns each bottom `Last` cell directly into a `Leaf` by
/// walking its positions in ascending order — no second scan over the
/// input rows is needed, since the row index recorded at each position
/// already identifies the value to use.
fn freeze_grow(cell: GrowCell, nzdata: &[Value]) -> SvtResult<Svt> {
    Ok(match cell {
        GrowCell::Absent => Svt::Absent,
        GrowCell::Node(children) => {
            let mut out = Vec::with_capacity(children.len());
            for c in children {
                out.push(Rc::new(freeze_grow(c, nzdata)?));
            }
            Svt::Node(out).collapse()
        }
        GrowCell::Last(last) => {
            let mut pos = Vec::with_capacity(last.len());
            let mut vals = Vec::with_capacity(last.len());
            for (i, row) in last.into_iter().enumerate() {
                if let Some(row) = row {
                    pos.push((i + 1) as Coord);
                    vals.push(nzdata[row].clone());
                }
            }
            if pos.is_empty() {
                Svt::Absent
            } else {
                Leaf::new(pos, vals).map(Svt::Leaf)?
            }
        }
    })
}

/// `coo_to_svt`: build an SVT from a COO triple (§4.3). `nzindex` is
/// column-major `k x N`, `nzdata` length `k`. Duplicate coordinates are
/// resolved last-write-wins, matching the subassignment engine's rule;
/// input need not be pre-sorted.
#[time("debug")]
pub fn coo_to_svt(
    shape: crate::dim::Shape,
    kind: ElementKind,
    nzindex: &[Coord],
    nzdata: &[Value],
) -> SvtResult<SparseVectorTree> {
    let ndim = shape.ndim();
    let k = nzdata.len();
    if nzindex.len() != k * ndim {
        return Err(SvtError::DimensionError(format!(
            "nzindex has {} entries, expected {} ({k} rows x {ndim} cols)",
            nzindex.len(),
            k * ndim
        )));
    }
    debug!("coo_to_svt: {k} non-zeros over shape {:?}", shape.as_slice());

    let row = |i: usize| -> Vec<Coord> { (0..ndim).map(|c| nzindex[c * k + i]).collect() };

    if ndim == 1 {
        // N = 1: no tree structure, the bottom cell is the whole SVT.
        let mut last: std::collections::BTreeMap<Coord, Value> = std::collections::BTreeMap::new();
        for i in 0..k {
            let coord = row(i);
            shape.check_coord(i, &coord).map_err(|_| SvtError::OutOfBoundCoord {
                row: i,
                axis: 0,
                axis_size: shape.axis(0),
            })?;
            last.insert(coord[0], nzdata[i].clone());
        }
        let (pos, vals): (Vec<_>, Vec<_>) = last.into_iter().unzip();
        let root = if pos.is_empty() {
            Svt::Absent
        } else {
            Leaf::new(pos, vals).map(Svt::Leaf)?
        };
        return SparseVectorTree::from_root(shape, kind, root);
    }

    // Pass 1: grow.
    let mut grow = GrowCell::Absent;
    for i in 0..k {
        let coord = row(i);
        shape
            .check_coord(i, &coord)
            .map_err(|_| out_of_bound(&shape, i, &coord))?;
        let bottom = descend_grow_mut(&mut grow, shape.as_slice(), &coord);
        match bottom {
            GrowCell::Absent => {
                let mut last = vec![None; shape.axis(0) as usize];
                last[(coord[0] - 1) as usize] = Some(i);
                *bottom = GrowCell::Last(last);
            }
            GrowCell::Last(last) => last[(coord[0] - 1) as usize] = Some(i),
            GrowCell::Node(_) => unreachable!("grow bottom cannot be a Node"),
        }
    }

    // Pass 2: freeze.
    let root = freeze_grow(grow, nzdata)?;
    SparseVectorTree::from_root(shape, kind, root)
}

fn out_of_bound(shape: &crate::dim::Shape, row: usize, coord: &[Coord]) -> SvtError {
    for (axis, (&c, &size)) in coord.iter().zip(shape.as_slice().iter()).enumerate() {
        if c < 1 || c > size {
            return SvtError::OutOfBoundCoord {
                row,
                axis,
                axis_size: size,
            };
        }
    }
    SvtError::structural("coo_to_svt", "out-of-bound coordinate check failed to localize the bad axis")
}
