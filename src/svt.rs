//! The SVT tree itself (§3.3) and the walker utilities that traverse it
//! (§4.2): non-zero counting and descent to a bottom cell by coordinate or
//! by linear index.
//!
//! The public recursive cell only ever has three shapes — `Absent`, `Leaf`,
//! `Node` — per the design note in §9: the transient `Count`/`AppendLeaf`/
//! `Ids`/`ExtLeaf` cell kinds used during construction and subassignment are
//! private types local to `coo.rs` and `subassign.rs` and never escape into
//! this enum.
//!
//! `Node` children are `Rc<Svt>` rather than bare `Svt`: the subassignment
//! engine (§4.5, §5) relies on cheap structural sharing to path-copy only
//! the nodes it actually touches, and an `Rc` clone of an untouched branch
//! is the mechanism that makes that free.

use logging_timer::time;
use log::trace;

use std::rc::Rc;

use crate::dim::{Coord, Shape};
use crate::error::{SvtError, SvtResult};
use crate::leaf::Leaf;
use crate::value::ElementKind;

/// One cell of the recursive tree. A `Node`'s child count always equals the
/// axis size at its depth (§3.3); this is checked wherever a `Node` is
/// constructed from untrusted input (`csc_to_svt`, `coo_to_svt`,
/// `dense_to_svt`) but not re-checked on every recursive step thereafter,
/// since the tree is owned and path-copied rather than freely mutable.
#[derive(Clone, Debug)]
pub enum Svt {
    Absent,
    Leaf(Leaf),
    Node(Vec<Rc<Svt>>),
}

impl Svt {
    pub fn is_absent(&self) -> bool {
        matches!(self, Svt::Absent)
    }

    pub(crate) fn rc(self) -> Rc<Svt> {
        Rc::new(self)
    }

    /// Collapses a `Node` whose children are all `Absent` back to `Absent`
    /// (§3.3 invariant: "a Node is never stored absent-everywhere").
    pub(crate) fn collapse(self) -> Svt {
        match self {
            Svt::Node(children) if children.iter().all(|c| c.is_absent()) => Svt::Absent,
            other => other,
        }
    }
}

/// An N-dimensional sparse array, §3.3.
#[derive(Clone, Debug)]
pub struct SparseVectorTree {
    shape: Shape,
    kind: ElementKind,
    root: Rc<Svt>,
}

impl SparseVectorTree {
    /// Constructs an all-absent SVT of the given shape and kind.
    pub fn empty(shape: Shape, kind: ElementKind) -> Self {
        SparseVectorTree {
            shape,
            kind,
            root: Rc::new(Svt::Absent),
        }
    }

    /// Constructs an SVT from an already-built root cell, checking the
    /// root's structural shape against `dim[N-1]` when `N >= 2` (§3.3).
    pub(crate) fn from_root(shape: Shape, kind: ElementKind, root: Svt) -> SvtResult<Self> {
        if shape.ndim() >= 2 {
            if let Svt::Node(children) = &root {
                let expect = shape.axis(shape.ndim() - 1) as usize;
                if children.len() != expect {
                    return Err(SvtError::structural(
                        "SVT",
                        format!(
                            "root node has {} children, expected dim[N-1] = {expect}",
                            children.len()
                        ),
                    ));
                }
            }
        }
        Ok(SparseVectorTree {
            shape,
            kind,
            root: Rc::new(root),
        })
    }

    pub(crate) fn from_root_rc(shape: Shape, kind: ElementKind, root: Rc<Svt>) -> Self {
        SparseVectorTree { shape, kind, root }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub(crate) fn root(&self) -> &Svt {
        &self.root
    }

    pub(crate) fn root_rc(&self) -> Rc<Svt> {
        Rc::clone(&self.root)
    }

    /// Whether `self` and `other` share the very same root node — used by
    /// tests of the "idempotence for zero batches" law (§8), which requires
    /// not just equal contents but the same underlying allocation.
    pub fn shares_root_with(&self, other: &SparseVectorTree) -> bool {
        Rc::ptr_eq(&self.root, &other.root)
    }

    /// `svt_nz_count`: recursive sum of leaf lengths (§4.2).
    #[time("debug")]
    pub fn nz_count(&self) -> u64 {
        trace!("counting non-zeros over shape {:?}", self.shape.as_slice());
        nz_count_rec(&self.root)
    }
}

fn nz_count_rec(cell: &Svt) -> u64 {
    match cell {
        Svt::Absent => 0,
        Svt::Leaf(leaf) => leaf.len() as u64,
        Svt::Node(children) => children.iter().map(|c| nz_count_rec(c)).sum(),
    }
}

/// Converts a 1-based linear index into a full coordinate, per the
/// algorithm in §4.2 `descend_by_linear`: at each axis `j` from `N-1` down
/// to `1`, `child = floor(idx0 / cumdim[j-1])`, `idx0 %= cumdim[j-1]`, and
/// the axis-0 coordinate is `idx0 + 1`.
pub(crate) fn linear_to_coord(shape: &Shape, cumdim: &[Coord], lidx: Coord) -> Vec<Coord> {
    let ndim = shape.ndim();
    let mut idx0 = lidx - 1;
    let mut coord = vec![0 as Coord; ndim];
    for j in (1..ndim).rev() {
        let block = cumdim[j - 1];
        coord[j] = idx0 / block + 1;
        idx0 %= block;
    }
    coord[0] = idx0 + 1;
    coord
}

pub(crate) fn check_linear_index(row: usize, max_xlen: Coord, lidx: Option<Coord>) -> SvtResult<Coord> {
    match lidx {
        Some(l) if l >= 1 && l <= max_xlen => Ok(l),
        _ => Err(SvtError::InvalidLinearIndex { row, max: max_xlen }),
    }
}

/// Descends from the root through axes `N-1 .. 1`, creating empty `Node`s
/// along the way as needed, and returns a mutable reference to the bottom
/// cell (the one representing axis 0, i.e. a `Leaf`/`Absent` slot) — used
/// only during construction passes (§4.2, §4.3) where the tree being built
/// has no other owner yet, so plain in-place mutation (no sharing to
/// preserve) is correct.
pub(crate) fn descend_mut<'a>(root: &'a mut Svt, shape: &Shape, coord: &[Coord]) -> &'a mut Svt {
    let ndim = shape.ndim();
    let mut cell = root;
    for j in (1..ndim).rev() {
        let size = shape.axis(j) as usize;
        if matches!(cell, Svt::Absent) {
            *cell = Svt::Node((0..size).map(|_| Rc::new(Svt::Absent)).collect());
        }
        let idx = (coord[j] - 1) as usize;
        match cell {
            Svt::Node(children) => cell = Rc::make_mut(&mut children[idx]),
            _ => unreachable!("descend_mut: non-Node cell above the bottom layer"),
        }
    }
    cell
}

/// Read-only descent; returns `None` wherever the path runs into `Absent`
/// without creating anything — used by queries that must not mutate.
pub(crate) fn descend_ref<'a>(root: &'a Svt, shape: &Shape, coord: &[Coord]) -> Option<&'a Svt> {
    let ndim = shape.ndim();
    let mut cell = root;
    for j in (1..ndim).rev() {
        match cell {
            Svt::Absent => return None,
            Svt::Node(children) => {
                let idx = (coord[j] - 1) as usize;
                cell = &children[idx];
            }
            Svt::Leaf(_) => {
                unreachable!("descend_ref: Leaf encountered above the bottom layer")
            }
        }
    }
    Some(cell)
}
