//! Leaf: a compressed sparse 1-D vector at the bottom of an SVT (§3.2, §4.1).

use std::cmp::Ordering;

use crate::dim::{Coord, MAX_I32_LEN};
use crate::error::{SvtError, SvtResult};
use crate::value::{ElementKind, Value};

/// A compressed sparse 1-D vector. `pos` is strictly ascending, 1-based, and
/// every entry in `vals` is non-zero for its kind (§3.2).
#[derive(Clone, Debug)]
pub struct Leaf {
    pos: Vec<Coord>,
    vals: Vec<Value>,
}

impl Leaf {
    /// Validates `|pos| == |vals|`, `|pos| <= 2^31 - 1`, and that `pos` is
    /// strictly ascending. Does **not** check for zero values in `vals`;
    /// callers that may have produced zeros (e.g. `leaf_merge`) must run
    /// `leaf_compact` before handing a leaf back to a caller.
    pub fn new(pos: Vec<Coord>, vals: Vec<Value>) -> SvtResult<Self> {
        if pos.len() != vals.len() {
            return Err(SvtError::structural(
                "Leaf",
                format!(
                    "pos length {} does not match vals length {}",
                    pos.len(),
                    vals.len()
                ),
            ));
        }
        if pos.is_empty() {
            return Err(SvtError::structural(
                "Leaf",
                "a leaf is never empty; use Absent instead",
            ));
        }
        if pos.len() as u64 > MAX_I32_LEN {
            return Err(SvtError::TooManyNonZeros(pos.len() as u64));
        }
        if !pos.windows(2).all(|w| w[0] < w[1]) {
            return Err(SvtError::structural(
                "Leaf",
                "positions must be strictly ascending",
            ));
        }
        Ok(Leaf { pos, vals })
    }

    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn pos(&self) -> &[Coord] {
        &self.pos
    }

    pub fn vals(&self) -> &[Value] {
        &self.vals
    }

    pub fn kind(&self) -> ElementKind {
        self.vals[0].kind()
    }

    /// Read-only view, `(pos, vals)` (§4.1 `leaf_split`).
    pub fn split(&self) -> (&[Coord], &[Value]) {
        (&self.pos, &self.vals)
    }

    pub fn into_parts(self) -> (Vec<Coord>, Vec<Value>) {
        (self.pos, self.vals)
    }

    /// Ordered two-way merge on position. On a duplicate position `b`'s
    /// value wins (assignment semantics, §4.1). The result may contain
    /// zero-valued entries; run `compact` to remove them.
    pub fn merge(a: &Leaf, b: &Leaf) -> Leaf {
        let mut pos = Vec::with_capacity(a.len() + b.len());
        let mut vals = Vec::with_capacity(a.len() + b.len());

        let (mut i, mut j) = (0, 0);
        while i < a.pos.len() && j < b.pos.len() {
            match a.pos[i].cmp(&b.pos[j]) {
                Ordering::Less => {
                    pos.push(a.pos[i]);
                    vals.push(a.vals[i].clone());
                    i += 1;
                }
                Ordering::Greater => {
                    pos.push(b.pos[j]);
                    vals.push(b.vals[j].clone());
                    j += 1;
                }
                Ordering::Equal => {
                    pos.push(b.pos[j]);
                    vals.push(b.vals[j].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        pos.extend_from_slice(&a.pos[i..]);
        vals.extend_from_slice(&a.vals[i..]);
        pos.extend_from_slice(&b.pos[j..]);
        vals.extend_from_slice(&b.vals[j..]);

        // Safety of unwrap: both inputs were strictly ascending and disjoint
        // positions interleave in strictly ascending order; equal positions
        // collapse to a single entry, so the result stays strictly ascending.
        Leaf { pos, vals }
    }

    /// Removes zero-valued entries, returning `None` if every entry is zero
    /// (§4.1 `leaf_compact`). The spec calls for a scratch `int[]` of size
    /// `>= |leaf|`; callers performing many compactions in a loop (the
    /// subassignment engine's Pass 2) should prefer `compact_into` with a
    /// reusable buffer instead.
    pub fn compact(self) -> Option<Leaf> {
        let mut scratch = Vec::with_capacity(self.pos.len());
        self.compact_into(&mut scratch)
    }

    /// Same as `compact`, but reuses `scratch` (cleared and repopulated with
    /// the surviving indices) across many calls instead of allocating a
    /// fresh buffer each time.
    pub fn compact_into(self, scratch: &mut Vec<usize>) -> Option<Leaf> {
        scratch.clear();
        scratch.extend(
            self.vals
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_zero())
                .map(|(i, _)| i),
        );
        if scratch.is_empty() {
            return None;
        }
        let mut pos = Vec::with_capacity(scratch.len());
        let mut vals = Vec::with_capacity(scratch.len());
        for &i in scratch.iter() {
            pos.push(self.pos[i]);
            vals.push(self.vals[i].clone());
        }
        Some(Leaf { pos, vals })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(pos: &[Coord], vals: &[i32]) -> Leaf {
        Leaf::new(
            pos.to_vec(),
            vals.iter().map(|&v| Value::Integer(v)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_unsorted_positions() {
        assert!(Leaf::new(vec![2, 1], vec![Value::Integer(1), Value::Integer(2)]).is_err());
    }

    #[test]
    fn new_rejects_empty() {
        assert!(Leaf::new(vec![], vec![]).is_err());
    }

    #[test]
    fn new_rejects_mismatched_lengths() {
        assert!(Leaf::new(vec![1, 2], vec![Value::Integer(1)]).is_err());
    }

    #[test]
    fn merge_disjoint_interleaves() {
        let a = leaf(&[1, 3], &[10, 30]);
        let b = leaf(&[2, 4], &[20, 40]);
        let m = Leaf::merge(&a, &b);
        assert_eq!(m.pos(), &[1, 2, 3, 4]);
    }

    #[test]
    fn merge_duplicate_position_second_wins() {
        let a = leaf(&[1], &[5]);
        let b = leaf(&[1], &[9]);
        let m = Leaf::merge(&a, &b);
        assert_eq!(m.pos(), &[1]);
        assert_eq!(m.vals()[0], Value::Integer(9));
    }

    #[test]
    fn compact_drops_zeros_and_may_become_none() {
        let l = leaf(&[1, 2, 3], &[0, 5, 0]);
        let c = l.compact().unwrap();
        assert_eq!(c.pos(), &[2]);

        let all_zero = leaf(&[1, 2], &[0, 0]);
        assert!(all_zero.compact().is_none());
    }
}
