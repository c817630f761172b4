//! Random SVT/dense generation shared by unit tests across modules.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::dense::{dense_to_svt, Dense};
use crate::dim::Shape;
use crate::svt::SparseVectorTree;
use crate::value::{ElementKind, Value};

/// Builds a reproducible random dense buffer of `kind`, then converts it to
/// an SVT, with roughly `density` (0.0-1.0) of entries non-zero.
pub fn random_svt(seed: u64, shape: Shape, kind: ElementKind, density: f64) -> SparseVectorTree {
    let mut rng = SmallRng::seed_from_u64(seed);
    let total = shape.total_len() as usize;
    let data: Vec<Value> = (0..total)
        .map(|_| {
            if rng.gen_bool(density) {
                random_nonzero(&mut rng, kind)
            } else {
                kind.zero()
            }
        })
        .collect();
    dense_to_svt(Dense { shape, kind, data }).expect("random dense buffer has the right length")
}

fn random_nonzero(rng: &mut SmallRng, kind: ElementKind) -> Value {
    match kind {
        ElementKind::Logical => Value::Logical(true),
        ElementKind::Integer => Value::Integer(rng.gen_range(1..1000)),
        ElementKind::Double => Value::Double(rng.gen_range(1..1000) as f64 / 7.0),
        ElementKind::Complex => Value::Complex(rng.gen_range(1..100) as f64, rng.gen_range(1..100) as f64),
        ElementKind::Raw => Value::Raw(rng.gen_range(1..=255)),
        ElementKind::Character => Value::Character(std::rc::Rc::from("x")),
        ElementKind::List => kind.zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_svt_is_reproducible_for_a_fixed_seed() {
        let shape = Shape::new(vec![4, 4]).unwrap();
        let a = random_svt(42, shape.clone(), ElementKind::Integer, 0.3);
        let b = random_svt(42, shape, ElementKind::Integer, 0.3);
        assert_eq!(a.nz_count(), b.nz_count());
    }
}
