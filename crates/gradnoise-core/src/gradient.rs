//! Lattice gradient store.
//!
//! Maps each [`LatticePoint`] to a unit gradient drawn from the injected
//! [`UniformSource`]. The first lookup of a point fixes its gradient; later
//! lookups return the same vector until [`GradientStore::clear`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::lattice::{GradientVector, LatticePoint};
use crate::source::UniformSource;

pub struct GradientStore<R> {
    gradients: HashMap<LatticePoint, GradientVector>,
    source: R,
}

impl<R: UniformSource> GradientStore<R> {
    /// Empty store drawing angles from `source`.
    pub fn new(source: R) -> Self {
        Self { gradients: HashMap::new(), source }
    }

    /// Gradient at `(ix, iy)`, sampling θ ∈ [0, 2π) on first use.
    pub fn get_or_create(&mut self, ix: i64, iy: i64) -> GradientVector {
        match self.gradients.entry(LatticePoint::new(ix, iy)) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let theta = self.source.next_unit() * TAU;
                *e.insert(GradientVector::from_angle(theta))
            }
        }
    }

    /// Populate every lattice point in
    /// `[floor(x_min), ceil(x_max)] × [floor(y_min), ceil(y_max)]`.
    ///
    /// Points are visited row by row (y outer, x inner), so a seeded source
    /// always assigns the same gradient to the same point. Existing entries
    /// are left alone. Inverted or non-finite bounds visit nothing.
    pub fn precompute(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            log::debug!(
                "skipping gradient precompute over non-finite bounds \
                 x=[{x_min}, {x_max}] y=[{y_min}, {y_max}]"
            );
            return;
        }

        let (ix0, ix1) = (x_min.floor() as i64, x_max.ceil() as i64);
        let (iy0, iy1) = (y_min.floor() as i64, y_max.ceil() as i64);

        let before = self.gradients.len();
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                self.get_or_create(ix, iy);
            }
        }
        log::debug!(
            "precomputed gradients x=[{ix0}, {ix1}] y=[{iy0}, {iy1}]: {} new, {} total",
            self.gradients.len() - before,
            self.gradients.len()
        );
    }
}

impl<R> GradientStore<R> {
    /// Stored gradient at `(ix, iy)`, without creating one.
    pub fn get(&self, ix: i64, iy: i64) -> Option<GradientVector> {
        self.gradients.get(&LatticePoint::new(ix, iy)).copied()
    }

    pub fn contains(&self, ix: i64, iy: i64) -> bool {
        self.gradients.contains_key(&LatticePoint::new(ix, iy))
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }

    /// Populated lattice points, in no particular order.
    pub fn points(&self) -> impl Iterator<Item = LatticePoint> + '_ {
        self.gradients.keys().copied()
    }

    /// Drop every gradient. Later lookups draw fresh ones.
    pub fn clear(&mut self) {
        self.gradients.clear();
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FnSource;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> GradientStore<StdRng> {
        GradientStore::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn get_or_create_is_stable() {
        let mut store = seeded(1);
        let g = store.get_or_create(3, -4);
        for _ in 0..4 {
            assert_eq!(store.get_or_create(3, -4), g);
        }
        assert_eq!(store.len(), 1);
        assert_abs_diff_eq!(g.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn angle_comes_from_source() {
        let mut store = GradientStore::new(FnSource(|| 0.25));
        let g = store.get_or_create(0, 0);
        assert_abs_diff_eq!(g.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(g.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn precompute_covers_floor_to_ceil() {
        let mut store = seeded(2);
        store.precompute(-0.5, 1.5, 0.2, 0.8);
        // x: -1..=2 (4 columns), y: 0..=1 (2 rows)
        assert_eq!(store.len(), 8);
        for iy in 0..=1 {
            for ix in -1..=2 {
                assert!(store.contains(ix, iy), "missing ({ix}, {iy})");
            }
        }
        assert!(!store.contains(3, 0));
    }

    #[test]
    fn precompute_is_idempotent() {
        let mut store = seeded(3);
        store.precompute(0.0, 2.0, 0.0, 2.0);
        let before: Vec<_> = (0..=2).map(|i| store.get(i, i)).collect();
        let n = store.len();
        store.precompute(0.0, 2.0, 0.0, 2.0);
        let after: Vec<_> = (0..=2).map(|i| store.get(i, i)).collect();
        assert_eq!(store.len(), n);
        assert_eq!(before, after);
    }

    #[test]
    fn precompute_inverted_or_non_finite_is_noop() {
        let mut store = seeded(4);
        store.precompute(2.0, 1.0, 0.0, 1.0);
        store.precompute(0.0, 1.0, 5.0, -5.0);
        store.precompute(f64::NAN, 1.0, 0.0, 1.0);
        store.precompute(0.0, f64::INFINITY, 0.0, 1.0);
        assert!(store.is_empty());
    }

    #[test]
    fn precompute_order_is_deterministic() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        a.precompute(-2.0, 2.0, -2.0, 2.0);
        b.precompute(-2.0, 2.0, -2.0, 2.0);
        for p in a.points() {
            assert_eq!(a.get(p.ix, p.iy), b.get(p.ix, p.iy));
        }
    }

    #[test]
    fn clear_draws_fresh_gradients() {
        let mut store = seeded(5);
        let before = store.get_or_create(0, 0);
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(0, 0).is_none());
        let after = store.get_or_create(0, 0);
        assert_ne!(before, after);
    }
}
