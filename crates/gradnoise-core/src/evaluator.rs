//! Memoized 2D gradient noise evaluator.
//!
//! `get(x, y)`:
//!   1. Return the cached value for `(x, y)` if there is one.
//!   2. Find the enclosing cell `(floor x, floor y)`.
//!   3. Dot each corner's gradient with the offset from that corner.
//!   4. Blend the four dots with the quintic fade, first along x then y.
//!   5. Cache and return.
//!
//! Output is not clamped. With unit gradients the analytic extreme of 2D
//! gradient noise is ±√½ (see [`THEORETICAL_BOUND`]), inside the nominal
//! `[-1, 1]` range.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::cache::ValueCache;
use crate::error::{NoiseError, Result};
use crate::gradient::GradientStore;
use crate::lattice::LatticePoint;
use crate::precompute::{Bounds, PrecomputeScheduler};
use crate::source::UniformSource;

/// Largest magnitude 2D gradient noise reaches with unit gradients.
pub const THEORETICAL_BOUND: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Quintic smoothstep `6t⁵ − 15t⁴ + 10t³`.
///
/// s(0)=0, s(1)=1, and the first and second derivatives vanish at both ends.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Blend `a` toward `b` by `smoothstep(t)`.
#[inline]
pub fn fade(t: f64, a: f64, b: f64) -> f64 {
    a + smoothstep(t) * (b - a)
}

/// Cache occupancy snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoiseStats {
    pub gradients: usize,
    pub cached_values: usize,
}

/// Gradient noise field with lazily created gradients and memoized values.
///
/// Each evaluator owns its own stores; two evaluators never share state.
/// Wrap in [`crate::SharedNoiseEvaluator`] to query from several threads.
pub struct NoiseEvaluator<R = StdRng> {
    gradients: GradientStore<R>,
    values: ValueCache,
}

impl NoiseEvaluator<StdRng> {
    /// Evaluator seeded from OS entropy. Every instance is a different field.
    pub fn new() -> Self {
        Self::with_source(StdRng::from_entropy())
    }

    /// Reproducible evaluator: same seed and same query order give the same field.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(StdRng::seed_from_u64(seed))
    }
}

impl Default for NoiseEvaluator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: UniformSource> NoiseEvaluator<R> {
    pub fn with_source(source: R) -> Self {
        Self { gradients: GradientStore::new(source), values: ValueCache::new() }
    }

    /// Noise value at `(x, y)`.
    ///
    /// Repeated calls with the same coordinates return bit-identical values
    /// until [`clear_cache`](Self::clear_cache). A NaN or infinite coordinate
    /// yields `f64::NAN` and leaves both caches untouched; use
    /// [`try_get`](Self::try_get) to reject such input instead.
    pub fn get(&mut self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return f64::NAN;
        }
        if let Some(v) = self.values.get(x, y) {
            return v;
        }

        let v = self.compute(x, y);
        self.values.set(x, y, v);
        v
    }

    /// `get(x, 0.0)`.
    #[inline]
    pub fn get_1d(&mut self, x: f64) -> f64 {
        self.get(x, 0.0)
    }

    /// Like [`get`](Self::get), but non-finite coordinates are an error.
    pub fn try_get(&mut self, x: f64, y: f64) -> Result<f64> {
        if !x.is_finite() || !y.is_finite() {
            return Err(NoiseError::NonFinite { x, y });
        }
        Ok(self.get(x, y))
    }

    /// Create gradients for every lattice point covering the rectangle.
    pub fn precompute_gradients(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        PrecomputeScheduler::run(&mut self.gradients, x_min, x_max, y_min, y_max);
    }

    pub fn precompute_bounds(&mut self, bounds: Bounds) {
        PrecomputeScheduler::run_bounds(&mut self.gradients, bounds);
    }

    fn compute(&mut self, x: f64, y: f64) -> f64 {
        let cell = LatticePoint::enclosing(x, y);
        let fx = x - x.floor();
        let fy = y - y.floor();

        let tl = self.corner(cell, 0, 0, fx, fy);
        let tr = self.corner(cell, 1, 0, fx, fy);
        let bl = self.corner(cell, 0, 1, fx, fy);
        let br = self.corner(cell, 1, 1, fx, fy);

        let xt = fade(fx, tl, tr);
        let xb = fade(fx, bl, br);
        fade(fy, xt, xb)
    }

    /// Dot of the corner gradient with the offset from that corner.
    ///
    /// Offsets use the fractional position so large coordinates keep their
    /// precision inside the cell.
    #[inline]
    fn corner(&mut self, cell: LatticePoint, dx: i64, dy: i64, fx: f64, fy: f64) -> f64 {
        let c = cell.offset(dx, dy);
        let g = self.gradients.get_or_create(c.ix, c.iy);
        g.dot(fx - dx as f64, fy - dy as f64)
    }
}

impl<R> NoiseEvaluator<R> {
    /// Forget memoized values. Gradients are kept, so recomputed values match.
    pub fn clear_cache(&mut self) {
        log::debug!("clearing {} cached noise values", self.values.len());
        self.values.clear();
    }

    /// Forget gradients. Cached values survive; new queries see a new field.
    pub fn clear_gradients(&mut self) {
        log::debug!("clearing {} lattice gradients", self.gradients.len());
        self.gradients.clear();
    }

    pub fn stats(&self) -> NoiseStats {
        NoiseStats { gradients: self.gradients.len(), cached_values: self.values.len() }
    }

    pub fn gradients(&self) -> &GradientStore<R> {
        &self.gradients
    }

    pub fn values(&self) -> &ValueCache {
        &self.values
    }
}
