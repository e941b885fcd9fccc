//! Thread-safe handle over a [`NoiseEvaluator`].
//!
//! Every operation takes one lock, so the first thread to touch a lattice
//! point fixes its gradient for every other thread.

use std::sync::Arc;

use noise::NoiseFn;
use parking_lot::Mutex;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::evaluator::{NoiseEvaluator, NoiseStats};
use crate::precompute::Bounds;
use crate::source::UniformSource;

pub struct SharedNoiseEvaluator<R = StdRng> {
    inner: Arc<Mutex<NoiseEvaluator<R>>>,
}

impl<R> Clone for SharedNoiseEvaluator<R> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl SharedNoiseEvaluator<StdRng> {
    pub fn with_seed(seed: u64) -> Self {
        Self::new(NoiseEvaluator::with_seed(seed))
    }
}

impl<R: UniformSource> SharedNoiseEvaluator<R> {
    pub fn new(evaluator: NoiseEvaluator<R>) -> Self {
        Self { inner: Arc::new(Mutex::new(evaluator)) }
    }

    pub fn get(&self, x: f64, y: f64) -> f64 {
        self.inner.lock().get(x, y)
    }

    pub fn get_1d(&self, x: f64) -> f64 {
        self.inner.lock().get_1d(x)
    }

    pub fn try_get(&self, x: f64, y: f64) -> Result<f64> {
        self.inner.lock().try_get(x, y)
    }

    pub fn precompute_gradients(&self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        self.inner.lock().precompute_gradients(x_min, x_max, y_min, y_max);
    }

    pub fn precompute_bounds(&self, bounds: Bounds) {
        self.inner.lock().precompute_bounds(bounds);
    }

    pub fn clear_cache(&self) {
        self.inner.lock().clear_cache();
    }

    pub fn clear_gradients(&self) {
        self.inner.lock().clear_gradients();
    }

    pub fn stats(&self) -> NoiseStats {
        self.inner.lock().stats()
    }

    /// Run `f` with the lock held, for batches that must not interleave.
    pub fn with_lock<T>(&self, f: impl FnOnce(&mut NoiseEvaluator<R>) -> T) -> T {
        f(&mut *self.inner.lock())
    }
}

impl<R: UniformSource> NoiseFn<f64, 2> for SharedNoiseEvaluator<R> {
    fn get(&self, point: [f64; 2]) -> f64 {
        SharedNoiseEvaluator::get(self, point[0], point[1])
    }
}

impl<R: UniformSource> NoiseFn<f64, 1> for SharedNoiseEvaluator<R> {
    fn get(&self, point: [f64; 1]) -> f64 {
        self.get_1d(point[0])
    }
}
