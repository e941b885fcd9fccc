//! Gradient warm-up over a rectangle, ahead of heavy querying.

use serde::{Deserialize, Serialize};

use crate::gradient::GradientStore;
use crate::source::UniformSource;

/// Axis-aligned query rectangle in noise space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }
}

/// Stateless driver for [`GradientStore::precompute`].
pub struct PrecomputeScheduler;

impl PrecomputeScheduler {
    pub fn run<R: UniformSource>(
        store: &mut GradientStore<R>,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) {
        store.precompute(x_min, x_max, y_min, y_max);
    }

    pub fn run_bounds<R: UniformSource>(store: &mut GradientStore<R>, bounds: Bounds) {
        Self::run(store, bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max);
    }
}
