//! Lazily memoized 2D gradient noise.
//!
//! A [`NoiseEvaluator`] owns a [`GradientStore`] (lattice point → unit
//! gradient) and a [`ValueCache`] (query point → noise value). Both fill on
//! demand and are only emptied by explicit clears.

pub mod cache;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod fbm;
pub mod gradient;
pub mod grid;
pub mod lattice;
pub mod precompute;
pub mod shared;
pub mod source;

pub use cache::ValueCache;
pub use error::{NoiseError, Result};
pub use evaluator::{NoiseEvaluator, NoiseStats, THEORETICAL_BOUND};
pub use gradient::GradientStore;
pub use lattice::{GradientVector, LatticePoint, QueryKey};
pub use precompute::{Bounds, PrecomputeScheduler};
pub use shared::SharedNoiseEvaluator;
pub use source::{FnSource, UniformSource};
