use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, Result};
use crate::evaluator::NoiseEvaluator;
use crate::fbm::Fbm;
use crate::precompute::Bounds;
use crate::shared::SharedNoiseEvaluator;
use crate::source::UniformSource;

/// Placement of a sampling grid in noise space.
///
/// Column `c` samples `x = x0 + c·step`, row `r` samples `y = y0 + r·step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub width: usize,
    pub height: usize,
    pub x0: f64,
    pub y0: f64,
    pub step: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { width: 64, height: 64, x0: 0.0, y0: 0.0, step: 1.0 / 16.0 }
    }
}

impl GridSpec {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(NoiseError::InvalidGrid(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(NoiseError::InvalidGrid(format!("step must be positive, got {}", self.step)));
        }
        if !self.x0.is_finite() || !self.y0.is_finite() {
            return Err(NoiseError::InvalidGrid("origin must be finite".into()));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(NoiseError::InvalidGrid(format!(
                "{}x{} samples overflow usize",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Number of samples. Only meaningful after [`validate`](Self::validate).
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Noise-space rectangle covered by the grid's sample points.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.x0,
            self.x0 + self.width.saturating_sub(1) as f64 * self.step,
            self.y0,
            self.y0 + self.height.saturating_sub(1) as f64 * self.step,
        )
    }

    /// Lattice rectangle holding every gradient a query inside the grid touches.
    ///
    /// `get` reads the `floor + 1` corner too, so the upper edge is one past
    /// the last sample's cell even when that sample sits on a lattice line.
    pub fn lattice_bounds(&self) -> Bounds {
        let b = self.bounds();
        Bounds::new(b.x_min.floor(), b.x_max.floor() + 1.0, b.y_min.floor(), b.y_max.floor() + 1.0)
    }

    #[inline]
    fn point(&self, row: usize, col: usize) -> (f64, f64) {
        (self.x0 + col as f64 * self.step, self.y0 + row as f64 * self.step)
    }
}

#[cfg(feature = "threading")]
fn fill_shared<R: UniformSource + Send>(noise: &SharedNoiseEvaluator<R>, spec: &GridSpec) -> Vec<f64> {
    use rayon::prelude::*;
    let mut data = vec![0.0f64; spec.len()];
    data.par_chunks_mut(spec.width).enumerate().for_each(|(r, row)| {
        for (c, v) in row.iter_mut().enumerate() {
            let (x, y) = spec.point(r, c);
            *v = noise.get(x, y);
        }
    });
    data
}

#[cfg(not(feature = "threading"))]
fn fill_shared<R: UniformSource + Send>(noise: &SharedNoiseEvaluator<R>, spec: &GridSpec) -> Vec<f64> {
    let mut data = Vec::with_capacity(spec.len());
    for r in 0..spec.height {
        for c in 0..spec.width {
            let (x, y) = spec.point(r, c);
            data.push(noise.get(x, y));
        }
    }
    data
}

/// Row-major noise samples over a [`GridSpec`].
///
/// Deserialising checks the spec and that `data` holds exactly one value
/// per sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct NoiseGrid {
    pub data: Vec<f64>,
    pub spec: GridSpec,
}

#[derive(Deserialize)]
struct GridRepr {
    data: Vec<f64>,
    spec: GridSpec,
}

impl TryFrom<GridRepr> for NoiseGrid {
    type Error = NoiseError;

    fn try_from(repr: GridRepr) -> Result<Self> {
        repr.spec.validate()?;
        if repr.data.len() != repr.spec.len() {
            return Err(NoiseError::InvalidGrid(format!(
                "{} values for a {}x{} grid",
                repr.data.len(),
                repr.spec.width,
                repr.spec.height
            )));
        }
        Ok(Self { data: repr.data, spec: repr.spec })
    }
}

impl NoiseGrid {
    /// Fill a grid by calling `f(x, y)` at every sample point, row by row.
    pub fn sample_with(spec: GridSpec, mut f: impl FnMut(f64, f64) -> f64) -> Result<Self> {
        spec.validate()?;
        let mut data = Vec::with_capacity(spec.len());
        for r in 0..spec.height {
            for c in 0..spec.width {
                let (x, y) = spec.point(r, c);
                data.push(f(x, y));
            }
        }
        Ok(Self { data, spec })
    }

    pub fn from_evaluator<R: UniformSource>(noise: &mut NoiseEvaluator<R>, spec: GridSpec) -> Result<Self> {
        Self::sample_with(spec, |x, y| noise.get(x, y))
    }

    pub fn from_fbm<R: UniformSource>(fbm: &mut Fbm<R>, spec: GridSpec) -> Result<Self> {
        Self::sample_with(spec, |x, y| fbm.sample(x, y))
    }

    /// Sample through a shared evaluator. Every gradient the grid touches is
    /// created up front, so neither the values nor the evaluator's gradient
    /// field depend on thread timing.
    pub fn from_shared<R>(noise: &SharedNoiseEvaluator<R>, spec: GridSpec) -> Result<Self>
    where
        R: UniformSource + Send,
    {
        spec.validate()?;
        noise.precompute_bounds(spec.lattice_bounds());
        Ok(Self { data: fill_shared(noise, &spec), spec })
    }

    pub fn width(&self) -> usize {
        self.spec.width
    }

    pub fn height(&self) -> usize {
        self.spec.height
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.spec.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.spec.width + col] = val;
    }

    /// Bilinear lookup at noise-space `(x, y)`.
    /// Returns None outside the sampled rectangle.
    pub fn sample(&self, x: f64, y: f64) -> Option<f64> {
        let b = self.spec.bounds();
        if !(x >= b.x_min && x <= b.x_max && y >= b.y_min && y <= b.y_max) {
            return None;
        }

        let fx = (x - self.spec.x0) / self.spec.step;
        let fy = (y - self.spec.y0) / self.spec.step;

        let x0 = (fx.floor() as usize).min(self.spec.width - 1);
        let y0 = (fy.floor() as usize).min(self.spec.height - 1);
        let x1 = (x0 + 1).min(self.spec.width - 1);
        let y1 = (y0 + 1).min(self.spec.height - 1);

        let tx = fx - x0 as f64;
        let ty = fy - y0 as f64;

        let v00 = self.get(y0, x0);
        let v10 = self.get(y0, x1);
        let v01 = self.get(y1, x0);
        let v11 = self.get(y1, x1);

        Some(
            v00 * (1.0 - tx) * (1.0 - ty)
                + v10 * tx * (1.0 - ty)
                + v01 * (1.0 - tx) * ty
                + v11 * tx * ty,
        )
    }

    pub fn min_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}
