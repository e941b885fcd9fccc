//! Fractional Brownian motion layered over a [`NoiseEvaluator`].
//!
//! fBm: sum of octaves with amplitude = gain^i and frequency = lacunarity^i.
//! Every octave reads the same memoized field, so octave lattices share
//! gradients and caches.
use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, Result};
use crate::evaluator::NoiseEvaluator;
use crate::source::UniformSource;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FbmParams {
    pub octaves: u32,
    pub lacunarity: f64,
    pub gain: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self { octaves: 1, lacunarity: 2.0, gain: 0.5 }
    }
}

impl FbmParams {
    /// Persistence from a Hurst exponent: gain = lacunarity^(−H).
    /// For lacunarity=2, H=0.75 → gain≈0.595.
    pub fn from_hurst(h: f64, octaves: u32) -> Self {
        let lacunarity = 2.0;
        Self { octaves, lacunarity, gain: lacunarity.powf(-h) }
    }

    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 {
            return Err(NoiseError::InvalidFbm("octaves must be at least 1".into()));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(NoiseError::InvalidFbm(format!(
                "lacunarity must be positive and finite, got {}",
                self.lacunarity
            )));
        }
        // A non-positive gain can cancel the amplitude sum to zero.
        if !(self.gain.is_finite() && self.gain > 0.0) {
            return Err(NoiseError::InvalidFbm(format!(
                "gain must be positive and finite, got {}",
                self.gain
            )));
        }
        Ok(())
    }

    /// Sum of octave amplitudes; divide by this to bring output back to ≈ ±1.
    pub fn amplitude_sum(&self) -> f64 {
        (0..self.octaves).map(|i| self.gain.powi(i as i32)).sum()
    }
}

pub struct Fbm<R> {
    params: FbmParams,
    noise: NoiseEvaluator<R>,
}

impl<R: UniformSource> Fbm<R> {
    pub fn new(noise: NoiseEvaluator<R>, params: FbmParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, noise })
    }

    /// Unscaled fBm value at `(x, y)`.
    pub fn sample(&mut self, x: f64, y: f64) -> f64 {
        let mut value = 0.0f64;
        let mut amp = 1.0f64;
        let mut freq = 1.0f64;
        for _ in 0..self.params.octaves {
            value += amp * self.noise.get(x * freq, y * freq);
            amp *= self.params.gain;
            freq *= self.params.lacunarity;
        }
        value
    }

    /// fBm value divided by [`FbmParams::amplitude_sum`].
    pub fn sample_normalized(&mut self, x: f64, y: f64) -> f64 {
        self.sample(x, y) / self.params.amplitude_sum()
    }
}

impl<R> Fbm<R> {
    pub fn params(&self) -> &FbmParams {
        &self.params
    }

    pub fn evaluator(&self) -> &NoiseEvaluator<R> {
        &self.noise
    }

    pub fn evaluator_mut(&mut self) -> &mut NoiseEvaluator<R> {
        &mut self.noise
    }

    pub fn into_evaluator(self) -> NoiseEvaluator<R> {
        self.noise
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn single_octave_is_base_field() {
        let mut fbm = Fbm::new(NoiseEvaluator::with_seed(31), FbmParams::default()).unwrap();
        let mut base = NoiseEvaluator::with_seed(31);
        for i in 0..20 {
            let (x, y) = (i as f64 * 0.23, i as f64 * 0.41 - 2.0);
            assert_eq!(fbm.sample(x, y).to_bits(), base.get(x, y).to_bits());
        }
    }

    #[test]
    fn more_octaves_add_detail() {
        let params = FbmParams { octaves: 5, ..FbmParams::default() };
        let mut fbm = Fbm::new(NoiseEvaluator::with_seed(32), params).unwrap();
        let mut base = NoiseEvaluator::with_seed(32);
        let differs = (0..20).any(|i| {
            let (x, y) = (i as f64 * 0.23 + 0.1, 0.77);
            let base_v = base.get(x, y);
            (fbm.sample(x, y) - base_v).abs() > 1e-6
        });
        assert!(differs);
    }

    #[test]
    fn normalized_output_is_bounded() {
        let params = FbmParams { octaves: 6, ..FbmParams::default() };
        let mut fbm = Fbm::new(NoiseEvaluator::with_seed(33), params).unwrap();
        for r in 0..30 {
            for c in 0..30 {
                let v = fbm.sample_normalized(c as f64 * 0.19, r as f64 * 0.21);
                assert!(v.abs() <= 1.0, "normalized fBm {v} outside [-1, 1]");
            }
        }
    }

    #[test]
    fn hurst_gain() {
        let p = FbmParams::from_hurst(0.75, 8);
        assert_abs_diff_eq!(p.gain, 0.5946, epsilon = 1e-4);
        assert_abs_diff_eq!(FbmParams::default().amplitude_sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_zero_octaves_and_nan_gain() {
        let zero = FbmParams { octaves: 0, ..FbmParams::default() };
        assert!(matches!(
            Fbm::new(NoiseEvaluator::with_seed(1), zero),
            Err(NoiseError::InvalidFbm(_))
        ));
        let nan = FbmParams { gain: f64::NAN, ..FbmParams::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_gain_and_lacunarity() {
        let cancelling = FbmParams { octaves: 2, gain: -1.0, ..FbmParams::default() };
        assert_eq!(cancelling.amplitude_sum(), 0.0);
        assert!(matches!(
            Fbm::new(NoiseEvaluator::with_seed(2), cancelling),
            Err(NoiseError::InvalidFbm(_))
        ));
        assert!(FbmParams { gain: 0.0, ..FbmParams::default() }.validate().is_err());
        assert!(FbmParams { lacunarity: -2.0, ..FbmParams::default() }.validate().is_err());
    }
}
