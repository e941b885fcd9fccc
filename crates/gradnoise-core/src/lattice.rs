//! Key and vector types shared by the gradient store and value cache.

use serde::{Deserialize, Serialize};

/// Integer grid vertex. Carries one persistent gradient in a `GradientStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticePoint {
    pub ix: i64,
    pub iy: i64,
}

impl LatticePoint {
    pub const fn new(ix: i64, iy: i64) -> Self {
        Self { ix, iy }
    }

    /// Lower-left corner of the unit cell enclosing `(x, y)`.
    ///
    /// Coordinates outside the `i64` range saturate.
    #[inline]
    pub fn enclosing(x: f64, y: f64) -> Self {
        Self { ix: x.floor() as i64, iy: y.floor() as i64 }
    }

    /// Vertex offset by `(dx, dy)`, saturating at the `i64` limits.
    #[inline]
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self { ix: self.ix.saturating_add(dx), iy: self.iy.saturating_add(dy) }
    }
}

impl From<(i64, i64)> for LatticePoint {
    fn from((ix, iy): (i64, i64)) -> Self {
        Self::new(ix, iy)
    }
}

/// Unit-length 2D gradient `(cos θ, sin θ)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientVector {
    pub x: f64,
    pub y: f64,
}

impl GradientVector {
    /// Gradient pointing at angle `theta` (radians).
    #[inline]
    pub fn from_angle(theta: f64) -> Self {
        let (y, x) = theta.sin_cos();
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, dx: f64, dy: f64) -> f64 {
        self.x * dx + self.y * dy
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Exact query coordinate pair, hashed by bit pattern.
///
/// `-0.0` is folded into `0.0` so both spellings of the origin share one
/// entry. NaN never reaches a cache, so bit equality is plain equality here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    x: u64,
    y: u64,
}

impl QueryKey {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        // Adding +0.0 maps -0.0 to +0.0 and leaves every other value alone.
        Self { x: (x + 0.0).to_bits(), y: (y + 0.0).to_bits() }
    }

    pub fn x(self) -> f64 {
        f64::from_bits(self.x)
    }

    pub fn y(self) -> f64 {
        f64::from_bits(self.y)
    }
}
