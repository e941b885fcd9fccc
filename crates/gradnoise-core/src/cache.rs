use std::collections::HashMap;

use crate::lattice::QueryKey;

/// Memoized noise values keyed by exact query coordinates.
#[derive(Debug, Default, Clone)]
pub struct ValueCache {
    values: HashMap<QueryKey, f64>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, x: f64, y: f64) -> Option<f64> {
        self.values.get(&QueryKey::new(x, y)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: f64, y: f64, value: f64) {
        self.values.insert(QueryKey::new(x, y), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every cached value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
