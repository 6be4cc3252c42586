//! Weighted multiset over tiles with proportional sampling

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::tiles::Tile;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accumulated successor weights for one context
///
/// The grand total always equals the sum of stored weights and every stored
/// weight is strictly positive. Entries are kept in tile order so sampling
/// with a seeded generator is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileDistribution {
    weights: BTreeMap<Tile, f64>,
    grand_total: f64,
}

impl TileDistribution {
    /// Create an empty distribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `tile`
    pub fn add(&mut self, tile: Tile) {
        self.add_weight(tile, 1.0);
    }

    /// Add every entry of `other` with its weight multiplied by `rate`
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not a positive finite number
    pub fn add_all(&mut self, other: &Self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(invalid_parameter(
                "rate",
                &rate,
                &"merge rate must be positive and finite",
            ));
        }

        for (tile, &weight) in &other.weights {
            self.add_weight(tile.clone(), weight * rate);
        }
        Ok(())
    }

    fn add_weight(&mut self, tile: Tile, weight: f64) {
        if weight <= 0.0 {
            return;
        }
        *self.weights.entry(tile).or_insert(0.0) += weight;
        self.grand_total += weight;
    }

    /// Draw a tile with probability proportional to its weight
    ///
    /// Returns `None` only when the distribution is empty.
    pub fn choose_randomly<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Tile> {
        if self.weights.is_empty() {
            return None;
        }

        let mut remainder = rng.random::<f64>() * self.grand_total;
        for (tile, &weight) in &self.weights {
            if remainder < weight {
                return Some(tile);
            }
            remainder -= weight;
        }

        // Rounding can leave a sliver past the last entry
        self.weights.keys().next_back()
    }

    /// Stored weight for `tile`, zero when absent
    pub fn weight(&self, tile: &Tile) -> f64 {
        self.weights.get(tile).copied().unwrap_or(0.0)
    }

    /// Sum of all stored weights
    pub const fn grand_total(&self) -> f64 {
        self.grand_total
    }

    /// Number of distinct tiles
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no tile has been recorded
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate `(tile, weight)` pairs in tile order
    pub fn iter(&self) -> impl Iterator<Item = (&Tile, f64)> + '_ {
        self.weights.iter().map(|(tile, &weight)| (tile, weight))
    }
}
