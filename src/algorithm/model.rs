//! Trained Markov model and the fitting pass
//!
//! The model keeps one distribution for the empty context and one k-d index
//! per context length `1..=max_n`, the index for length `n` keyed by
//! `3 * n` components.

use crate::io::configuration::{COMPONENTS_PER_STEP, MAX_CONTEXT_LENGTH};
use crate::io::error::{Result, SynthesisError, invalid_parameter};
use crate::math::distribution::TileDistribution;
use crate::spatial::context::{ChainMode, ContextVector, enumerate_contexts};
use crate::spatial::graph::Digraph;
use crate::spatial::kdtree::KdMap;
use crate::spatial::tiles::{Tile, TileRaster};
use log::info;
use serde::{Deserialize, Serialize};

/// Per-context successor distribution index
pub type ContextIndex = KdMap<TileDistribution>;

/// Counts gathered while fitting one raster
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FitSummary {
    /// Positions visited
    pub positions: usize,
    /// Context observations recorded, all arities included
    pub observations: usize,
    /// Contexts seen for the first time
    pub new_contexts: usize,
}

/// Size of a fitted model
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelStatistics {
    /// Distinct tiles in the empty-context distribution
    pub nullary_tiles: usize,
    /// Distinct contexts stored for arity `i + 1`
    pub contexts_per_arity: Vec<usize>,
    /// Deepest node chain for arity `i + 1`
    pub depth_per_arity: Vec<usize>,
}

/// Order-N Markov model over tile contexts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Model {
    max_n: usize,
    tile_size: usize,
    nullary: TileDistribution,
    indexes: Vec<ContextIndex>,
}

impl Model {
    /// Create an empty model for contexts up to `max_n` steps
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `tile_size` is zero
    /// - `max_n` exceeds the supported context length
    pub fn new(max_n: usize, tile_size: usize) -> Result<Self> {
        check_parameters(max_n, tile_size)?;

        let indexes = (1..=max_n)
            .map(|arity| ContextIndex::new(arity * COMPONENTS_PER_STEP))
            .collect();

        Ok(Self {
            max_n,
            tile_size,
            nullary: TileDistribution::new(),
            indexes,
        })
    }

    /// Longest context length
    pub const fn max_n(&self) -> usize {
        self.max_n
    }

    /// Tile edge length in pixels
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Distribution used when no predecessor context exists
    pub const fn nullary(&self) -> &TileDistribution {
        &self.nullary
    }

    /// Index for contexts of `arity` steps (`1..=max_n`)
    pub fn index(&self, arity: usize) -> Option<&ContextIndex> {
        arity.checked_sub(1).and_then(|slot| self.indexes.get(slot))
    }

    /// Check a model that was decoded rather than built by [`Model::new`]
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `tile_size` or `max_n` is outside what [`Model::new`] accepts
    /// - There is not exactly one index per arity, each keyed by `3 * arity`
    ///   components
    /// - An index has broken node links
    /// - A stored tile has the wrong pixel count or a weight is not positive
    pub fn validate(&self) -> Result<()> {
        check_parameters(self.max_n, self.tile_size)?;

        if self.indexes.len() != self.max_n {
            return Err(invalid_parameter(
                "indexes",
                &self.indexes.len(),
                &format!("model of order {} needs one index per arity", self.max_n),
            ));
        }

        for (slot, index) in self.indexes.iter().enumerate() {
            let expected = (slot + 1) * COMPONENTS_PER_STEP;
            if index.dimensions() != expected {
                return Err(SynthesisError::DimensionMismatch {
                    expected,
                    actual: index.dimensions(),
                });
            }
            index.check_structure()?;
        }

        let tile_pixels = self.tile_size.saturating_mul(self.tile_size);
        let stored = self
            .indexes
            .iter()
            .flat_map(|index| index.iter().map(|(_, distribution)| distribution));
        for distribution in std::iter::once(&self.nullary).chain(stored) {
            for (tile, weight) in distribution.iter() {
                if tile.pixel_count() != tile_pixels {
                    return Err(invalid_parameter(
                        "tile",
                        &tile.pixel_count(),
                        &format!("model tiles hold {tile_pixels} pixels"),
                    ));
                }
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(invalid_parameter(
                        "weight",
                        &weight,
                        &"stored weights must be positive and finite",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Fold every position of `raster` into the model
    ///
    /// # Errors
    ///
    /// Returns an error if the raster has undefined positions or tiles of
    /// a different size than the model
    pub fn fit(&mut self, raster: &TileRaster) -> Result<FitSummary> {
        self.fit_with_progress(raster, |_| {})
    }

    /// Fit like [`Model::fit`], reporting the number of positions done
    ///
    /// # Errors
    ///
    /// Returns an error if the raster has undefined positions or tiles of
    /// a different size than the model
    pub fn fit_with_progress<F>(
        &mut self,
        raster: &TileRaster,
        mut on_progress: F,
    ) -> Result<FitSummary>
    where
        F: FnMut(usize),
    {
        if raster.tile_size() != self.tile_size {
            return Err(SynthesisError::InvalidSourceData {
                reason: format!(
                    "raster uses {0}x{0} tiles, model expects {1}x{1}",
                    raster.tile_size(),
                    self.tile_size
                ),
            });
        }

        let graph = Digraph::grid(raster.width(), raster.height())?;
        let mut summary = FitSummary::default();

        for vertex in graph.vertices() {
            let Some([x, y]) = graph.position(vertex) else {
                continue;
            };
            let observed = raster
                .get(x, y)
                .ok_or_else(|| SynthesisError::InvalidSourceData {
                    reason: format!("source raster has no tile at ({x}, {y})"),
                })?;

            let contexts = enumerate_contexts(
                &graph,
                vertex,
                self.max_n,
                ChainMode::AllPrefixes,
                |predecessor| {
                    graph
                        .position(predecessor)
                        .and_then(|[px, py]| raster.get(px, py))
                        .map(|tile| tile.average_color())
                },
            );

            for context in contexts {
                if self.observe(context, observed)? {
                    summary.new_contexts += 1;
                }
                summary.observations += 1;
            }

            summary.positions += 1;
            on_progress(summary.positions);
        }

        info!(
            "Fitted {}x{} raster: {} observations, {} new contexts",
            raster.width(),
            raster.height(),
            summary.observations,
            summary.new_contexts
        );
        Ok(summary)
    }

    // Returns whether the context was new to its index
    fn observe(&mut self, context: ContextVector, tile: &Tile) -> Result<bool> {
        let arity = context.arity();
        if arity == 0 {
            self.nullary.add(tile.clone());
            return Ok(false);
        }

        let index = self
            .indexes
            .get_mut(arity - 1)
            .ok_or(SynthesisError::DimensionMismatch {
                expected: self.max_n * COMPONENTS_PER_STEP,
                actual: context.as_slice().len(),
            })?;

        if let Some(distribution) = index.get_mut(context.as_slice())? {
            distribution.add(tile.clone());
            return Ok(false);
        }

        let mut distribution = TileDistribution::new();
        distribution.add(tile.clone());
        index.insert(context.into_inner(), distribution)?;
        Ok(true)
    }

    /// Sizes of the stored structures
    pub fn statistics(&self) -> ModelStatistics {
        ModelStatistics {
            nullary_tiles: self.nullary.len(),
            contexts_per_arity: self.indexes.iter().map(KdMap::len).collect(),
            depth_per_arity: self.indexes.iter().map(KdMap::depth).collect(),
        }
    }
}

fn check_parameters(max_n: usize, tile_size: usize) -> Result<()> {
    if tile_size == 0 {
        return Err(invalid_parameter(
            "tile_size",
            &tile_size,
            &"tiles must be at least one pixel wide",
        ));
    }
    if max_n > MAX_CONTEXT_LENGTH {
        return Err(invalid_parameter(
            "max_n",
            &max_n,
            &format!("context length is limited to {MAX_CONTEXT_LENGTH}"),
        ));
    }
    Ok(())
}
