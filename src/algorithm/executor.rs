//! Raster generation from a fitted model
//!
//! Each iteration takes the next vertex from the scheduler, gathers the
//! longest available contexts from already generated neighbours, merges
//! every distribution found near those contexts and samples one tile.

use crate::{
    algorithm::model::Model,
    algorithm::scheduler::PriorityScheduler,
    io::configuration::{DEFAULT_SEARCH_RADIUS, DEFAULT_SEED, MAX_GRID_DIMENSION},
    io::error::{Result, SynthesisError, invalid_parameter},
    math::distribution::TileDistribution,
    spatial::context::{ChainMode, ContextVector, enumerate_contexts},
    spatial::graph::{Digraph, VertexId},
    spatial::tiles::TileRaster,
};
use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

/// What to do when no stored context lies near the observed one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EmptyContextPolicy {
    /// Retry with progressively shorter contexts, then the empty context
    #[default]
    BackOff,
    /// Fall straight back to the empty-context distribution
    Nullary,
    /// Leave the position undefined
    Skip,
}

/// Generation parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationConfig {
    /// Euclidean radius used when matching contexts
    pub search_radius: f64,
    /// Fallback when the matched contexts are all empty
    pub empty_context_policy: EmptyContextPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS,
            empty_context_policy: EmptyContextPolicy::default(),
        }
    }
}

impl GenerationConfig {
    /// Check the parameters before a run
    ///
    /// # Errors
    ///
    /// Returns an error if the search radius is not positive and finite
    pub fn validate(&self) -> Result<()> {
        if self.search_radius.is_finite() && self.search_radius > 0.0 {
            Ok(())
        } else {
            Err(invalid_parameter(
                "search_radius",
                &self.search_radius,
                &"radius must be positive to tolerate averaging noise",
            ))
        }
    }
}

/// Outcome counts of a generation run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Vertices processed
    pub generated: usize,
    /// Positions left without a tile
    pub undefined: usize,
    /// Positions that needed the empty-context policy
    pub backoffs: usize,
}

/// Drives one generation run over a fresh raster
pub struct Synthesizer<'a> {
    model: &'a Model,
    config: GenerationConfig,
    graph: Digraph,
    scheduler: PriorityScheduler,
    output: TileRaster,
    rng: StdRng,
    report: GenerationReport,
}

impl<'a> Synthesizer<'a> {
    /// Prepare a `width x height` run seeded with `seed`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either dimension is zero or above the allowed maximum
    /// - The configuration is invalid
    pub fn new(
        model: &'a Model,
        width: usize,
        height: usize,
        config: GenerationConfig,
        seed: u64,
    ) -> Result<Self> {
        for (parameter, value) in [("width", width), ("height", height)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        config.validate()?;

        let graph = Digraph::grid(width, height)?;
        let scheduler = PriorityScheduler::new(&graph);
        let output = TileRaster::new(width, height, model.tile_size())?;

        Ok(Self {
            model,
            config,
            graph,
            scheduler,
            output,
            rng: StdRng::seed_from_u64(seed),
            report: GenerationReport::default(),
        })
    }

    /// Generate one position; returns `false` once nothing is left
    ///
    /// # Errors
    ///
    /// Returns an error if a context lookup or graph update fails
    pub fn execute_iteration(&mut self) -> Result<bool> {
        let Some(vertex) = self.scheduler.next_vertex() else {
            return Ok(false);
        };
        let [x, y] = self
            .graph
            .position(vertex)
            .ok_or(SynthesisError::MissingVertex {
                vertex: vertex.index(),
            })?;

        let contexts = self.contexts_for(vertex);
        let mut accumulator = self.merge_matches(&contexts)?;

        if accumulator.is_empty() {
            self.report.backoffs += 1;
            accumulator = self.fallback(&contexts)?;
            debug!(
                "No context match at ({x}, {y}), applied {:?}",
                self.config.empty_context_policy
            );
        }

        match accumulator.choose_randomly(&mut self.rng) {
            Some(tile) => self.output.set(x, y, tile.clone())?,
            None => {
                self.report.undefined += 1;
                warn!("Position ({x}, {y}) left undefined");
            }
        }

        self.scheduler.complete(&mut self.graph, vertex)?;
        self.report.generated += 1;
        Ok(true)
    }

    /// Generate every remaining position
    ///
    /// # Errors
    ///
    /// Returns an error if any iteration fails
    pub fn run(&mut self) -> Result<GenerationReport> {
        while self.execute_iteration()? {}

        info!(
            "Generated {}x{} raster: {} positions, {} fallbacks, {} undefined",
            self.output.width(),
            self.output.height(),
            self.report.generated,
            self.report.backoffs,
            self.report.undefined
        );
        Ok(self.report)
    }

    /// Positions not yet generated
    pub fn remaining(&self) -> usize {
        self.scheduler.remaining()
    }

    /// Counts so far
    pub const fn report(&self) -> GenerationReport {
        self.report
    }

    /// Raster generated so far
    pub const fn output(&self) -> &TileRaster {
        &self.output
    }

    /// Finish the run and take the raster
    pub fn into_raster(self) -> TileRaster {
        self.output
    }

    fn contexts_for(&self, vertex: VertexId) -> Vec<ContextVector> {
        let graph = &self.graph;
        let output = &self.output;
        enumerate_contexts(
            graph,
            vertex,
            self.model.max_n(),
            ChainMode::LongestOnly,
            |predecessor| {
                if !graph.is_generated(predecessor) {
                    return None;
                }
                graph
                    .position(predecessor)
                    .and_then(|[px, py]| output.get(px, py))
                    .map(|tile| tile.average_color())
            },
        )
    }

    fn merge_matches(&self, contexts: &[ContextVector]) -> Result<TileDistribution> {
        let mut accumulator = TileDistribution::new();
        for context in contexts {
            self.merge_context(&mut accumulator, context)?;
        }
        Ok(accumulator)
    }

    fn merge_context(
        &self,
        accumulator: &mut TileDistribution,
        context: &ContextVector,
    ) -> Result<()> {
        let arity = context.arity();
        if arity == 0 {
            return accumulator.add_all(self.model.nullary(), 1.0);
        }

        let Some(index) = self.model.index(arity) else {
            return Ok(());
        };
        let matches = index.range_search(context.as_slice(), self.config.search_radius)?;
        for distribution in matches {
            accumulator.add_all(distribution, 1.0)?;
        }
        Ok(())
    }

    fn fallback(&self, contexts: &[ContextVector]) -> Result<TileDistribution> {
        let mut accumulator = TileDistribution::new();

        match self.config.empty_context_policy {
            EmptyContextPolicy::Skip => {}
            EmptyContextPolicy::Nullary => {
                accumulator.add_all(self.model.nullary(), 1.0)?;
            }
            EmptyContextPolicy::BackOff => {
                let longest = contexts.iter().map(ContextVector::arity).max().unwrap_or(0);
                for arity in (1..longest).rev() {
                    let mut shortened: Vec<ContextVector> = Vec::new();
                    for context in contexts.iter().filter(|context| context.arity() > arity) {
                        let prefix = context.prefix(arity);
                        if !shortened.contains(&prefix) {
                            shortened.push(prefix);
                        }
                    }
                    for context in &shortened {
                        self.merge_context(&mut accumulator, context)?;
                    }
                    if !accumulator.is_empty() {
                        break;
                    }
                }
                if accumulator.is_empty() {
                    accumulator.add_all(self.model.nullary(), 1.0)?;
                }
            }
        }

        Ok(accumulator)
    }
}

impl Model {
    /// Generate a `width x height` raster with the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are invalid or generation fails
    pub fn generate(&self, width: usize, height: usize) -> Result<TileRaster> {
        self.generate_with(width, height, GenerationConfig::default(), DEFAULT_SEED)
            .map(|(raster, _)| raster)
    }

    /// Generate a raster with explicit configuration and seed
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions or configuration are invalid or
    /// generation fails
    pub fn generate_with(
        &self,
        width: usize,
        height: usize,
        config: GenerationConfig,
        seed: u64,
    ) -> Result<(TileRaster, GenerationReport)> {
        let mut synthesizer = Synthesizer::new(self, width, height, config, seed)?;
        let report = synthesizer.run()?;
        Ok((synthesizer.into_raster(), report))
    }
}
