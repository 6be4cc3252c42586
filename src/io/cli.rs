//! Command-line interface for fitting models and generating textures

use crate::algorithm::executor::{EmptyContextPolicy, GenerationConfig, Synthesizer};
use crate::algorithm::model::Model;
use crate::io::configuration::{
    DEFAULT_HEIGHT, DEFAULT_MAX_CONTEXT_LENGTH, DEFAULT_SEARCH_RADIUS, DEFAULT_SEED,
    DEFAULT_TILE_SIZE, DEFAULT_WIDTH, MODEL_EXTENSION, OUTPUT_SUFFIX,
};
use crate::io::error::Result;
use crate::io::image::{export_raster_as_png, load_tile_raster};
use crate::io::persistence::{load_model, save_model};
use crate::io::progress::ProgressManager;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "markovtex")]
#[command(
    author,
    version,
    about = "Fit order-N Markov texture models and generate new images from them"
)]
/// Command-line arguments for the texture synthesis tool
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Available operations
#[derive(Subcommand)]
pub enum Command {
    /// Build a model from a reference image
    Fit(FitArgs),
    /// Generate an image from a saved model
    Generate(GenerateArgs),
}

/// Arguments of `fit`
#[derive(Args)]
pub struct FitArgs {
    /// Reference image to learn from
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the model (defaults to <INPUT stem>.model)
    #[arg(value_name = "MODEL")]
    pub model: Option<PathBuf>,

    /// Longest predecessor context to record
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_CONTEXT_LENGTH)]
    pub max_n: usize,

    /// Tile edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: usize,
}

impl FitArgs {
    /// Model destination, explicit or derived from the input
    pub fn model_path(&self) -> PathBuf {
        self.model
            .clone()
            .unwrap_or_else(|| self.input.with_extension(MODEL_EXTENSION))
    }
}

/// Arguments of `generate`
#[derive(Args)]
pub struct GenerateArgs {
    /// Model produced by `fit`
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Output width in tiles
    #[arg(value_name = "WIDTH", default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Output height in tiles
    #[arg(value_name = "HEIGHT", default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Output image (defaults to <MODEL stem>_result.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Context matching radius
    #[arg(short, long, default_value_t = DEFAULT_SEARCH_RADIUS)]
    pub radius: f64,

    /// Fallback when no stored context matches
    #[arg(long, value_enum, default_value_t = EmptyContextPolicy::BackOff)]
    pub on_empty: EmptyContextPolicy,
}

impl GenerateArgs {
    /// Image destination, explicit or derived from the model path
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| get_output_path(&self.model))
    }

    /// Generation parameters taken from the flags
    pub const fn config(&self) -> GenerationConfig {
        GenerationConfig {
            search_radius: self.radius,
            empty_context_policy: self.on_empty,
        }
    }
}

/// Runs the parsed command with optional progress display
pub struct CommandRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CommandRunner {
    /// Create a runner for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Execute the selected command
    ///
    /// # Errors
    ///
    /// Returns an error if loading, fitting, generating or saving fails
    pub fn run(&mut self) -> Result<()> {
        match &self.cli.command {
            Command::Fit(args) => Self::fit(args, self.progress_manager.as_mut()),
            Command::Generate(args) => Self::generate(args, self.progress_manager.as_mut()),
        }
    }

    fn fit(args: &FitArgs, mut progress: Option<&mut ProgressManager>) -> Result<()> {
        let start_time = Instant::now();
        let raster = load_tile_raster(&args.input, args.tile_size)?;
        let mut model = Model::new(args.max_n, args.tile_size)?;

        if let Some(pm) = progress.as_deref_mut() {
            pm.start_phase("fit", raster.width() * raster.height());
        }
        model.fit_with_progress(&raster, |done| {
            if let Some(pm) = progress.as_deref() {
                pm.update(done);
            }
        })?;
        if let Some(pm) = progress.as_deref_mut() {
            pm.finish_phase();
        }

        let model_path = args.model_path();
        save_model(&model, &model_path)?;

        let statistics = model.statistics();
        info!(
            "Saved model to {} in {:.2?}: {} nullary tiles, contexts per arity {:?}, index depth per arity {:?}",
            model_path.display(),
            start_time.elapsed(),
            statistics.nullary_tiles,
            statistics.contexts_per_arity,
            statistics.depth_per_arity
        );
        Ok(())
    }

    fn generate(args: &GenerateArgs, mut progress: Option<&mut ProgressManager>) -> Result<()> {
        let start_time = Instant::now();
        let model = load_model(&args.model)?;
        let mut synthesizer =
            Synthesizer::new(&model, args.width, args.height, args.config(), args.seed)?;

        let total = args.width * args.height;
        if let Some(pm) = progress.as_deref_mut() {
            pm.start_phase("generate", total);
        }
        while synthesizer.execute_iteration()? {
            if let Some(pm) = progress.as_deref() {
                pm.update(total - synthesizer.remaining());
            }
        }
        if let Some(pm) = progress.as_deref_mut() {
            pm.finish_phase();
        }

        let report = synthesizer.report();
        let output_path = args.output_path();
        export_raster_as_png(synthesizer.output(), &output_path)?;

        info!(
            "Wrote {} in {:.2?}: {} positions, {} fallbacks, {} undefined",
            output_path.display(),
            start_time.elapsed(),
            report.generated,
            report.backoffs,
            report.undefined
        );
        Ok(())
    }
}

/// Default image path for a model: `<stem>_result.png` beside it
pub fn get_output_path(model_path: &Path) -> PathBuf {
    let stem = model_path.file_stem().unwrap_or_default();
    let output_name = format!("{}{}.png", stem.to_string_lossy(), OUTPUT_SUFFIX);

    if let Some(parent) = model_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}
