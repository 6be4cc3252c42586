//! Model constants and runtime configuration defaults

// Context chains branch at every vertex with two predecessors, so the number
// of chains per position grows as 2^n
/// Default number of predecessor steps folded into a context
pub const DEFAULT_MAX_CONTEXT_LENGTH: usize = 2;
/// Largest accepted context length
pub const MAX_CONTEXT_LENGTH: usize = 8;

/// Default tile edge length in pixels
pub const DEFAULT_TILE_SIZE: usize = 1;

/// Numeric components contributed by each predecessor step (one RGB triple)
pub const COMPONENTS_PER_STEP: usize = 3;

/// Default radius for range searches against the context indexes
pub const DEFAULT_SEARCH_RADIUS: f64 = 2.0;

// Default output size when the command line leaves it out
/// Default generated width in tiles
pub const DEFAULT_WIDTH: usize = 100;
/// Default generated height in tiles
pub const DEFAULT_HEIGHT: usize = 50;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed raster dimension in tiles
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

// Output settings
/// Suffix added to generated image filenames
pub const OUTPUT_SUFFIX: &str = "_result";
/// Extension given to serialized models
pub const MODEL_EXTENSION: &str = "model";

// Progress bar display settings
/// Number of positions processed between progress bar redraws
pub const PROGRESS_UPDATE_INTERVAL: usize = 256;
