//! Order-N Markov texture synthesis
//!
//! A reference image is cut into tiles and every tile is recorded against the
//! colors of the tiles on the predecessor chains leading to it. Contexts are
//! stored in one k-d tree per context length, so generation can gather
//! successors from near-miss contexts with a fixed-radius search.

#![forbid(unsafe_code)]

/// Model fitting, generation scheduling and execution
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Weighted tile distributions
pub mod math;
/// Spatial indexes, dependency graphs and tile rasters
pub mod spatial;

pub use io::error::{Result, SynthesisError};
