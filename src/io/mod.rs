/// Command-line interface
pub mod cli;
/// Default parameters and limits
pub mod configuration;
/// Error types
pub mod error;
/// Raster loading and export
pub mod image;
/// Model serialization
pub mod persistence;
/// Terminal progress display
pub mod progress;
