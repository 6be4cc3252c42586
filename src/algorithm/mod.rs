/// Raster generation driven by the fitted model
pub mod executor;
/// Markov model storage and fitting
pub mod model;
/// Fewest-pending-predecessor generation order
pub mod scheduler;
