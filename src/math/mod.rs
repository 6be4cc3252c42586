//! Probability utilities for the model

/// Weighted tile multisets with proportional sampling
pub mod distribution;
