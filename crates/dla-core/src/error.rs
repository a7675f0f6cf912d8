//! Error type shared by every fallible operation of the engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DlaError {
    /// Grid too small to hold an interior cell, or too large to double.
    #[error("invalid grid size {size}: {reason}")]
    InvalidGridSize { size: usize, reason: &'static str },

    /// More particles requested than there are empty cells on the grid.
    #[error("cannot add {requested} pixels: only {available} empty cells left")]
    CapacityExceeded { requested: usize, available: usize },

    /// A particle used up every walk budget and restart without sticking.
    /// The `placed` particles before it are kept in the tree.
    #[error("random walk budget exhausted after placing {placed} of {requested} pixels")]
    WalkBudgetExhausted { placed: usize, requested: usize },

    /// Image synthesis was run twice without an `upscale` in between.
    #[error("image is {image}x{image} but grid is {grid}x{grid}; upscale the grid first")]
    ResolutionMismatch { grid: usize, image: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("malformed parameter JSON: {0}")]
    Json(#[from] serde_json::Error),
}
