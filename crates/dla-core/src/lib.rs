//! Heightmap generation by diffusion-limited aggregation.
//!
//! A single seed grows into a branching tree of grid cells. The tree is
//! repeatedly doubled in resolution and grown further, and after each tier
//! its depth structure is folded into a smoothed grayscale heightmap.
//!
//! Main components:
//! - [`tree`]: node arena with parent/child links.
//! - [`grid`]: cell occupancy lookup.
//! - [`aggregation`]: random-walk growth.
//! - [`upscale`]: structural doubling with jittered connectors.
//! - [`depth`]: per-node depth ("level") computation.
//! - [`synthesis`] and [`blur`]: depth-to-image blending and smoothing.
//! - [`dla`]: the step-by-step model API.
//! - [`generator`]: the full tiered pipeline.
//! - [`params`]: configuration.

pub mod aggregation;
pub mod blur;
pub mod coords;
pub mod depth;
pub mod dla;
pub mod error;
pub mod generator;
pub mod grid;
pub mod heightfield;
pub mod params;
pub mod synthesis;
pub mod tree;
pub mod upscale;

pub use dla::Dla;
pub use error::DlaError;
pub use generator::{GenerationResult, HeightmapGenerator, TierSummary};
pub use heightfield::HeightField;
pub use params::{DepthPolicy, GenerationParams, JitterParams, WalkBudget};
