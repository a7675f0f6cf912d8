use serde::{Deserialize, Serialize};

use crate::error::DlaError;

/// Connector jitter during structural upscaling.
///
/// A draw `k` uniform in `1..=10` is made per connector: `k >= add_threshold`
/// shifts the connector along the perpendicular, `subtract_threshold <= k <
/// add_threshold` shifts it the other way, anything lower leaves it in place.
/// Use 11 for either threshold to disable that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterParams {
    pub add_threshold: u32,
    pub subtract_threshold: u32,
}

impl Default for JitterParams {
    fn default() -> Self {
        Self { add_threshold: 9, subtract_threshold: 7 }
    }
}

impl JitterParams {
    /// No jitter at all: connectors stay on the edge midpoints.
    pub fn none() -> Self {
        Self { add_threshold: 11, subtract_threshold: 11 }
    }

    pub fn validate(&self) -> Result<(), DlaError> {
        let range = 1..=11;
        if !range.contains(&self.add_threshold) || !range.contains(&self.subtract_threshold) {
            return Err(DlaError::InvalidParams(format!(
                "jitter thresholds must be in 1..=11, got add={} subtract={}",
                self.add_threshold, self.subtract_threshold
            )));
        }
        if self.subtract_threshold > self.add_threshold {
            return Err(DlaError::InvalidParams(format!(
                "subtract_threshold ({}) must not exceed add_threshold ({})",
                self.subtract_threshold, self.add_threshold
            )));
        }
        Ok(())
    }
}

/// Bounds the random walk of a single particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkBudget {
    /// Steps before the particle is respawned. `None` scales with the grid:
    /// `64 * size²`.
    pub max_walk_steps: Option<usize>,
    /// Respawns allowed per particle before `add_pixels` gives up.
    pub max_restarts: u32,
}

impl Default for WalkBudget {
    fn default() -> Self {
        Self { max_walk_steps: None, max_restarts: 8 }
    }
}

impl WalkBudget {
    pub fn steps_for(&self, size: usize) -> usize {
        self.max_walk_steps
            .unwrap_or_else(|| size.saturating_mul(size).saturating_mul(64))
    }

    pub fn validate(&self) -> Result<(), DlaError> {
        if self.max_walk_steps == Some(0) {
            return Err(DlaError::InvalidParams("max_walk_steps must be positive".into()));
        }
        Ok(())
    }
}

/// How node depths are derived from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthPolicy {
    /// True longest leaf path: `1 + max(children)`.
    #[default]
    LongestPath,
    /// Each leaf, in registry order, overwrites its ancestors with its own
    /// distance. Ancestors keep whatever the last leaf wrote.
    LastWrite,
}

/// Everything a full generation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub seed: u64,
    /// Grid side length of the first tier.
    pub grid_size: usize,
    /// Particles added at each resolution tier. The grid doubles between
    /// consecutive tiers.
    pub tiers: Vec<usize>,
    pub jitter: JitterParams,
    pub walk: WalkBudget,
    pub depth_policy: DepthPolicy,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 42,
            grid_size: 12,
            tiers: vec![12, 24, 9 * 24, 9 * 9 * 24, 3 * 9 * 9 * 24],
            jitter: JitterParams::default(),
            walk: WalkBudget::default(),
            depth_policy: DepthPolicy::default(),
        }
    }
}

impl GenerationParams {
    pub fn from_json(json: &str) -> Result<Self, DlaError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Grid side length once every tier has been grown.
    pub fn final_grid_size(&self) -> usize {
        let upscales = self.tiers.len().saturating_sub(1) as u32;
        self.grid_size << upscales
    }

    pub fn validate(&self) -> Result<(), DlaError> {
        if self.tiers.is_empty() {
            return Err(DlaError::InvalidParams("at least one tier is required".into()));
        }
        if self.grid_size < 3 {
            return Err(DlaError::InvalidGridSize {
                size: self.grid_size,
                reason: "need at least 3 cells per side",
            });
        }
        // Final image is twice the final grid, and cell counts are squared.
        let upscales = self.tiers.len() as u32;
        let fits = self
            .grid_size
            .checked_shl(upscales)
            .filter(|&s| s >> upscales == self.grid_size)
            .and_then(|s| s.checked_mul(s));
        if fits.is_none() {
            return Err(DlaError::InvalidGridSize {
                size: self.grid_size,
                reason: "too large for the requested number of tiers",
            });
        }
        self.jitter.validate()?;
        self.walk.validate()?;
        Ok(())
    }
}
