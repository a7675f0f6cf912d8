//! Pipeline orchestrator: runs every resolution tier in order and hands back
//! the finished heightmap.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::dla::Dla;
use crate::error::DlaError;
use crate::heightfield::HeightField;
use crate::params::GenerationParams;

// ── Public structs ────────────────────────────────────────────────────────────

/// What one resolution tier produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierSummary {
    pub grid_size: usize,
    pub nodes_added: usize,
    pub total_nodes: usize,
    /// Deepest node depth after this tier's synthesis.
    pub max_depth: u32,
}

/// Full output of the generation pipeline.
pub struct GenerationResult {
    /// Final blurred heightmap, `2 × final grid size` on each side.
    pub heightfield: HeightField,
    pub node_count: usize,
    /// Grid size of the last tier.
    pub grid_size: usize,
    pub tiers: Vec<TierSummary>,
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// The main pipeline orchestrator.
pub struct HeightmapGenerator;

impl HeightmapGenerator {
    pub fn new() -> Self { Self }

    /// Run the full generation pipeline for the given parameters.
    ///
    /// Pipeline order, per tier:
    ///   1. Structural upscale (every tier but the first)
    ///   2. Aggregation
    ///   3. Image synthesis
    ///
    /// followed by one final blur. All randomness comes from a single
    /// `StdRng` seeded with `params.seed`, so equal params give equal output.
    pub fn generate(&self, params: &GenerationParams) -> Result<GenerationResult, DlaError> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut dla = Dla::new(params.grid_size)?;
        let mut tiers = Vec::with_capacity(params.tiers.len());

        for (i, &count) in params.tiers.iter().enumerate() {
            if i > 0 {
                dla.upscale(&params.jitter, &mut rng)?;
            }
            let added = dla.add_pixels(count, &params.walk, &mut rng)?;
            dla.synthesize_image(params.depth_policy, &mut rng)?;

            let summary = TierSummary {
                grid_size: dla.grid_size(),
                nodes_added: added.len(),
                total_nodes: dla.nodes().len(),
                max_depth: dla.tree().max_depth(),
            };
            debug!("tier {i}: {summary:?}");
            tiers.push(summary);
        }

        let heightfield = dla.finalize_texture(&mut rng);
        info!(
            "generated {0}x{0} heightmap from {1} nodes in {2} tiers",
            heightfield.width,
            dla.nodes().len(),
            tiers.len()
        );

        Ok(GenerationResult {
            heightfield,
            node_count: dla.nodes().len(),
            grid_size: dla.grid_size(),
            tiers,
        })
    }
}

impl Default for HeightmapGenerator {
    fn default() -> Self { Self::new() }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
