//! Heightmap synthesis: turns node depths into intensities, folds them into
//! the accumulated image, then doubles and smooths the image for the next
//! tier.

use log::debug;
use rand::Rng;

use crate::blur::randomized_blur;
use crate::depth::calculate_levels;
use crate::error::DlaError;
use crate::grid::Grid;
use crate::heightfield::HeightField;
use crate::params::DepthPolicy;
use crate::tree::Tree;

/// Weight of the previously accumulated value in [`blend`].
const CARRY_WEIGHT: f32 = 1.25;

/// Map a node depth to `[0, 1)`; deeper nodes approach 1.
#[inline]
pub fn depth_intensity(depth: u32) -> f32 {
    1.0 - 1.0 / (1.0 + 0.5 * depth as f32)
}

/// Fold a fresh sample `v` into the accumulated value `old`. Later passes
/// (larger `step`) weigh new samples less.
#[inline]
pub fn blend(old: f32, v: f32, step: u32) -> f32 {
    1.0 - 1.0 / (1.0 + v / step as f32 + CARRY_WEIGHT * old)
}

/// Blend the current tree into `image` in place. Empty cells sample 0.
///
/// `image` must already match the grid resolution and depths must be fresh.
pub fn blend_tree(image: &mut HeightField, tree: &Tree, grid: &Grid, step: u32) {
    let size = grid.size();
    debug_assert_eq!((image.width, image.height), (size, size));
    let mut samples = vec![0.0f32; size * size];
    for (pos, id) in grid.occupied() {
        samples[pos.x as usize * size + pos.y as usize] = depth_intensity(tree.nodes[id].depth);
    }
    for (px, v) in image.data.iter_mut().zip(samples) {
        *px = blend(*px, v, step);
    }
}

/// Advance the accumulated image by one tier.
///
/// Recomputes depths, blends them in at the grid resolution, then returns
/// the image doubled and blurred once. `step` counts completed tiers plus
/// one and is read, not incremented.
pub fn advance_image(
    image: &HeightField,
    tree: &mut Tree,
    grid: &Grid,
    step: u32,
    policy: DepthPolicy,
    rng: &mut impl Rng,
) -> Result<HeightField, DlaError> {
    let size = grid.size();
    if image.width != size || image.height != size {
        return Err(DlaError::ResolutionMismatch { grid: size, image: image.width });
    }

    calculate_levels(tree, policy);

    let mut blended = image.clone();
    blend_tree(&mut blended, tree, grid, step);

    let out = randomized_blur(&blended.upscaled(), rng);
    debug!(
        "synthesized tier {step}: {size}x{size} -> {0}x{0}, max depth {1}",
        out.width,
        tree.max_depth()
    );
    Ok(out)
}
