//! The aggregation model: tree, grid and accumulated heightmap, advanced one
//! operation at a time by a driver.
//!
//! A typical run alternates `add_pixels` and `synthesize_image`, with an
//! `upscale` before every tier but the first, and ends with
//! `finalize_texture`:
//!
//! ```
//! use dla_core::dla::Dla;
//! use dla_core::params::{DepthPolicy, JitterParams, WalkBudget};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut dla = Dla::new(12).unwrap();
//! dla.add_pixels(12, &WalkBudget::default(), &mut rng).unwrap();
//! dla.synthesize_image(DepthPolicy::LongestPath, &mut rng).unwrap();
//! dla.upscale(&JitterParams::default(), &mut rng).unwrap();
//! dla.add_pixels(24, &WalkBudget::default(), &mut rng).unwrap();
//! dla.synthesize_image(DepthPolicy::LongestPath, &mut rng).unwrap();
//! let texture = dla.finalize_texture(&mut rng);
//! assert_eq!(texture.width, 48);
//! ```

use rand::Rng;

use crate::aggregation;
use crate::blur::randomized_blur;
use crate::coords::GridPos;
use crate::error::DlaError;
use crate::grid::Grid;
use crate::heightfield::HeightField;
use crate::params::{DepthPolicy, JitterParams, WalkBudget};
use crate::synthesis::advance_image;
use crate::tree::{Node, NodeId, Tree};
use crate::upscale;

#[derive(Debug, Clone)]
pub struct Dla {
    tree: Tree,
    grid: Grid,
    image: HeightField,
    /// Tiers synthesized so far, plus one.
    step: u32,
}

impl Dla {
    /// A `grid_size` grid holding a single seed at its centre, and a blank
    /// image of the same size.
    pub fn new(grid_size: usize) -> Result<Self, DlaError> {
        if grid_size < 3 {
            return Err(DlaError::InvalidGridSize {
                size: grid_size,
                reason: "need at least 3 cells per side",
            });
        }
        if i32::try_from(grid_size).is_err() || grid_size.checked_mul(grid_size).is_none() {
            return Err(DlaError::InvalidGridSize { size: grid_size, reason: "too large" });
        }
        let center = (grid_size / 2) as i32;
        let tree = Tree::new(GridPos::new(center, center));
        let grid = Grid::from_tree(grid_size, &tree);
        Ok(Self { tree, grid, image: HeightField::flat(grid_size), step: 1 })
    }

    /// Grow the aggregate by `count` pixels. See [`aggregation::add_pixels`].
    pub fn add_pixels(
        &mut self,
        count: usize,
        budget: &WalkBudget,
        rng: &mut impl Rng,
    ) -> Result<Vec<NodeId>, DlaError> {
        aggregation::add_pixels(&mut self.tree, &mut self.grid, count, budget, rng)
    }

    /// Double the grid, splitting every edge through a connector.
    /// See [`upscale::upscale`].
    pub fn upscale(&mut self, jitter: &JitterParams, rng: &mut impl Rng) -> Result<(), DlaError> {
        let size = self.grid.size();
        if i32::try_from(upscale::doubled_size(size)?).is_err() {
            return Err(DlaError::InvalidGridSize { size, reason: "cannot be doubled any further" });
        }
        self.grid = upscale::upscale(&mut self.tree, size, jitter, rng)?;
        Ok(())
    }

    /// Fold the current tree into the heightmap and move the image to the
    /// next resolution. Must be called once per grid resolution.
    pub fn synthesize_image(&mut self, policy: DepthPolicy, rng: &mut impl Rng) -> Result<(), DlaError> {
        self.image = advance_image(&self.image, &mut self.tree, &self.grid, self.step, policy, rng)?;
        self.step += 1;
        Ok(())
    }

    /// A final blurred copy of the heightmap, ready for upload. The
    /// accumulated image is left untouched.
    pub fn finalize_texture(&self, rng: &mut impl Rng) -> HeightField {
        randomized_blur(&self.image, rng)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.tree.nodes
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn image(&self) -> &HeightField {
        &self.image
    }

    pub fn grid_size(&self) -> usize {
        self.grid.size()
    }

    pub fn image_size(&self) -> usize {
        self.image.width
    }

    pub fn step(&self) -> u32 {
        self.step
    }
}
