//! Diffusion-limited aggregation: particles random-walk on the grid until
//! they touch the aggregate, then stick as a new leaf.

use log::{debug, warn};
use rand::Rng;

use crate::coords::{GridPos, OFFSETS};
use crate::error::DlaError;
use crate::grid::Grid;
use crate::params::WalkBudget;
use crate::tree::{NodeId, Tree};

/// Grow the aggregate by `count` particles and return the new node ids in
/// placement order.
///
/// Each particle spawns on a uniformly random empty cell and walks until one
/// of its 4-neighbours is an occupied interior cell. A particle that has not
/// stuck after `budget.steps_for(size)` steps is respawned elsewhere, at most
/// `budget.max_restarts` times.
///
/// Fails up front with [`DlaError::CapacityExceeded`] if `count` exceeds the
/// empty cells a particle could stick on (see [`Grid::reachable_empty_count`]),
/// and with [`DlaError::WalkBudgetExhausted`] if a particle runs
/// out of restarts. Nodes placed before the failure stay in `tree` and `grid`.
pub fn add_pixels(
    tree: &mut Tree,
    grid: &mut Grid,
    count: usize,
    budget: &WalkBudget,
    rng: &mut impl Rng,
) -> Result<Vec<NodeId>, DlaError> {
    let available = grid.reachable_empty_count();
    if count > available {
        return Err(DlaError::CapacityExceeded { requested: count, available });
    }

    let max_steps = budget.steps_for(grid.size());
    let mut placed = Vec::with_capacity(count);

    for _ in 0..count {
        let mut attempts = 0;
        let id = loop {
            if let Some(id) = walk_particle(tree, grid, max_steps, rng) {
                break id;
            }
            if attempts >= budget.max_restarts {
                return Err(DlaError::WalkBudgetExhausted {
                    placed: placed.len(),
                    requested: count,
                });
            }
            attempts += 1;
            warn!(
                "particle {} wandered {max_steps} steps without sticking, respawning ({attempts}/{})",
                placed.len(),
                budget.max_restarts
            );
        };
        placed.push(id);
    }

    debug!(
        "aggregated {} pixels on {}x{} grid, {} nodes total",
        placed.len(),
        grid.size(),
        grid.size(),
        tree.len()
    );
    Ok(placed)
}

/// Walk one particle for at most `max_steps` steps. Returns the new node if
/// it stuck.
fn walk_particle(
    tree: &mut Tree,
    grid: &mut Grid,
    max_steps: usize,
    rng: &mut impl Rng,
) -> Option<NodeId> {
    let mut pos = random_empty_cell(grid, rng);

    for _ in 0..max_steps {
        if let Some(parent) = sticky_neighbor(grid, pos) {
            let id = tree.add_child(parent, pos);
            grid.set(pos, id);
            return Some(id);
        }
        pos = step_walker(grid, pos, rng);
    }
    None
}

/// One random 4-neighbour move, clamped to the grid.
///
/// Border cells never act as anchors, so a walker can bump into one. It
/// stays put rather than overlapping it.
fn step_walker(grid: &Grid, pos: GridPos, rng: &mut impl Rng) -> GridPos {
    let next = (pos + OFFSETS[rng.gen_range(0..OFFSETS.len())]).clamped(grid.size());
    if grid.is_occupied(next) {
        pos
    } else {
        next
    }
}

/// First occupied interior 4-neighbour of `pos`, in [`OFFSETS`] order.
fn sticky_neighbor(grid: &Grid, pos: GridPos) -> Option<NodeId> {
    let size = grid.size();
    OFFSETS
        .iter()
        .map(|&o| pos + o)
        .filter(|n| n.is_interior(size))
        .find_map(|n| grid.get(n))
}

/// Uniformly random unoccupied cell. The grid must have one.
fn random_empty_cell(grid: &Grid, rng: &mut impl Rng) -> GridPos {
    let size = grid.size() as i32;
    loop {
        let x = rng.gen_range(0..size);
        let y = rng.gen_range(0..size);
        let pos = GridPos::new(x, y);
        if !grid.is_occupied(pos) {
            return pos;
        }
    }
}
