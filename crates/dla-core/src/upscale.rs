//! Structural upscaling: doubles the grid and splits every edge of the tree
//! into two through a new connector node.
//!
//! A parent `p` and child `c` end up at `2p` and `2c`. The connector starts
//! on the midpoint `2p + (c - p)` and may be nudged one cell sideways so that
//! long branches do not come out perfectly straight.

use log::debug;
use rand::Rng;

use crate::coords::GridPos;
use crate::error::DlaError;
use crate::grid::Grid;
use crate::params::JitterParams;
use crate::tree::{NodeId, Tree, ROOT};

/// Resolution multiplier of one upscale. The midpoint construction only
/// works for 2.
pub const SCALE_FACTOR: i32 = 2;

/// One parent → child link, captured before any position changes.
struct Edge {
    parent: NodeId,
    child: NodeId,
    /// Midpoint on the doubled grid.
    base: GridPos,
    /// Sideways unit offset used for jitter.
    ortho: GridPos,
}

/// `size` after one upscale, or an error if it would overflow.
pub fn doubled_size(size: usize) -> Result<usize, DlaError> {
    size.checked_mul(SCALE_FACTOR as usize)
        .filter(|s| s.checked_mul(*s).is_some())
        .ok_or(DlaError::InvalidGridSize { size, reason: "cannot be doubled any further" })
}

/// Double the resolution of `tree`, which currently lives on a `size` grid,
/// and return the rebuilt grid for the new size.
///
/// Every original edge `p → c` becomes `p → k → c` for a fresh connector `k`,
/// and `p.children` keeps its order with each child replaced by its
/// connector. Jitter never moves a connector off the grid or onto an occupied
/// cell; such a connector stays on its midpoint instead.
pub fn upscale(
    tree: &mut Tree,
    size: usize,
    jitter: &JitterParams,
    rng: &mut impl Rng,
) -> Result<Grid, DlaError> {
    let new_size = doubled_size(size)?;
    let original_count = tree.len();
    let edges = collect_edges(tree);

    // Reserve every final position before jittering: scaled originals sit on
    // even/even cells and midpoints are unique per edge, so a connector can
    // always fall back to its own midpoint.
    let mut grid = Grid::new(new_size);
    for id in 0..original_count {
        let scaled = tree.nodes[id].pos * SCALE_FACTOR;
        tree.nodes[id].pos = scaled;
        grid.set(scaled, id);
    }

    let mut connectors = Vec::with_capacity(edges.len());
    for edge in &edges {
        debug_assert!(!grid.is_occupied(edge.base), "midpoint {:?} reserved twice", edge.base);
        let k = tree.push_detached(edge.base);
        grid.set(edge.base, k);
        connectors.push(k);
    }

    let mut jittered = 0usize;
    for (edge, &k) in edges.iter().zip(&connectors) {
        let draw = rng.gen_range(1..=10);
        let target = if draw >= jitter.add_threshold {
            edge.base + edge.ortho
        } else if draw >= jitter.subtract_threshold {
            edge.base - edge.ortho
        } else {
            continue;
        };
        if target.in_bounds(new_size) && !grid.is_occupied(target) {
            grid.clear(edge.base);
            grid.set(target, k);
            tree.nodes[k].pos = target;
            jittered += 1;
        }
    }

    for (edge, &k) in edges.iter().zip(&connectors) {
        if let Some(slot) = tree.nodes[edge.parent].children.iter_mut().find(|c| **c == edge.child) {
            *slot = k;
        }
        tree.nodes[k].parent = Some(edge.parent);
        tree.nodes[k].children.push(edge.child);
        tree.nodes[edge.child].parent = Some(k);
    }

    debug!(
        "upscaled grid {size} -> {new_size}: {} connectors ({jittered} jittered), {} nodes total",
        connectors.len(),
        tree.len()
    );
    Ok(grid)
}

/// Every edge reachable from the root, in depth-first pre-order of the
/// child, with pre-scale geometry resolved.
fn collect_edges(tree: &Tree) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(tree.len().saturating_sub(1));
    let mut stack: Vec<NodeId> = tree.nodes[ROOT].children.iter().rev().copied().collect();

    while let Some(child) = stack.pop() {
        let Some(parent) = tree.nodes[child].parent else { continue };
        let p = tree.nodes[parent].pos;
        let d = tree.nodes[child].pos - p;
        edges.push(Edge {
            parent,
            child,
            base: p * SCALE_FACTOR + d,
            ortho: d.swapped_unit(),
        });
        stack.extend(tree.nodes[child].children.iter().rev());
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::add_pixels;
    use crate::params::WalkBudget;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_grid_matches(tree: &Tree, grid: &Grid) {
        assert_eq!(grid.occupied_count(), tree.len(), "grid and tree disagree on node count");
        for (id, node) in tree.nodes.iter().enumerate() {
            assert_eq!(grid.get(node.pos), Some(id), "node {id} at {:?} not on grid", node.pos);
        }
    }

    #[test]
    fn root_with_two_children_gains_two_connectors() {
        let mut tree = Tree::new(GridPos::new(2, 2));
        let a = tree.add_child(ROOT, GridPos::new(3, 2));
        let b = tree.add_child(ROOT, GridPos::new(2, 1));
        let mut rng = StdRng::seed_from_u64(0);

        let grid = upscale(&mut tree, 5, &JitterParams::none(), &mut rng).unwrap();

        assert_eq!(grid.size(), 10);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root().pos, GridPos::new(4, 4));
        assert_eq!(tree.nodes[a].pos, GridPos::new(6, 4));
        assert_eq!(tree.nodes[b].pos, GridPos::new(4, 2));

        let ka = tree.nodes[a].parent.unwrap();
        let kb = tree.nodes[b].parent.unwrap();
        assert_eq!(tree.root().children, vec![ka, kb]);
        assert_eq!(tree.nodes[ka].pos, GridPos::new(5, 4));
        assert_eq!(tree.nodes[kb].pos, GridPos::new(4, 3));
        assert_eq!(tree.nodes[ka].children, vec![a]);
        assert_eq!(tree.distance_to_root(a), Some(2));
        assert_eq!(tree.distance_to_root(b), Some(2));
        assert_grid_matches(&tree, &grid);
    }

    #[test]
    fn forced_jitter_shifts_connector_sideways() {
        let mut tree = Tree::new(GridPos::new(2, 2));
        let a = tree.add_child(ROOT, GridPos::new(3, 2));
        let mut rng = StdRng::seed_from_u64(0);
        let always_add = JitterParams { add_threshold: 1, subtract_threshold: 1 };

        let grid = upscale(&mut tree, 5, &always_add, &mut rng).unwrap();

        let k = tree.nodes[a].parent.unwrap();
        assert_eq!(tree.nodes[k].pos, GridPos::new(5, 5));
        assert_grid_matches(&tree, &grid);
    }

    #[test]
    fn jitter_never_leaves_the_grid() {
        let mut tree = Tree::new(GridPos::new(0, 2));
        let a = tree.add_child(ROOT, GridPos::new(0, 3));
        let mut rng = StdRng::seed_from_u64(0);
        let always_subtract = JitterParams { add_threshold: 11, subtract_threshold: 1 };

        let grid = upscale(&mut tree, 5, &always_subtract, &mut rng).unwrap();

        let k = tree.nodes[a].parent.unwrap();
        assert_eq!(tree.nodes[k].pos, GridPos::new(0, 5));
        assert_grid_matches(&tree, &grid);
    }

    #[test]
    fn every_edge_gains_exactly_one_connector() {
        let c = 8;
        let mut tree = Tree::new(GridPos::new(c, c));
        let mut grid = Grid::from_tree(16, &tree);
        let mut rng = StdRng::seed_from_u64(11);
        add_pixels(&mut tree, &mut grid, 40, &WalkBudget::default(), &mut rng).unwrap();

        let before: Vec<(NodeId, NodeId)> = tree
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.parent.map(|p| (p, id)))
            .collect();
        let original_count = tree.len();

        let grid = upscale(&mut tree, 16, &JitterParams::default(), &mut rng).unwrap();

        assert_eq!(tree.len(), original_count + before.len());
        for (p, c) in before {
            let k = tree.nodes[c].parent.unwrap();
            assert!(k >= original_count, "edge {p}->{c} has no connector");
            assert_eq!(tree.ancestor(c, 2), Some(p));
            assert_eq!(tree.nodes[k].children, vec![c]);
            for end in [p, c] {
                let d = tree.nodes[end].pos - tree.nodes[k].pos;
                assert!(d.x.abs() <= 1 && d.y.abs() <= 1, "connector {k} not adjacent to {end}");
            }
        }
        for id in 0..tree.len() {
            assert!(tree.distance_to_root(id).is_some(), "node {id} detached after upscale");
        }
        assert_grid_matches(&tree, &grid);
    }

    #[test]
    fn repeated_upscales_keep_grid_consistent() {
        let mut tree = Tree::new(GridPos::new(6, 6));
        let mut grid = Grid::from_tree(12, &tree);
        let mut rng = StdRng::seed_from_u64(5);
        let walk = WalkBudget::default();
        for count in [12, 24, 48] {
            add_pixels(&mut tree, &mut grid, count, &walk, &mut rng).unwrap();
            grid = upscale(&mut tree, grid.size(), &JitterParams::default(), &mut rng).unwrap();
            assert_grid_matches(&tree, &grid);
        }
        assert_eq!(grid.size(), 96);
    }

    #[test]
    fn doubled_size_rejects_overflow() {
        assert_eq!(doubled_size(12).unwrap(), 24);
        assert!(matches!(doubled_size(usize::MAX / 2 + 1), Err(DlaError::InvalidGridSize { .. })));
    }
}
