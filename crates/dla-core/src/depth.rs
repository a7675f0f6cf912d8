//! Node depth ("level"): how many nodes lie on the longest path from a node
//! down to a leaf, the node itself included. Leaves have depth 1.

use crate::params::DepthPolicy;
use crate::tree::{Tree, ROOT};

/// Recompute `depth` for every node of `tree` according to `policy`.
pub fn calculate_levels(tree: &mut Tree, policy: DepthPolicy) {
    for node in &mut tree.nodes {
        node.depth = 0;
    }
    if tree.is_empty() {
        return;
    }
    match policy {
        DepthPolicy::LongestPath => longest_path(tree),
        DepthPolicy::LastWrite => last_write(tree),
    }
}

/// Iterative post-order: a node is finished once all its children are.
fn longest_path(tree: &mut Tree) {
    let mut stack = vec![(ROOT, false)];
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            let deepest = tree.nodes[id]
                .children
                .iter()
                .map(|&c| tree.nodes[c].depth)
                .max()
                .unwrap_or(0);
            tree.nodes[id].depth = deepest + 1;
        } else {
            stack.push((id, true));
            stack.extend(tree.nodes[id].children.iter().map(|&c| (c, false)));
        }
    }
}

/// Every leaf walks to the root stamping its distance on each ancestor.
/// Ancestors shared by several leaves end up with the last leaf's count.
fn last_write(tree: &mut Tree) {
    let leaves: Vec<_> = tree.leaves().collect();
    for leaf in leaves {
        let mut level = 1;
        tree.nodes[leaf].depth = level;
        let mut cur = tree.nodes[leaf].parent;
        while let Some(id) = cur {
            level += 1;
            tree.nodes[id].depth = level;
            cur = tree.nodes[id].parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::add_pixels;
    use crate::coords::GridPos;
    use crate::grid::Grid;
    use crate::params::{JitterParams, WalkBudget};
    use crate::upscale::upscale;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// root ─ a ─ b ─ c
    ///   └─ d
    fn lopsided() -> Tree {
        let mut tree = Tree::new(GridPos::new(4, 4));
        let a = tree.add_child(ROOT, GridPos::new(5, 4));
        let b = tree.add_child(a, GridPos::new(6, 4));
        tree.add_child(b, GridPos::new(7, 4));
        tree.add_child(ROOT, GridPos::new(3, 4));
        tree
    }

    #[test]
    fn longest_path_takes_deepest_branch() {
        let mut tree = lopsided();
        calculate_levels(&mut tree, DepthPolicy::LongestPath);
        let depths: Vec<u32> = tree.nodes.iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![4, 3, 2, 1, 1]);
    }

    #[test]
    fn last_write_keeps_last_leaf_count() {
        // Leaf `d` (id 4) is visited last and overwrites the root with 2.
        let mut tree = lopsided();
        calculate_levels(&mut tree, DepthPolicy::LastWrite);
        let depths: Vec<u32> = tree.nodes.iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![2, 3, 2, 1, 1]);
    }

    #[test]
    fn single_root_is_a_leaf() {
        let mut tree = Tree::new(GridPos::new(1, 1));
        calculate_levels(&mut tree, DepthPolicy::LongestPath);
        assert_eq!(tree.root().depth, 1);
    }

    #[test]
    fn depth_exceeds_every_child_after_growth_and_upscale() {
        let mut tree = Tree::new(GridPos::new(8, 8));
        let mut grid = Grid::from_tree(16, &tree);
        let mut rng = StdRng::seed_from_u64(21);
        add_pixels(&mut tree, &mut grid, 50, &WalkBudget::default(), &mut rng).unwrap();
        upscale(&mut tree, 16, &JitterParams::default(), &mut rng).unwrap();

        calculate_levels(&mut tree, DepthPolicy::LongestPath);

        for (id, node) in tree.nodes.iter().enumerate() {
            if node.children.is_empty() {
                assert_eq!(node.depth, 1, "leaf {id}");
            }
            for &c in &node.children {
                assert!(node.depth >= tree.nodes[c].depth + 1, "node {id} not above child {c}");
            }
        }
    }

    #[test]
    fn recomputing_resets_stale_depths() {
        let mut tree = lopsided();
        for n in &mut tree.nodes {
            n.depth = 99;
        }
        calculate_levels(&mut tree, DepthPolicy::LongestPath);
        assert_eq!(tree.root().depth, 4);
    }
}
