//! Square occupancy grid mapping cells to the node that sits on them.

use crate::coords::GridPos;
use crate::tree::{NodeId, Tree};

/// `size × size` cells, stored with index `x * size + y`.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<NodeId>>,
}

impl Grid {
    /// An empty grid.
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![None; size * size] }
    }

    /// A fresh grid of `size` with every node of `tree` registered at its
    /// position. Later nodes win if two share a cell.
    pub fn from_tree(size: usize, tree: &Tree) -> Self {
        let mut grid = Self::new(size);
        for (id, node) in tree.nodes.iter().enumerate() {
            grid.set(node.pos, id);
        }
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, pos: GridPos) -> usize {
        debug_assert!(pos.in_bounds(self.size), "{pos:?} outside {0}x{0} grid", self.size);
        pos.x as usize * self.size + pos.y as usize
    }

    /// Node at `pos`, or `None` for empty or off-grid cells.
    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<NodeId> {
        if pos.in_bounds(self.size) {
            self.cells[self.index(pos)]
        } else {
            None
        }
    }

    #[inline]
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.get(pos).is_some()
    }

    /// Register `id` at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is outside the grid.
    #[inline]
    pub fn set(&mut self, pos: GridPos, id: NodeId) {
        assert!(pos.in_bounds(self.size), "{pos:?} outside {0}x{0} grid", self.size);
        let i = self.index(pos);
        self.cells[i] = Some(id);
    }

    /// Empty the cell at `pos`. Off-grid positions are ignored.
    #[inline]
    pub fn clear(&mut self, pos: GridPos) {
        if pos.in_bounds(self.size) {
            let i = self.index(pos);
            self.cells[i] = None;
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.occupied_count()
    }

    /// Empty cells a walker could still stick on. The four corners have no
    /// interior neighbour, so they never count.
    pub fn reachable_empty_count(&self) -> usize {
        let last = self.size as i32 - 1;
        let empty_corners = [(0, 0), (0, last), (last, 0), (last, last)]
            .into_iter()
            .map(|(x, y)| GridPos::new(x, y))
            .filter(|&c| !self.is_occupied(c))
            .count();
        self.empty_count().saturating_sub(empty_corners)
    }

    /// All occupied cells as `(position, node)` pairs, in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (GridPos, NodeId)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|id| (GridPos::new((i / size) as i32, (i % size) as i32), id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ROOT;

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(5);
        assert_eq!(grid.size(), 5);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.empty_count(), 25);
    }

    #[test]
    fn reachable_count_skips_empty_corners() {
        let tree = Tree::new(GridPos::new(1, 1));
        let grid = Grid::from_tree(3, &tree);
        assert_eq!(grid.empty_count(), 8);
        assert_eq!(grid.reachable_empty_count(), 4);

        // An occupied corner is not subtracted twice.
        let tree = Tree::new(GridPos::new(0, 0));
        let grid = Grid::from_tree(5, &tree);
        assert_eq!(grid.empty_count(), 24);
        assert_eq!(grid.reachable_empty_count(), 21);
    }

    #[test]
    fn off_grid_lookups_are_empty() {
        let grid = Grid::new(5);
        assert_eq!(grid.get(GridPos::new(-1, 0)), None);
        assert_eq!(grid.get(GridPos::new(0, 5)), None);
    }

    #[test]
    fn from_tree_registers_every_node() {
        let mut tree = Tree::new(GridPos::new(2, 2));
        let a = tree.add_child(ROOT, GridPos::new(2, 3));
        let grid = Grid::from_tree(5, &tree);

        assert_eq!(grid.get(GridPos::new(2, 2)), Some(ROOT));
        assert_eq!(grid.get(GridPos::new(2, 3)), Some(a));
        let occupied: Vec<_> = grid.occupied().collect();
        assert_eq!(occupied, vec![(GridPos::new(2, 2), ROOT), (GridPos::new(2, 3), a)]);
    }

    #[test]
    #[should_panic]
    fn set_off_grid_panics() {
        let mut grid = Grid::new(3);
        grid.set(GridPos::new(3, 0), ROOT);
    }
}
