//! Integer grid coordinates.
//! Signed so that walk steps and offsets can go negative before clamping.

use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A cell position (or an offset between cells) on the aggregation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

/// The four unit steps of the random walk, in neighbor-check order.
pub const OFFSETS: [GridPos; 4] = [
    GridPos { x: 1, y: 0 },
    GridPos { x: 0, y: 1 },
    GridPos { x: -1, y: 0 },
    GridPos { x: 0, y: -1 },
];

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp both components to `[0, size - 1]`.
    pub fn clamped(self, size: usize) -> Self {
        let hi = size as i32 - 1;
        Self::new(self.x.clamp(0, hi), self.y.clamp(0, hi))
    }

    /// True if the position lies on a `size × size` grid.
    pub fn in_bounds(self, size: usize) -> bool {
        let s = size as i32;
        self.x >= 0 && self.x < s && self.y >= 0 && self.y < s
    }

    /// True if the position lies strictly inside the border ring.
    pub fn is_interior(self, size: usize) -> bool {
        let hi = size as i32 - 1;
        self.x > 0 && self.x < hi && self.y > 0 && self.y < hi
    }

    /// Components swapped, each reduced to its sign.
    ///
    /// For axis-aligned offsets this is the unit perpendicular. For diagonal
    /// offsets it points along the diagonal itself.
    pub fn swapped_unit(self) -> Self {
        Self::new(self.y.signum(), self.x.signum())
    }
}

impl Add for GridPos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for GridPos {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for GridPos {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for GridPos {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<i32> for GridPos {
    type Output = Self;
    fn mul(self, k: i32) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}
