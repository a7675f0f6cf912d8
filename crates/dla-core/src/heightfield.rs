use serde::{Deserialize, Serialize};

/// A 2D heightfield of normalized intensities, row-major.
/// Row `r`, column `c` lives at `data[r * width + c]`; the engine uses the
/// grid's `x` as the row and `y` as the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightField {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl HeightField {
    /// Create a new HeightField filled with the given value.
    pub fn new(width: usize, height: usize, fill: f32) -> Self {
        Self { data: vec![fill; width * height], width, height }
    }

    /// Square field of zeros.
    pub fn flat(size: usize) -> Self {
        Self::new(size, size, 0.0)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        self.data[row * self.width + col] = val;
    }

    pub fn min_elevation(&self) -> f32 {
        self.data.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    pub fn max_elevation(&self) -> f32 {
        self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Copy rescaled so the lowest value maps to 0 and the highest to 1.
    /// A flat field maps to all zeros.
    pub fn normalized(&self) -> HeightField {
        let lo = self.min_elevation();
        let range = self.max_elevation() - lo;
        let data = if range > 0.0 {
            self.data.iter().map(|&v| (v - lo) / range).collect()
        } else {
            vec![0.0; self.data.len()]
        };
        HeightField { data, width: self.width, height: self.height }
    }

    /// Twice the resolution on both axes.
    ///
    /// Output pixel `(r, c)` averages the four source pixels at rows
    /// `⌊(r-1)/2⌋, ⌊r/2⌋` and columns `⌊(c-1)/2⌋, ⌊c/2⌋`, with `r-1` and
    /// `c-1` clamped to 0 on the first row and column.
    pub fn upscaled(&self) -> HeightField {
        let (w, h) = (self.width * 2, self.height * 2);
        let mut out = HeightField::new(w, h, 0.0);
        for r in 0..h {
            let mr = r / 2;
            let br = r.saturating_sub(1) / 2;
            for c in 0..w {
                let mc = c / 2;
                let bc = c.saturating_sub(1) / 2;
                let v = 0.25
                    * (self.get(br, bc) + self.get(br, mc) + self.get(mr, bc) + self.get(mr, mc));
                out.set(r, c, v);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn min_max_and_normalize() {
        let mut hf = HeightField::flat(2);
        hf.set(0, 0, 2.0);
        hf.set(1, 1, 6.0);
        assert_eq!(hf.min_elevation(), 0.0);
        assert_eq!(hf.max_elevation(), 6.0);

        let n = hf.normalized();
        assert_relative_eq!(n.get(0, 0), 1.0 / 3.0);
        assert_relative_eq!(n.get(1, 1), 1.0);
        assert_eq!(HeightField::new(3, 3, 5.0).normalized().max_elevation(), 0.0);
    }

    #[test]
    fn upscaled_doubles_dimensions() {
        let hf = HeightField::new(3, 3, 0.5);
        let up = hf.upscaled();
        assert_eq!((up.width, up.height), (6, 6));
        assert_eq!(up.data.len(), 36);
        for &v in &up.data {
            assert_relative_eq!(v, 0.5);
        }
    }

    #[test]
    fn upscaled_averages_neighbouring_sources() {
        // 2x2 source:
        //   1 0
        //   0 0
        let mut hf = HeightField::flat(2);
        hf.set(0, 0, 1.0);
        let up = hf.upscaled();

        // First row/column clamp onto source (0, 0).
        assert_relative_eq!(up.get(0, 0), 1.0);
        assert_relative_eq!(up.get(0, 1), 1.0);
        // (1, 2): rows {0, 0}, cols {0, 1} -> (1 + 0 + 1 + 0) / 4.
        assert_relative_eq!(up.get(1, 2), 0.5);
        // (2, 2): rows {0, 1}, cols {0, 1} -> 1 / 4.
        assert_relative_eq!(up.get(2, 2), 0.25);
        assert_relative_eq!(up.get(3, 3), 0.0);
    }
}
