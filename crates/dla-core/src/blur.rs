//! 3×3 convolution blur with freshly drawn weights for every pixel.
//!
//! Weights for diagonal, orthogonal and centre taps are `4·k/10`, `8·k/10`
//! and `16·k/10` with an independent `k ∈ 1..=10` each. The result is a
//! normalized weighted mean, so values stay within the input range.

use rand::Rng;

use crate::heightfield::HeightField;

/// Per-pixel tap weights.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Kernel {
    diagonal: f32,
    orthogonal: f32,
    center: f32,
}

impl Kernel {
    fn draw(rng: &mut impl Rng) -> Self {
        let mut unit = || rng.gen_range(1..=10u32) as f32 / 10.0;
        let diagonal = 4.0 * unit();
        let orthogonal = 8.0 * unit();
        let center = 16.0 * unit();
        Self { diagonal, orthogonal, center }
    }

    fn total(&self) -> f32 {
        4.0 * self.diagonal + 4.0 * self.orthogonal + self.center
    }
}

/// Blur `src` once, returning a new field of the same size.
/// Taps past the border reuse the centre row or column.
pub fn randomized_blur(src: &HeightField, rng: &mut impl Rng) -> HeightField {
    let (w, h) = (src.width, src.height);
    let mut out = HeightField::new(w, h, 0.0);

    for r in 0..h {
        let above = r.checked_sub(1).unwrap_or(r);
        let below = if r + 1 < h { r + 1 } else { r };
        for c in 0..w {
            let left = c.checked_sub(1).unwrap_or(c);
            let right = if c + 1 < w { c + 1 } else { c };

            let k = Kernel::draw(rng);
            let diagonal = src.get(above, left)
                + src.get(above, right)
                + src.get(below, left)
                + src.get(below, right);
            let orthogonal = src.get(above, c)
                + src.get(below, c)
                + src.get(r, left)
                + src.get(r, right);
            let v = (k.diagonal * diagonal + k.orthogonal * orthogonal + k.center * src.get(r, c))
                / k.total();
            out.set(r, c, v);
        }
    }
    out
}
