//! 2D affine transforms.
//!
//! ```text
//! / a1 b1 c1 \   / x \   / x' \
//! | a2 b2 c2 | x | y | = | y' |
//! \  0  0  1 /   \ 1 /   \ 1  /
//! ```

use std::ops::Mul;

/// A 2x3 affine matrix mapping `(x, y)` to `(x', y')`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a1: f64,
    pub b1: f64,
    pub c1: f64,
    pub a2: f64,
    pub b2: f64,
    pub c2: f64,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0);

    pub const fn new(a1: f64, b1: f64, c1: f64, a2: f64, b2: f64, c2: f64) -> Self {
        Self {
            a1,
            b1,
            c1,
            a2,
            b2,
            c2,
        }
    }

    /// Translation by `(dx, dy)`.
    pub fn shift(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, dx, 0.0, 1.0, dy)
    }

    /// Axis-aligned scale about the origin.
    pub fn scale(kx: f64, ky: f64) -> Self {
        Self::new(kx, 0.0, 0.0, 0.0, ky, 0.0)
    }

    /// Rotation about the origin by `radians`.
    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, -sin, 0.0, sin, cos, 0.0)
    }

    /// `shift(cx, cy) * self * shift(-cx, -cy)`: apply `self` about `(cx, cy)`.
    pub fn about(self, cx: f64, cy: f64) -> Self {
        Self::shift(cx, cy) * self * Self::shift(-cx, -cy)
    }

    /// Map a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a1 * x + self.b1 * y + self.c1,
            self.a2 * x + self.b2 * y + self.c2,
        )
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Matrix product. `(a * b).apply(p) == a.apply(b.apply(p))`: the right
/// operand is applied to the point first.
impl Mul for AffineTransform {
    type Output = AffineTransform;

    fn mul(self, t: AffineTransform) -> AffineTransform {
        AffineTransform::new(
            self.a1 * t.a1 + self.b1 * t.a2,
            self.a1 * t.b1 + self.b1 * t.b2,
            self.a1 * t.c1 + self.b1 * t.c2 + self.c1,
            self.a2 * t.a1 + self.b2 * t.a2,
            self.a2 * t.b1 + self.b2 * t.b2,
            self.a2 * t.c1 + self.b2 * t.c2 + self.c2,
        )
    }
}
