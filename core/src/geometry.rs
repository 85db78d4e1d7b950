//! Planar geometry used by the collision sweep and the facing logic.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

const ROOT_ITERATIONS: usize = 96;

/// Angle in radians that is always kept within `[0, 2π)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Rotation(f32);

impl Rotation {
    /// Creates a rotation, wrapping the angle into `[0, 2π)`.
    #[must_use]
    pub fn from_radians(radians: f32) -> Self {
        if !radians.is_finite() {
            return Self(0.0);
        }
        let wrapped = radians.rem_euclid(TAU);
        // rem_euclid may round up to exactly TAU for tiny negative inputs.
        if wrapped >= TAU {
            Self(0.0)
        } else {
            Self(wrapped)
        }
    }

    /// Rotation of the vector pointing from `from` towards `to`.
    ///
    /// Screen coordinates are assumed, so a positive angle turns from the
    /// positive x axis towards the positive (downward) y axis.
    #[must_use]
    pub fn toward(from: Vec2, to: Vec2) -> Self {
        let delta = to - from;
        Self::from_radians(delta.y.atan2(delta.x))
    }

    /// Angle expressed in radians.
    #[must_use]
    pub const fn radians(&self) -> f32 {
        self.0
    }

    /// Unit vector pointing along the rotation.
    #[must_use]
    pub fn unit(&self) -> Vec2 {
        Vec2::new(self.0.cos(), self.0.sin())
    }
}

/// One of the eight sprite facings, numbered clockwise on screen starting at south.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction8(u8);

impl Direction8 {
    /// Number of discrete facings.
    pub const COUNT: usize = 8;

    /// Facing towards the bottom of the screen.
    pub const SOUTH: Self = Self(0);

    /// Discretises a rotation into the facing used to pick sprites and muzzle offsets.
    #[must_use]
    pub fn from_rotation(rotation: Rotation) -> Self {
        let character = Rotation::from_radians(-rotation.radians() + FRAC_PI_2);
        for slice in 0..Self::COUNT {
            let upper = (slice as f32 + 1.0) * FRAC_PI_4 - FRAC_PI_8;
            if character.radians() < upper {
                return Self(slice as u8);
            }
        }
        Self::SOUTH
    }

    /// Index in `0..8`, usable against per-direction tables.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Collision area of an entity.
///
/// Both variants are axis aligned and described by their top-left corner and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Rectangle spanning `min..min + size`.
    Rect {
        /// Top-left corner.
        min: Vec2,
        /// Width and height.
        size: Vec2,
    },
    /// Ellipse inscribed into the rectangle spanning `min..min + size`.
    Ellipse {
        /// Top-left corner of the bounding box.
        min: Vec2,
        /// Width and height of the bounding box.
        size: Vec2,
    },
}

impl Shape {
    /// Rectangle anchored at the provided corner.
    #[must_use]
    pub const fn rect(min: Vec2, size: Vec2) -> Self {
        Self::Rect { min, size }
    }

    /// Ellipse inscribed in the rectangle anchored at the provided corner.
    #[must_use]
    pub const fn ellipse(min: Vec2, size: Vec2) -> Self {
        Self::Ellipse { min, size }
    }

    /// Top-left corner of the bounding box.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        match self {
            Self::Rect { min, .. } | Self::Ellipse { min, .. } => *min,
        }
    }

    /// Size of the bounding box.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        match self {
            Self::Rect { size, .. } | Self::Ellipse { size, .. } => *size,
        }
    }

    /// Centre of the bounding box.
    #[must_use]
    pub fn centre(&self) -> Vec2 {
        self.min() + self.size() * 0.5
    }

    fn is_degenerate(&self) -> bool {
        let size = self.size();
        !(size.x > 0.0 && size.y > 0.0)
    }

    /// Reports whether the two areas share a region of non-zero extent.
    ///
    /// Touching edges do not count, and a shape without area never intersects.
    #[must_use]
    pub fn intersects(&self, other: &Shape) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        if !bounds_overlap(self, other) {
            return false;
        }
        match (self, other) {
            (Self::Rect { .. }, Self::Rect { .. }) => true,
            (Self::Ellipse { min, size }, Self::Rect { min: rmin, size: rsize })
            | (Self::Rect { min: rmin, size: rsize }, Self::Ellipse { min, size }) => {
                ellipse_meets_rect(*min, *size, *rmin, *rsize)
            }
            (Self::Ellipse { min, size }, Self::Ellipse { min: omin, size: osize }) => {
                ellipse_meets_ellipse(*min, *size, *omin, *osize)
            }
        }
    }
}

fn bounds_overlap(a: &Shape, b: &Shape) -> bool {
    let (a_min, a_max) = (a.min(), a.min() + a.size());
    let (b_min, b_max) = (b.min(), b.min() + b.size());
    a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
}

fn ellipse_meets_rect(min: Vec2, size: Vec2, rect_min: Vec2, rect_size: Vec2) -> bool {
    // Scale space so the ellipse becomes the unit circle at the origin.
    let radii = (size * 0.5).as_dvec2();
    let centre = (min + size * 0.5).as_dvec2();
    let low = (rect_min.as_dvec2() - centre) / radii;
    let high = ((rect_min + rect_size).as_dvec2() - centre) / radii;
    let closest = glam::DVec2::ZERO.clamp(low, high);
    closest.length_squared() < 1.0
}

fn ellipse_meets_ellipse(min: Vec2, size: Vec2, other_min: Vec2, other_size: Vec2) -> bool {
    // Map the first ellipse onto the unit circle; the second stays axis aligned.
    let radii = (size * 0.5).as_dvec2();
    let centre = (min + size * 0.5).as_dvec2();
    let other_centre = ((other_min + other_size * 0.5).as_dvec2() - centre) / radii;
    let other_radii = (other_size * 0.5).as_dvec2() / radii;

    // By symmetry the distance from the origin to the second ellipse only
    // depends on the absolute offset of its centre.
    let query = other_centre.abs();
    let inside = (query.x / other_radii.x).powi(2) + (query.y / other_radii.y).powi(2) <= 1.0;
    if inside {
        return true;
    }
    distance_to_ellipse(other_radii.x, other_radii.y, query.x, query.y) < 1.0
}

/// Distance from the point `(y0, y1)` in the first quadrant to the ellipse with
/// semi-axes `e0`, `e1` centred at the origin.
fn distance_to_ellipse(e0: f64, e1: f64, y0: f64, y1: f64) -> f64 {
    if e0 < e1 {
        return distance_to_ellipse(e1, e0, y1, y0);
    }
    if y1 > 0.0 {
        if y0 > 0.0 {
            let z0 = y0 / e0;
            let z1 = y1 / e1;
            let g = z0 * z0 + z1 * z1 - 1.0;
            if g == 0.0 {
                return 0.0;
            }
            let r0 = (e0 / e1) * (e0 / e1);
            let sbar = ellipse_root(r0, z0, z1, g);
            let x0 = r0 * y0 / (sbar + r0);
            let x1 = y1 / (sbar + 1.0);
            ((x0 - y0).powi(2) + (x1 - y1).powi(2)).sqrt()
        } else {
            (y1 - e1).abs()
        }
    } else {
        let numer0 = e0 * y0;
        let denom0 = e0 * e0 - e1 * e1;
        if numer0 < denom0 {
            let xde0 = numer0 / denom0;
            let x0 = e0 * xde0;
            let x1 = e1 * (1.0 - xde0 * xde0).sqrt();
            ((x0 - y0).powi(2) + x1 * x1).sqrt()
        } else {
            (y0 - e0).abs()
        }
    }
}

fn ellipse_root(r0: f64, z0: f64, z1: f64, g: f64) -> f64 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = if g < 0.0 {
        0.0
    } else {
        n0.hypot(z1) - 1.0
    };
    let mut s = 0.0;
    for _ in 0..ROOT_ITERATIONS {
        s = (s0 + s1) / 2.0;
        if s == s0 || s == s1 {
            break;
        }
        let ratio0 = n0 / (s + r0);
        let ratio1 = z1 / (s + 1.0);
        let value = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;
        if value > 0.0 {
            s0 = s;
        } else if value < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn rotation_wraps_into_positive_range() {
        let rotation = Rotation::from_radians(-FRAC_PI_2);
        assert!((rotation.radians() - 3.0 * FRAC_PI_2).abs() < 1e-5);
        assert!(Rotation::from_radians(TAU).radians().abs() < 1e-6);
        assert_eq!(Rotation::from_radians(f32::NAN), Rotation::default());
    }

    #[test]
    fn facings_follow_screen_clockwise_order() {
        let centre = v(0.0, 0.0);
        let expect = [
            (v(0.0, 1.0), 0),
            (v(1.0, 1.0), 1),
            (v(1.0, 0.0), 2),
            (v(1.0, -1.0), 3),
            (v(0.0, -1.0), 4),
            (v(-1.0, -1.0), 5),
            (v(-1.0, 0.0), 6),
            (v(-1.0, 1.0), 7),
        ];
        for (target, index) in expect {
            let facing = Direction8::from_rotation(Rotation::toward(centre, target));
            assert_eq!(facing.index(), index, "target {target:?}");
        }
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let a = Shape::rect(v(0.0, 0.0), v(10.0, 10.0));
        let b = Shape::rect(v(10.0, 0.0), v(10.0, 10.0));
        let c = Shape::rect(v(9.0, 9.0), v(10.0, 10.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }

    #[test]
    fn ellipse_misses_rectangle_corner_inside_its_bounds() {
        let circle = Shape::ellipse(v(0.0, 0.0), v(10.0, 10.0));
        let corner = Shape::rect(v(-5.0, -5.0), v(6.0, 6.0));
        let edge = Shape::rect(v(4.0, -5.0), v(2.0, 6.0));
        assert!(!circle.intersects(&corner));
        assert!(circle.intersects(&edge));
        assert!(edge.intersects(&circle));
    }

    #[test]
    fn ellipses_intersect_only_when_curves_overlap() {
        let a = Shape::ellipse(v(0.0, 0.0), v(20.0, 10.0));
        let diagonal = Shape::ellipse(v(17.0, 8.0), v(10.0, 10.0));
        let overlapping = Shape::ellipse(v(15.0, 0.0), v(10.0, 10.0));
        let contained = Shape::ellipse(v(8.0, 3.0), v(4.0, 4.0));
        assert!(!a.intersects(&diagonal));
        assert!(a.intersects(&overlapping));
        assert!(a.intersects(&contained));
        assert!(contained.intersects(&a));
    }

    #[test]
    fn zero_area_shapes_never_intersect() {
        let flat = Shape::rect(v(0.0, 0.0), v(10.0, 0.0));
        let block = Shape::rect(v(-5.0, -5.0), v(20.0, 20.0));
        assert!(!flat.intersects(&block));
        assert!(!block.intersects(&flat));
    }
}
