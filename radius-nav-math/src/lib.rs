//! 2D (XZ-plane) geometry primitives for the radius-aware navmesh pathfinder.
//!
//! The navmesh lives on the XZ plane; the Y coordinate is carried through
//! positions but ignored by every test in this crate. Grounded on Fyrox's
//! `fyrox-math` crate, trimmed to the projection, distance and orientation
//! primitives the geometry kernel (component C3 of the spec) actually needs.

pub mod segment;

use nalgebra::Vector3;
use segment::LineSegment3;

/// A point's position is all the pathfinder's graph search needs to know
/// about a vertex; lets the A* node pool and `get_closest_point` work over
/// any vertex-like type.
pub trait PositionProvider: Sized {
    /// Returns the world-space position of this item.
    fn position(&self) -> Vector3<f32>;
}

impl PositionProvider for Vector3<f32> {
    #[inline]
    fn position(&self) -> Vector3<f32> {
        *self
    }
}

/// Small extensions to `nalgebra::Vector3<f32>` in the style of
/// `fyrox-math::Vector3Ext`.
pub trait Vector3Ext {
    /// Squared Euclidean distance to `other`.
    fn sqr_distance(&self, other: &Self) -> f32;
}

impl Vector3Ext for Vector3<f32> {
    #[inline]
    fn sqr_distance(&self, other: &Self) -> f32 {
        (self - other).norm_squared()
    }
}

/// Orthogonal projection of `p` onto the infinite line through `a` and `b`,
/// evaluated on the XZ plane (the Y component of the result is interpolated
/// along with X and Z but carries no geometric meaning).
#[inline]
pub fn project_point_on_line(p: Vector3<f32>, a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    let segment = LineSegment3::new(&a, &b);
    if segment.is_degenerate() {
        return a;
    }
    segment.interpolate_clamped(segment.nearest_t(&p))
}

/// Point on segment `a..b` closest to `p`, clamped to the segment. Degenerate
/// segments (near-zero length) collapse to endpoint `a`.
#[inline]
pub fn closest_point_on_segment(p: Vector3<f32>, a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    let segment = LineSegment3::new(&a, &b);
    if segment.is_degenerate() {
        return a;
    }
    segment.nearest_point(&p)
}

/// Squared distance from `p` to segment `a..b`. A segment whose squared
/// length is below `DEGENERATE_SQR_LEN` is treated as a single point at `a`
/// per the spec's degenerate-segment rule.
#[inline]
pub fn sqr_distance_to_segment(p: Vector3<f32>, a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    let segment = LineSegment3::new(&a, &b);
    if segment.length_squared() < DEGENERATE_SQR_LEN {
        return 0.0;
    }
    segment.distance_squared(&p)
}

/// Below this squared length a segment is considered degenerate (a point),
/// per spec §4.3.
pub const DEGENERATE_SQR_LEN: f32 = 0.01;

/// Signed area of the triangle `(a, b, c)` projected onto the XZ plane.
/// Positive when `a, b, c` wind counter-clockwise as viewed from above
/// (+Y looking down), matching `relative_side`'s LEFT/RIGHT convention.
#[inline]
pub fn tri_area_2d(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> f32 {
    let abx = b.x - a.x;
    let abz = b.z - a.z;
    let acx = c.x - a.x;
    let acz = c.z - a.z;
    acx * abz - abx * acz
}

/// Which side of the directed line `a -> b` the point `p` falls on.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Side {
    /// `p` is to the left of `a -> b`.
    Left,
    /// `p` is to the right of `a -> b`.
    Right,
    /// `p` lies on the line through `a` and `b`.
    On,
}

/// Classifies which side of the directed line `a -> b` the point `p` lies on.
#[inline]
pub fn relative_side(p: Vector3<f32>, a: Vector3<f32>, b: Vector3<f32>) -> Side {
    let area = tri_area_2d(p, a, b);
    if area > 0.0 {
        Side::Left
    } else if area < 0.0 {
        Side::Right
    } else {
        Side::On
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn projection_onto_axis_aligned_edge() {
        let p = project_point_on_line(
            Vector3::new(1.0, 0.0, 5.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
        );
        assert_eq!(p, Vector3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn closest_point_clamps_to_segment() {
        let p = closest_point_on_segment(
            Vector3::new(-5.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
        );
        assert_eq!(p, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn degenerate_segment_is_zero_distance() {
        let d = sqr_distance_to_segment(
            Vector3::new(3.0, 0.0, 3.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.05, 0.0, 0.0),
        );
        assert_eq!(d, 0.0);
    }

    #[test]
    fn triangle_area_flips_sign_with_winding() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        let c = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(tri_area_2d(a, b, c), -tri_area_2d(a, c, b));
        assert_ne!(tri_area_2d(a, b, c), 0.0);
    }

    #[test]
    fn relative_side_classification() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(1.0, 0.0, 0.0);
        let left = relative_side(Vector3::new(0.5, 0.0, 1.0), a, b);
        let right = relative_side(Vector3::new(0.5, 0.0, -1.0), a, b);
        assert_ne!(left, right);
        assert_ne!(left, Side::On);
        assert_ne!(right, Side::On);
        assert_eq!(relative_side(Vector3::new(0.5, 0.0, 0.0), a, b), Side::On);
    }
}
