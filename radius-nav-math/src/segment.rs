//! Line segment helpers used by the clearance oracle and the funnel algorithm.
//!
//! Grounded on Fyrox's `fyrox-math::segment` module: a thin, allocator-generic
//! line segment with a closest-point projection. Trimmed to the three
//! dimensions the pathfinder actually works with (3D positions, XZ-plane
//! distances) and to the operations the spec names.

use nalgebra::{
    allocator::Allocator, DefaultAllocator, Dim, OVector, RealField, Scalar, Storage, Vector, U3,
};
use num_traits::{One, Zero};

/// Line segment in three dimensions (the navmesh stores XZ positions with a
/// carried, ignored Y component).
pub type LineSegment3<T> = LineSegment<T, U3>;

/// Line segment in any number of dimensions.
#[derive(Clone, Debug)]
pub struct LineSegment<T, D>
where
    DefaultAllocator: Allocator<T, D>,
    D: Dim,
{
    /// One end of the line segment, the point returned when interpolating at t = 0.0.
    pub start: OVector<T, D>,
    /// One end of the line segment, the point returned when interpolating at t = 1.0.
    pub end: OVector<T, D>,
}

impl<T, D> LineSegment<T, D>
where
    T: Zero + One + Scalar + RealField,
    D: Dim,
    DefaultAllocator: Allocator<T, D>,
{
    /// Creates a new line segment with the given endpoints.
    pub fn new<S1, S2>(start: &Vector<T, D, S1>, end: &Vector<T, D, S2>) -> Self
    where
        S1: Storage<T, D>,
        S2: Storage<T, D>,
    {
        Self {
            start: start.clone_owned(),
            end: end.clone_owned(),
        }
    }

    /// The two endpoints are equal; degenerate segments collapse any
    /// projection onto the single endpoint `start`.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Create a point somewhere between `start` and `end`, clamped so the
    /// result can never land off the segment.
    pub fn interpolate_clamped(&self, t: T) -> OVector<T, D> {
        self.start
            .lerp(&self.end, t.clamp(<T as Zero>::zero(), <T as One>::one()))
    }

    /// The vector from `start` to `end`.
    pub fn vector(&self) -> OVector<T, D> {
        self.end.clone() - self.start.clone()
    }

    /// The square of the distance between `start` and `end`.
    pub fn length_squared(&self) -> T {
        self.vector().norm_squared()
    }

    /// The interpolation parameter of the point on this segment that is
    /// closest to the given point.
    ///
    /// [Stack Exchange: Find a point on a line segment which is the closest to other point not on the line segment](https://math.stackexchange.com/questions/2193720/find-a-point-on-a-line-segment-which-is-the-closest-to-other-point-not-on-the-li)
    pub fn nearest_t<S>(&self, point: &Vector<T, D, S>) -> T
    where
        S: Storage<T, D>,
    {
        let v = self.vector();
        let u = self.start.clone() - point;
        let n2 = v.norm_squared();
        if n2.is_zero() {
            return T::zero();
        }
        -v.dot(&u) / n2
    }

    /// The point on this segment that is closest to the given point.
    pub fn nearest_point<S>(&self, point: &Vector<T, D, S>) -> OVector<T, D>
    where
        S: Storage<T, D>,
    {
        self.interpolate_clamped(self.nearest_t(point))
    }

    /// The squared distance between the given point and the nearest point on
    /// this line segment.
    pub fn distance_squared<S>(&self, point: &Vector<T, D, S>) -> T
    where
        S: Storage<T, D>,
    {
        (point - self.nearest_point(point)).norm_squared()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn nearest_at_start() {
        let segment = LineSegment3::new(&Vector3::new(0.0, 0.0, 0.0), &Vector3::new(1.0, 0.0, 2.0));
        assert_eq!(segment.nearest_t(&Vector3::new(-1.0, 0.0, -1.0)).max(0.0), 0.0);
        assert_eq!(
            segment.nearest_point(&Vector3::new(-1.0, 0.0, -1.0)),
            Vector3::new(0.0, 0.0, 0.0)
        );
    }

    #[test]
    fn nearest_at_end() {
        let segment = LineSegment3::new(&Vector3::new(0.0, 0.0, 0.0), &Vector3::new(1.0, 0.0, 2.0));
        assert_eq!(segment.nearest_t(&Vector3::new(2.0, 0.0, 2.0)).min(1.0), 1.0);
        assert_eq!(
            segment.nearest_point(&Vector3::new(2.0, 0.0, 2.0)),
            Vector3::new(1.0, 0.0, 2.0)
        );
    }

    #[test]
    fn nearest_in_middle() {
        let segment = LineSegment3::new(&Vector3::new(0.0, 0.0, 0.0), &Vector3::new(1.0, 0.0, 2.0));
        assert_eq!(segment.nearest_t(&Vector3::new(2.5, 0.0, 0.0)), 0.5);
        assert_eq!(
            segment.nearest_point(&Vector3::new(2.5, 0.0, 0.0)),
            Vector3::new(0.5, 0.0, 1.0)
        );
    }

    #[test]
    fn degenerate() {
        let segment = LineSegment3::new(&Vector3::new(1.0, 0.0, 2.0), &Vector3::new(1.0, 0.0, 2.0));
        assert!(segment.is_degenerate());
        assert_eq!(segment.length_squared(), 0.0);
    }
}
