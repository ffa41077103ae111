//! Radius-offset corner modifier (component C7): the funnel's taut polyline
//! hugs every corner exactly, so an agent with nonzero radius walking it
//! would clip the wall. This stage pushes each interior corner outward by
//! `radius` along its external bisector, falling back to a short fan of
//! chord points around sharp corners where a single inset point would
//! otherwise overshoot the corridor.

use crate::status::Status;
use nalgebra::Vector3;

/// Reference uses 10.0: the largest number of chord segments a single
/// sharp corner's arc approximation is split into.
const MAX_CORNER_SUBDIVISIONS: u32 = 10;

/// Corners turning by less than this many radians are straight enough that
/// no offset is needed at all.
const STRAIGHT_THROUGH_ANGLE: f32 = 1e-4;

/// Corners turning by more than this many radians (roughly 115 degrees)
/// are sharp enough that a single inset point, offset a fixed `radius`
/// along the bisector, would no longer clear both adjacent segments by
/// `radius`; those get arced instead.
const SHARP_TURN_ANGLE: f32 = 2.0;

/// Debug marker recording the original corner a point was offset from, so
/// tests (and host-side debug draw) can verify the inset distance
/// independent of however many chord points a sharp turn expanded into.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OffsetCorner {
    /// Position of the corner before the offset was applied.
    pub centre: Vector3<f32>,
    /// Offset radius applied at this corner.
    pub radius: f32,
}

fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let len = v.norm();
    if len < 1e-8 {
        Vector3::zeros()
    } else {
        v / len
    }
}

/// Chord points of a `radius`-sized arc around `centre`, sweeping from
/// `start_dir` to `end_dir` (both unit, same winding as the turn), with at
/// most [`MAX_CORNER_SUBDIVISIONS`] segments.
fn arc_points(
    centre: Vector3<f32>,
    start_dir: Vector3<f32>,
    end_dir: Vector3<f32>,
    radius: f32,
) -> Vec<Vector3<f32>> {
    let segments = MAX_CORNER_SUBDIVISIONS;
    (1..segments)
        .map(|s| {
            let t = s as f32 / segments as f32;
            let dir = normalize_or_zero(start_dir.lerp(&end_dir, t));
            centre + dir * radius
        })
        .collect()
}

/// Perpendicular to `dir` in the XZ plane, on the side that points away
/// from `towards` (the turn's interior).
fn perpendicular_away(dir: Vector3<f32>, away_from: Vector3<f32>) -> Vector3<f32> {
    let perp = Vector3::new(-dir.z, 0.0, dir.x);
    if perp.dot(&away_from) >= 0.0 {
        perp
    } else {
        -perp
    }
}

/// Insets every interior corner of `points` outward by `radius`, leaving
/// the first and last point untouched. `points` is expected to already be
/// a funnel-pulled, taut polyline (consecutive points never coincide
/// except possibly at the very ends).
pub fn apply_radius_offset(
    points: &[Vector3<f32>],
    radius: f32,
) -> (Vec<Vector3<f32>>, Vec<Option<OffsetCorner>>, Status) {
    if points.len() < 3 || radius <= 0.0 {
        return (points.to_vec(), vec![None; points.len()], Status::SUCCESS);
    }

    let mut out_points = Vec::with_capacity(points.len());
    let mut out_corners = Vec::with_capacity(points.len());
    out_points.push(points[0]);
    out_corners.push(None);

    for i in 1..points.len() - 1 {
        let prev = points[i - 1];
        let cur = points[i];
        let next = points[i + 1];

        let into = normalize_or_zero(cur - prev);
        let out_of = normalize_or_zero(next - cur);

        // Signed turn angle in the XZ plane: 0 for a straight line, ±π for
        // a full reversal. Unlike the bisector below, this stays
        // well-defined (and meaningful) across the whole range.
        let cross = into.x * out_of.z - into.z * out_of.x;
        let dot = into.dot(&out_of).clamp(-1.0, 1.0);
        let bend = cross.atan2(dot);

        if bend.abs() < STRAIGHT_THROUGH_ANGLE {
            out_points.push(cur);
            out_corners.push(None);
            continue;
        }

        // External bisector: the direction away from the turn's interior,
        // i.e. the direction the corner must move to gain clearance.
        let bisector = normalize_or_zero(into - out_of);

        if bend.abs() > SHARP_TURN_ANGLE {
            let start_dir = perpendicular_away(into, bisector);
            let end_dir = perpendicular_away(out_of, bisector);
            let arc = arc_points(cur, start_dir, end_dir, radius);
            out_corners.extend(std::iter::repeat(Some(OffsetCorner { centre: cur, radius })).take(arc.len()));
            out_points.extend(arc);
        } else {
            out_points.push(cur + bisector * radius);
            out_corners.push(Some(OffsetCorner { centre: cur, radius }));
        }
    }

    out_points.push(*points.last().unwrap());
    out_corners.push(None);

    (out_points, out_corners, Status::SUCCESS)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn straight_line_is_untouched() {
        let points = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
        ];
        let (out, corners, status) = apply_radius_offset(&points, 0.25);
        assert!(status.succeeded());
        assert_eq!(out[0], points[0]);
        assert_eq!(*out.last().unwrap(), points[2]);
        assert!(corners[1].is_none());
    }

    #[test]
    fn right_angle_turn_displaces_corner_by_radius() {
        // Corridor turns 90 degrees at the origin: comes in along +x,
        // leaves along +z. The external bisector at the corner is
        // (-1, -1)/sqrt(2), so a radius-0.25 offset moves the corner by
        // exactly 0.25 along that direction.
        let points = vec![
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let (out, corners, status) = apply_radius_offset(&points, 0.25);
        assert!(status.succeeded());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], points[0]);
        assert_eq!(out[2], points[2]);
        let corner = corners[1].unwrap();
        assert_eq!(corner.centre, points[1]);
        assert!(((out[1] - points[1]).norm() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn endpoints_are_always_preserved() {
        let points = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.5),
            Vector3::new(2.0, 0.0, -0.5),
            Vector3::new(3.0, 0.0, 0.0),
        ];
        let (out, _, status) = apply_radius_offset(&points, 0.1);
        assert!(status.succeeded());
        assert_eq!(out[0], points[0]);
        assert_eq!(*out.last().unwrap(), points[3]);
    }

    #[test]
    fn sharp_turn_arcs_instead_of_a_single_point() {
        // Corridor folds back on itself by 150 degrees: a single inset
        // point can no longer keep both adjacent segments at `radius`, so
        // the corner expands into a fan of equidistant chord points.
        let prev = Vector3::new(-1.0, 0.0, 0.0);
        let cur = Vector3::new(0.0, 0.0, 0.0);
        let next = Vector3::new(-0.866, 0.0, 0.5);
        let (out, corners, status) = apply_radius_offset(&[prev, cur, next], 0.3);
        assert!(status.succeeded());
        assert_eq!(out.len(), 2 + (MAX_CORNER_SUBDIVISIONS as usize - 1));
        // out_points and out_corners must stay parallel arrays even when a
        // single source corner expands into several arc points.
        assert_eq!(out.len(), corners.len());
        assert_eq!(out[0], prev);
        assert_eq!(*out.last().unwrap(), next);
        for corner in &corners[1..corners.len() - 1] {
            assert!(corner.is_some());
        }
        for p in &out[1..out.len() - 1] {
            assert!(((*p - cur).norm() - 0.3).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_radius_is_a_no_op() {
        let points = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
        ];
        let (out, corners, status) = apply_radius_offset(&points, 0.0);
        assert!(status.succeeded());
        assert_eq!(out, points);
        assert!(corners.iter().all(Option::is_none));
    }
}
