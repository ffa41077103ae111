//! Public query surface (maps onto the host-facing half of components
//! C1-C7): a `Filter` seam for per-face admissibility and movement cost, and
//! [`NavMeshQuery`], the entry point a caller actually builds a path with.

use crate::astar::{self, PathResult};
use crate::funnel::{self, FunnelResult};
use crate::mesh::NavMeshAdapter;
use crate::modifier::{self, OffsetCorner};
use crate::status::Status;
use crate::topology::{FaceId, Topology};
use nalgebra::Vector3;
use radius_nav_math::tri_area_2d;

/// Per-face admissibility and per-leg movement cost, the seam a host plugs
/// area types, off-mesh connections or dynamic obstacles into.
pub trait Filter {
    /// Whether `face` may be entered at all.
    fn pass_filter(&self, face: FaceId) -> bool;

    /// Cost of moving from `pa` to `pb`, crossing from `prev_face` (if any)
    /// through `cur_face` towards `next_face` (if any, `None` at the goal).
    fn get_cost(
        &self,
        pa: Vector3<f32>,
        pb: Vector3<f32>,
        prev_face: Option<FaceId>,
        cur_face: FaceId,
        next_face: Option<FaceId>,
    ) -> f32;
}

/// A filter that admits every face and costs each leg by Euclidean
/// distance; the default when a caller has no area types or obstacles.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoFilter;

impl Filter for NoFilter {
    fn pass_filter(&self, _face: FaceId) -> bool {
        true
    }

    fn get_cost(
        &self,
        pa: Vector3<f32>,
        pb: Vector3<f32>,
        _prev_face: Option<FaceId>,
        _cur_face: FaceId,
        _next_face: Option<FaceId>,
    ) -> f32 {
        (pb - pa).norm()
    }
}

/// The straight path, string-pulled and radius-offset, ready to hand to a
/// steering system.
pub struct StraightPath {
    /// Waypoints from start to end, inclusive.
    pub points: Vec<Vector3<f32>>,
    /// Per-waypoint radius-offset marker, when the caller asked for one.
    pub corners: Vec<Option<OffsetCorner>>,
    /// Outcome of the funnel and modifier stages.
    pub status: Status,
}

/// Entry point for path queries over a borrowed navmesh. Bundles the
/// topology view ([`Topology`]) that every stage (clearance, search, funnel)
/// is built on.
pub struct NavMeshQuery<'a, A: NavMeshAdapter> {
    topo: Topology<'a, A>,
    nav: &'a A,
}

impl<'a, A: NavMeshAdapter> NavMeshQuery<'a, A> {
    /// Borrows `nav` for the duration of however many queries are issued
    /// against the returned value.
    pub fn new(nav: &'a A) -> Self {
        Self { topo: Topology::new(nav), nav }
    }

    /// The face of the navmesh (among `nav.all_polys()`'s virtual faces)
    /// that contains `point`, or failing that the one whose triangle is
    /// closest to it.
    pub fn find_nearest_face(&self, point: Vector3<f32>) -> Option<(FaceId, Vector3<f32>)> {
        let mut best: Option<(FaceId, Vector3<f32>, f32)> = None;
        for poly in self.nav.all_polys() {
            let Some(faces) = self.topo.poly_internal_faces(poly) else {
                continue;
            };
            for face in faces {
                let Some(verts) = self.topo.face_vertices(face) else {
                    continue;
                };
                let Some(positions) = verts
                    .iter()
                    .map(|v| self.topo.vertex_pos(*v))
                    .collect::<Option<Vec<_>>>()
                else {
                    continue;
                };
                let (a, b, c) = (positions[0], positions[1], positions[2]);

                if point_in_triangle(point, a, b, c) {
                    return Some((face, point));
                }

                let closest = closest_point_on_triangle(point, a, b, c);
                let d2 = (closest - point).norm_squared();
                if best.map(|(_, _, bd)| d2 < bd).unwrap_or(true) {
                    best = Some((face, closest, d2));
                }
            }
        }
        best.map(|(face, pos, _)| (face, pos))
    }

    /// Runs the clearance-gated A* search (component C5) between two faces.
    #[allow(clippy::too_many_arguments)]
    pub fn find_path_by_radius<F: Filter>(
        &self,
        start_face: FaceId,
        end_face: FaceId,
        start_pos: Vector3<f32>,
        end_pos: Vector3<f32>,
        filter: &F,
        radius: f32,
        max_path_faces: usize,
        max_search_nodes: Option<usize>,
    ) -> PathResult {
        astar::find_path_by_radius(
            &self.topo,
            start_face,
            end_face,
            start_pos,
            end_pos,
            filter,
            radius,
            max_path_faces,
            max_search_nodes,
        )
    }

    /// String-pulls `path` (as returned by
    /// [`NavMeshQuery::find_path_by_radius`]) into a minimal-length
    /// sequence of straight segments, then inset by `radius` at convex
    /// corners.
    pub fn straight_path_by_radius(
        &self,
        path: &PathResult,
        start_pos: Vector3<f32>,
        end_pos: Vector3<f32>,
        radius: f32,
        max_points: usize,
    ) -> StraightPath {
        let FunnelResult { points, status: funnel_status } =
            funnel::string_pull(&self.topo, path, start_pos, end_pos, max_points);

        let (points, corners, modifier_status) = if radius > 0.0 {
            modifier::apply_radius_offset(&points, radius)
        } else {
            let corners = vec![None; points.len()];
            (points, corners, Status::SUCCESS)
        };

        StraightPath { points, corners, status: funnel_status | modifier_status }
    }
}

fn point_in_triangle(p: Vector3<f32>, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> bool {
    let d1 = tri_area_2d(p, a, b);
    let d2 = tri_area_2d(p, b, c);
    let d3 = tri_area_2d(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

fn closest_point_on_triangle(
    p: Vector3<f32>,
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
) -> Vector3<f32> {
    let edges = [(a, b), (b, c), (c, a)];
    edges
        .iter()
        .map(|(u, v)| radius_nav_math::closest_point_on_segment(p, *u, *v))
        .min_by(|x, y| (*x - p).norm_squared().total_cmp(&(*y - p).norm_squared()))
        .unwrap_or(a)
}
