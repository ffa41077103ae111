//! Funnel string-pull (component C6): turns a face corridor and its portal
//! edges into the shortest polyline that still stays inside the corridor,
//! via the textbook funnel algorithm.

use crate::astar::PathResult;
use crate::error::NavError;
use crate::log::Log;
use crate::mesh::NavMeshAdapter;
use crate::status::Status;
use crate::topology::Topology;
use nalgebra::Vector3;
use radius_nav_math::{relative_side, tri_area_2d, Side};

/// Below this squared distance two funnel vertices are treated as the same
/// point, so a corner is not emitted twice.
const VEQUAL_SQR_EPS: f32 = 1e-8;

fn vequal(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    (a - b).norm_squared() < VEQUAL_SQR_EPS
}

/// The straight-pulled polyline plus the outcome of pulling it.
pub struct FunnelResult {
    /// Waypoints from `start_pos` to `end_pos`, duplicates suppressed.
    pub points: Vec<Vector3<f32>>,
    /// Outcome of the string-pull.
    pub status: Status,
}

struct Portal {
    left: Vector3<f32>,
    right: Vector3<f32>,
}

/// Resolves each portal edge's (left, right) endpoints: the first portal by
/// `relative_side(start_pos, origin, destination)`, every later one by
/// matching the pivot *position* shared with the previous portal (edges on
/// different polygons never share a [`crate::topology::VertexId`] even when
/// they meet at the same physical point, since a vertex's index is local to
/// its owning polygon's ring).
fn portals_from_corridor<A: NavMeshAdapter>(
    topo: &Topology<'_, A>,
    path: &PathResult,
    start_pos: Vector3<f32>,
) -> Result<Vec<Portal>, NavError> {
    let mut portals = Vec::with_capacity(path.portals.len());
    let mut prev: Option<(Vector3<f32>, Vector3<f32>)> = None;

    for &edge in &path.portals {
        let (vo, vd) = topo.edge_vertices(edge).ok_or(NavError::InvalidPrimitive)?;
        let po = topo.vertex_pos(vo).ok_or(NavError::InvalidPrimitive)?;
        let pd = topo.vertex_pos(vd).ok_or(NavError::InvalidPrimitive)?;

        let (left_pos, right_pos) = match prev {
            None => match relative_side(start_pos, po, pd) {
                // Ambiguous (On) resolves to LEFT, per the same convention
                // as the Left case.
                Side::Right => (pd, po),
                Side::Left | Side::On => (po, pd),
            },
            Some((pl, _)) if vequal(po, pl) => (po, pd),
            Some((pl, _)) if vequal(pd, pl) => (pd, po),
            Some((_, pr)) if vequal(po, pr) => (pd, po),
            Some((_, pr)) if vequal(pd, pr) => (po, pd),
            Some(_) => return Err(NavError::FunnelVertexMismatch),
        };

        portals.push(Portal { left: left_pos, right: right_pos });
        prev = Some((left_pos, right_pos));
    }
    Ok(portals)
}

fn push_point(points: &mut Vec<Vector3<f32>>, p: Vector3<f32>, max_points: usize, status: &mut Status) {
    if let Some(last) = points.last() {
        if vequal(*last, p) {
            return;
        }
    }
    if max_points > 0 && points.len() >= max_points {
        *status |= Status::BUFFER_TOO_SMALL;
        return;
    }
    points.push(p);
}

/// String-pulls `path` into the shortest polyline from `start_pos` to
/// `end_pos` that stays within the face corridor. `max_points == 0` means
/// unbounded.
pub fn string_pull<A: NavMeshAdapter>(
    topo: &Topology<'_, A>,
    path: &PathResult,
    start_pos: Vector3<f32>,
    end_pos: Vector3<f32>,
    max_points: usize,
) -> FunnelResult {
    if path.faces.is_empty() {
        return FunnelResult { points: Vec::new(), status: Status::FAILURE | Status::INVALID_PARAM };
    }

    let portals = match portals_from_corridor(topo, path, start_pos) {
        Ok(portals) => portals,
        Err(err) => {
            Log::warn(format!("straightPathByRadius: {err}"));
            return FunnelResult { points: Vec::new(), status: Status::FAILURE | Status::INVALID_PARAM };
        }
    };

    let mut lefts: Vec<Vector3<f32>> = portals.iter().map(|p| p.left).collect();
    let mut rights: Vec<Vector3<f32>> = portals.iter().map(|p| p.right).collect();
    lefts.push(end_pos);
    rights.push(end_pos);

    let mut status = Status::SUCCESS;
    let mut points = Vec::new();
    push_point(&mut points, start_pos, max_points, &mut status);

    let mut apex = start_pos;
    let mut portal_left = start_pos;
    let mut portal_right = start_pos;
    let mut apex_index = 0usize;
    let mut left_index = 0usize;
    let mut right_index = 0usize;

    let n = lefts.len();
    let mut i = 0usize;
    while i < n {
        let left = lefts[i];
        let right = rights[i];

        if tri_area_2d(apex, portal_right, right) >= 0.0 {
            // Degenerate check compares against the established bound, not
            // the incoming candidate: at the very first portal both bounds
            // still equal apex, so this collapses to the fresh reading
            // (tighten, rather than spuriously emitting a corner at start).
            if apex == portal_right || tri_area_2d(apex, portal_left, right) < 0.0 {
                portal_right = right;
                right_index = i;
            } else {
                push_point(&mut points, portal_left, max_points, &mut status);
                apex = portal_left;
                apex_index = left_index;
                portal_left = apex;
                portal_right = apex;
                left_index = apex_index;
                right_index = apex_index;
                i = apex_index + 1;
                continue;
            }
        }

        if tri_area_2d(apex, portal_left, left) <= 0.0 {
            if apex == portal_left || tri_area_2d(apex, portal_right, left) > 0.0 {
                portal_left = left;
                left_index = i;
            } else {
                push_point(&mut points, portal_right, max_points, &mut status);
                apex = portal_right;
                apex_index = right_index;
                portal_left = apex;
                portal_right = apex;
                left_index = apex_index;
                right_index = apex_index;
                i = apex_index + 1;
                continue;
            }
        }

        i += 1;
    }

    push_point(&mut points, end_pos, max_points, &mut status);
    FunnelResult { points, status }
}
