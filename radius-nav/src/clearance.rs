//! Clearance oracle (component C4): decides whether a disc of a given
//! radius can pass through a face, entering on `from_edge` and leaving on
//! `to_edge`, including a flood-fill around the shared pivot vertex across
//! unconstrained adjacent faces.

use crate::error::NavError;
use crate::mesh::NavMeshAdapter;
use crate::topology::{EdgeId, FaceId, Topology, VertexId};
use fxhash::FxHashSet;
use nalgebra::Vector3;
use radius_nav_math::sqr_distance_to_segment;
use std::collections::VecDeque;

fn edge_endpoints<A: NavMeshAdapter>(
    topo: &Topology<'_, A>,
    edge: EdgeId,
) -> Option<(Vector3<f32>, Vector3<f32>)> {
    let (o, d) = topo.edge_vertices(edge)?;
    Some((topo.vertex_pos(o)?, topo.vertex_pos(d)?))
}

fn dist_sq_vertex_to_edge<A: NavMeshAdapter>(
    topo: &Topology<'_, A>,
    p: Vector3<f32>,
    edge: EdgeId,
) -> Option<f32> {
    let (a, b) = edge_endpoints(topo, edge)?;
    Some(sqr_distance_to_segment(p, a, b))
}

/// The pivot vertex shared by `from_edge` and `to_edge`, plus the other
/// endpoint of each (vA from `from_edge`, vB from `to_edge`).
fn find_pivot<A: NavMeshAdapter>(
    topo: &Topology<'_, A>,
    from_edge: EdgeId,
    to_edge: EdgeId,
) -> Option<(VertexId, VertexId, VertexId)> {
    let (fo, fd) = topo.edge_vertices(from_edge)?;
    let (to, td) = topo.edge_vertices(to_edge)?;
    if fd == to {
        Some((fo, fd, td))
    } else if fd == td {
        Some((fo, fd, to))
    } else if fo == to {
        Some((fd, fo, td))
    } else if fo == td {
        Some((fd, fo, to))
    } else {
        None
    }
}

/// The edge of `face` opposite the pivot vertex: the one that is neither
/// `from_edge` nor `to_edge`, nor either of their opposites.
fn pick_adjacent_edge<A: NavMeshAdapter>(
    topo: &Topology<'_, A>,
    face: FaceId,
    from_edge: EdgeId,
    to_edge: EdgeId,
) -> Option<EdgeId> {
    let from_opp = topo.edge_opposite_edge(from_edge);
    let to_opp = topo.edge_opposite_edge(to_edge);
    let is_free = |e: EdgeId| {
        e != from_edge && e != to_edge && Some(e) != from_opp && Some(e) != to_opp
    };
    let f_edge = topo.face_edge(face)?;
    let f_next = topo.edge_next_left_edge(f_edge)?;
    let f_next2 = topo.edge_next_left_edge(f_next)?;
    for e in [f_edge, f_next, f_next2] {
        if is_free(e) {
            return Some(e);
        }
    }
    topo.edge_prev_left_edge(f_edge)
}

/// BFS flood around the pivot vertex `vc_pos`, seeded at `seed_face`
/// entered through `seed_entry_edge`. Returns `false` as soon as a
/// boundary edge is found closer than the diameter; `true` once the
/// worklist drains.
fn flood_clears_pivot<A: NavMeshAdapter>(
    topo: &Topology<'_, A>,
    through_face: FaceId,
    vc_pos: Vector3<f32>,
    seed_face: FaceId,
    seed_entry_edge: EdgeId,
    d2: f32,
) -> Option<bool> {
    let mut visited: FxHashSet<(u64, u16)> = FxHashSet::default();
    visited.insert((through_face.poly.0, through_face.index));
    visited.insert((seed_face.poly.0, seed_face.index));

    let mut queue = VecDeque::new();
    queue.push_back((seed_face, seed_entry_edge));

    while let Some((face, entry_edge)) = queue.pop_front() {
        for edge in topo.face_edges(face)? {
            if edge == entry_edge {
                continue;
            }
            let d2_edge = dist_sq_vertex_to_edge(topo, vc_pos, edge)?;
            if d2_edge >= d2 {
                continue;
            }
            if topo.edge_is_boundary(edge)? {
                return Some(false);
            }
            let Some(next_face) = topo.edge_right_face(edge) else {
                continue;
            };
            let key = (next_face.poly.0, next_face.index);
            if visited.insert(key) {
                let entry_for_next = topo.edge_opposite_edge(edge).unwrap_or(edge);
                queue.push_back((next_face, entry_for_next));
            }
        }
    }
    Some(true)
}

/// Decides whether a disc of radius `r` fits through `through_face`,
/// entering on `from_edge` and leaving on `to_edge`.
pub fn is_walkable_by_radius<A: NavMeshAdapter>(
    topo: &Topology<'_, A>,
    r: f32,
    from_edge: EdgeId,
    through_face: FaceId,
    to_edge: EdgeId,
) -> Result<bool, NavError> {
    let (va, vc, vb) =
        find_pivot(topo, from_edge, to_edge).ok_or(NavError::NoPivotVertex)?;
    let a = topo.vertex_pos(va).ok_or(NavError::InvalidPrimitive)?;
    let b = topo.vertex_pos(vb).ok_or(NavError::InvalidPrimitive)?;
    let c = topo.vertex_pos(vc).ok_or(NavError::InvalidPrimitive)?;

    let d2 = (2.0 * r) * (2.0 * r);

    // Corrected per spec: `ab` and `ac` are computed as two distinct
    // vectors; an earlier revision overwrote `ab` with `ac` before the dot
    // product, corrupting the acute-angle check at A.
    let ab = b - a;
    let ac = c - a;
    if ab.dot(&ac) <= 0.0 {
        return Ok(ac.norm_squared() >= d2);
    }
    let ba = a - b;
    let bc = c - b;
    if ba.dot(&bc) <= 0.0 {
        return Ok(bc.norm_squared() >= d2);
    }

    let adj_edge =
        pick_adjacent_edge(topo, through_face, from_edge, to_edge).ok_or(NavError::InvalidPrimitive)?;

    if topo.edge_is_boundary(adj_edge).ok_or(NavError::InvalidPrimitive)? {
        let (ea, eb) = edge_endpoints(topo, adj_edge).ok_or(NavError::InvalidPrimitive)?;
        if ea == eb {
            return Err(NavError::InvalidPrimitive);
        }
        let proj = radius_nav_math::project_point_on_line(c, ea, eb);
        return Ok((proj - c).norm_squared() >= d2);
    }

    if ac.norm_squared() < d2 || bc.norm_squared() < d2 {
        return Ok(false);
    }

    let across_face = topo
        .edge_right_face(adj_edge)
        .ok_or(NavError::InvalidPrimitive)?;
    flood_clears_pivot(topo, through_face, c, across_face, adj_edge, d2)
        .ok_or(NavError::InvalidPrimitive)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mesh::SimpleNavMesh;
    use crate::topology::Topology;
    use nalgebra::Vector3;

    fn wide_pair() -> SimpleNavMesh {
        let mut mesh = SimpleNavMesh::new();
        mesh.add_tile(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 1.0),
                Vector3::new(1.0, 0.0, -1.0),
            ],
            vec![vec![0, 1, 2], vec![1, 0, 3]],
        );
        mesh.autolink();
        mesh
    }

    #[test]
    fn wide_shared_edge_clears_small_radius() {
        let mesh = wide_pair();
        let topo = Topology::new(&mesh);
        let poly = crate::mesh::PolyRef(0);
        let face_a = FaceId { poly, index: 0 };
        let edges = topo.face_edges(face_a).unwrap();
        // edges[0] is the shared boundary edge (0,0,0)-(2,0,0) via autolink.
        let shared = edges[0];
        let other1 = edges[1];
        let result = is_walkable_by_radius(&topo, 0.2, other1, face_a, shared);
        assert!(result.unwrap());
    }

    #[test]
    fn monotone_in_radius() {
        let mesh = wide_pair();
        let topo = Topology::new(&mesh);
        let poly = crate::mesh::PolyRef(0);
        let face_a = FaceId { poly, index: 0 };
        let edges = topo.face_edges(face_a).unwrap();
        let shared = edges[0];
        let other1 = edges[1];
        let small = is_walkable_by_radius(&topo, 0.1, other1, face_a, shared).unwrap();
        let large = is_walkable_by_radius(&topo, 0.9, other1, face_a, shared).unwrap();
        assert!(small || !large);
    }

    #[test]
    fn narrow_corner_blocks_small_radius() {
        // Two triangles sharing a 0.3-long edge, flanked by boundary edges
        // close enough to the pivot that a radius-0.2 disc cannot pass: the
        // acute-angle diameter check at the pivot's near neighbour already
        // rejects it, without needing to reach the flood fill.
        let mut mesh = SimpleNavMesh::new();
        mesh.add_tile(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.3, 0.0, 0.0),
                Vector3::new(0.15, 0.0, 0.05),
                Vector3::new(0.15, 0.0, -0.05),
            ],
            vec![vec![0, 1, 2], vec![1, 0, 3]],
        );
        mesh.autolink();
        let topo = Topology::new(&mesh);
        let poly = crate::mesh::PolyRef(0);
        let face_a = FaceId { poly, index: 0 };
        let edges = topo.face_edges(face_a).unwrap();
        let shared = edges[0];
        let flank = edges[1];
        let result = is_walkable_by_radius(&topo, 0.2, flank, face_a, shared);
        assert_eq!(result.unwrap(), false);
    }

    #[test]
    fn disjoint_edges_fail_with_no_pivot() {
        let mesh = wide_pair();
        let topo = Topology::new(&mesh);
        let poly = crate::mesh::PolyRef(0);
        let face_a = FaceId { poly, index: 0 };
        let edges = topo.face_edges(face_a).unwrap();
        // edges[1] and edges[2] of a triangle always share a vertex, so
        // force a disjoint pair using the opposite polygon's far edge.
        let other_poly = crate::mesh::PolyRef(1);
        let unrelated = EdgeId { poly: other_poly, index: 2 };
        let result = is_walkable_by_radius(&topo, 0.2, edges[1], face_a, unrelated);
        assert!(matches!(result, Err(NavError::NoPivotVertex)));
    }
}
