//! Face topology (component C2): maps `(polyRef, index)` to the virtual
//! vertices, edges and faces of a polygon's triangle fan, and implements the
//! quad-edge-style queries (origin, destination, left/right face, opposite,
//! next/prev) purely arithmetically — no extra storage is ever allocated.
//!
//! Every handle ([`VertexId`], [`EdgeId`], [`FaceId`]) is a plain, `Copy`
//! `{ poly, index }` pair with no sentinel and no back-pointer to the
//! navmesh; "no such primitive" is `None`, and the navmesh is borrowed
//! explicitly by [`Topology`] rather than carried inside each handle.

use crate::mesh::{NavMeshAdapter, PolyRef, EXT_LINK_BIT};

/// Handle to a polygon vertex: `index` is the vertex's position in the
/// polygon's vertex ring, `0..vert_count`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct VertexId {
    /// Owning polygon.
    pub poly: PolyRef,
    /// Vertex index within the polygon.
    pub index: u16,
}

/// Handle to a directed edge: boundary edges occupy `index ∈ [0, N)`;
/// interior fan diagonals occupy `index ∈ [N, N + 2·(N-3))` as opposite
/// half-edge pairs (see module docs).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct EdgeId {
    /// Owning polygon.
    pub poly: PolyRef,
    /// Edge index, boundary or interior.
    pub index: u16,
}

/// Handle to a virtual triangle of the polygon's fan: `index ∈ [0, N-3]`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FaceId {
    /// Owning polygon.
    pub poly: PolyRef,
    /// Face index within the fan.
    pub index: u16,
}

/// Borrows a navmesh for the duration of a topology query. Mirrors the
/// spec's "non-owning reference with a lifetime bound to the search call"
/// resolution of the original design's primitive-to-navmesh back-pointer.
pub struct Topology<'a, A: NavMeshAdapter> {
    nav: &'a A,
}

impl<'a, A: NavMeshAdapter> Topology<'a, A> {
    /// Borrows `nav` for topology queries.
    pub fn new(nav: &'a A) -> Self {
        Self { nav }
    }

    fn vert_count(&self, poly: PolyRef) -> Option<u16> {
        self.nav.vert_count(poly)
    }

    /// World-space position of a vertex handle.
    pub fn vertex_pos(&self, vertex: VertexId) -> Option<nalgebra::Vector3<f32>> {
        self.nav.vert_pos(vertex.poly, vertex.index)
    }

    /// The three directed edges of `face`, in CCW order, per the spec's
    /// face-to-edges table.
    pub fn face_edges(&self, face: FaceId) -> Option<[EdgeId; 3]> {
        let n = self.vert_count(face.poly)?;
        let k = face.index;
        if k > n.saturating_sub(3) {
            return None;
        }
        let edge = |index: u16| EdgeId { poly: face.poly, index };
        let edges = if n == 3 {
            [edge(0), edge(1), edge(2)]
        } else if k == 0 {
            [edge(0), edge(1), edge(n)]
        } else if k == n - 3 {
            [edge(n + 1 + 2 * (k - 1)), edge(k + 1), edge(k + 2)]
        } else {
            [edge(n + 1 + 2 * (k - 1)), edge(k + 1), edge(n + 2 + 2 * (k - 1))]
        };
        Some(edges)
    }

    /// The canonical representative edge of a face: its first entry in
    /// [`Topology::face_edges`].
    pub fn face_edge(&self, face: FaceId) -> Option<EdgeId> {
        Some(self.face_edges(face)?[0])
    }

    /// `true` if `index` addresses an interior diagonal rather than a
    /// polygon-boundary edge.
    fn is_interior(&self, edge: EdgeId, n: u16) -> bool {
        edge.index >= n
    }

    /// The vertex an edge starts at.
    pub fn edge_origin_vertex(&self, edge: EdgeId) -> Option<VertexId> {
        let n = self.vert_count(edge.poly)?;
        let v = if edge.index < n {
            edge.index
        } else {
            let j = edge.index - n;
            if j % 2 == 1 {
                0
            } else {
                j / 2 + 2
            }
        };
        Some(VertexId { poly: edge.poly, index: v })
    }

    /// The vertex an edge ends at.
    pub fn edge_destination_vertex(&self, edge: EdgeId) -> Option<VertexId> {
        let n = self.vert_count(edge.poly)?;
        let v = if edge.index < n {
            (edge.index + 1) % n
        } else {
            let j = edge.index - n;
            if j % 2 == 0 {
                0
            } else {
                j / 2 + 2
            }
        };
        Some(VertexId { poly: edge.poly, index: v })
    }

    /// Origin and destination in one call.
    pub fn edge_vertices(&self, edge: EdgeId) -> Option<(VertexId, VertexId)> {
        Some((self.edge_origin_vertex(edge)?, self.edge_destination_vertex(edge)?))
    }

    /// The face to the left of a directed edge.
    pub fn edge_left_face(&self, edge: EdgeId) -> Option<FaceId> {
        let n = self.vert_count(edge.poly)?;
        let index = if edge.index < n {
            if edge.index <= 1 {
                0
            } else if edge.index >= n - 2 {
                n - 3
            } else {
                edge.index - 1
            }
        } else {
            let j = edge.index - n;
            if j % 2 == 0 {
                j / 2
            } else {
                j / 2 + 1
            }
        };
        Some(FaceId { poly: edge.poly, index })
    }

    /// The edge on the opposite side of the same geometric segment: the
    /// paired half-edge for interior diagonals, or the matching boundary
    /// edge on the neighbouring polygon. `None` if `edge` is an unlinked
    /// boundary edge.
    pub fn edge_opposite_edge(&self, edge: EdgeId) -> Option<EdgeId> {
        let n = self.vert_count(edge.poly)?;
        if self.is_interior(edge, n) {
            return Some(EdgeId { poly: edge.poly, index: edge.index ^ 1 });
        }
        let nei = self.nav.raw_nei(edge.poly, edge.index)?;
        if nei == 0 {
            return None;
        }
        let neighbour = if nei & EXT_LINK_BIT != 0 {
            self.nav
                .links(edge.poly)
                .into_iter()
                .find(|link| link.edge_on_source == edge.index)
                .map(|link| link.neighbour)?
        } else {
            let base = self.nav.poly_ref_base(edge.poly)?;
            PolyRef(base | (nei - 1) as u64)
        };
        self.shared_edge_index(neighbour, edge.poly)
    }

    /// Finds the boundary edge on `from` that points back at `to`, used to
    /// locate the mirror slot of a cross-polygon edge.
    fn shared_edge_index(&self, from: PolyRef, to: PolyRef) -> Option<EdgeId> {
        let n = self.vert_count(from)?;
        for e in 0..n {
            let nei = self.nav.raw_nei(from, e)?;
            if nei == 0 {
                continue;
            }
            let candidate = if nei & EXT_LINK_BIT != 0 {
                self.nav
                    .links(from)
                    .into_iter()
                    .find(|link| link.edge_on_source == e)
                    .map(|link| link.neighbour)
            } else {
                self.nav.poly_ref_base(from).map(|base| PolyRef(base | (nei - 1) as u64))
            };
            if candidate == Some(to) {
                return Some(EdgeId { poly: from, index: e });
            }
        }
        None
    }

    /// `true` if `edge` is a polygon-boundary edge with no neighbour.
    pub fn edge_is_boundary(&self, edge: EdgeId) -> Option<bool> {
        let n = self.vert_count(edge.poly)?;
        if edge.index >= n {
            return Some(false);
        }
        Some(self.nav.raw_nei(edge.poly, edge.index)? == 0)
    }

    /// The next edge CCW around `edge`'s left face.
    pub fn edge_next_left_edge(&self, edge: EdgeId) -> Option<EdgeId> {
        let face = self.edge_left_face(edge)?;
        let edges = self.face_edges(face)?;
        let k = edges.iter().position(|e| *e == edge)?;
        Some(edges[(k + 1) % 3])
    }

    /// The previous edge CCW around `edge`'s left face (`next` applied
    /// twice, since faces are triangles).
    pub fn edge_prev_left_edge(&self, edge: EdgeId) -> Option<EdgeId> {
        self.edge_next_left_edge(self.edge_next_left_edge(edge)?)
    }

    /// The face to the right of a directed edge.
    pub fn edge_right_face(&self, edge: EdgeId) -> Option<FaceId> {
        self.edge_left_face(self.edge_opposite_edge(edge)?)
    }

    /// The next edge CCW around `edge`'s right face.
    pub fn edge_next_right_edge(&self, edge: EdgeId) -> Option<EdgeId> {
        let e = self.edge_opposite_edge(edge)?;
        let e = self.edge_next_left_edge(e)?;
        let e = self.edge_next_left_edge(e)?;
        self.edge_opposite_edge(e)
    }

    /// The previous edge CCW around `edge`'s right face.
    pub fn edge_prev_right_edge(&self, edge: EdgeId) -> Option<EdgeId> {
        let e = self.edge_opposite_edge(edge)?;
        let e = self.edge_next_left_edge(e)?;
        self.edge_opposite_edge(e)
    }

    /// The three edges bounding `face`, starting from [`Topology::face_edge`].
    pub fn face_inner_edges(&self, face: FaceId) -> Option<[EdgeId; 3]> {
        self.face_edges(face)
    }

    /// The three vertices of `face`, in the same order as
    /// [`Topology::face_inner_edges`].
    pub fn face_vertices(&self, face: FaceId) -> Option<[VertexId; 3]> {
        let edges = self.face_edges(face)?;
        Some([
            self.edge_origin_vertex(edges[0])?,
            self.edge_origin_vertex(edges[1])?,
            self.edge_origin_vertex(edges[2])?,
        ])
    }

    /// The (up to three) faces adjacent to `face`, one per edge, skipping
    /// edges with no right face (unlinked boundary edges).
    pub fn face_neighbour_faces(&self, face: FaceId) -> Option<Vec<FaceId>> {
        let edges = self.face_edges(face)?;
        Some(edges.iter().filter_map(|e| self.edge_right_face(*e)).collect())
    }

    /// Every virtual face of a polygon's triangle fan: `0..=N-3`.
    pub fn poly_internal_faces(&self, poly: PolyRef) -> Option<Vec<FaceId>> {
        let n = self.vert_count(poly)?;
        Some((0..=n - 3).map(|index| FaceId { poly, index }).collect())
    }
}
