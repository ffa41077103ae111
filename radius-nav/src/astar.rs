//! A* search (component C5): priority-queue search over the virtual face
//! graph, gated by the clearance oracle (C4) and an external cost filter,
//! yielding a face corridor and its portal-edge sequence.

use crate::clearance::is_walkable_by_radius;
use crate::log::Log;
use crate::mesh::NavMeshAdapter;
use crate::query::Filter;
use crate::status::Status;
use crate::topology::{EdgeId, FaceId, Topology};
use crate::H_SCALE;
use fxhash::FxHashMap;
use nalgebra::Vector3;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

bitflags::bitflags! {
    #[derive(Copy, Clone, Default)]
    struct NodeFlags: u8 {
        const OPEN = 1 << 0;
        const CLOSED = 1 << 1;
    }
}

struct Node {
    face: FaceId,
    pos: Vector3<f32>,
    cost: f32,
    total: f32,
    parent: Option<usize>,
    entry_edge: Option<EdgeId>,
    flags: NodeFlags,
}

struct OpenEntry {
    total: f32,
    idx: usize,
}

impl Eq for OpenEntry {}
impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.total == other.total
    }
}
impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest total first.
        other.total.total_cmp(&self.total)
    }
}
impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn face_key(face: FaceId) -> (u64, u16) {
    (face.poly.0, face.index)
}

/// The corridor of faces and the portal edges between them, with the
/// outcome status. `portals.len() == faces.len() - 1` whenever `faces` is
/// non-empty.
pub struct PathResult {
    /// Faces from (nearest-reached) start to (nearest-reached) end.
    pub faces: Vec<FaceId>,
    /// Portal edge shared by consecutive faces, one fewer than `faces`.
    pub portals: Vec<EdgeId>,
    /// Outcome of the search.
    pub status: Status,
}

struct NodePool {
    nodes: Vec<Node>,
    index_of: FxHashMap<(u64, u16), usize>,
    max_nodes: Option<usize>,
}

impl NodePool {
    fn new(max_nodes: Option<usize>) -> Self {
        Self {
            nodes: Vec::new(),
            index_of: FxHashMap::default(),
            max_nodes,
        }
    }

    fn get(&self, face: FaceId) -> Option<usize> {
        self.index_of.get(&face_key(face)).copied()
    }

    /// Returns the pool slot for `face`, creating one if needed. `None` if
    /// the pool's node budget is exhausted.
    fn get_or_create(&mut self, face: FaceId) -> Option<usize> {
        if let Some(idx) = self.get(face) {
            return Some(idx);
        }
        if let Some(max) = self.max_nodes {
            if self.nodes.len() >= max {
                return None;
            }
        }
        let idx = self.nodes.len();
        self.nodes.push(Node {
            face,
            pos: Vector3::zeros(),
            cost: f32::MAX,
            total: f32::MAX,
            parent: None,
            entry_edge: None,
            flags: NodeFlags::empty(),
        });
        self.index_of.insert(face_key(face), idx);
        Some(idx)
    }
}

/// Runs A* from `start_face` to `end_face` over the virtual face graph.
///
/// `max_path_faces == 0` means unbounded; `max_search_nodes` bounds the
/// node pool the same way (`None` disables the cap).
#[allow(clippy::too_many_arguments)]
pub fn find_path_by_radius<A: NavMeshAdapter, F: Filter>(
    topo: &Topology<'_, A>,
    start_face: FaceId,
    end_face: FaceId,
    start_pos: Vector3<f32>,
    end_pos: Vector3<f32>,
    filter: &F,
    radius: f32,
    max_path_faces: usize,
    max_search_nodes: Option<usize>,
) -> PathResult {
    if radius <= 0.01 || !start_pos.iter().all(|c| c.is_finite()) || !end_pos.iter().all(|c| c.is_finite()) {
        return PathResult {
            faces: Vec::new(),
            portals: Vec::new(),
            status: Status::FAILURE | Status::INVALID_PARAM,
        };
    }

    if start_face == end_face {
        return PathResult {
            faces: vec![start_face],
            portals: Vec::new(),
            status: Status::SUCCESS,
        };
    }

    let mut pool = NodePool::new(max_search_nodes);
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut out_of_nodes = false;

    let start_idx = pool.get_or_create(start_face).expect("first node always fits");
    {
        let h = (start_pos - end_pos).norm();
        let node = &mut pool.nodes[start_idx];
        node.pos = start_pos;
        node.cost = 0.0;
        node.total = h * H_SCALE;
        node.flags = NodeFlags::OPEN;
    }
    open.push(OpenEntry { total: pool.nodes[start_idx].total, idx: start_idx });

    let mut last_best_idx = start_idx;
    let mut last_best_h = (start_pos - end_pos).norm();
    let mut success = false;

    while let Some(OpenEntry { total, idx }) = open.pop() {
        if pool.nodes[idx].total != total || pool.nodes[idx].flags.contains(NodeFlags::CLOSED) {
            continue;
        }
        pool.nodes[idx].flags = NodeFlags::CLOSED;

        let best_face = pool.nodes[idx].face;
        if best_face == end_face {
            last_best_idx = idx;
            success = true;
            break;
        }

        let best_pos = pool.nodes[idx].pos;
        let best_cost = pool.nodes[idx].cost;
        let best_entry_edge = pool.nodes[idx].entry_edge;
        let parent_face = pool.nodes[idx].parent.map(|p| pool.nodes[p].face);

        let Some(edges) = topo.face_edges(best_face) else {
            continue;
        };

        for edge in edges {
            let Some(neighbour) = topo.edge_right_face(edge) else {
                continue;
            };
            if neighbour == best_face || Some(neighbour) == parent_face {
                continue;
            }
            if !filter.pass_filter(neighbour) {
                continue;
            }
            if let Some(entry_edge) = best_entry_edge {
                match is_walkable_by_radius(topo, radius, entry_edge, best_face, edge) {
                    Ok(true) => {}
                    Ok(false) | Err(_) => continue,
                }
            }

            let (ea, eb) = match topo.edge_vertices(edge).and_then(|(o, d)| {
                Some((topo.vertex_pos(o)?, topo.vertex_pos(d)?))
            }) {
                Some(pair) => pair,
                None => continue,
            };
            let neighbour_pos = radius_nav_math::closest_point_on_segment(best_pos, ea, eb);

            let is_goal = neighbour == end_face;
            let mut cost = best_cost + filter.get_cost(best_pos, neighbour_pos, parent_face, best_face, Some(neighbour));
            let h;
            if is_goal {
                cost += filter.get_cost(neighbour_pos, end_pos, Some(best_face), neighbour, None);
                h = 0.0;
            } else {
                h = (neighbour_pos - end_pos).norm();
            }
            let total = cost + h * H_SCALE;

            let Some(n_idx) = pool.get_or_create(neighbour) else {
                out_of_nodes = true;
                continue;
            };
            let existing = &pool.nodes[n_idx];
            if existing.flags.intersects(NodeFlags::OPEN | NodeFlags::CLOSED) && total >= existing.total {
                continue;
            }

            let entry_for_neighbour = topo.edge_opposite_edge(edge).unwrap_or(edge);
            {
                let node = &mut pool.nodes[n_idx];
                node.pos = neighbour_pos;
                node.cost = cost;
                node.total = total;
                node.parent = Some(idx);
                node.entry_edge = Some(entry_for_neighbour);
                node.flags = NodeFlags::OPEN;
            }
            open.push(OpenEntry { total, idx: n_idx });

            if h < last_best_h {
                last_best_h = h;
                last_best_idx = n_idx;
            }
        }
    }

    let mut status = if success {
        Status::SUCCESS
    } else {
        Log::warn("findPathByRadius: goal unreachable, returning partial path");
        Status::SUCCESS | Status::PARTIAL_RESULT
    };
    if out_of_nodes {
        status |= Status::OUT_OF_NODES;
        Log::warn("findPathByRadius: node pool exhausted during search");
    }

    let mut faces = Vec::new();
    let mut portals = Vec::new();
    let mut cur = Some(last_best_idx);
    while let Some(idx) = cur {
        faces.push(pool.nodes[idx].face);
        if let Some(entry_edge) = pool.nodes[idx].entry_edge {
            portals.push(entry_edge);
        }
        cur = pool.nodes[idx].parent;
    }
    faces.reverse();
    portals.reverse();

    if max_path_faces > 0 && faces.len() > max_path_faces {
        let drop = faces.len() - max_path_faces;
        faces.drain(0..drop);
        let portal_drop = drop.min(portals.len());
        portals.drain(0..portal_drop);
        status |= Status::BUFFER_TOO_SMALL;
    }

    PathResult { faces, portals, status }
}
