//! Radius-aware pathfinding over a polygon navigation mesh.
//!
//! A navmesh polygon of up to [`MAX_VERTS_PER_POLYGON`] vertices is presented
//! as a virtual fan of triangles ("faces") without ever materialising new
//! storage; a clearance oracle ([`clearance::is_walkable_by_radius`]) decides
//! whether a disc of a given radius can pass through a face corner, A*
//! ([`astar`]) searches the resulting face graph, and a funnel string-pull
//! ([`funnel`]) turns the face corridor into a polyline that the radius
//! modifier ([`modifier`]) then insets by the agent radius.
//!
//! The crate only ever reads a navmesh through the [`mesh::NavMeshAdapter`]
//! trait; [`mesh::SimpleNavMesh`] is a minimal concrete implementation for
//! hosts and tests that do not already have a tile store of their own.

#![warn(missing_docs)]

pub mod clearance;
pub mod error;
pub mod funnel;
pub mod log;
pub mod mesh;
pub mod modifier;
pub mod query;
pub mod status;
pub mod topology;

mod astar;

pub use error::NavError;
pub use mesh::{Link, NavMeshAdapter, Poly, PolyRef, SimpleNavMesh};
pub use query::{Filter, NavMeshQuery, NoFilter};
pub use status::Status;
pub use topology::{EdgeId, FaceId, VertexId};

/// Largest vertex count a polygon may have. Polygons ranging from triangles
/// (3) up to hexagons (6) are supported.
pub const MAX_VERTS_PER_POLYGON: u16 = 6;

/// Scales the A* heuristic so that ties between equal-cost paths favour the
/// one discovered first, avoiding needless re-expansion.
pub const H_SCALE: f32 = 0.999;

/// Below this squared length a segment collapses to a single point.
pub const DEGENERATE_SQR_LEN: f32 = radius_nav_math::DEGENERATE_SQR_LEN;
