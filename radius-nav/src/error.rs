//! Internal error type used with `?` across the pipeline before it is folded
//! into a [`crate::status::Status`] at the public entry points.

use std::fmt::{Display, Formatter};

/// Failure modes produced by the topology, clearance, search and funnel
/// stages. None of these are caller-visible directly; [`crate::query`]
/// translates each variant into the matching [`crate::status::Status`] bit.
#[derive(Clone, Debug)]
pub enum NavError {
    /// A polygon reference did not resolve through the navmesh adapter.
    InvalidPolyRef,
    /// A vertex/edge/face handle fell outside of the polygon's valid range.
    InvalidPrimitive,
    /// The two edges passed to the clearance oracle share no vertex.
    NoPivotVertex,
    /// A search or funnel parameter failed a precondition check.
    InvalidParam(&'static str),
    /// The face graph contains no path from start to end.
    NoPath,
    /// The node pool was exhausted before the search could finish.
    OutOfNodes,
    /// An output collection would have exceeded its declared capacity.
    BufferTooSmall,
    /// The funnel's vertex-side cache could not match a portal's endpoints
    /// against the previous one; the pivot-continuity assumption broke.
    FunnelVertexMismatch,
}

impl Display for NavError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NavError::InvalidPolyRef => write!(f, "polygon reference did not resolve"),
            NavError::InvalidPrimitive => write!(f, "primitive handle out of range"),
            NavError::NoPivotVertex => write!(f, "edges share no pivot vertex"),
            NavError::InvalidParam(what) => write!(f, "invalid parameter: {what}"),
            NavError::NoPath => write!(f, "no path between start and end face"),
            NavError::OutOfNodes => write!(f, "search node pool exhausted"),
            NavError::BufferTooSmall => write!(f, "output would exceed declared capacity"),
            NavError::FunnelVertexMismatch => {
                write!(f, "funnel could not identify the shared pivot vertex")
            }
        }
    }
}

impl std::error::Error for NavError {}
