//! The NavMesh Adapter (component C1): a read-only view over a host navmesh.
//!
//! [`NavMeshAdapter`] is the seam a host engine's own tile store plugs into.
//! [`SimpleNavMesh`] is a minimal concrete implementation, built for tests
//! and for embedders with no tile store of their own; its construction API
//! (`add_tile`, `autolink`) is not part of the C1 contract and may change
//! independently of it.

use crate::MAX_VERTS_PER_POLYGON;
use arrayvec::ArrayVec;
use nalgebra::Vector3;
use radius_nav_math::Vector3Ext;

/// Marks `neis[i]` as resolved through the tile's link list rather than by
/// direct intra-tile index arithmetic.
pub const EXT_LINK_BIT: u16 = 0x8000;

/// Opaque reference to a polygon inside some tile of a navmesh.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct PolyRef(pub u64);

impl PolyRef {
    /// A reference that never resolves to a real polygon.
    pub const NONE: PolyRef = PolyRef(0);

    /// True if this reference could plausibly resolve (zero is reserved).
    #[inline]
    pub fn is_some(self) -> bool {
        self.0 != 0
    }
}

/// A directed connection from one polygon edge to a neighbour polygon.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Link {
    /// The polygon on the other side of the edge.
    pub neighbour: PolyRef,
    /// The edge index on the polygon that owns this link entry.
    pub edge_on_source: u16,
}

/// Ordered ring of vertices plus, per edge, how to find the polygon (if any)
/// across it.
#[derive(Clone, Debug)]
pub struct Poly {
    /// Indices into the owning tile's vertex array.
    pub verts: ArrayVec<u16, { MAX_VERTS_PER_POLYGON as usize }>,
    /// Per-edge neighbour encoding: 0 = boundary, `EXT_LINK_BIT` set =
    /// cross-tile (resolved via the link list), otherwise a 1-based
    /// intra-tile polygon index.
    pub neis: ArrayVec<u16, { MAX_VERTS_PER_POLYGON as usize }>,
}

impl Poly {
    /// Number of vertices (and edges) of this polygon.
    #[inline]
    pub fn vert_count(&self) -> u16 {
        self.verts.len() as u16
    }
}

/// A tile: a self-contained block of polygons sharing one vertex pool and
/// one base reference.
#[derive(Clone, Debug)]
pub struct Tile {
    base: u64,
    verts: Vec<Vector3<f32>>,
    polys: Vec<Poly>,
    links: Vec<Vec<Link>>,
}

/// Read-only accessor over a host navmesh, consumed but never owned by the
/// rest of this crate. All operations are pure reads and must stay
/// consistent for the duration of a single search.
pub trait NavMeshAdapter {
    /// Number of vertices of the polygon `poly_ref` refers to.
    fn vert_count(&self, poly_ref: PolyRef) -> Option<u16>;

    /// Raw `neis[edge]` encoding for the given polygon edge.
    fn raw_nei(&self, poly_ref: PolyRef, edge: u16) -> Option<u16>;

    /// World-space position of the polygon's `vert_index`-th vertex.
    fn vert_pos(&self, poly_ref: PolyRef, vert_index: u16) -> Option<Vector3<f32>>;

    /// The link list of the polygon, in the order the host stores it.
    fn links(&self, poly_ref: PolyRef) -> Vec<Link>;

    /// Base reference of the tile owning `poly_ref`, used to compose
    /// intra-tile neighbour references from a 1-based `neis` value.
    fn poly_ref_base(&self, poly_ref: PolyRef) -> Option<u64>;

    /// All polygon references known to this navmesh, used by
    /// [`crate::query::NavMeshQuery::find_nearest_face`] to scan candidates.
    fn all_polys(&self) -> Vec<PolyRef>;
}

/// Minimal concrete [`NavMeshAdapter`]: a flat `Vec` of tiles, each owning
/// its polygons, vertices and per-polygon link lists.
#[derive(Clone, Debug, Default)]
pub struct SimpleNavMesh {
    tiles: Vec<Tile>,
}

impl SimpleNavMesh {
    /// Creates an empty navmesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tile built from a vertex pool and a set of polygons (each a
    /// CCW ring of indices into `verts`). Returns the `PolyRef` of every
    /// polygon added, in order. Boundary/intra-tile linkage is left at the
    /// default (all edges boundary) until [`SimpleNavMesh::autolink`] runs.
    pub fn add_tile(&mut self, verts: Vec<Vector3<f32>>, polys: Vec<Vec<u16>>) -> Vec<PolyRef> {
        let tile_index = self.tiles.len() as u64;
        let base = tile_index << 32;
        let poly_count = polys.len();
        let tile_polys: Vec<Poly> = polys
            .into_iter()
            .map(|ring| {
                let mut verts = ArrayVec::new();
                verts.extend(ring);
                let mut neis = ArrayVec::new();
                neis.extend(std::iter::repeat(0u16).take(verts.len()));
                Poly { verts, neis }
            })
            .collect();
        self.tiles.push(Tile {
            base,
            verts,
            polys: tile_polys,
            links: vec![Vec::new(); poly_count],
        });
        (0..poly_count as u64)
            .map(|i| PolyRef(base | i))
            .collect()
    }

    /// Scans every pair of boundary edges across all tiles and links the
    /// ones that share endpoints in reverse winding order: same-tile pairs
    /// get a direct 1-based `neis` index, cross-tile pairs get
    /// [`EXT_LINK_BIT`] plus reciprocal link-list entries.
    pub fn autolink(&mut self) {
        const EPS_SQ: f32 = 1e-6;

        #[derive(Copy, Clone)]
        struct Candidate {
            tile: usize,
            poly: usize,
            edge: u16,
            a: Vector3<f32>,
            b: Vector3<f32>,
        }

        let mut candidates = Vec::new();
        for (tile_idx, tile) in self.tiles.iter().enumerate() {
            for (poly_idx, poly) in tile.polys.iter().enumerate() {
                let n = poly.vert_count();
                for e in 0..n {
                    if poly.neis[e as usize] != 0 {
                        continue;
                    }
                    let a = tile.verts[poly.verts[e as usize] as usize];
                    let b = tile.verts[poly.verts[((e + 1) % n) as usize] as usize];
                    candidates.push(Candidate {
                        tile: tile_idx,
                        poly: poly_idx,
                        edge: e,
                        a,
                        b,
                    });
                }
            }
        }

        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let (lo, hi) = (candidates[i], candidates[j]);
                if lo.tile == hi.tile && lo.poly == hi.poly {
                    continue;
                }
                if lo.a.sqr_distance(&hi.b) > EPS_SQ || lo.b.sqr_distance(&hi.a) > EPS_SQ {
                    continue;
                }
                if self.tiles[lo.tile].polys[lo.poly].neis[lo.edge as usize] != 0
                    || self.tiles[hi.tile].polys[hi.poly].neis[hi.edge as usize] != 0
                {
                    continue;
                }
                if lo.tile == hi.tile {
                    self.tiles[lo.tile].polys[lo.poly].neis[lo.edge as usize] =
                        hi.poly as u16 + 1;
                    self.tiles[hi.tile].polys[hi.poly].neis[hi.edge as usize] =
                        lo.poly as u16 + 1;
                } else {
                    let lo_ref = PolyRef(self.tiles[lo.tile].base | lo.poly as u64);
                    let hi_ref = PolyRef(self.tiles[hi.tile].base | hi.poly as u64);
                    self.tiles[lo.tile].polys[lo.poly].neis[lo.edge as usize] = EXT_LINK_BIT;
                    self.tiles[hi.tile].polys[hi.poly].neis[hi.edge as usize] = EXT_LINK_BIT;
                    self.tiles[lo.tile].links[lo.poly].push(Link {
                        neighbour: hi_ref,
                        edge_on_source: lo.edge,
                    });
                    self.tiles[hi.tile].links[hi.poly].push(Link {
                        neighbour: lo_ref,
                        edge_on_source: hi.edge,
                    });
                }
            }
        }
    }

    fn decode(poly_ref: PolyRef) -> (usize, usize) {
        ((poly_ref.0 >> 32) as usize, (poly_ref.0 & 0xFFFF_FFFF) as usize)
    }

    fn poly(&self, poly_ref: PolyRef) -> Option<&Poly> {
        let (tile, poly) = Self::decode(poly_ref);
        self.tiles.get(tile)?.polys.get(poly)
    }
}

impl NavMeshAdapter for SimpleNavMesh {
    fn vert_count(&self, poly_ref: PolyRef) -> Option<u16> {
        self.poly(poly_ref).map(Poly::vert_count)
    }

    fn raw_nei(&self, poly_ref: PolyRef, edge: u16) -> Option<u16> {
        self.poly(poly_ref)?.neis.get(edge as usize).copied()
    }

    fn vert_pos(&self, poly_ref: PolyRef, vert_index: u16) -> Option<Vector3<f32>> {
        let (tile, _) = Self::decode(poly_ref);
        let poly = self.poly(poly_ref)?;
        let vert = *poly.verts.get(vert_index as usize)?;
        self.tiles[tile].verts.get(vert as usize).copied()
    }

    fn links(&self, poly_ref: PolyRef) -> Vec<Link> {
        let (tile, poly) = Self::decode(poly_ref);
        self.tiles
            .get(tile)
            .and_then(|t| t.links.get(poly))
            .cloned()
            .unwrap_or_default()
    }

    fn poly_ref_base(&self, poly_ref: PolyRef) -> Option<u64> {
        let (tile, _) = Self::decode(poly_ref);
        self.tiles.get(tile).map(|t| t.base)
    }

    fn all_polys(&self) -> Vec<PolyRef> {
        self.tiles
            .iter()
            .enumerate()
            .flat_map(|(tile_idx, tile)| {
                let base = tile.base;
                (0..tile.polys.len() as u64).map(move |i| PolyRef(base | i))
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_triangles() -> SimpleNavMesh {
        let verts = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, -1.0),
        ];
        let mut mesh = SimpleNavMesh::new();
        mesh.add_tile(verts, vec![vec![0, 1, 2], vec![1, 0, 3]]);
        mesh.autolink();
        mesh
    }

    #[test]
    fn autolink_finds_shared_edge() {
        let mesh = two_triangles();
        let a = PolyRef(0);
        let b = PolyRef(1);
        assert_eq!(mesh.raw_nei(a, 0), Some(2));
        assert_eq!(mesh.raw_nei(b, 0), Some(1));
        assert_eq!(mesh.raw_nei(a, 1), Some(0));
        assert_eq!(mesh.raw_nei(a, 2), Some(0));
    }

    #[test]
    fn vert_pos_resolves_through_poly() {
        let mesh = two_triangles();
        assert_eq!(mesh.vert_pos(PolyRef(0), 0), Some(Vector3::new(0.0, 0.0, 0.0)));
        assert_eq!(mesh.vert_pos(PolyRef(1), 0), Some(Vector3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn cross_tile_linking_uses_ext_link_bit() {
        let mut mesh = SimpleNavMesh::new();
        // t0 edge 1 runs (1,0,0) -> (0,0,1).
        let t0 = mesh.add_tile(
            vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)],
            vec![vec![0, 1, 2]],
        );
        // t1 edge 0 runs (0,0,1) -> (1,0,0), the reverse of t0's edge 1.
        let t1 = mesh.add_tile(
            vec![Vector3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 1.0)],
            vec![vec![0, 1, 2]],
        );
        mesh.autolink();
        assert_eq!(mesh.raw_nei(t0[0], 1), Some(EXT_LINK_BIT));
        let links = mesh.links(t0[0]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].neighbour, t1[0]);
        assert_eq!(links[0].edge_on_source, 1);
    }
}
