//! Randomised end-to-end coverage over a fully-connected grid navmesh,
//! grounded on the teacher's own `astar_random_points` test (a 40x40 grid of
//! linked vertices, 1000 random start/end pairs, checked for a non-empty,
//! properly-anchored path every time).

use rand::Rng;
use radius_nav::{NavMeshQuery, NoFilter, SimpleNavMesh};

const GRID_SIZE: usize = 4;

fn grid_mesh() -> SimpleNavMesh {
    let mut verts = Vec::new();
    for z in 0..=GRID_SIZE {
        for x in 0..=GRID_SIZE {
            verts.push(nalgebra::Vector3::new(x as f32, 0.0, z as f32));
        }
    }

    let idx = |x: usize, z: usize| (z * (GRID_SIZE + 1) + x) as u16;
    let mut polys = Vec::new();
    for z in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            polys.push(vec![
                idx(x, z),
                idx(x + 1, z),
                idx(x + 1, z + 1),
                idx(x, z + 1),
            ]);
        }
    }

    let mut mesh = SimpleNavMesh::new();
    mesh.add_tile(verts, polys);
    mesh.autolink();
    mesh
}

#[test]
fn random_points_always_connect_on_a_full_grid() {
    let mesh = grid_mesh();
    let query = NavMeshQuery::new(&mesh);
    let mut rng = rand::thread_rng();

    let mut paths_with_more_than_one_face = 0;

    for _ in 0..200 {
        let start_pos = nalgebra::Vector3::new(
            rng.gen_range(0.05..(GRID_SIZE as f32 - 0.05)),
            0.0,
            rng.gen_range(0.05..(GRID_SIZE as f32 - 0.05)),
        );
        let end_pos = nalgebra::Vector3::new(
            rng.gen_range(0.05..(GRID_SIZE as f32 - 0.05)),
            0.0,
            rng.gen_range(0.05..(GRID_SIZE as f32 - 0.05)),
        );

        let (start_face, start_snap) = query.find_nearest_face(start_pos).unwrap();
        let (end_face, end_snap) = query.find_nearest_face(end_pos).unwrap();

        let path = query.find_path_by_radius(
            start_face,
            end_face,
            start_snap,
            end_snap,
            &NoFilter,
            0.1,
            0,
            None,
        );
        assert!(path.status.succeeded(), "grid is fully connected, every pair must resolve");
        assert!(!path.faces.is_empty());
        assert_eq!(*path.faces.first().unwrap(), start_face);
        assert_eq!(*path.faces.last().unwrap(), end_face);

        if path.faces.len() > 1 {
            paths_with_more_than_one_face += 1;
        }

        let straight = query.straight_path_by_radius(&path, start_snap, end_snap, 0.1, 0);
        assert!(straight.status.succeeded());
        assert_eq!(*straight.points.first().unwrap(), start_snap);
        assert_eq!(*straight.points.last().unwrap(), end_snap);

        // Every leg of the pulled path must stay within the grid's own
        // diagonal, never ballooning out past what a taut string over this
        // corridor could possibly need.
        let diagonal = (GRID_SIZE as f32) * std::f32::consts::SQRT_2;
        for pair in straight.points.windows(2) {
            assert!((pair[1] - pair[0]).norm() <= diagonal);
        }
    }

    assert!(paths_with_more_than_one_face > 0);
}
