mod support;

use meshshatter::{
    HierarchySet, MeshPass, ShatterConfig, ShatterError, ShatterSource, ShatterSystem, SourceMesh,
    UnsupportedReason,
    float_types::{Color, Real, parry3d::bounding_volume::BoundingSphere},
};
use nalgebra::{Isometry3, Point3, Vector2, Vector3};
use std::sync::Arc;

use crate::support::{
    approx_eq, single_plane_pattern, single_plane_patterns, straight_down, triangle_area,
    unit_scale_mesh,
};

fn seeded() -> ShatterSystem<&'static str> {
    let mut system = ShatterSystem::new(ShatterConfig::default().with_seed(7));
    assert_eq!(system.initialize(&single_plane_patterns()), 1);
    system
}

fn above_plane() -> SourceMesh<&'static str> {
    unit_scale_mesh(
        &[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]],
        vec![[0, 1, 2]],
    )
}

fn across_plane() -> SourceMesh<&'static str> {
    unit_scale_mesh(
        &[[0.0, 0.0, -1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]],
        vec![[0, 1, 2]],
    )
}

#[test]
fn triangle_in_front_of_the_plane_stays_whole() {
    let mut system = seeded();
    let mesh = above_plane();
    let (point, direction) = straight_down();

    assert_eq!(system.shatter(&mesh, &point, &direction), Ok(1));
    let fragment = system.peek_fragment(0).unwrap();
    assert_eq!(fragment.leaf, 0);
    assert_eq!(fragment.vertex_count(), 3);
    assert_eq!(fragment.triangles, vec![[0, 1, 2]]);

    // same vertices in the same order, back in the world
    for i in 0..3 {
        let world = fragment.world_position(i);
        let source = mesh.vertex_position(i);
        assert!((world - source).norm() < 1e-5, "{world} != {source}");
    }
}

#[test]
fn spanning_triangle_is_split_between_two_fragments() {
    let mut system = seeded();
    let mesh = across_plane();
    let (point, direction) = straight_down();

    assert_eq!(system.shatter(&mesh, &point, &direction), Ok(2));

    let fragments = system.fragments();
    let triangles: usize = fragments.iter().map(|f| f.triangle_count()).sum();
    assert_eq!(triangles, 3);

    let area: Real = fragments.iter().map(|f| f.area()).sum();
    let source_area = triangle_area(
        &mesh.positions[0],
        &mesh.positions[1],
        &mesh.positions[2],
    );
    assert!(approx_eq(area, source_area, 1e-5));

    for fragment in fragments {
        for i in 0..fragment.vertex_count() {
            let z = fragment.world_position(i).z;
            match fragment.leaf {
                0 => assert!(z > -1e-4),
                _ => assert!(z < 1e-4),
            }
        }
    }
}

#[test]
fn unsupported_mesh_leaves_batch_untouched() {
    let mut system = seeded();
    let (point, direction) = straight_down();
    assert_eq!(system.shatter(&across_plane(), &point, &direction), Ok(2));
    let before = system.get_fragment(0).unwrap();

    let mut mesh = above_plane();
    mesh.passes[0].per_polygon_shaders = true;
    assert_eq!(
        system.shatter(&mesh, &point, &direction),
        Err(ShatterError::UnsupportedMesh {
            mesh: "test-mesh".to_string(),
            reason: UnsupportedReason::ShaderArray(0),
        })
    );
    assert_eq!(system.fragment_count(), 2);
    assert!(Arc::ptr_eq(&before, &system.get_fragment(0).unwrap()));
}

#[test]
fn other_unsupported_meshes() {
    let mut system = seeded();
    let (point, direction) = straight_down();

    let mut textured = above_plane();
    textured.passes[0].per_polygon_textures[1] = true;
    assert!(matches!(
        system.shatter(&textured, &point, &direction),
        Err(ShatterError::UnsupportedMesh {
            reason: UnsupportedReason::TextureArray { pass: 0, stage: 1 },
            ..
        })
    ));

    let mut materials = above_plane();
    materials.passes[0].per_polygon_materials = true;
    assert!(matches!(
        system.shatter(&materials, &point, &direction),
        Err(ShatterError::UnsupportedMesh {
            reason: UnsupportedReason::MaterialArray(0),
            ..
        })
    ));

    let mut passes = above_plane();
    for _ in 0..4 {
        passes.passes.push(MeshPass::new("extra"));
    }
    assert!(matches!(
        system.shatter(&passes, &point, &direction),
        Err(ShatterError::UnsupportedMesh {
            reason: UnsupportedReason::TooManyPasses(5),
            ..
        })
    ));
    assert_eq!(system.fragment_count(), 0);
}

#[test]
fn no_patterns_is_a_no_op() {
    let (point, direction) = straight_down();

    let mut empty: ShatterSystem<&'static str> = ShatterSystem::new(ShatterConfig::default());
    assert_eq!(empty.initialize(&HierarchySet::new()), 0);
    assert_eq!(
        empty.shatter(&above_plane(), &point, &direction),
        Err(ShatterError::NoPatterns)
    );
    assert_eq!(empty.fragment_count(), 0);

    // unloading patterns keeps the last batch
    let mut system = seeded();
    assert_eq!(system.shatter(&across_plane(), &point, &direction), Ok(2));
    system.initialize(&HierarchySet::new());
    assert_eq!(
        system.shatter(&above_plane(), &point, &direction),
        Err(ShatterError::NoPatterns)
    );
    assert_eq!(system.fragment_count(), 2);
}

#[test]
fn degenerate_requests_leave_batch_untouched() {
    let mut system = seeded();
    let (point, direction) = straight_down();
    assert_eq!(system.shatter(&above_plane(), &point, &direction), Ok(1));

    let tiny = above_plane().with_bounding_sphere(BoundingSphere::new(Point3::origin(), 0.0));
    assert!(matches!(
        system.shatter(&tiny, &point, &direction),
        Err(ShatterError::DegenerateBoundingRadius { .. })
    ));
    assert_eq!(
        system.shatter(&above_plane(), &point, &Vector3::zeros()),
        Err(ShatterError::DegenerateDirection)
    );
    assert_eq!(system.fragment_count(), 1);
}

#[test]
fn new_batch_replaces_old_but_handles_survive() {
    let mut system = seeded();
    let (point, direction) = straight_down();

    assert_eq!(system.shatter(&across_plane(), &point, &direction), Ok(2));
    let kept = system.get_fragment(1).unwrap();
    assert_eq!(Arc::strong_count(&kept), 2);

    assert_eq!(system.shatter(&above_plane(), &point, &direction), Ok(1));
    assert_eq!(Arc::strong_count(&kept), 1);
    assert_eq!(kept.leaf, 1);
    assert!(system.get_fragment(1).is_none());
    assert!(system.peek_fragment(1).is_none());

    system.release_fragments();
    assert_eq!(system.fragment_count(), 0);
    assert!(system.get_fragment(0).is_none());
}

#[test]
fn fragments_carry_materials_colors_and_uvs() {
    let mut system = seeded();
    let (point, direction) = straight_down();

    let direct = vec![Color::new(0.5, 1.0, 1.0, 0.25); 3];
    let illumination = vec![Color::new(0.5, 0.5, 1.0, 1.0); 3];
    let uvs = vec![
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(0.0, 1.0),
    ];

    let mut mesh = above_plane().with_sorting(true);
    mesh.passes[0] = MeshPass::new("stone")
        .with_direct_colors(direct)
        .with_illumination_colors(illumination)
        .with_uvs(0, uvs.clone());
    mesh.passes.push(MeshPass::new("moss"));

    assert_eq!(system.shatter(&mesh, &point, &direction), Ok(1));
    let fragment = system.peek_fragment(0).unwrap();
    assert!(fragment.sorted);
    assert_eq!(fragment.materials, vec![Some("stone"), Some("moss")]);

    for (i, v) in fragment.vertices.iter().enumerate() {
        let color = v.colors[0].expect("pass 0 has colors");
        assert!(approx_eq(color.x, 0.25, 1e-6));
        assert!(approx_eq(color.y, 0.5, 1e-6));
        assert!(approx_eq(color.z, 1.0, 1e-6));
        assert!(approx_eq(color.w, 0.25, 1e-6));
        assert_eq!(v.colors[1], None);

        assert_eq!(v.uv[0][0], Some(uvs[i]));
        assert_eq!(v.uv[0][1], None);
        assert_eq!(v.uv[1][0], None);
        assert!(approx_eq(v.normal.z, 1.0, 1e-6));
    }
}

#[test]
fn illumination_only_is_modulated_by_white() {
    let mut system = seeded();
    let (point, direction) = straight_down();

    let mut mesh = above_plane();
    mesh.passes[0].illumination_colors = Some(vec![Color::new(0.2, 0.4, 0.6, 0.5); 3]);

    assert_eq!(system.shatter(&mesh, &point, &direction), Ok(1));
    let color = system.peek_fragment(0).unwrap().vertices[0].colors[0].unwrap();
    assert!(approx_eq(color.x, 0.2, 1e-6));
    assert!(approx_eq(color.z, 0.6, 1e-6));
    assert!(approx_eq(color.w, 1.0, 1e-6));
}

#[test]
fn fragments_stay_where_the_mesh_was() {
    let mut system = seeded();
    let placement = Isometry3::new(Vector3::new(10.0, -3.0, 2.0), Vector3::new(0.3, 0.0, 0.9));
    let mut mesh = across_plane();
    mesh.transform = placement;

    // impact at the object origin along object -Z
    let point = placement * Point3::origin();
    let direction = placement * Vector3::new(0.0, 0.0, -1.0);

    assert_eq!(system.shatter(&mesh, &point, &direction), Ok(2));
    for fragment in system.fragments() {
        let center = fragment.bounding_box.center();
        assert!(center.coords.norm() < 1e-5);
        for i in 0..fragment.vertex_count() {
            // back in object space every vertex lies on the source triangle's plane
            let object = placement.inverse() * fragment.world_position(i);
            let a = mesh.positions[0];
            let normal = (mesh.positions[1] - a).cross(&(mesh.positions[2] - a)).normalize();
            assert!((object - a).dot(&normal).abs() < 1e-5);
        }
    }

    let area: Real = system.fragments().iter().map(|f| f.area()).sum();
    assert!(approx_eq(area, 1.5, 1e-5));
}

#[test]
fn unsplit_fragment_matches_source_under_placement() {
    let mut system = seeded();
    let placement = Isometry3::new(Vector3::new(-4.0, 7.0, 1.0), Vector3::new(0.0, 0.6, 0.2));
    let mut mesh = above_plane();
    mesh.transform = placement;

    let point = placement * Point3::origin();
    let direction = placement * Vector3::new(0.0, 0.0, -1.0);

    assert_eq!(system.shatter(&mesh, &point, &direction), Ok(1));
    let fragment = system.peek_fragment(0).unwrap();
    for i in 0..3 {
        let expected = placement * mesh.positions[i];
        assert!((fragment.world_position(i) - expected).norm() < 1e-5);
    }
}

#[test]
fn same_seed_same_patterns() {
    let patterns: HierarchySet = [
        single_plane_pattern("pattern0", 0.0),
        single_plane_pattern("pattern1", 4.0),
        single_plane_pattern("pattern2", -4.0),
    ]
    .into_iter()
    .collect();
    let (point, direction) = straight_down();
    let mesh = across_plane();

    let run = |seed| {
        let mut system = ShatterSystem::new(ShatterConfig::default().with_seed(seed));
        assert_eq!(system.initialize(&patterns), 3);
        (0..60)
            .map(|_| {
                let count = system.shatter(&mesh, &point, &direction).unwrap();
                let leaf = system.peek_fragment(0).unwrap().leaf;
                (count, leaf)
            })
            .collect::<Vec<_>>()
    };

    let first = run(42);
    assert_eq!(first, run(42));
    // every pattern gets picked at some point
    assert!(first.contains(&(2, 0)));
    assert!(first.contains(&(1, 0)));
    assert!(first.contains(&(1, 1)));
}

#[test]
fn shutdown_drops_everything() {
    let mut system = seeded();
    let (point, direction) = straight_down();
    assert_eq!(system.shatter(&above_plane(), &point, &direction), Ok(1));

    system.shutdown();
    assert_eq!(system.fragment_count(), 0);
    assert!(system.patterns().is_empty());
    assert_eq!(
        system.shatter(&above_plane(), &point, &direction),
        Err(ShatterError::NoPatterns)
    );
}

#[test]
fn unusable_source_triangles_are_skipped() {
    let mut system = seeded();
    let (point, direction) = straight_down();

    // [0, 1, 3] is collinear and [0, 2, 9] refers to a missing vertex
    let mesh = unit_scale_mesh(
        &[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0], [2.0, 0.0, 1.0]],
        vec![[0, 1, 2], [0, 1, 3], [0, 2, 9]],
    );

    assert_eq!(system.shatter(&mesh, &point, &direction), Ok(1));
    let fragment = system.peek_fragment(0).unwrap();
    assert_eq!(fragment.triangle_count(), 1);
    assert_eq!(fragment.vertex_count(), 3);
    assert!(approx_eq(fragment.area(), 0.5, 1e-6));
}
