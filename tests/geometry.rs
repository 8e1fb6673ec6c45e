use std::f64::consts::FRAC_PI_4;

use glam::Vec3;

use coord3d::MeshConfig;
use coord3d::math::{Axis, CoordinateMapping, EdgeCurveExtractor, ElementMeshBuilder, ElementSpec, Range};
use coord3d::scene::DiagramKind;

fn close(a: [f32; 3], b: [f32; 3]) -> bool {
    Vec3::from(a).distance(Vec3::from(b)) < 1e-4
}

#[test]
fn surface_edge_endpoints_meet_mesh_corners() {
    let diagram = DiagramKind::SphericalSurfaceR.diagram();
    let store = diagram.store();
    let geometry = diagram.build(&store, &MeshConfig::default());
    let (mesh, edges) = geometry.element.unwrap();

    let corners = mesh.corners();
    assert_eq!(corners.len(), 4);
    assert_eq!(edges.len(), 4);
    for end in edges.endpoints() {
        assert!(corners.iter().any(|&c| close(c, end)), "{end:?} is not a corner");
    }
}

#[test]
fn volume_edges_close_around_every_corner() {
    let diagram = DiagramKind::CylindricalVolume.diagram();
    let store = diagram.store();
    let geometry = diagram.build(&store, &MeshConfig::default());
    let (mesh, edges) = geometry.element.unwrap();

    assert_eq!(mesh.faces, 6);
    assert_eq!(edges.len(), 12);
    for corner in mesh.corners() {
        let touching = edges.endpoints().filter(|&e| close(e, corner)).count();
        assert_eq!(touching, 3, "corner {corner:?}");
    }
}

#[test]
fn zero_extent_drops_degenerate_faces() {
    let spec = ElementSpec::volume(
        CoordinateMapping::Cartesian,
        [Range::new(0.0, 1.0), Range::new(0.0, 1.0), Range::fixed(2.0)],
    );

    let mesh = ElementMeshBuilder::new(8).build(&spec);

    assert_eq!(mesh.faces, 2);
    assert!(mesh.mesh.vertices.iter().all(|v| (v[2] - 2.0).abs() < 1e-6));
    assert!(mesh.mesh.normals.iter().flatten().all(|n| n.is_finite()));
}

#[test]
fn element_reaching_the_pole_stays_finite() {
    let spec = ElementSpec::volume(
        CoordinateMapping::Spherical,
        [Range::new(1.0, 1.0), Range::new(0.0, FRAC_PI_4), Range::new(0.0, FRAC_PI_4)],
    );

    let mesh = ElementMeshBuilder::new(12).build(&spec);
    let edges = EdgeCurveExtractor::new(16, 10).extract(&spec);

    assert!(mesh.mesh.vertices.iter().flatten().all(|c| c.is_finite()));
    assert!(edges.curves.iter().flat_map(|c| c.points.iter().flatten()).all(|c| c.is_finite()));
    assert!(edges.curves.iter().any(|c| c.axis == Axis::U));
}
