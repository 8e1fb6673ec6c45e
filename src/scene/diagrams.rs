use glam::{DVec3, Vec3};

use crate::config::MeshConfig;
use crate::math::primitives::{self, Arrow};
use crate::math::{
    Axis, CoordinateMapping, EdgeCurveExtractor, EdgeCurveSet, ElementMesh, ElementMeshBuilder,
    ElementSpec, Range, TriangleMesh,
};
use crate::scene::params::{ExtentConstraint, ParameterSpec, ParameterStore};
use crate::scene::surface::{Material, Topology};

pub const ELEMENT_MATERIAL: Material = Material::lit([0.4, 0.494, 0.918, 0.8]);
pub const INK: Material = Material::flat([0.0, 0.0, 0.0, 1.0]);
pub const GUIDE: Material = Material::flat([0.35, 0.35, 0.35, 1.0]);
pub const MARKER: Material = Material::lit([0.9, 0.1, 0.1, 1.0]);

const BASIS_ARROW: (f32, f32, f32) = (0.8, 0.2, 0.15);
const NORMAL_ARROW: (f32, f32, f32) = (1.0, 0.3, 0.2);
const DASH: f32 = 0.1;
const GAP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    CartesianPoint,
    CartesianVolume,
    CylindricalPoint,
    CylindricalSurfaceR,
    CylindricalSurfaceZ,
    CylindricalVolume,
    SphericalPoint,
    SphericalSurfaceR,
    SphericalVolume,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Geometry {
    Point,
    Surface { fixed: Axis },
    Volume,
}

/// One interactive diagram: a mapping, its parameters and what they drive.
#[derive(Debug)]
pub struct Diagram {
    pub kind: DiagramKind,
    pub title: &'static str,
    pub description: &'static str,
    pub mapping: CoordinateMapping,
    pub geometry: Geometry,
    /// Parameter holding the position on each axis.
    pub position: [&'static str; 3],
    /// Parameter holding the extent on each axis, if it varies.
    pub extent: [Option<&'static str>; 3],
    pub parameters: &'static [ParameterSpec],
    pub constraints: &'static [ExtentConstraint],
}

/// Shapes to install into the scene graph.
#[derive(Clone, Debug)]
pub enum Shape {
    Mesh {
        mesh: TriangleMesh,
        material: Material,
    },
    Lines {
        topology: Topology,
        points: Vec<[f32; 3]>,
        material: Material,
    },
    Label {
        text: String,
        anchor: Vec3,
    },
}

/// Everything rebuilt from the parameters on a change.
#[derive(Clone, Debug, Default)]
pub struct DiagramGeometry {
    pub element: Option<(ElementMesh, EdgeCurveSet)>,
    pub annotations: Vec<Shape>,
}

const CARTESIAN_XYZ: [ParameterSpec; 3] = [
    ParameterSpec::position("x", "x", -5.0, 5.0, 0.1, 1.0),
    ParameterSpec::position("y", "y", -5.0, 5.0, 0.1, 2.0),
    ParameterSpec::position("z", "z", -5.0, 5.0, 0.1, 2.0),
];

const POLAR_LIMIT: &[ExtentConstraint] = &[ExtentConstraint {
    base: "theta",
    extent: "dtheta",
    upper: 180.0,
}];

const fn cyl_position(r: f64, theta: f64, z: f64) -> [ParameterSpec; 3] {
    [
        ParameterSpec::position("r", "r", 0.1, 5.0, 0.1, r),
        ParameterSpec::position("theta", "θ (degrees)", 0.0, 360.0, 1.0, theta),
        ParameterSpec::position("z", "z", -5.0, 5.0, 0.1, z),
    ]
}

const fn sph_position(r: f64, theta: f64, phi: f64, step: f64) -> [ParameterSpec; 3] {
    [
        ParameterSpec::position("r", "r", 0.1, 5.0, 0.1, r),
        ParameterSpec::position("theta", "θ (degrees)", 0.0, 180.0, step, theta),
        ParameterSpec::position("phi", "φ (degrees)", 0.0, 360.0, step, phi),
    ]
}

const CYL: [&str; 3] = ["r", "theta", "z"];
const SPH: [&str; 3] = ["r", "theta", "phi"];

static CARTESIAN_POINT_PARAMS: [ParameterSpec; 3] = CARTESIAN_XYZ;
static CARTESIAN_VOLUME_PARAMS: [ParameterSpec; 6] = [
    ParameterSpec::position("x", "x", -5.0, 5.0, 0.1, 1.0),
    ParameterSpec::position("y", "y", -5.0, 5.0, 0.1, 3.0),
    ParameterSpec::position("z", "z", -5.0, 5.0, 0.1, 2.0),
    ParameterSpec::differential("dx", "dx", 0.1, 5.0, 0.1, 1.0),
    ParameterSpec::differential("dy", "dy", 0.1, 5.0, 0.1, 1.0),
    ParameterSpec::differential("dz", "dz", 0.1, 5.0, 0.1, 1.0),
];
static CYL_POINT_PARAMS: [ParameterSpec; 3] = cyl_position(3.0, 60.0, 2.0);
static CYL_SURFACE_R_PARAMS: [ParameterSpec; 5] = {
    let [r, t, z] = cyl_position(2.0, 30.0, 1.0);
    [
        r,
        t,
        z,
        ParameterSpec::differential("dtheta", "dθ (degrees)", 1.0, 360.0, 1.0, 60.0),
        ParameterSpec::differential("dz", "dz", 0.1, 3.0, 0.1, 1.0),
    ]
};
static CYL_SURFACE_Z_PARAMS: [ParameterSpec; 5] = {
    let [r, t, z] = cyl_position(1.5, 30.0, 1.0);
    [
        r,
        t,
        z,
        ParameterSpec::differential("dr", "dr", 0.1, 3.0, 0.1, 1.0),
        ParameterSpec::differential("dtheta", "dθ (degrees)", 1.0, 360.0, 1.0, 60.0),
    ]
};
static CYL_VOLUME_PARAMS: [ParameterSpec; 6] = {
    let [r, t, z] = cyl_position(2.0, 30.0, 1.0);
    [
        r,
        t,
        z,
        ParameterSpec::differential("dr", "dr", 0.1, 2.0, 0.1, 0.5),
        ParameterSpec::differential("dtheta", "dθ (degrees)", 1.0, 360.0, 1.0, 30.0),
        ParameterSpec::differential("dz", "dz", 0.1, 2.0, 0.1, 0.5),
    ]
};
static SPH_POINT_PARAMS: [ParameterSpec; 3] = sph_position(4.0, 50.0, 50.0, 0.1);
static SPH_SURFACE_R_PARAMS: [ParameterSpec; 5] = {
    let [r, t, p] = sph_position(3.0, 45.0, 30.0, 1.0);
    [
        r,
        t,
        p,
        ParameterSpec::differential("dtheta", "dθ (degrees)", 1.0, 180.0, 1.0, 45.0),
        ParameterSpec::differential("dphi", "dφ (degrees)", 1.0, 360.0, 1.0, 60.0),
    ]
};
static SPH_VOLUME_PARAMS: [ParameterSpec; 6] = {
    let [r, t, p] = sph_position(2.0, 45.0, 30.0, 1.0);
    [
        r,
        t,
        p,
        ParameterSpec::differential("dr", "dr", 0.1, 2.0, 0.1, 0.5),
        ParameterSpec::differential("dtheta", "dθ (degrees)", 1.0, 180.0, 1.0, 30.0),
        ParameterSpec::differential("dphi", "dφ (degrees)", 1.0, 360.0, 1.0, 30.0),
    ]
};

pub static DIAGRAMS: &[Diagram] = &[
    Diagram {
        kind: DiagramKind::CartesianPoint,
        title: "Cartesian point",
        description: "Point M(x, y, z) and the fixed basis",
        mapping: CoordinateMapping::Cartesian,
        geometry: Geometry::Point,
        position: ["x", "y", "z"],
        extent: [None, None, None],
        parameters: &CARTESIAN_POINT_PARAMS,
        constraints: &[],
    },
    Diagram {
        kind: DiagramKind::CartesianVolume,
        title: "Cartesian volume element",
        description: "dV = dx dy dz",
        mapping: CoordinateMapping::Cartesian,
        geometry: Geometry::Volume,
        position: ["x", "y", "z"],
        extent: [Some("dx"), Some("dy"), Some("dz")],
        parameters: &CARTESIAN_VOLUME_PARAMS,
        constraints: &[],
    },
    Diagram {
        kind: DiagramKind::CylindricalPoint,
        title: "Cylindrical point",
        description: "Point M(r, θ, z) and its local basis",
        mapping: CoordinateMapping::Cylindrical,
        geometry: Geometry::Point,
        position: CYL,
        extent: [None, None, None],
        parameters: &CYL_POINT_PARAMS,
        constraints: &[],
    },
    Diagram {
        kind: DiagramKind::CylindricalSurfaceR,
        title: "Cylindrical surface, r fixed",
        description: "dS = r dθ dz",
        mapping: CoordinateMapping::Cylindrical,
        geometry: Geometry::Surface { fixed: Axis::U },
        position: CYL,
        extent: [None, Some("dtheta"), Some("dz")],
        parameters: &CYL_SURFACE_R_PARAMS,
        constraints: &[],
    },
    Diagram {
        kind: DiagramKind::CylindricalSurfaceZ,
        title: "Cylindrical surface, z fixed",
        description: "dS = r dr dθ",
        mapping: CoordinateMapping::Cylindrical,
        geometry: Geometry::Surface { fixed: Axis::W },
        position: CYL,
        extent: [Some("dr"), Some("dtheta"), None],
        parameters: &CYL_SURFACE_Z_PARAMS,
        constraints: &[],
    },
    Diagram {
        kind: DiagramKind::CylindricalVolume,
        title: "Cylindrical volume element",
        description: "dV = r dr dθ dz",
        mapping: CoordinateMapping::Cylindrical,
        geometry: Geometry::Volume,
        position: CYL,
        extent: [Some("dr"), Some("dtheta"), Some("dz")],
        parameters: &CYL_VOLUME_PARAMS,
        constraints: &[],
    },
    Diagram {
        kind: DiagramKind::SphericalPoint,
        title: "Spherical point",
        description: "Point M(r, θ, φ) and its local basis",
        mapping: CoordinateMapping::Spherical,
        geometry: Geometry::Point,
        position: SPH,
        extent: [None, None, None],
        parameters: &SPH_POINT_PARAMS,
        constraints: &[],
    },
    Diagram {
        kind: DiagramKind::SphericalSurfaceR,
        title: "Spherical surface, r fixed",
        description: "dS = r² sin θ dθ dφ",
        mapping: CoordinateMapping::Spherical,
        geometry: Geometry::Surface { fixed: Axis::U },
        position: SPH,
        extent: [None, Some("dtheta"), Some("dphi")],
        parameters: &SPH_SURFACE_R_PARAMS,
        constraints: POLAR_LIMIT,
    },
    Diagram {
        kind: DiagramKind::SphericalVolume,
        title: "Spherical volume element",
        description: "dV = r² sin θ dr dθ dφ",
        mapping: CoordinateMapping::Spherical,
        geometry: Geometry::Volume,
        position: SPH,
        extent: [Some("dr"), Some("dtheta"), Some("dphi")],
        parameters: &SPH_VOLUME_PARAMS,
        constraints: POLAR_LIMIT,
    },
];

impl DiagramKind {
    pub fn diagram(self) -> &'static Diagram {
        // Catalog order follows the enum declaration order.
        &DIAGRAMS[self as usize]
    }
}

impl Diagram {
    pub fn store(&self) -> ParameterStore {
        ParameterStore::new(self.parameters, self.constraints)
    }

    fn value(&self, store: &ParameterStore, name: &str, axis: Axis) -> f64 {
        let v = store.get(name).unwrap_or_default();
        if self.mapping.is_angular(axis) {
            v.to_radians()
        } else {
            v
        }
    }

    /// Position in mapping coordinates (angles in radians).
    pub fn coords(&self, store: &ParameterStore) -> [f64; 3] {
        Axis::ALL.map(|axis| self.value(store, self.position[axis.index()], axis))
    }

    pub fn point(&self, store: &ParameterStore) -> DVec3 {
        self.mapping.map_coords(self.coords(store))
    }

    pub fn element_spec(&self, store: &ParameterStore) -> Option<ElementSpec> {
        let coords = self.coords(store);
        let ranges = Axis::ALL.map(|axis| {
            let delta = self.extent[axis.index()]
                .map(|name| self.value(store, name, axis))
                .unwrap_or(0.0);
            Range::new(coords[axis.index()], delta)
        });
        match self.geometry {
            Geometry::Point => None,
            Geometry::Volume => Some(ElementSpec::volume(self.mapping, ranges)),
            Geometry::Surface { fixed } => {
                let [a, b] = fixed.others();
                Some(ElementSpec::surface(
                    self.mapping,
                    fixed,
                    coords[fixed.index()],
                    [ranges[a.index()], ranges[b.index()]],
                ))
            }
        }
    }

    pub fn build(&self, store: &ParameterStore, config: &MeshConfig) -> DiagramGeometry {
        let mut out = DiagramGeometry::default();
        let Some(spec) = self.element_spec(store) else {
            out.annotations = self.point_annotations(store);
            return out;
        };

        let resolution = match self.geometry {
            Geometry::Volume => config.volume_resolution,
            _ => config.surface_resolution,
        };
        let mesh = ElementMeshBuilder::new(resolution).build(&spec);
        let edges = EdgeCurveExtractor::new(config.edge_samples, config.edge_divisions).extract(&spec);
        out.element = Some((mesh, edges));

        if let Geometry::Surface { fixed } = self.geometry {
            let center = spec.center();
            let normal = self.mapping.basis(center)[fixed.index()];
            let (len, head, width) = NORMAL_ARROW;
            let a = primitives::arrow(
                spec.point(center).as_vec3(),
                normal.as_vec3(),
                len,
                head,
                width,
            );
            out.annotations.extend(arrow_shapes(a, INK));
        }
        out
    }

    fn point_annotations(&self, store: &ParameterStore) -> Vec<Shape> {
        let coords = self.coords(store);
        let p = self.mapping.map_coords(coords).as_vec3();
        let foot = Vec3::new(p.x, p.y, 0.0);
        let names = self.mapping.axis_names();
        let mut shapes = vec![
            Shape::Mesh {
                mesh: primitives::uv_sphere(p, 0.1, 32, 16),
                material: MARKER,
            },
            Shape::Label {
                text: "M".into(),
                anchor: p + Vec3::new(0.3, -0.3, 0.0),
            },
        ];

        let (len, head, width) = BASIS_ARROW;
        for (e, name) in self.mapping.basis(coords).into_iter().zip(names) {
            let e = e.as_vec3();
            shapes.extend(arrow_shapes(primitives::arrow(p, e, len, head, width), INK));
            shapes.push(Shape::Label {
                text: format!("e_{name}"),
                anchor: p + e * 1.2,
            });
        }

        let mut dashed = |a: Vec3, b: Vec3| {
            shapes.push(Shape::Lines {
                topology: Topology::LineList,
                points: primitives::dashes(a, b, DASH, GAP),
                material: GUIDE,
            });
        };
        match self.mapping {
            CoordinateMapping::Cartesian => {
                dashed(p, foot);
                dashed(foot, Vec3::new(p.x, 0.0, 0.0));
                dashed(foot, Vec3::new(0.0, p.y, 0.0));
            }
            CoordinateMapping::Cylindrical => {
                dashed(foot, Vec3::ZERO);
                dashed(p, foot);
            }
            CoordinateMapping::Spherical => {
                dashed(p, Vec3::ZERO);
                dashed(p, foot);
                dashed(foot, Vec3::ZERO);
            }
        }

        match self.mapping {
            CoordinateMapping::Cartesian => {
                shapes.push(label("x", Vec3::new(p.x, -0.3, 0.0)));
                shapes.push(label("y", Vec3::new(-0.3, p.y, 0.0)));
                shapes.push(label("z", p.with_z(p.z * 0.5) + Vec3::new(0.3, 0.3, 0.0)));
            }
            CoordinateMapping::Cylindrical => {
                let theta = coords[1] as f32;
                let radius = (coords[0] as f32 * 0.5).min(1.0);
                let arc = primitives::arc(Vec3::ZERO, radius, 0.0, theta, 32);
                if let Some(&end) = arc.last() {
                    let tangent = Vec3::new(-theta.sin(), theta.cos(), 0.0);
                    shapes.push(Shape::Mesh {
                        mesh: primitives::cone(Vec3::from(end), tangent, 0.15, 0.08, 16),
                        material: INK,
                    });
                }
                shapes.push(Shape::Lines {
                    topology: Topology::LineStrip,
                    points: arc,
                    material: INK,
                });
                let mid = theta * 0.5;
                shapes.push(label("θ", Vec3::new(mid.cos(), mid.sin(), 0.0) * radius * 1.3));
                shapes.push(label("r", foot * 0.5 + Vec3::new(0.2, 0.2, -0.3)));
                shapes.push(label("z", p.with_z(p.z * 0.5) + Vec3::new(0.3, 0.3, 0.0)));
            }
            CoordinateMapping::Spherical => {
                shapes.push(label("r", p * 0.5 + Vec3::new(0.2, 0.2, 0.0)));
            }
        }
        shapes
    }
}

fn label(text: &str, anchor: Vec3) -> Shape {
    Shape::Label {
        text: text.to_string(),
        anchor,
    }
}

fn arrow_shapes(arrow: Arrow, material: Material) -> [Shape; 2] {
    [
        Shape::Lines {
            topology: Topology::LineList,
            points: arrow.shaft.to_vec(),
            material,
        },
        Shape::Mesh {
            mesh: arrow.head,
            material,
        },
    ]
}

/// The x, y and z axes drawn under every diagram.
pub fn coordinate_axes(length: f32) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for (dir, name) in [(Vec3::X, "x"), (Vec3::Y, "y"), (Vec3::Z, "z")] {
        shapes.extend(arrow_shapes(
            primitives::arrow(Vec3::ZERO, dir, length, 0.2, 0.15),
            INK,
        ));
        shapes.push(label(name, dir * (length + 0.4)));
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn catalog_matches_kinds() {
        for d in DIAGRAMS {
            assert_eq!(d.kind.diagram().kind, d.kind);
        }
        assert_eq!(DIAGRAMS.len(), 9);
    }

    #[test]
    fn every_referenced_parameter_is_declared() {
        for d in DIAGRAMS {
            let store = d.store();
            for name in d.position.iter().chain(d.extent.iter().flatten()) {
                assert!(store.get(name).is_some(), "{}: {name}", d.title);
            }
        }
    }

    #[test]
    fn cartesian_volume_corners() {
        let d = DiagramKind::CartesianVolume.diagram();
        let spec = d.element_spec(&d.store()).unwrap();
        let mut corners: Vec<[i32; 3]> = spec
            .corners()
            .iter()
            .map(|p| [p.x.round() as i32, p.y.round() as i32, p.z.round() as i32])
            .collect();
        corners.sort();
        let mut expected = vec![
            [1, 3, 2], [2, 3, 2], [1, 4, 2], [1, 3, 3],
            [2, 4, 2], [2, 3, 3], [1, 4, 3], [2, 4, 3],
        ];
        expected.sort();
        assert_eq!(corners, expected);
    }

    #[test]
    fn angles_are_converted_to_radians() {
        let d = DiagramKind::SphericalSurfaceR.diagram();
        let c = d.coords(&d.store());
        assert_relative_eq!(c[1], 45f64.to_radians());
        let p = d.point(&d.store());
        assert_relative_eq!(p.x, 1.837, epsilon = 1e-3);
    }

    #[test]
    fn surface_diagram_builds_one_face_and_normal_arrow() {
        let d = DiagramKind::CylindricalSurfaceZ.diagram();
        let cfg = MeshConfig::default();
        let g = d.build(&d.store(), &cfg);
        let (mesh, edges) = g.element.unwrap();
        assert_eq!(mesh.faces, 1);
        assert_eq!(edges.len(), 4);
        assert_eq!(g.annotations.len(), 2);
    }

    #[test]
    fn point_diagram_has_no_element() {
        let d = DiagramKind::CylindricalPoint.diagram();
        let g = d.build(&d.store(), &MeshConfig::default());
        assert!(g.element.is_none());
        assert!(g.annotations.iter().any(|s| matches!(s, Shape::Label { text, .. } if text == "M")));
    }

    #[test]
    fn axes_have_three_labels() {
        let labels = coordinate_axes(5.0)
            .into_iter()
            .filter(|s| matches!(s, Shape::Label { .. }))
            .count();
        assert_eq!(labels, 3);
    }
}
