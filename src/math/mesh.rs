use glam::Vec3;
use log::debug;

use super::element::ElementSpec;

/// Indexed triangle list with per-vertex normals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                Vec3::from(self.vertices[tri[0] as usize]),
                Vec3::from(self.vertices[tri[1] as usize]),
                Vec3::from(self.vertices[tri[2] as usize]),
            ]
        })
    }

    /// Appends `other`, offsetting its indices.
    pub fn append(&mut self, other: &TriangleMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn compute_normals(&mut self) {
        self.normals = vertex_normals(&self.vertices, &self.indices);
    }
}

/// Area-weighted vertex normals. Vectors that cannot be normalized (zero
/// length or NaN from a collapsed triangle) are left as accumulated.
pub fn vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from(vertices[a]);
        let n = (Vec3::from(vertices[b]) - pa).cross(Vec3::from(vertices[c]) - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| {
            let len = n.length();
            if len.is_finite() && len > 0.0 {
                (n / len).to_array()
            } else {
                n.to_array()
            }
        })
        .collect()
}

/// Tessellated boundary of a differential element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementMesh {
    pub mesh: TriangleMesh,
    pub faces: usize,
    pub resolution: usize,
}

impl ElementMesh {
    /// Corner vertices of every emitted face, four per face.
    pub fn corners(&self) -> Vec<[f32; 3]> {
        let n = self.resolution;
        let side = n + 1;
        (0..self.faces)
            .flat_map(|f| {
                let base = f * side * side;
                [base, base + n, base + n * side, base + n * side + n]
            })
            .map(|i| self.mesh.vertices[i])
            .collect()
    }
}

pub struct ElementMeshBuilder {
    resolution: usize,
}

impl ElementMeshBuilder {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution: resolution.max(1),
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Samples an `(N+1)²` grid on each non-degenerate face, row-major with
    /// the face's outer axis as rows, and splits every cell `a-b-c`, `a-c-d`.
    pub fn build(&self, spec: &ElementSpec) -> ElementMesh {
        let n = self.resolution;
        let side = n + 1;
        let faces: Vec<_> = spec
            .faces()
            .into_iter()
            .filter(|face| {
                if face.is_degenerate() {
                    debug!("skipping collapsed face on {:?} = {}", face.fixed, face.value);
                    false
                } else {
                    true
                }
            })
            .collect();

        let mut vertices = Vec::with_capacity(faces.len() * side * side);
        let mut indices = Vec::with_capacity(faces.len() * n * n * 6);

        for face in &faces {
            let base = vertices.len() as u32;
            let (_, outer) = face.outer;
            let (_, inner) = face.inner;
            for i in 0..=n {
                let s = outer.sample(i, n);
                for j in 0..=n {
                    let t = inner.sample(j, n);
                    let p = spec.point(face.coords(s, t));
                    vertices.push(p.as_vec3().to_array());
                }
            }

            for i in 0..n {
                for j in 0..n {
                    let a = base + (i * side + j) as u32;
                    let b = a + 1;
                    let d = base + ((i + 1) * side + j) as u32;
                    let c = d + 1;
                    indices.extend_from_slice(&[a, b, c, a, c, d]);
                }
            }
        }

        let normals = vertex_normals(&vertices, &indices);
        debug!(
            "built {:?} element: {} faces, {} vertices",
            spec.mapping,
            faces.len(),
            vertices.len()
        );

        ElementMesh {
            mesh: TriangleMesh {
                vertices,
                normals,
                indices,
            },
            faces: faces.len(),
            resolution: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::element::Range;
    use crate::math::mapping::{Axis, CoordinateMapping};
    use approx::assert_relative_eq;

    fn cart_box(delta: [f64; 3]) -> ElementSpec {
        ElementSpec::volume(
            CoordinateMapping::Cartesian,
            [
                Range::new(1.0, delta[0]),
                Range::new(3.0, delta[1]),
                Range::new(2.0, delta[2]),
            ],
        )
    }

    #[test]
    fn volume_counts() {
        for n in [1, 4, 20] {
            let m = ElementMeshBuilder::new(n).build(&cart_box([1.0, 1.0, 1.0]));
            assert_eq!(m.mesh.vertex_count(), 6 * (n + 1) * (n + 1));
            assert_eq!(m.mesh.triangle_count(), 12 * n * n);
            assert_eq!(m.mesh.normals.len(), m.mesh.vertex_count());
        }
    }

    #[test]
    fn surface_counts() {
        let spec = ElementSpec::surface(
            CoordinateMapping::Spherical,
            Axis::U,
            3.0,
            [Range::new(0.7, 0.8), Range::new(0.5, 1.0)],
        );
        let m = ElementMeshBuilder::new(60).build(&spec);
        assert_eq!(m.faces, 1);
        assert_eq!(m.mesh.vertex_count(), 61 * 61);
        assert_eq!(m.mesh.triangle_count(), 2 * 60 * 60);
    }

    #[test]
    fn triangles_face_outward() {
        let spec = cart_box([1.0, 2.0, 0.5]);
        let c = spec.point(spec.center()).as_vec3();
        let m = ElementMeshBuilder::new(3).build(&spec);
        for [a, b, d] in m.mesh.triangles() {
            let n = (b - a).cross(d - a);
            let centroid = (a + b + d) / 3.0;
            assert!(n.dot(centroid - c) > 0.0);
        }
    }

    #[test]
    fn curved_volume_faces_outward() {
        let spec = ElementSpec::volume(
            CoordinateMapping::Spherical,
            [Range::new(2.0, 0.5), Range::new(0.8, 0.5), Range::new(0.5, 0.5)],
        );
        let c = spec.point(spec.center()).as_vec3();
        let m = ElementMeshBuilder::new(4).build(&spec);
        let outward = m
            .mesh
            .triangles()
            .filter(|[a, b, d]| (*b - *a).cross(*d - *a).dot((*a + *b + *d) / 3.0 - c) > 0.0)
            .count();
        assert_eq!(outward, m.mesh.triangle_count());
    }

    #[test]
    fn normals_are_unit_on_regular_faces() {
        let m = ElementMeshBuilder::new(5).build(&cart_box([1.0, 1.0, 1.0]));
        for n in &m.mesh.normals {
            assert_relative_eq!(Vec3::from(*n).length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn zero_delta_drops_spanning_faces() {
        let n = 4;
        let m = ElementMeshBuilder::new(n).build(&cart_box([1.0, 0.0, 1.0]));
        assert_eq!(m.faces, 2);
        assert_eq!(m.mesh.vertex_count(), 2 * (n + 1) * (n + 1));

        let flat = ElementMeshBuilder::new(n).build(&cart_box([0.0, 0.0, 1.0]));
        assert_eq!(flat.faces, 0);
        assert!(flat.mesh.is_empty());
    }

    #[test]
    fn singular_origin_is_tolerated() {
        let spec = ElementSpec::volume(
            CoordinateMapping::Spherical,
            [Range::new(0.0, 1.0), Range::new(0.0, 0.5), Range::new(0.0, 1.0)],
        );
        let m = ElementMeshBuilder::new(6).build(&spec);
        assert_eq!(m.faces, 6);
        assert_eq!(m.mesh.normals.len(), m.mesh.vertex_count());
    }

    #[test]
    fn corners_cover_every_face() {
        let m = ElementMeshBuilder::new(3).build(&cart_box([1.0, 1.0, 1.0]));
        assert_eq!(m.corners().len(), 24);
    }
}
