//! Small meshes and polylines used for diagram annotations.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::mesh::TriangleMesh;

pub fn uv_sphere(center: Vec3, radius: f32, slices: u32, stacks: u32) -> TriangleMesh {
    let slices = slices.max(3);
    let stacks = stacks.max(2);
    let mut mesh = TriangleMesh::default();

    for i in 0..=stacks {
        let theta = PI * i as f32 / stacks as f32;
        for j in 0..=slices {
            let phi = TAU * j as f32 / slices as f32;
            let n = Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            mesh.vertices.push((center + n * radius).to_array());
            mesh.normals.push(n.to_array());
        }
    }

    let row = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * row + j;
            let b = a + 1;
            let d = a + row;
            let c = d + 1;
            if i != 0 {
                mesh.indices.extend_from_slice(&[a, d, b]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[b, d, c]);
            }
        }
    }
    mesh
}

/// Closed cone with its base centred on `base` and apex at `base + axis * height`.
pub fn cone(base: Vec3, axis: Vec3, height: f32, radius: f32, segments: u32) -> TriangleMesh {
    let segments = segments.max(3);
    let axis = axis.normalize_or(Vec3::Z);
    let (s, t) = axis.any_orthonormal_pair();
    let apex = base + axis * height;
    let mut mesh = TriangleMesh::default();

    mesh.vertices.push(apex.to_array());
    mesh.vertices.push(base.to_array());
    for k in 0..segments {
        let a = TAU * k as f32 / segments as f32;
        let rim = base + (s * a.cos() + t * a.sin()) * radius;
        mesh.vertices.push(rim.to_array());
    }
    for k in 0..segments {
        let cur = 2 + k;
        let next = 2 + (k + 1) % segments;
        mesh.indices.extend_from_slice(&[cur, next, 0]);
        mesh.indices.extend_from_slice(&[next, cur, 1]);
    }
    mesh.compute_normals();
    mesh
}

/// Line shaft plus solid head, sized like a classic arrow helper.
#[derive(Clone, Debug)]
pub struct Arrow {
    pub shaft: [[f32; 3]; 2],
    pub head: TriangleMesh,
    pub tip: Vec3,
}

pub fn arrow(origin: Vec3, dir: Vec3, length: f32, head_length: f32, head_width: f32) -> Arrow {
    let dir = dir.normalize_or(Vec3::Z);
    let head_start = origin + dir * (length - head_length).max(0.0);
    Arrow {
        shaft: [origin.to_array(), head_start.to_array()],
        head: cone(head_start, dir, head_length, head_width * 0.5, 12),
        tip: origin + dir * length,
    }
}

/// Dash segments from `a` to `b` as line-list pairs.
pub fn dashes(a: Vec3, b: Vec3, dash: f32, gap: f32) -> Vec<[f32; 3]> {
    let span = b - a;
    let len = span.length();
    if len <= 0.0 || dash <= 0.0 {
        return Vec::new();
    }
    let dir = span / len;
    let mut out = Vec::new();
    let mut s = 0.0;
    while s < len {
        let e = (s + dash).min(len);
        out.push((a + dir * s).to_array());
        out.push((a + dir * e).to_array());
        s = e + gap.max(0.0);
    }
    out
}

/// Arc in the plane `z = center.z` from angle `start` to `end`.
pub fn arc(center: Vec3, radius: f32, start: f32, end: f32, segments: u32) -> Vec<[f32; 3]> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|k| {
            let a = start + (end - start) * k as f32 / segments as f32;
            (center + Vec3::new(a.cos(), a.sin(), 0.0) * radius).to_array()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let c = Vec3::new(1.0, 2.0, 3.0);
        let m = uv_sphere(c, 0.1, 16, 8);
        for v in &m.vertices {
            assert_relative_eq!(Vec3::from(*v).distance(c), 0.1, epsilon = 1e-6);
        }
        assert_eq!(m.triangle_count() as u32, 16 * 8 * 2 - 2 * 16);
    }

    #[test]
    fn arrow_tip_matches_length() {
        let a = arrow(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.8, 0.2, 0.15);
        assert_relative_eq!(a.tip.y, 0.8, epsilon = 1e-6);
        assert_relative_eq!(a.shaft[1][1], 0.6, epsilon = 1e-6);
        let max_y = a.head.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        assert_relative_eq!(max_y, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn dashes_cover_span_with_gaps() {
        let d = dashes(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 0.1, 0.05);
        assert_eq!(d.len() % 2, 0);
        assert_eq!(d.len() / 2, 7);
        assert_relative_eq!(d[d.len() - 1][0], 1.0, epsilon = 1e-6);
        assert!(dashes(Vec3::ONE, Vec3::ONE, 0.1, 0.05).is_empty());
    }

    #[test]
    fn arc_endpoints() {
        let pts = arc(Vec3::ZERO, 1.0, 0.0, PI / 2.0, 32);
        assert_eq!(pts.len(), 33);
        assert_relative_eq!(pts[32][0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(pts[32][1], 1.0, epsilon = 1e-6);
    }
}
