use glam::DVec3;

/// One of the three coordinate slots `(u, v, w)` of a mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    U,
    V,
    W,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::U, Axis::V, Axis::W];

    pub const fn index(self) -> usize {
        match self {
            Axis::U => 0,
            Axis::V => 1,
            Axis::W => 2,
        }
    }

    /// The two remaining axes, in ascending order.
    pub const fn others(self) -> [Axis; 2] {
        match self {
            Axis::U => [Axis::V, Axis::W],
            Axis::V => [Axis::U, Axis::W],
            Axis::W => [Axis::U, Axis::V],
        }
    }
}

/// Closed set of coordinate systems the diagrams can draw in.
///
/// Angles are in radians. Cylindrical coordinates are `(r, θ, z)`,
/// spherical ones `(r, θ, φ)` with θ the polar angle from +z and φ the
/// azimuth in the xy-plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordinateMapping {
    Cartesian,
    Cylindrical,
    Spherical,
}

impl CoordinateMapping {
    pub fn map(self, u: f64, v: f64, w: f64) -> DVec3 {
        match self {
            CoordinateMapping::Cartesian => DVec3::new(u, v, w),
            CoordinateMapping::Cylindrical => {
                let (sin, cos) = v.sin_cos();
                DVec3::new(u * cos, u * sin, w)
            }
            CoordinateMapping::Spherical => {
                let (sin_t, cos_t) = v.sin_cos();
                let (sin_p, cos_p) = w.sin_cos();
                DVec3::new(u * sin_t * cos_p, u * sin_t * sin_p, u * cos_t)
            }
        }
    }

    pub fn map_coords(self, coords: [f64; 3]) -> DVec3 {
        self.map(coords[0], coords[1], coords[2])
    }

    /// Inverse of [`map`](Self::map). Azimuths come back in `(-π, π]`.
    pub fn invert(self, p: DVec3) -> [f64; 3] {
        match self {
            CoordinateMapping::Cartesian => p.to_array(),
            CoordinateMapping::Cylindrical => [p.x.hypot(p.y), p.y.atan2(p.x), p.z],
            CoordinateMapping::Spherical => {
                let r = p.length();
                let theta = if r > 0.0 {
                    (p.z / r).clamp(-1.0, 1.0).acos()
                } else {
                    0.0
                };
                [r, theta, p.y.atan2(p.x)]
            }
        }
    }

    /// Unit basis vectors `(ê_u, ê_v, ê_w)` at the given coordinates.
    pub fn basis(self, coords: [f64; 3]) -> [DVec3; 3] {
        match self {
            CoordinateMapping::Cartesian => [DVec3::X, DVec3::Y, DVec3::Z],
            CoordinateMapping::Cylindrical => {
                let (sin, cos) = coords[1].sin_cos();
                [
                    DVec3::new(cos, sin, 0.0),
                    DVec3::new(-sin, cos, 0.0),
                    DVec3::Z,
                ]
            }
            CoordinateMapping::Spherical => {
                let (sin_t, cos_t) = coords[1].sin_cos();
                let (sin_p, cos_p) = coords[2].sin_cos();
                [
                    DVec3::new(sin_t * cos_p, sin_t * sin_p, cos_t),
                    DVec3::new(cos_t * cos_p, cos_t * sin_p, -sin_t),
                    DVec3::new(-sin_p, cos_p, 0.0),
                ]
            }
        }
    }

    pub fn axis_names(self) -> [&'static str; 3] {
        match self {
            CoordinateMapping::Cartesian => ["x", "y", "z"],
            CoordinateMapping::Cylindrical => ["r", "θ", "z"],
            CoordinateMapping::Spherical => ["r", "θ", "φ"],
        }
    }

    pub fn is_angular(self, axis: Axis) -> bool {
        match self {
            CoordinateMapping::Cartesian => false,
            CoordinateMapping::Cylindrical => axis == Axis::V,
            CoordinateMapping::Spherical => axis != Axis::U,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CoordinateMapping::Cartesian => "Cartesian",
            CoordinateMapping::Cylindrical => "Cylindrical",
            CoordinateMapping::Spherical => "Spherical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn spherical_reference_point() {
        let p = CoordinateMapping::Spherical.map(3.0, 45f64.to_radians(), 30f64.to_radians());
        assert_relative_eq!(p.x, 1.837, epsilon = 1e-3);
        assert_relative_eq!(p.y, 1.061, epsilon = 1e-3);
        assert_relative_eq!(p.z, 2.121, epsilon = 1e-3);
    }

    #[test]
    fn spherical_round_trip() {
        for &r in &[0.1, 1.0, 4.5] {
            for i in 1..12 {
                let theta = PI * i as f64 / 12.0;
                for j in -5..6 {
                    let phi = PI * j as f64 / 6.0;
                    let back = CoordinateMapping::Spherical
                        .invert(CoordinateMapping::Spherical.map(r, theta, phi));
                    assert_relative_eq!(back[0], r, epsilon = 1e-9);
                    assert_relative_eq!(back[1], theta, epsilon = 1e-9);
                    assert_relative_eq!(back[2], phi, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn cylindrical_round_trip() {
        let coords = [2.5, 1.2, -0.7];
        let back = CoordinateMapping::Cylindrical
            .invert(CoordinateMapping::Cylindrical.map_coords(coords));
        for k in 0..3 {
            assert_relative_eq!(back[k], coords[k], epsilon = 1e-12);
        }
    }

    #[test]
    fn cartesian_is_identity() {
        let p = CoordinateMapping::Cartesian.map(1.0, -2.0, 3.5);
        assert_eq!(p, DVec3::new(1.0, -2.0, 3.5));
    }

    #[test]
    fn bases_are_right_handed_and_orthonormal() {
        let coords = [2.0, 0.8, 1.1];
        for mapping in [
            CoordinateMapping::Cartesian,
            CoordinateMapping::Cylindrical,
            CoordinateMapping::Spherical,
        ] {
            let [e0, e1, e2] = mapping.basis(coords);
            assert_relative_eq!(e0.length(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(e1.length(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(e0.dot(e1), 0.0, epsilon = 1e-12);
            assert_relative_eq!(e0.cross(e1).dot(e2), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn radius_axis_is_never_angular() {
        assert!(!CoordinateMapping::Spherical.is_angular(Axis::U));
        assert!(CoordinateMapping::Spherical.is_angular(Axis::W));
        assert!(!CoordinateMapping::Cylindrical.is_angular(Axis::W));
    }
}
