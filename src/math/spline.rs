use glam::DVec3;

/// Centripetal Catmull-Rom curve through a list of control points.
///
/// Endpoint tangents are built from mirrored phantom points so the curve
/// starts and ends exactly on the first and last control point.
#[derive(Clone, Debug)]
pub struct CatmullRomCurve {
    points: Vec<DVec3>,
}

struct CubicPoly {
    c0: DVec3,
    c1: DVec3,
    c2: DVec3,
    c3: DVec3,
}

impl CubicPoly {
    // Hermite form with tangents already scaled to the unit segment.
    fn hermite(x0: DVec3, x1: DVec3, t0: DVec3, t1: DVec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn nonuniform(p: [DVec3; 4], dt: [f64; 3]) -> Self {
        let [x0, x1, x2, x3] = p;
        let [dt0, dt1, dt2] = dt;
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(&self, t: f64) -> DVec3 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

const MIN_KNOT: f64 = 1e-4;

impl CatmullRomCurve {
    pub fn new(points: Vec<DVec3>) -> Self {
        Self { points }
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.points
    }

    /// Point at curve parameter `t` in `[0, 1]`, spread evenly over segments.
    pub fn point_at(&self, t: f64) -> DVec3 {
        let pts = &self.points;
        let l = pts.len();
        match l {
            0 => return DVec3::ZERO,
            1 => return pts[0],
            _ => {}
        }

        let p = (l - 1) as f64 * t.clamp(0.0, 1.0);
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f64;
        if seg >= l - 1 {
            seg = l - 2;
            weight = 1.0;
        }

        let p1 = pts[seg];
        let p2 = pts[seg + 1];
        let p0 = if seg > 0 { pts[seg - 1] } else { 2.0 * p1 - p2 };
        let p3 = if seg + 2 < l { pts[seg + 2] } else { 2.0 * p2 - p1 };

        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < MIN_KNOT {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT {
            dt2 = dt1;
        }

        CubicPoly::nonuniform([p0, p1, p2, p3], [dt0, dt1, dt2]).eval(weight)
    }

    /// `divisions + 1` points evenly spaced in curve parameter.
    pub fn sample(&self, divisions: usize) -> Vec<DVec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point_at(d as f64 / divisions as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arc(n: usize) -> Vec<DVec3> {
        (0..=n)
            .map(|i| {
                let a = std::f64::consts::FRAC_PI_2 * i as f64 / n as f64;
                DVec3::new(2.0 * a.cos(), 2.0 * a.sin(), 0.0)
            })
            .collect()
    }

    #[test]
    fn passes_through_endpoints() {
        let pts = arc(8);
        let curve = CatmullRomCurve::new(pts.clone());
        let s = curve.sample(20);
        assert_eq!(s.len(), 21);
        assert_relative_eq!(s[0].distance(pts[0]), 0.0, epsilon = 1e-12);
        assert_relative_eq!(s[20].distance(pts[8]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn interpolates_control_points() {
        let pts = arc(4);
        let curve = CatmullRomCurve::new(pts.clone());
        for (i, p) in pts.iter().enumerate() {
            let q = curve.point_at(i as f64 / 4.0);
            assert_relative_eq!(q.distance(*p), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn stays_close_to_circle() {
        let curve = CatmullRomCurve::new(arc(16));
        for p in curve.sample(50) {
            assert_relative_eq!(p.length(), 2.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn straight_line_stays_straight() {
        let pts: Vec<_> = (0..5).map(|i| DVec3::new(i as f64, 0.0, 1.0)).collect();
        for p in CatmullRomCurve::new(pts).sample(13) {
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
            assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let curve = CatmullRomCurve::new(vec![DVec3::ONE; 4]);
        for p in curve.sample(8) {
            assert!(p.is_finite());
        }
    }
}
