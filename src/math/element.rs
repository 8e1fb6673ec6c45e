use glam::DVec3;

use super::mapping::{Axis, CoordinateMapping};

/// A coordinate interval `[start, start + delta]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub start: f64,
    pub delta: f64,
}

impl Range {
    pub const fn new(start: f64, delta: f64) -> Self {
        Self { start, delta }
    }

    pub const fn fixed(value: f64) -> Self {
        Self { start: value, delta: 0.0 }
    }

    pub fn end(&self) -> f64 {
        self.start + self.delta
    }

    pub fn is_degenerate(&self) -> bool {
        self.delta == 0.0
    }

    pub fn at(&self, t: f64) -> f64 {
        self.start + self.delta * t
    }

    /// Value at grid index `i` of `n` segments. Index `n` lands exactly on [`end`](Self::end).
    pub fn sample(&self, i: usize, n: usize) -> f64 {
        if i >= n {
            self.end()
        } else {
            self.at(i as f64 / n as f64)
        }
    }

    pub fn extremes(&self) -> [f64; 2] {
        [self.start, self.end()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementShape {
    /// All three ranges vary; six boundary faces.
    Volume,
    /// One axis is pinned to a value; a single face.
    Surface { fixed: Axis },
}

/// A differential element: a coordinate-space box pushed through a mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementSpec {
    pub mapping: CoordinateMapping,
    pub shape: ElementShape,
    ranges: [Range; 3],
}

/// One boundary face of an element, oriented so its triangles wind outward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub fixed: Axis,
    pub value: f64,
    /// Grid rows.
    pub outer: (Axis, Range),
    /// Grid columns.
    pub inner: (Axis, Range),
}

impl Face {
    pub fn is_degenerate(&self) -> bool {
        self.outer.1.is_degenerate() || self.inner.1.is_degenerate()
    }

    pub fn coords(&self, s: f64, t: f64) -> [f64; 3] {
        let mut c = [0.0; 3];
        c[self.fixed.index()] = self.value;
        c[self.outer.0.index()] = s;
        c[self.inner.0.index()] = t;
        c
    }
}

impl ElementSpec {
    pub fn volume(mapping: CoordinateMapping, ranges: [Range; 3]) -> Self {
        Self {
            mapping,
            shape: ElementShape::Volume,
            ranges,
        }
    }

    /// `varying` holds the ranges of the two free axes in ascending axis order.
    pub fn surface(mapping: CoordinateMapping, fixed: Axis, value: f64, varying: [Range; 2]) -> Self {
        let mut ranges = [Range::fixed(value); 3];
        let [a, b] = fixed.others();
        ranges[a.index()] = varying[0];
        ranges[b.index()] = varying[1];
        Self {
            mapping,
            shape: ElementShape::Surface { fixed },
            ranges,
        }
    }

    pub fn range(&self, axis: Axis) -> Range {
        self.ranges[axis.index()]
    }

    pub fn ranges(&self) -> [Range; 3] {
        self.ranges
    }

    pub fn is_fixed(&self, axis: Axis) -> bool {
        matches!(self.shape, ElementShape::Surface { fixed } if fixed == axis)
    }

    /// Axes the element extends along.
    pub fn free_axes(&self) -> Vec<Axis> {
        Axis::ALL
            .into_iter()
            .filter(|&axis| !self.is_fixed(axis))
            .collect()
    }

    /// Every boundary face, degenerate ones included. Volumes list the start
    /// face of each axis before its end face.
    pub fn faces(&self) -> Vec<Face> {
        match self.shape {
            ElementShape::Surface { fixed } => {
                vec![self.face(fixed, self.range(fixed).start, true)]
            }
            ElementShape::Volume => Axis::ALL
                .into_iter()
                .flat_map(|axis| {
                    let range = self.range(axis);
                    [
                        self.face(axis, range.start, false),
                        self.face(axis, range.end(), true),
                    ]
                })
                .collect(),
        }
    }

    // Orders the free axes so that (∂inner × ∂outer) points along +fixed on
    // an end face and -fixed on a start face.
    fn face(&self, fixed: Axis, value: f64, end: bool) -> Face {
        let [a, b] = fixed.others();
        // Sign of (∂a × ∂b) relative to ∂fixed for a right-handed system.
        let parity = if fixed == Axis::V { -1.0 } else { 1.0 };
        let side = if end { 1.0 } else { -1.0 };
        let (outer, inner) = if -parity == side { (a, b) } else { (b, a) };
        Face {
            fixed,
            value,
            outer: (outer, self.range(outer)),
            inner: (inner, self.range(inner)),
        }
    }

    /// Coordinates of the element's centre.
    pub fn center(&self) -> [f64; 3] {
        self.ranges.map(|r| r.at(0.5))
    }

    pub fn point(&self, coords: [f64; 3]) -> DVec3 {
        self.mapping.map_coords(coords)
    }

    /// Mapped corner points; 8 for a volume, 4 for a surface.
    pub fn corners(&self) -> Vec<DVec3> {
        let mut out = Vec::new();
        let values = |axis: Axis| -> Vec<f64> {
            if self.is_fixed(axis) {
                vec![self.range(axis).start]
            } else {
                self.range(axis).extremes().to_vec()
            }
        };
        for &u in &values(Axis::U) {
            for &v in &values(Axis::V) {
                for &w in &values(Axis::W) {
                    out.push(self.mapping.map(u, v, w));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> ElementSpec {
        ElementSpec::volume(
            CoordinateMapping::Cartesian,
            [Range::new(0.0, 1.0), Range::new(0.0, 1.0), Range::new(0.0, 1.0)],
        )
    }

    #[test]
    fn sample_hits_both_ends_exactly() {
        let r = Range::new(0.3, 0.7);
        assert_eq!(r.sample(0, 7), 0.3);
        assert_eq!(r.sample(7, 7), r.end());
    }

    #[test]
    fn volume_has_six_faces() {
        let faces = unit_box().faces();
        assert_eq!(faces.len(), 6);
        assert!(faces.iter().all(|f| !f.is_degenerate()));
    }

    #[test]
    fn surface_pins_fixed_axis() {
        let spec = ElementSpec::surface(
            CoordinateMapping::Cylindrical,
            Axis::U,
            2.0,
            [Range::new(0.5, 1.0), Range::new(1.0, 1.0)],
        );
        assert!(spec.is_fixed(Axis::U));
        assert_eq!(spec.free_axes(), vec![Axis::V, Axis::W]);
        let faces = spec.faces();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].value, 2.0);
        assert_eq!(spec.corners().len(), 4);
    }

    #[test]
    fn zero_delta_marks_spanning_faces_degenerate() {
        let spec = ElementSpec::volume(
            CoordinateMapping::Cartesian,
            [Range::new(0.0, 0.0), Range::new(0.0, 1.0), Range::new(0.0, 1.0)],
        );
        let live: Vec<_> = spec.faces().into_iter().filter(|f| !f.is_degenerate()).collect();
        assert_eq!(live.len(), 2);
        assert!(live.iter().all(|f| f.fixed == Axis::U));
    }

    #[test]
    fn face_coords_place_each_axis() {
        let face = unit_box().faces()[3];
        assert_eq!(face.fixed, Axis::V);
        let c = face.coords(0.25, 0.75);
        assert_eq!(c[Axis::V.index()], 1.0);
        assert_eq!(c[face.outer.0.index()], 0.25);
        assert_eq!(c[face.inner.0.index()], 0.75);
    }
}
