use log::debug;

use super::element::ElementSpec;
use super::mapping::Axis;
use super::spline::CatmullRomCurve;

/// One smoothed boundary curve, swept along `axis`.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeCurve {
    pub axis: Axis,
    pub points: Vec<[f32; 3]>,
}

impl EdgeCurve {
    pub fn first(&self) -> Option<[f32; 3]> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<[f32; 3]> {
        self.points.last().copied()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeCurveSet {
    pub curves: Vec<EdgeCurve>,
}

impl EdgeCurveSet {
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn endpoints(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.curves
            .iter()
            .flat_map(|c| c.first().into_iter().chain(c.last()))
    }
}

pub struct EdgeCurveExtractor {
    samples: usize,
    divisions: usize,
}

impl EdgeCurveExtractor {
    /// `samples` segments of raw control points, re-sampled into
    /// `divisions + 1` output points per curve.
    pub fn new(samples: usize, divisions: usize) -> Self {
        Self {
            samples: samples.max(1),
            divisions: divisions.max(1),
        }
    }

    /// Boundary curves of the element: 12 for a volume, 4 for a surface.
    ///
    /// Each free axis is swept at every combination of the extremes of the
    /// other two (a pinned axis contributes its single value). Curves along a
    /// zero-length axis are skipped.
    pub fn extract(&self, spec: &ElementSpec) -> EdgeCurveSet {
        let held = |axis: Axis| -> Vec<f64> {
            if spec.is_fixed(axis) {
                vec![spec.range(axis).start]
            } else {
                spec.range(axis).extremes().to_vec()
            }
        };

        let mut curves = Vec::new();
        for axis in spec.free_axes() {
            let sweep = spec.range(axis);
            if sweep.is_degenerate() {
                debug!("skipping collapsed edges along {axis:?}");
                continue;
            }
            let [a, b] = axis.others();
            for &va in &held(a) {
                for &vb in &held(b) {
                    let control = (0..=self.samples)
                        .map(|i| {
                            let mut c = [0.0; 3];
                            c[a.index()] = va;
                            c[b.index()] = vb;
                            c[axis.index()] = sweep.sample(i, self.samples);
                            spec.point(c)
                        })
                        .collect();
                    let points = CatmullRomCurve::new(control)
                        .sample(self.divisions)
                        .into_iter()
                        .map(|p| p.as_vec3().to_array())
                        .collect();
                    curves.push(EdgeCurve { axis, points });
                }
            }
        }

        EdgeCurveSet { curves }
    }
}
