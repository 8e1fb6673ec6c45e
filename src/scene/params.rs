use log::debug;

use crate::error::{Result, VizError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterGroup {
    Position,
    Differential,
}

/// Declaration of one editable scalar: the control's bounds and step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub group: ParameterGroup,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
}

impl ParameterSpec {
    pub const fn position(name: &'static str, label: &'static str, min: f64, max: f64, step: f64, initial: f64) -> Self {
        Self {
            name,
            label,
            group: ParameterGroup::Position,
            min,
            max,
            step,
            initial,
        }
    }

    pub const fn differential(name: &'static str, label: &'static str, min: f64, max: f64, step: f64, initial: f64) -> Self {
        Self {
            name,
            label,
            group: ParameterGroup::Differential,
            min,
            max,
            step,
            initial,
        }
    }

    /// Snaps onto the step grid anchored at `min`, then clamps into bounds.
    pub fn constrain(&self, value: f64) -> f64 {
        let mut v = value;
        if self.step > 0.0 {
            v = self.min + ((v - self.min) / self.step).round() * self.step;
            v = (v * 1e9).round() / 1e9;
        }
        v.clamp(self.min, self.max)
    }
}

/// Keeps `base + extent <= upper` by shrinking `extent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtentConstraint {
    pub base: &'static str,
    pub extent: &'static str,
    pub upper: f64,
}

/// A requested value change coming from a control.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterEdit {
    pub name: String,
    pub value: f64,
}

/// Current values of a diagram's parameters.
#[derive(Clone, Debug)]
pub struct ParameterStore {
    specs: &'static [ParameterSpec],
    constraints: &'static [ExtentConstraint],
    values: Vec<f64>,
}

impl ParameterStore {
    pub fn new(specs: &'static [ParameterSpec], constraints: &'static [ExtentConstraint]) -> Self {
        let values = specs.iter().map(|s| s.constrain(s.initial)).collect();
        let mut store = Self {
            specs,
            constraints,
            values,
        };
        store.enforce();
        store
    }

    pub fn specs(&self) -> &'static [ParameterSpec] {
        self.specs
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.name == name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index(name).map(|i| self.values[i])
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static ParameterSpec, f64)> + '_ {
        self.specs.iter().zip(self.values.iter().copied())
    }

    /// Stores `value` after clamping it to the control bounds and the
    /// coordinate domain. Returns the value actually stored. Non-finite
    /// input leaves the current value untouched.
    pub fn set(&mut self, name: &str, value: f64) -> Result<f64> {
        let i = self
            .index(name)
            .ok_or_else(|| VizError::UnknownParameter(name.to_string()))?;
        if value.is_finite() {
            let v = self.specs[i].constrain(value);
            if v != value {
                debug!("{name}: {value} constrained to {v}");
            }
            self.values[i] = v;
            self.enforce();
        }
        Ok(self.values[i])
    }

    pub fn reset(&mut self) {
        for (v, s) in self.values.iter_mut().zip(self.specs) {
            *v = s.constrain(s.initial);
        }
        self.enforce();
    }

    fn enforce(&mut self) {
        for c in self.constraints {
            let (Some(b), Some(e)) = (self.index(c.base), self.index(c.extent)) else {
                continue;
            };
            let limit = (c.upper - self.values[b]).max(0.0);
            if self.values[e] > limit {
                debug!("{}: {} shrunk to {} to stay in domain", c.extent, self.values[e], limit);
                self.values[e] = limit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    static SPECS: &[ParameterSpec] = &[
        ParameterSpec::position("r", "r", 0.1, 5.0, 0.1, 3.0),
        ParameterSpec::position("theta", "θ", 0.0, 180.0, 0.1, 45.0),
        ParameterSpec::differential("dtheta", "dθ", 1.0, 180.0, 1.0, 45.0),
    ];
    static LIMITS: &[ExtentConstraint] = &[ExtentConstraint {
        base: "theta",
        extent: "dtheta",
        upper: 180.0,
    }];

    fn store() -> ParameterStore {
        ParameterStore::new(SPECS, LIMITS)
    }

    #[test]
    fn initial_values() {
        let s = store();
        assert_eq!(s.get("r"), Some(3.0));
        assert_eq!(s.get("dtheta"), Some(45.0));
        assert_eq!(s.get("missing"), None);
    }

    #[test]
    fn clamps_to_bounds() {
        let mut s = store();
        assert_eq!(s.set("r", 9.0).unwrap(), 5.0);
        assert_eq!(s.set("r", -1.0).unwrap(), 0.1);
    }

    #[test]
    fn snaps_to_step() {
        let mut s = store();
        assert_relative_eq!(s.set("r", 2.04).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(s.set("r", 2.06).unwrap(), 2.1, epsilon = 1e-12);
        assert_eq!(s.set("dtheta", 12.4).unwrap(), 12.0);
    }

    #[test]
    fn polar_extent_stays_in_domain() {
        let mut s = store();
        s.set("theta", 170.0).unwrap();
        assert_relative_eq!(s.get("dtheta").unwrap(), 10.0, epsilon = 1e-9);
        s.set("dtheta", 90.0).unwrap();
        assert_relative_eq!(s.get("dtheta").unwrap(), 10.0, epsilon = 1e-9);
        s.set("theta", 180.0).unwrap();
        assert_eq!(s.get("dtheta"), Some(0.0));
    }

    #[test]
    fn unknown_and_non_finite() {
        let mut s = store();
        assert!(matches!(s.set("q", 1.0), Err(VizError::UnknownParameter(_))));
        assert_eq!(s.set("r", f64::NAN).unwrap(), 3.0);
    }

    #[test]
    fn reset_restores_initial() {
        let mut s = store();
        s.set("r", 1.0).unwrap();
        s.reset();
        assert_eq!(s.get("r"), Some(3.0));
    }
}
