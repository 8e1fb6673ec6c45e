use log::info;

use crate::config::{MeshConfig, SceneConfig};
use crate::error::{Result, VizError};
use crate::scene::diagrams::{Diagram, coordinate_axes};
use crate::scene::graph::NodeRole;
use crate::scene::lifecycle::{SceneLifecycle, TickStatus};
use crate::scene::params::{ParameterEdit, ParameterStore};
use crate::scene::surface::RenderSurface;
use crate::scene::update::{UpdateCycle, install};

/// A mounted diagram: its lifecycle plus the update cycle feeding it.
pub struct Visualization<S: RenderSurface> {
    lifecycle: SceneLifecycle<S>,
    cycle: UpdateCycle,
}

impl<S: RenderSurface> Visualization<S> {
    pub fn mount(surface: S, diagram: &'static Diagram, scene_config: SceneConfig, mesh_config: MeshConfig) -> Self {
        let axis_length = scene_config.axis_length as f32;
        let mut lifecycle = SceneLifecycle::mount(surface, scene_config);
        let mut cycle = UpdateCycle::new(diagram, mesh_config);
        if let Some((scene, surface)) = lifecycle.parts_mut() {
            for shape in coordinate_axes(axis_length) {
                install(scene, surface, NodeRole::Static, &shape);
            }
            cycle.rebuild(scene, surface);
        }
        info!("mounted '{}'", diagram.title);
        Self { lifecycle, cycle }
    }

    pub fn diagram(&self) -> &'static Diagram {
        self.cycle.diagram()
    }

    pub fn store(&self) -> &ParameterStore {
        self.cycle.store()
    }

    pub fn cycle(&self) -> &UpdateCycle {
        &self.cycle
    }

    pub fn lifecycle(&self) -> &SceneLifecycle<S> {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut SceneLifecycle<S> {
        &mut self.lifecycle
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<f64> {
        let (scene, surface) = self.lifecycle.parts_mut().ok_or(VizError::Disposed)?;
        self.cycle.set_parameter(scene, surface, name, value)
    }

    /// Applies edits in order; each one is its own rebuild.
    pub fn apply(&mut self, edits: &[ParameterEdit]) -> Result<()> {
        for edit in edits {
            self.set_parameter(&edit.name, edit.value)?;
        }
        Ok(())
    }

    pub fn reset(&mut self) -> Result<()> {
        let (scene, surface) = self.lifecycle.parts_mut().ok_or(VizError::Disposed)?;
        self.cycle.reset(scene, surface);
        Ok(())
    }

    pub fn tick(&mut self) -> Result<TickStatus> {
        self.lifecycle.tick()
    }

    pub fn dispose(&mut self) -> usize {
        self.cycle.forget();
        self.lifecycle.dispose()
    }
}
