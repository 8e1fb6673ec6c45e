use log::trace;

use crate::config::MeshConfig;
use crate::error::Result;
use crate::scene::diagrams::{Diagram, ELEMENT_MATERIAL, INK, Shape};
use crate::scene::graph::{NodeId, NodeRole, SceneGraph};
use crate::scene::params::ParameterStore;
use crate::scene::surface::{RenderSurface, Topology};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub rebuilds: u64,
    pub disposals: u64,
}

/// Rebuilds a diagram's parameter-driven geometry on every edit.
///
/// The installed group is always released before its replacement is
/// built, so a scene never holds two element meshes at once.
#[derive(Debug)]
pub struct UpdateCycle {
    diagram: &'static Diagram,
    store: ParameterStore,
    config: MeshConfig,
    installed: Vec<NodeId>,
    stats: CycleStats,
}

impl UpdateCycle {
    pub fn new(diagram: &'static Diagram, config: MeshConfig) -> Self {
        Self {
            diagram,
            store: diagram.store(),
            config,
            installed: Vec::new(),
            stats: CycleStats::default(),
        }
    }

    pub fn diagram(&self) -> &'static Diagram {
        self.diagram
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    pub fn installed(&self) -> &[NodeId] {
        &self.installed
    }

    /// Stores the edit and performs exactly one rebuild. Returns the value
    /// actually stored after clamping.
    pub fn set_parameter<S: RenderSurface + ?Sized>(
        &mut self,
        scene: &mut SceneGraph,
        surface: &mut S,
        name: &str,
        value: f64,
    ) -> Result<f64> {
        let applied = self.store.set(name, value)?;
        self.rebuild(scene, surface);
        Ok(applied)
    }

    pub fn reset<S: RenderSurface + ?Sized>(&mut self, scene: &mut SceneGraph, surface: &mut S) {
        self.store.reset();
        self.rebuild(scene, surface);
    }

    pub fn rebuild<S: RenderSurface + ?Sized>(&mut self, scene: &mut SceneGraph, surface: &mut S) {
        self.dispose(scene, surface);

        let geometry = self.diagram.build(&self.store, &self.config);
        if let Some((mesh, edges)) = &geometry.element {
            self.installed.push(scene.add_mesh(
                surface,
                NodeRole::Element,
                &mesh.mesh,
                &ELEMENT_MATERIAL,
            ));
            for curve in &edges.curves {
                self.installed.push(scene.add_lines(
                    surface,
                    NodeRole::Edge,
                    Topology::LineStrip,
                    &curve.points,
                    &INK,
                ));
            }
        }
        for shape in &geometry.annotations {
            self.installed
                .push(install(scene, surface, NodeRole::Annotation, shape));
        }

        self.stats.rebuilds += 1;
        trace!(
            "{}: rebuilt {} nodes",
            self.diagram.title,
            self.installed.len()
        );
    }

    /// Releases the installed group. Returns how many nodes were removed.
    pub fn dispose<S: RenderSurface + ?Sized>(&mut self, scene: &mut SceneGraph, surface: &mut S) -> usize {
        if self.installed.is_empty() {
            return 0;
        }
        let removed = self
            .installed
            .drain(..)
            .filter(|&id| scene.remove(surface, id))
            .count();
        self.stats.disposals += 1;
        removed
    }

    /// Drops node bookkeeping after the owning scene was cleared wholesale.
    pub(crate) fn forget(&mut self) {
        self.installed.clear();
    }
}

pub fn install<S: RenderSurface + ?Sized>(
    scene: &mut SceneGraph,
    surface: &mut S,
    role: NodeRole,
    shape: &Shape,
) -> NodeId {
    match shape {
        Shape::Mesh { mesh, material } => scene.add_mesh(surface, role, mesh, material),
        Shape::Lines {
            topology,
            points,
            material,
        } => scene.add_lines(surface, role, *topology, points, material),
        Shape::Label { text, anchor } => scene.add_label(role, text.clone(), *anchor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::diagrams::DiagramKind;
    use crate::scene::surface::{HeadlessSurface, SurfaceSize};

    fn small() -> MeshConfig {
        MeshConfig {
            surface_resolution: 6,
            volume_resolution: 3,
            edge_samples: 4,
            edge_divisions: 4,
        }
    }

    #[test]
    fn one_edit_is_one_dispose_and_one_rebuild() {
        let mut surface = HeadlessSurface::new(SurfaceSize::new(8, 6));
        let mut scene = SceneGraph::new();
        let mut cycle = UpdateCycle::new(DiagramKind::CylindricalVolume.diagram(), small());
        cycle.rebuild(&mut scene, &mut surface);
        assert_eq!(cycle.stats(), CycleStats { rebuilds: 1, disposals: 0 });

        cycle.set_parameter(&mut scene, &mut surface, "r", 3.0).unwrap();
        assert_eq!(cycle.stats(), CycleStats { rebuilds: 2, disposals: 1 });
        assert_eq!(scene.count(NodeRole::Element), 1);
        assert_eq!(scene.count(NodeRole::Edge), 12);
    }

    #[test]
    fn unknown_parameter_does_not_rebuild() {
        let mut surface = HeadlessSurface::new(SurfaceSize::new(8, 6));
        let mut scene = SceneGraph::new();
        let mut cycle = UpdateCycle::new(DiagramKind::CartesianVolume.diagram(), small());
        assert!(cycle.set_parameter(&mut scene, &mut surface, "rho", 1.0).is_err());
        assert_eq!(cycle.stats().rebuilds, 0);
    }

    #[test]
    fn dispose_releases_everything_it_installed() {
        let mut surface = HeadlessSurface::new(SurfaceSize::new(8, 6));
        let mut scene = SceneGraph::new();
        let mut cycle = UpdateCycle::new(DiagramKind::SphericalPoint.diagram(), small());
        cycle.rebuild(&mut scene, &mut surface);
        assert!(surface.live_geometries() > 0);
        assert!(cycle.dispose(&mut scene, &mut surface) > 0);
        assert!(scene.is_empty());
        assert_eq!(surface.live_geometries(), 0);
        assert_eq!(cycle.dispose(&mut scene, &mut surface), 0);
    }
}
