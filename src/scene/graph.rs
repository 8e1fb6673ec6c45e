use glam::Vec3;

use crate::math::TriangleMesh;
use crate::scene::surface::{
    GeometryData, GeometryHandle, Material, MaterialHandle, RenderSurface, Topology,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// What a node belongs to, so groups can be replaced or counted together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Coordinate axes; live for the whole scene.
    Static,
    /// The differential element's triangulated mesh.
    Element,
    /// The element's boundary curves.
    Edge,
    /// Markers, arrows, guide lines and labels tied to the current parameters.
    Annotation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Drawable {
        geometry: GeometryHandle,
        material: MaterialHandle,
        topology: Topology,
        transparent: bool,
    },
    Label {
        text: String,
        anchor: Vec3,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub role: NodeRole,
    pub kind: NodeKind,
}

/// Flat scene graph. Every drawable node owns one geometry and one material
/// on the surface it was created with.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, role: NodeRole, kind: NodeKind) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.push(SceneNode { id, role, kind });
        id
    }

    pub fn add_drawable<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        role: NodeRole,
        data: GeometryData<'_>,
        material: &Material,
    ) -> NodeId {
        let geometry = surface.create_geometry(data);
        let material_handle = surface.create_material(material);
        self.push(
            role,
            NodeKind::Drawable {
                geometry,
                material: material_handle,
                topology: data.topology,
                transparent: material.is_transparent(),
            },
        )
    }

    pub fn add_mesh<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        role: NodeRole,
        mesh: &TriangleMesh,
        material: &Material,
    ) -> NodeId {
        let data = GeometryData {
            topology: Topology::Triangles,
            positions: &mesh.vertices,
            normals: &mesh.normals,
            indices: &mesh.indices,
        };
        self.add_drawable(surface, role, data, material)
    }

    pub fn add_lines<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        role: NodeRole,
        topology: Topology,
        points: &[[f32; 3]],
        material: &Material,
    ) -> NodeId {
        let data = GeometryData {
            topology,
            positions: points,
            normals: &[],
            indices: &[],
        };
        self.add_drawable(surface, role, data, material)
    }

    pub fn add_label(&mut self, role: NodeRole, text: impl Into<String>, anchor: Vec3) -> NodeId {
        self.push(
            role,
            NodeKind::Label {
                text: text.into(),
                anchor,
            },
        )
    }

    /// Detaches the node and releases its surface resources.
    pub fn remove<S: RenderSurface + ?Sized>(&mut self, surface: &mut S, id: NodeId) -> bool {
        let Some(pos) = self.nodes.iter().position(|n| n.id == id) else {
            return false;
        };
        release(surface, &self.nodes.remove(pos));
        true
    }

    /// Walks the whole graph releasing every node. Returns how many were removed.
    pub fn clear<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let count = self.nodes.len();
        for node in self.nodes.drain(..) {
            release(surface, &node);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn count(&self, role: NodeRole) -> usize {
        self.nodes.iter().filter(|n| n.role == role).count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, Vec3)> {
        self.nodes.iter().filter_map(|n| match &n.kind {
            NodeKind::Label { text, anchor } => Some((text.as_str(), *anchor)),
            NodeKind::Drawable { .. } => None,
        })
    }
}

fn release<S: RenderSurface + ?Sized>(surface: &mut S, node: &SceneNode) {
    if let NodeKind::Drawable {
        geometry, material, ..
    } = node.kind
    {
        surface.release_geometry(geometry);
        surface.release_material(material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::surface::{HeadlessSurface, SurfaceSize};

    #[test]
    fn remove_releases_resources() {
        let mut surface = HeadlessSurface::new(SurfaceSize::new(4, 3));
        let mut graph = SceneGraph::new();
        let ink = Material::flat([0.0, 0.0, 0.0, 1.0]);
        let a = graph.add_lines(&mut surface, NodeRole::Edge, Topology::LineStrip, &[[0.0; 3]; 2], &ink);
        graph.add_label(NodeRole::Annotation, "r", Vec3::X);
        assert_eq!(surface.live_geometries(), 1);

        assert!(graph.remove(&mut surface, a));
        assert!(!graph.remove(&mut surface, a));
        assert_eq!(surface.live_geometries(), 0);
        assert_eq!(surface.live_materials(), 0);
        assert_eq!(graph.labels().count(), 1);
    }

    #[test]
    fn clear_walks_every_node() {
        let mut surface = HeadlessSurface::new(SurfaceSize::new(4, 3));
        let mut graph = SceneGraph::new();
        let mesh = crate::math::primitives::uv_sphere(Vec3::ZERO, 1.0, 8, 4);
        let mat = Material::lit([0.4, 0.5, 0.9, 0.8]);
        for role in [NodeRole::Static, NodeRole::Element, NodeRole::Annotation] {
            graph.add_mesh(&mut surface, role, &mesh, &mat);
        }
        assert_eq!(graph.count(NodeRole::Element), 1);
        assert_eq!(graph.clear(&mut surface), 3);
        assert!(graph.is_empty());
        assert_eq!(surface.live_geometries(), 0);
    }
}
