use std::collections::HashMap;

use glam::Mat4;

use crate::error::Result;
use crate::scene::graph::SceneGraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pixel rectangle the scene is drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Largest centred rectangle of the given aspect that fits in `size`.
    pub fn fit(size: SurfaceSize, aspect: f32) -> Self {
        let w = size.width.max(1) as f32;
        let h = size.height.max(1) as f32;
        let (width, height) = if w / h > aspect {
            (h * aspect, h)
        } else {
            (w, w / aspect)
        };
        Self {
            x: (w - width) * 0.5,
            y: (h - height) * 0.5,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    LineStrip,
    LineList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u64);

/// Borrowed vertex data handed to a surface for upload. `normals` may be
/// empty for line topologies.
#[derive(Clone, Copy, Debug)]
pub struct GeometryData<'a> {
    pub topology: Topology,
    pub positions: &'a [[f32; 3]],
    pub normals: &'a [[f32; 3]],
    pub indices: &'a [u32],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 4],
    pub lit: bool,
}

impl Material {
    pub const fn flat(color: [f32; 4]) -> Self {
        Self { color, lit: false }
    }

    pub const fn lit(color: [f32; 4]) -> Self {
        Self { color, lit: true }
    }

    pub fn is_transparent(&self) -> bool {
        self.color[3] < 1.0
    }
}

/// Per-frame values shared by every draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub view_proj: Mat4,
    pub light_dir: [f32; 3],
    pub viewport: Viewport,
    pub clear_color: [f32; 4],
}

/// Drawable target owned by a scene.
///
/// Geometry and materials live on the surface until explicitly released;
/// a scene is responsible for releasing everything it created.
pub trait RenderSurface {
    fn size(&self) -> SurfaceSize;
    fn resize(&mut self, size: SurfaceSize);
    fn create_geometry(&mut self, data: GeometryData<'_>) -> GeometryHandle;
    fn release_geometry(&mut self, handle: GeometryHandle);
    fn create_material(&mut self, material: &Material) -> MaterialHandle;
    fn release_material(&mut self, handle: MaterialHandle);
    fn render(&mut self, scene: &SceneGraph, frame: &FrameUniforms) -> Result<()>;
}

/// CPU-only surface that keeps uploaded data and counts frames. Useful for
/// tests and headless runs.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    size: SurfaceSize,
    next: u64,
    geometries: HashMap<GeometryHandle, (Topology, usize)>,
    materials: HashMap<MaterialHandle, Material>,
    pub frames: u64,
    pub resizes: u64,
    pub last_frame: Option<FrameUniforms>,
    pub geometries_created: u64,
    pub geometries_released: u64,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl HeadlessSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn live_of(&self, topology: Topology) -> usize {
        self.geometries.values().filter(|(t, _)| *t == topology).count()
    }

    pub fn vertex_count(&self, handle: GeometryHandle) -> Option<usize> {
        self.geometries.get(&handle).map(|(_, n)| *n)
    }
}

impl RenderSurface for HeadlessSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.resizes += 1;
    }

    fn create_geometry(&mut self, data: GeometryData<'_>) -> GeometryHandle {
        self.next += 1;
        let handle = GeometryHandle(self.next);
        self.geometries
            .insert(handle, (data.topology, data.positions.len()));
        self.geometries_created += 1;
        handle
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        if self.geometries.remove(&handle).is_some() {
            self.geometries_released += 1;
        }
    }

    fn create_material(&mut self, material: &Material) -> MaterialHandle {
        self.next += 1;
        let handle = MaterialHandle(self.next);
        self.materials.insert(handle, *material);
        handle
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        self.materials.remove(&handle);
    }

    fn render(&mut self, _scene: &SceneGraph, frame: &FrameUniforms) -> Result<()> {
        self.frames += 1;
        self.last_frame = Some(*frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn viewport_letterboxes_wide_windows() {
        let vp = Viewport::fit(SurfaceSize::new(1600, 600), 4.0 / 3.0);
        assert_relative_eq!(vp.height, 600.0);
        assert_relative_eq!(vp.width, 800.0);
        assert_relative_eq!(vp.x, 400.0);
        assert_relative_eq!(vp.y, 0.0);
    }

    #[test]
    fn viewport_pillarboxes_tall_windows() {
        let vp = Viewport::fit(SurfaceSize::new(400, 900), 4.0 / 3.0);
        assert_relative_eq!(vp.width, 400.0);
        assert_relative_eq!(vp.height, 300.0);
        assert_relative_eq!(vp.y, 300.0);
    }

    #[test]
    fn headless_tracks_live_resources() {
        let mut s = HeadlessSurface::new(SurfaceSize::new(10, 10));
        let g = s.create_geometry(GeometryData {
            topology: Topology::LineStrip,
            positions: &[[0.0; 3], [1.0; 3]],
            normals: &[],
            indices: &[],
        });
        let m = s.create_material(&Material::flat([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(s.vertex_count(g), Some(2));
        s.release_geometry(g);
        s.release_geometry(g);
        s.release_material(m);
        assert_eq!(s.live_geometries(), 0);
        assert_eq!(s.live_materials(), 0);
        assert_eq!(s.geometries_released, 1);
    }
}
