use glam::Vec3;

/// Projection, camera and look of one visualization.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Width / height of the drawable; the window is letterboxed to keep it.
    pub aspect: f32,
    /// Vertical world-space extent seen at zoom 1.
    pub frustum_size: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub up: Vec3,
    pub damping_factor: f32,
    pub background: [f32; 4],
    pub axis_length: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            aspect: 4.0 / 3.0,
            frustum_size: 10.0,
            near: 0.1,
            far: 1000.0,
            camera_position: Vec3::new(8.0, 8.0, 4.0),
            camera_target: Vec3::ZERO,
            up: Vec3::Z,
            damping_factor: 0.2,
            background: [1.0, 1.0, 1.0, 1.0],
            axis_length: 5.0,
        }
    }
}

/// Tessellation densities used by the element builders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshConfig {
    /// Segments per axis for single-face surface elements.
    pub surface_resolution: usize,
    /// Segments per axis for six-face volume elements.
    pub volume_resolution: usize,
    /// Control points (minus one) sampled along each edge before smoothing.
    pub edge_samples: usize,
    /// Divisions of the smoothed edge; each curve has `edge_divisions + 1` points.
    pub edge_divisions: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            surface_resolution: 60,
            volume_resolution: 20,
            edge_samples: 32,
            edge_divisions: 20,
        }
    }
}
