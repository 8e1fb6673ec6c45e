use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::SceneConfig;
use crate::scene::surface::Viewport;

/// Orthographic camera. Bounds are kept for a fixed aspect; `zoom` scales them.
#[derive(Clone, Debug, PartialEq)]
pub struct OrthographicCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub zoom: f32,
}

impl OrthographicCamera {
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut camera = Self {
            position: config.camera_position,
            target: config.camera_target,
            up: config.up,
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
            near: config.near,
            far: config.far,
            zoom: 1.0,
        };
        camera.set_frustum(config.frustum_size, config.aspect);
        camera
    }

    /// Frames slightly more above the target than below it.
    pub fn set_frustum(&mut self, frustum_size: f32, aspect: f32) {
        self.left = -frustum_size * aspect / 2.0;
        self.right = frustum_size * aspect / 2.0;
        self.top = frustum_size * 1.3 / 2.0;
        self.bottom = -frustum_size * 0.7 / 2.0;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let z = self.zoom.max(f32::EPSILON);
        Mat4::orthographic_rh(
            self.left / z,
            self.right / z,
            self.bottom / z,
            self.top / z,
            self.near,
            self.far,
        )
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// Pixel position of a world point inside `viewport`, `None` if clipped.
    pub fn project(&self, point: Vec3, viewport: &Viewport) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * Vec4::from((point, 1.0));
        if clip.w.abs() < f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.x) || !(-1.0..=1.0).contains(&ndc.y) || !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(Vec2::new(
            viewport.x + (ndc.x + 1.0) * 0.5 * viewport.width,
            viewport.y + (1.0 - ndc.y) * 0.5 * viewport.height,
        ))
    }
}

/// Damped orbit control around the camera target, with `up` as the pole.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,

    delta_azimuth: f32,
    delta_polar: f32,
    pan_offset: Vec3,
}

const POLAR_EPS: f32 = 1e-6;
const SETTLE_EPS: f32 = 1e-6;

impl OrbitControls {
    pub fn new(damping_factor: f32) -> Self {
        Self {
            damping_factor: damping_factor.clamp(0.0, 1.0),
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_zoom: 0.1,
            max_zoom: 20.0,
            delta_azimuth: 0.0,
            delta_polar: 0.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Queues rotation for a pointer drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let k = std::f32::consts::TAU * self.rotate_speed / viewport_height.max(1.0);
        self.delta_azimuth -= delta.x * k;
        self.delta_polar -= delta.y * k;
    }

    /// Queues a screen-space pan for a drag of `delta` pixels.
    pub fn pan(&mut self, camera: &OrthographicCamera, delta: Vec2, viewport: &Viewport) {
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or(Vec3::X);
        let screen_up = right.cross(forward);
        let zoom = camera.zoom.max(f32::EPSILON);
        let dx = delta.x * (camera.right - camera.left) / zoom / viewport.width.max(1.0);
        let dy = delta.y * (camera.top - camera.bottom) / zoom / viewport.height.max(1.0);
        self.pan_offset += (-right * dx + screen_up * dy) * self.pan_speed;
    }

    /// Wheel zoom; positive `scroll` zooms in.
    pub fn zoom(&mut self, camera: &mut OrthographicCamera, scroll: f32) {
        let scale = 0.95f32.powf(self.zoom_speed * scroll);
        camera.zoom = (camera.zoom / scale).clamp(self.min_zoom, self.max_zoom);
    }

    /// Applies one damping step of the pending motion. Returns whether the
    /// camera moved noticeably.
    pub fn update(&mut self, camera: &mut OrthographicCamera) -> bool {
        if self.is_settled() {
            return false;
        }
        let d = if self.damping_factor > 0.0 { self.damping_factor } else { 1.0 };

        let up = camera.up.normalize_or(Vec3::Z);
        let (ex, ey) = up.any_orthonormal_pair();
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= 0.0 {
            return false;
        }
        let local = Vec3::new(offset.dot(ex), offset.dot(ey), offset.dot(up));
        let mut azimuth = local.y.atan2(local.x);
        let mut polar = (local.z / radius).clamp(-1.0, 1.0).acos();

        azimuth += self.delta_azimuth * d;
        polar = (polar + self.delta_polar * d).clamp(POLAR_EPS, std::f32::consts::PI - POLAR_EPS);
        let pan = self.pan_offset * d;

        let (sin_p, cos_p) = polar.sin_cos();
        let (sin_a, cos_a) = azimuth.sin_cos();
        let new_offset = (ex * cos_a * sin_p + ey * sin_a * sin_p + up * cos_p) * radius;

        let before = camera.position;
        camera.target += pan;
        camera.position = camera.target + new_offset;

        self.delta_azimuth *= 1.0 - d;
        self.delta_polar *= 1.0 - d;
        self.pan_offset *= 1.0 - d;

        camera.position.distance(before) > SETTLE_EPS
    }

    pub fn is_settled(&self) -> bool {
        self.delta_azimuth.abs() < SETTLE_EPS
            && self.delta_polar.abs() < SETTLE_EPS
            && self.pan_offset.length() < SETTLE_EPS
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_dir: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn new(view_proj: Mat4, light_dir: [f32; 3]) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_dir,
            _padding: 0.0,
        }
    }
}
