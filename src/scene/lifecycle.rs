use log::{debug, info};

use crate::config::SceneConfig;
use crate::error::Result;
use crate::renderer::camera::{OrbitControls, OrthographicCamera};
use crate::scene::graph::SceneGraph;
use crate::scene::resize::{ResizeNotifier, ResizeObserver};
use crate::scene::surface::{FrameUniforms, RenderSurface, SurfaceSize, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Running,
    Disposed,
}

/// Handle for the repeating render task. Cancelling it stops every future tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSchedule {
    running: bool,
    ticks: u64,
}

impl FrameSchedule {
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn advance(&mut self) -> bool {
        if self.running {
            self.ticks += 1;
        }
        self.running
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    Rendered,
    Stopped,
}

/// Owns one visualization's surface, camera, scene graph and render loop.
pub struct SceneLifecycle<S: RenderSurface> {
    state: LifecycleState,
    config: SceneConfig,
    surface: S,
    scene: SceneGraph,
    camera: OrthographicCamera,
    controls: Option<OrbitControls>,
    resize_observer: Option<ResizeObserver>,
    schedule: FrameSchedule,
    viewport: Viewport,
    applied_size: Option<SurfaceSize>,
}

impl<S: RenderSurface> SceneLifecycle<S> {
    pub fn new(surface: S, config: SceneConfig) -> Self {
        let camera = OrthographicCamera::from_config(&config);
        let viewport = Viewport::fit(surface.size(), config.aspect);
        Self {
            state: LifecycleState::Uninitialized,
            config,
            surface,
            scene: SceneGraph::new(),
            camera,
            controls: None,
            resize_observer: None,
            schedule: FrameSchedule::default(),
            viewport,
            applied_size: None,
        }
    }

    /// Creates and starts a lifecycle in one step.
    pub fn mount(surface: S, config: SceneConfig) -> Self {
        let mut lifecycle = Self::new(surface, config);
        lifecycle.start();
        lifecycle
    }

    /// Attaches controls and the resize observer and schedules ticks.
    /// Only valid from `Uninitialized`.
    pub fn start(&mut self) -> bool {
        if self.state != LifecycleState::Uninitialized {
            return false;
        }
        self.controls = Some(OrbitControls::new(self.config.damping_factor));
        self.resize_observer = Some(ResizeObserver::new());
        let size = self.surface.size();
        self.resize(size);
        self.schedule.start();
        self.state = LifecycleState::Running;
        info!("scene started at {}x{}", size.width, size.height);
        true
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn schedule(&self) -> FrameSchedule {
        self.schedule
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Scene graph and surface for installing geometry; `None` once disposed.
    pub fn parts_mut(&mut self) -> Option<(&mut SceneGraph, &mut S)> {
        match self.state {
            LifecycleState::Disposed => None,
            _ => Some((&mut self.scene, &mut self.surface)),
        }
    }

    /// Camera together with its controls while they are attached.
    pub fn controls_mut(&mut self) -> Option<(&mut OrbitControls, &mut OrthographicCamera)> {
        self.controls.as_mut().map(|c| (c, &mut self.camera))
    }

    pub fn resize_notifier(&self) -> Option<ResizeNotifier> {
        self.resize_observer.as_ref().map(ResizeObserver::notifier)
    }

    /// Applies a new drawable size. Repeating the current size does nothing.
    pub fn resize(&mut self, size: SurfaceSize) -> bool {
        if self.state == LifecycleState::Disposed || size.is_empty() || self.applied_size == Some(size) {
            return false;
        }
        self.surface.resize(size);
        self.camera.set_frustum(self.config.frustum_size, self.config.aspect);
        self.viewport = Viewport::fit(size, self.config.aspect);
        self.applied_size = Some(size);
        debug!("resized to {}x{}", size.width, size.height);
        true
    }

    /// Advances camera damping and renders one frame.
    pub fn tick(&mut self) -> Result<TickStatus> {
        if self.state != LifecycleState::Running || !self.schedule.advance() {
            return Ok(TickStatus::Stopped);
        }
        if let Some(size) = self.resize_observer.as_ref().and_then(ResizeObserver::latest) {
            self.resize(size);
        }
        if let Some(controls) = self.controls.as_mut() {
            controls.update(&mut self.camera);
        }

        let frame = FrameUniforms {
            view_proj: self.camera.view_projection_matrix(),
            light_dir: glam::Vec3::new(5.0, 5.0, 5.0).normalize().to_array(),
            viewport: self.viewport,
            clear_color: self.config.background,
        };
        self.surface.render(&self.scene, &frame)?;
        Ok(TickStatus::Rendered)
    }

    /// Stops ticking, detaches input and resize handling, and releases every
    /// node in the scene graph. Returns the number of nodes released.
    pub fn dispose(&mut self) -> usize {
        if self.state == LifecycleState::Disposed {
            return 0;
        }
        self.schedule.cancel();
        self.controls = None;
        self.resize_observer = None;
        let released = self.scene.clear(&mut self.surface);
        self.state = LifecycleState::Disposed;
        info!("scene disposed, released {released} nodes");
        released
    }
}

impl<S: RenderSurface> Drop for SceneLifecycle<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
