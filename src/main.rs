use std::sync::Arc;

use glam::Vec2;
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use coord3d::renderer::{GpuState, OverlayFrame};
use coord3d::scene::{DiagramKind, NodeRole, ResizeNotifier, SurfaceSize, TickStatus, Visualization};
use coord3d::{MeshConfig, SceneConfig, VizError};

mod ui;

use ui::{SceneStats, UiActions, UiState, apply_theme, draw_help_overlay, draw_labels, draw_side_panel};

#[derive(Default)]
struct DragState {
    rotating: bool,
    panning: bool,
    cursor: Option<Vec2>,
}

struct App {
    window: Option<Arc<Window>>,
    viz: Option<Visualization<GpuState>>,
    resize_notifier: Option<ResizeNotifier>,
    egui_state: Option<egui_winit::State>,
    egui_ctx: egui::Context,

    ui_state: UiState,
    drag: DragState,
    scene_config: SceneConfig,
    mesh_config: MeshConfig,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            viz: None,
            resize_notifier: None,
            egui_state: None,
            egui_ctx: egui::Context::default(),

            ui_state: UiState::default(),
            drag: DragState::default(),
            scene_config: SceneConfig::default(),
            mesh_config: MeshConfig::default(),
        }
    }

    /// Tears down the current diagram and mounts `kind` on a fresh surface.
    fn mount(&mut self, kind: DiagramKind) -> coord3d::Result<()> {
        let Some(window) = self.window.clone() else {
            return Ok(());
        };

        self.shutdown();

        let gpu = pollster::block_on(GpuState::new(window.clone()))?;
        let viz = Visualization::mount(gpu, kind.diagram(), self.scene_config.clone(), self.mesh_config.clone());

        self.egui_ctx = egui::Context::default();
        apply_theme(&self.egui_ctx);
        self.egui_state = Some(egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        ));

        self.resize_notifier = viz.lifecycle().resize_notifier();
        self.ui_state.selected = kind;
        self.viz = Some(viz);
        Ok(())
    }

    fn render(&mut self) -> coord3d::Result<()> {
        let (Some(window), Some(egui_state), Some(viz)) = (&self.window, &mut self.egui_state, &mut self.viz)
        else {
            return Ok(());
        };

        let raw_input = egui_state.take_egui_input(window);

        let lifecycle = viz.lifecycle();
        let stats = SceneStats {
            nodes: lifecycle.scene().len(),
            edges: lifecycle.scene().count(NodeRole::Edge),
            rebuilds: viz.cycle().stats().rebuilds,
            frames: lifecycle.schedule().ticks(),
        };
        let camera = lifecycle.camera().clone();
        let viewport = lifecycle.viewport();
        let labels: Vec<(String, glam::Vec3)> = lifecycle
            .scene()
            .labels()
            .map(|(text, anchor)| (text.to_string(), anchor))
            .collect();

        let mut actions = UiActions::default();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = draw_side_panel(ctx, &mut self.ui_state, viz.store(), &stats);
            if self.ui_state.show_labels {
                draw_labels(ctx, labels.iter().map(|(t, a)| (t.as_str(), *a)), &camera, &viewport);
            }
            draw_help_overlay(ctx);
        });
        egui_state.handle_platform_output(window, full_output.platform_output);

        if actions.reset {
            viz.reset()?;
        }
        viz.apply(&actions.edits)?;

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        viz.lifecycle_mut().surface_mut().overlay.submit(OverlayFrame {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        });

        if viz.tick()? == TickStatus::Stopped {
            debug!("frame skipped, scene not running");
        }

        if let Some(kind) = actions.switch_to {
            self.mount(kind)?;
        }
        Ok(())
    }

    fn handle_cursor(&mut self, position: Vec2) {
        let previous = self.drag.cursor.replace(position);
        let Some(previous) = previous else { return };
        if !self.drag.rotating && !self.drag.panning {
            return;
        }
        let Some(viz) = &mut self.viz else { return };
        let delta = position - previous;
        let viewport = viz.lifecycle().viewport();
        let Some((controls, camera)) = viz.lifecycle_mut().controls_mut() else {
            return;
        };
        if self.drag.rotating {
            controls.rotate(delta, viewport.height);
        } else {
            controls.pan(camera, delta, &viewport);
        }
    }

    fn shutdown(&mut self) {
        self.resize_notifier = None;
        if let Some(mut viz) = self.viz.take() {
            viz.dispose();
            let (geometries, materials) = viz.lifecycle().surface().live_resources();
            if geometries + materials > 0 {
                error!("{geometries} geometries and {materials} materials still live after dispose");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title("Coordinate systems")
            .with_inner_size(PhysicalSize::new(1280, 960));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window);

        if let Err(e) = self.mount(self.ui_state.selected) {
            error!("failed to mount diagram: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(notifier) = &self.resize_notifier {
                    notifier.notify(SurfaceSize::new(size.width, size.height));
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.drag.rotating = pressed,
                    MouseButton::Right => self.drag.panning = pressed,
                    _ => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::CursorLeft { .. } => {
                self.drag = DragState::default();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                if let Some((controls, camera)) = self.viz.as_mut().and_then(|v| v.lifecycle_mut().controls_mut()) {
                    controls.zoom(camera, scroll);
                }
            }

            WindowEvent::RedrawRequested => match self.render() {
                Ok(()) => {}
                Err(VizError::OutOfMemory) => {
                    error!("out of GPU memory");
                    self.shutdown();
                    event_loop.exit();
                }
                Err(e) => error!("frame failed: {e}"),
            },

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("failed to create event loop: {e}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("event loop terminated: {e}");
    }
    info!("bye");
}
