/// One tessellated egui frame waiting to be drawn over the scene.
pub struct OverlayFrame {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// egui pass drawn on top of the scene in the same frame.
pub struct Overlay {
    renderer: egui_wgpu::Renderer,
    pending: Option<OverlayFrame>,
}

impl Overlay {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            renderer: egui_wgpu::Renderer::new(device, format, None, 1, false),
            pending: None,
        }
    }

    /// Queues a frame. Texture updates of a frame that never reached the
    /// screen are carried over so none are lost.
    pub fn submit(&mut self, mut frame: OverlayFrame) {
        if let Some(mut skipped) = self.pending.take() {
            skipped.textures_delta.append(frame.textures_delta);
            frame.textures_delta = skipped.textures_delta;
        }
        self.pending = Some(frame);
    }

    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) {
        let Some(frame) = self.pending.take() else {
            return;
        };

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };

        for (id, delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &frame.paint_jobs, &screen_descriptor);
        }

        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
