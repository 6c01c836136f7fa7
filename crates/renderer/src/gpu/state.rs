use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use fractal::{ViewState, Viewport};
use tracing::debug;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::types::ShaderCompiler;

use super::context::GpuContext;
use super::mesh::ScreenQuad;
use super::overlay::{OverlaySource, OverlayTexture};
use super::pipeline::{FractalProgram, PipelineLayouts};
use super::uniforms::FractalUniforms;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Everything needed to turn a [`ViewState`] into a presented frame.
pub(crate) struct GpuState {
    context: GpuContext,
    program: FractalProgram,
    quad: ScreenQuad,
    overlay: OverlayTexture,
    overlay_bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    stats: FrameStats,
}

impl GpuState {
    pub(crate) fn new(
        window: Arc<Window>,
        overlay_path: &Path,
        shader_compiler: ShaderCompiler,
    ) -> Result<Self> {
        let context = GpuContext::new(window)?;
        let device = &context.device;

        let layouts = PipelineLayouts::new(device);
        let program = FractalProgram::new(
            device,
            &layouts,
            context.surface_format,
            shader_compiler,
        );
        let quad = ScreenQuad::new(device);
        let overlay = OverlayTexture::load(device, &context.queue, overlay_path);

        let overlay_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("overlay bind group"),
            layout: &layouts.overlay_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&overlay.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&overlay.sampler),
                },
            ],
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fractal uniforms"),
            size: std::mem::size_of::<FractalUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform bind group"),
            layout: &layouts.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            context,
            program,
            quad,
            overlay,
            overlay_bind_group,
            uniform_buffer,
            uniform_bind_group,
            stats: FrameStats::new(Instant::now()),
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn viewport(&self) -> Viewport {
        Viewport::new(self.context.size.width, self.context.size.height)
    }

    pub(crate) fn is_program_linked(&self) -> bool {
        self.program.is_linked()
    }

    pub(crate) fn shader_diagnostics(&self) -> &[crate::compile::ShaderError] {
        &self.program.diagnostics
    }

    pub(crate) fn overlay_source(&self) -> OverlaySource {
        self.overlay.source
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    /// Uploads the frame's uniforms, draws the screen quad once and presents.
    pub(crate) fn render(&mut self, view: &ViewState) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;

        let uniforms = FractalUniforms::for_frame(view, self.viewport());
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("fractal pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.program.pipeline.as_ref() {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, &self.overlay_bind_group, &[]);
                self.quad.draw(&mut render_pass);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        if let Some(fps) = self.stats.frame_presented(Instant::now()) {
            debug!(
                fps = fps.round(),
                power = view.power().get(),
                mode = %view.mode(),
                width = uniforms.screen_size[0],
                height = uniforms.screen_size[1],
                "render stats"
            );
        }
        Ok(())
    }
}

/// Frames-per-second counter reported once per interval.
#[derive(Debug)]
pub(crate) struct FrameStats {
    interval: Duration,
    window_start: Instant,
    frames: u32,
}

impl FrameStats {
    pub(crate) fn new(now: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1),
            window_start: now,
            frames: 0,
        }
    }

    /// Counts a frame; returns the rate once a full interval has elapsed.
    pub(crate) fn frame_presented(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_stats_report_once_per_interval() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        for frame in 1..60 {
            let now = start + Duration::from_millis(frame * 16);
            assert_eq!(stats.frame_presented(now), None);
        }
        let fps = stats
            .frame_presented(start + Duration::from_secs(1))
            .unwrap();
        assert_eq!(fps, 60.0);
        assert_eq!(
            stats.frame_presented(start + Duration::from_millis(1016)),
            None
        );
    }
}
