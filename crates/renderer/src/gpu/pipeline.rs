use crate::compile::{compile_stage, ShaderError, Stage};
use crate::types::ShaderCompiler;

use super::mesh::Vertex;

pub(crate) struct PipelineLayouts {
    pub uniform_layout: wgpu::BindGroupLayout,
    pub overlay_layout: wgpu::BindGroupLayout,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let overlay_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("overlay layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            uniform_layout,
            overlay_layout,
        }
    }
}

/// The compiled and linked fractal program.
///
/// Compile or link failures leave `pipeline` empty. The program is still
/// usable as a value: frames clear and present but draw nothing, and the
/// collected diagnostics stay available for inspection.
pub(crate) struct FractalProgram {
    pub pipeline: Option<wgpu::RenderPipeline>,
    pub diagnostics: Vec<ShaderError>,
}

impl FractalProgram {
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        surface_format: wgpu::TextureFormat,
        compiler: ShaderCompiler,
    ) -> Self {
        let mut diagnostics = Vec::new();
        let vertex = compile_stage(device, compiler, Stage::Vertex)
            .map_err(|err| diagnostics.push(err))
            .ok();
        let fragment = compile_stage(device, compiler, Stage::Fragment)
            .map_err(|err| diagnostics.push(err))
            .ok();

        let pipeline = match (vertex, fragment) {
            (Some(vertex), Some(fragment)) => {
                link(device, layouts, surface_format, &vertex, &fragment)
                    .map_err(|err| diagnostics.push(err))
                    .ok()
            }
            _ => None,
        };

        for diagnostic in &diagnostics {
            tracing::error!(%compiler, "{diagnostic}");
        }
        if pipeline.is_some() {
            tracing::debug!(%compiler, "fractal program linked");
        }

        Self {
            pipeline,
            diagnostics,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.pipeline.is_some()
    }
}

fn link(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    surface_format: wgpu::TextureFormat,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("fractal pipeline layout"),
        bind_group_layouts: &[&layouts.uniform_layout, &layouts.overlay_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("fractal pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some("main"),
            buffers: &[Vertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::link(&error.to_string())),
        None => Ok(pipeline),
    }
}
