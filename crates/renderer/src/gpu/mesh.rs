use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Position in clip space plus the texture coordinate sampled for the overlay.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Corners of the viewport: top-right, bottom-right, bottom-left, top-left.
pub(crate) const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [1.0, 1.0, 0.0],
        texcoord: [1.0, 1.0],
    },
    Vertex {
        position: [1.0, -1.0, 0.0],
        texcoord: [1.0, 0.0],
    },
    Vertex {
        position: [-1.0, -1.0, 0.0],
        texcoord: [0.0, 0.0],
    },
    Vertex {
        position: [-1.0, 1.0, 0.0],
        texcoord: [0.0, 1.0],
    },
];

/// Two triangles sharing the bottom-right to top-left diagonal.
pub(crate) const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Static vertex and index buffers for the full-viewport quad.
pub(crate) struct ScreenQuad {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl ScreenQuad {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("screen quad vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("screen quad indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: QUAD_INDICES.len() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
        ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])) * 0.5
    }

    #[test]
    fn triangles_cover_clip_space() {
        let area: f32 = QUAD_INDICES
            .chunks(3)
            .map(|tri| {
                signed_area(
                    QUAD_VERTICES[tri[0] as usize].position,
                    QUAD_VERTICES[tri[1] as usize].position,
                    QUAD_VERTICES[tri[2] as usize].position,
                )
                .abs()
            })
            .sum();
        assert_eq!(area, 4.0);
    }

    #[test]
    fn texcoords_follow_positions() {
        for vertex in QUAD_VERTICES {
            assert_eq!(vertex.texcoord[0], (vertex.position[0] + 1.0) * 0.5);
            assert_eq!(vertex.texcoord[1], (vertex.position[1] + 1.0) * 0.5);
        }
    }

    #[test]
    fn vertex_stride_is_five_floats() {
        assert_eq!(Vertex::layout().array_stride, 20);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&QUAD_VERTICES).len(), 80);
    }
}
