use bytemuck::{Pod, Zeroable};
use fractal::{ViewState, Viewport};

/// std140 mirror of the `FractalParams` block in the fragment stage.
///
/// Every member is four bytes wide and the vec2s sit on 8-byte offsets, so the
/// only padding std140 needs is the tail rounding the block up to 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct FractalUniforms {
    pub center: [f32; 2],
    pub screen_size: [f32; 2],
    pub screen_ratio: f32,
    pub zoom: f32,
    pub iteration_limit: i32,
    pub power: i32,
    pub mode: i32,
    pub _padding: [i32; 3],
}

impl FractalUniforms {
    /// Builds the block for one frame from the view and the surface's current size.
    pub fn for_frame(view: &ViewState, viewport: Viewport) -> Self {
        let center = view.center();
        Self {
            center: [center.re, center.im],
            screen_size: viewport.size(),
            screen_ratio: viewport.aspect_ratio(),
            zoom: view.zoom(),
            iteration_limit: view.iteration_limit() as i32,
            power: i32::from(view.power().get()),
            mode: view.mode().as_uniform(),
            _padding: [0; 3],
        }
    }
}
