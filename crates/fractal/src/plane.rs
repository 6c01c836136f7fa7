//! Screen to complex-plane mapping.

use num_complex::Complex32;

use crate::view::ViewState;

/// Framebuffer size in physical pixels, as last reported by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero height yields a non-finite ratio; callers
    /// skip zero-sized surfaces rather than guard here.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn size(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

/// Maps a fragment coordinate to the point `c` it samples.
///
/// `frag` is measured from the bottom-left corner of the framebuffer (pixel
/// centers at `n + 0.5`). The unit square is centered on the origin, stretched
/// horizontally by the aspect ratio, divided by the zoom and then offset by
/// the view center.
pub fn map_to_plane(frag: [f32; 2], viewport: Viewport, view: &ViewState) -> Complex32 {
    let [width, height] = viewport.size();
    let c = Complex32::new(
        viewport.aspect_ratio() * (frag[0] / width - 0.5),
        frag[1] / height - 0.5,
    );
    c / view.zoom() + view.center()
}
