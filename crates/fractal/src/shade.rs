//! Final per-pixel color, including the overlay override.

use crate::escape::{escape_fraction, evaluate};
use crate::palette::{map_to_color, Rgba};
use crate::plane::{map_to_plane, Viewport};
use crate::view::ViewState;

/// Overlay texels whose red channel exceeds this replace the fractal color.
pub const OVERLAY_THRESHOLD: f32 = 0.1;

/// Chooses between the computed fractal color and the overlay texel.
///
/// Only the red channel is tested; alpha plays no part.
pub fn composite(fractal: Rgba, overlay: Rgba) -> Rgba {
    if overlay[0] > OVERLAY_THRESHOLD {
        overlay
    } else {
        fractal
    }
}

/// CPU reference of the fragment stage for one pixel.
pub fn shade_pixel(frag: [f32; 2], viewport: Viewport, view: &ViewState, overlay: Rgba) -> Rgba {
    let c = map_to_plane(frag, viewport, view);
    let iterations = evaluate(c, view);
    let t = escape_fraction(iterations, view.iteration_limit());
    composite(map_to_color(t), overlay)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: Rgba = [0.0, 0.0, 0.0, 0.0];

    #[test]
    fn bright_overlay_replaces_fractal() {
        let overlay = [0.8, 0.1, 0.1, 0.5];
        assert_eq!(composite([0.2, 0.2, 0.2, 1.0], overlay), overlay);
    }

    #[test]
    fn dim_red_keeps_fractal_even_when_opaque() {
        let fractal = [0.2, 0.3, 0.4, 1.0];
        assert_eq!(composite(fractal, [0.1, 1.0, 1.0, 1.0]), fractal);
        assert_eq!(composite(fractal, [0.05, 0.0, 0.0, 1.0]), fractal);
    }

    #[test]
    fn interior_pixel_is_black() {
        let view = ViewState::default();
        let viewport = Viewport::new(800, 600);
        let color = shade_pixel([400.0, 300.0], viewport, &view, CLEAR);
        assert_eq!(color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn exterior_pixel_is_colored() {
        let view = ViewState::default();
        let viewport = Viewport::new(800, 600);
        // Right edge of the default view sits near +1.66 on the real axis,
        // well outside the set, so it escapes on the second step.
        let color = shade_pixel([799.5, 300.0], viewport, &view, CLEAR);
        assert_eq!(color[3], 1.0);
        assert!(color[..3].iter().any(|&channel| channel > 0.0));
    }
}
