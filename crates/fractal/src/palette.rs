/// Linear RGBA color, each channel nominally in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Warm gradient over the escape fraction `t`.
///
/// Each channel is a cubic Bernstein-style bump:
/// `r = 9(1-t)t^3`, `g = 15(1-t)^2 t^2`, `b = 8.5(1-t)^3 t`. Both ends of the
/// range are opaque black.
pub fn map_to_color(t: f32) -> Rgba {
    let s = 1.0 - t;
    let r = 9.0 * s * t * t * t;
    let g = 15.0 * s * s * t * t;
    let b = 8.5 * s * s * s * t;
    [r, g, b, 1.0]
}
