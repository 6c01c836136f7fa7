//! Host-independent model of the fractal explorer.
//!
//! Everything the GPU evaluates per pixel and everything the host loop mutates
//! per frame lives here, free of any window or device types:
//!
//! ```text
//!   key events ─▶ HeldControls ─▶ ViewState::step() ─▶ ViewState
//!                                                        │
//!   Viewport (framebuffer size) ─────────────────────────┤
//!                                                        ▼
//!                     plane::map_to_plane ─▶ escape::seed ─▶ escape::escape_time
//!                                                        │
//!                            palette::map_to_color ◀─────┘ ─▶ shade::composite
//! ```
//!
//! The `renderer` crate embeds a GLSL fragment stage that implements the same
//! formulas; the functions in [`escape`], [`palette`] and [`shade`] are the
//! CPU reference it is checked against.

mod error;
pub mod escape;
pub mod input;
pub mod palette;
pub mod plane;
pub mod shade;
mod view;

pub use error::Error;
pub use input::{Control, Flow, HeldControls};
pub use num_complex::Complex32;
pub use palette::Rgba;
pub use plane::Viewport;
pub use view::{FractalMode, Power, ViewState, ITERATION_LIMIT};
