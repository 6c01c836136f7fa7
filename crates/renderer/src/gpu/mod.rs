//! GPU side of the explorer.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   reconfigure the swapchain when the window resizes.
//! - `mesh` holds the static screen quad (4 vertices, 6 indices).
//! - `overlay` decodes the overlay image, builds its mip chain and falls back
//!   to a transparent placeholder when loading fails.
//! - `pipeline` compiles and links the fractal program, keeping diagnostics
//!   instead of failing when either step goes wrong.
//! - `uniforms` mirrors the fragment stage's uniform block.
//! - `state` glues everything together and exposes the `GpuState` API used by
//!   `window`.

mod context;
mod mesh;
mod overlay;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use overlay::OverlaySource;
pub(crate) use state::GpuState;
