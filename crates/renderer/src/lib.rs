//! Renderer crate for Fraxplore, an interactive escape-time fractal viewer.
//!
//! The crate glues the `winit` window, the `wgpu` pipeline, and the GLSL
//! fractal program together. The overall flow is:
//!
//! ```text
//!   CLI / fraxplore
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ WindowState::frame()
//!                          │                                   │
//!                          │ HeldControls ──▶ ViewState::step ─┤
//!                          │                                   └─▶ GpuState::render ─▶ GPU UBO
//! ```
//!
//! `WindowState` owns all GPU resources (surface, device, pipeline, uniforms,
//! overlay texture), while `Renderer` is the thin entry point that opens the
//! window. The fractal math itself lives in the `fractal` crate; the fragment
//! stage in [`compile::FRAGMENT_SHADER_GLSL`] evaluates the same recurrence per
//! pixel on the GPU.

pub mod compile;
mod gpu;
mod types;
mod window;

use anyhow::Result;

pub use compile::{ShaderError, Stage};
pub use types::{RendererConfig, ShaderCompiler};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and runs until it is closed or Escape is pressed.
    ///
    /// Returns an error if the window or GPU device cannot be created. Shader
    /// compile and link failures are not errors: they are logged and the
    /// window keeps presenting cleared frames.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
