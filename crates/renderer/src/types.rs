use std::path::PathBuf;

use fractal::ViewState;

/// Shader compilation backend requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderCompiler {
    /// Compile the GLSL stages through shaderc into SPIR-V.
    Shaderc,
    /// Hand GLSL to naga's built-in frontend.
    NagaGlsl,
}

impl Default for ShaderCompiler {
    fn default() -> Self {
        if cfg!(feature = "shaderc") {
            ShaderCompiler::Shaderc
        } else {
            ShaderCompiler::NagaGlsl
        }
    }
}

impl std::fmt::Display for ShaderCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderCompiler::Shaderc => f.write_str("shaderc"),
            ShaderCompiler::NagaGlsl => f.write_str("naga"),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags: the initial window size, the overlay
/// image, the starting view, and the shader backend.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Initial window inner size in physical pixels.
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Overlay image sampled by the fragment stage; a missing or unreadable
    /// file falls back to a transparent placeholder.
    pub overlay: PathBuf,
    /// View the loop starts from.
    pub initial_view: ViewState,
    /// Shader compiler that should be used for the GLSL stages.
    pub shader_compiler: ShaderCompiler,
}

impl Default for RendererConfig {
    /// Provides an 800x600 window starting on the power-2 Mandelbrot set.
    fn default() -> Self {
        Self {
            surface_size: (800, 600),
            title: "Fraxplore".to_string(),
            overlay: PathBuf::from("name.png"),
            initial_view: ViewState::default(),
            shader_compiler: ShaderCompiler::default(),
        }
    }
}
