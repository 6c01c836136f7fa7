use anyhow::{Context, Result};
use renderer::{Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<()> {
    let config = renderer_config(cli);
    tracing::info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        overlay = %config.overlay.display(),
        compiler = %config.shader_compiler,
        "launching fraxplore; keys: Esc quit, 2-8 power, M mandelbrot, J julia"
    );

    let mut renderer = Renderer::new(config);
    renderer.run().context("renderer terminated with an error")
}

pub fn renderer_config(cli: Cli) -> RendererConfig {
    RendererConfig {
        overlay: cli.overlay,
        ..RendererConfig::default()
    }
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
