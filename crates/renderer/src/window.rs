use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use fractal::{Control, Flow, HeldControls, Power, ViewState};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::{GpuState, OverlaySource};
use crate::types::RendererConfig;

/// State owned by the event loop: GPU resources, the window, and the view the
/// keyboard drives.
pub(crate) struct WindowState {
    gpu: GpuState,
    window: Arc<Window>,
    view: ViewState,
    controls: HeldControls,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let gpu = GpuState::new(Arc::clone(&window), &config.overlay, config.shader_compiler)?;

        if !gpu.is_program_linked() {
            warn!(
                failures = gpu.shader_diagnostics().len(),
                "fractal program is unusable; frames will only show the clear color"
            );
        }
        match gpu.overlay_source() {
            OverlaySource::Image { width, height } => {
                debug!(width, height, "overlay bound");
            }
            OverlaySource::Placeholder => {
                debug!("rendering without an overlay image");
            }
        }

        Ok(Self {
            gpu,
            window,
            view: config.initial_view,
            controls: HeldControls::new(),
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    pub(crate) fn handle_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(control) = control_for_key(code) else {
            return;
        };
        match event.state {
            ElementState::Pressed => self.controls.press(control),
            ElementState::Released => self.controls.release(control),
        };
    }

    /// Drops every held key; release events are not delivered while unfocused.
    pub(crate) fn release_all(&mut self) {
        self.controls.clear();
    }

    /// Applies this frame's input, then renders unless the input asked to quit.
    pub(crate) fn frame(&mut self) -> Result<Flow, wgpu::SurfaceError> {
        let before = self.view;
        if self.view.step(&self.controls) == Flow::Exit {
            return Ok(Flow::Exit);
        }
        if self.view != before {
            info!(
                power = self.view.power().get(),
                mode = %self.view.mode(),
                "view updated"
            );
        }
        self.gpu.render(&self.view)?;
        Ok(Flow::Continue)
    }
}

/// Maps a physical key to the control it triggers, if any.
pub(crate) fn control_for_key(code: KeyCode) -> Option<Control> {
    let power = |value: u8| Power::new(value).ok().map(Control::Power);
    match code {
        KeyCode::Escape => Some(Control::Quit),
        KeyCode::Digit2 => power(2),
        KeyCode::Digit3 => power(3),
        KeyCode::Digit4 => power(4),
        KeyCode::Digit5 => power(5),
        KeyCode::Digit6 => power(6),
        KeyCode::Digit7 => power(7),
        KeyCode::Digit8 => power(8),
        KeyCode::KeyM => Some(Control::Mandelbrot),
        KeyCode::KeyJ => Some(Control::Julia),
        _ => None,
    }
}

/// Opens the window and drives the `winit` event loop until it closes.
///
/// Each redraw polls the held keys into the view, uploads uniforms for the
/// current surface size, draws once and presents. A new redraw is requested
/// whenever the loop is about to idle, so frames run back to back.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size)
        .with_resizable(true)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, config)?;
    state.window().request_redraw();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            state.handle_key(&event);
                        }
                        WindowEvent::Focused(false) => {
                            state.release_all();
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                        }
                        WindowEvent::RedrawRequested => match state.frame() {
                            Ok(Flow::Continue) => {}
                            Ok(Flow::Exit) => {
                                info!("escape pressed; closing window");
                                elwt.exit();
                            }
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.resize(state.size());
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("surface out of memory; exiting");
                                elwt.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                warn!("surface timeout; retrying next frame");
                            }
                            Err(other) => {
                                warn!("surface error: {other:?}; retrying next frame");
                            }
                        },
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    state.window().request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys_select_powers() {
        assert_eq!(
            control_for_key(KeyCode::Digit5),
            Some(Control::Power(Power::new(5).unwrap()))
        );
        assert_eq!(
            control_for_key(KeyCode::Digit8),
            Some(Control::Power(Power::new(8).unwrap()))
        );
        assert_eq!(control_for_key(KeyCode::Digit1), None);
        assert_eq!(control_for_key(KeyCode::Digit9), None);
    }

    #[test]
    fn letter_and_escape_keys_map_to_controls() {
        assert_eq!(control_for_key(KeyCode::Escape), Some(Control::Quit));
        assert_eq!(control_for_key(KeyCode::KeyM), Some(Control::Mandelbrot));
        assert_eq!(control_for_key(KeyCode::KeyJ), Some(Control::Julia));
        assert_eq!(control_for_key(KeyCode::KeyK), None);
    }
}
