use std::fmt;

use num_complex::Complex32;

use crate::error::Error;
use crate::input::{Control, Flow, HeldControls};

/// Escape-time iteration cap. Fixed for the lifetime of a run.
pub const ITERATION_LIMIT: u32 = 100;

const INITIAL_ZOOM: f32 = 0.4;

/// Integer exponent of the iterated map `z -> z^power + c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Power(u8);

impl Power {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 8;

    pub fn new(value: u8) -> Result<Self, Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::PowerOutOfRange(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Every selectable power, lowest first.
    pub fn all() -> impl Iterator<Item = Power> {
        (Self::MIN..=Self::MAX).map(Power)
    }
}

impl Default for Power {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which parameterisation of the generalised map is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FractalMode {
    /// The pixel coordinate is the additive constant; iteration starts at zero.
    #[default]
    Mandelbrot,
    /// The pixel coordinate seeds the iteration; the constant is fixed.
    Julia,
}

impl FractalMode {
    /// The 0/1 selector used by the branchless blend.
    pub const fn selector(self) -> f32 {
        match self {
            FractalMode::Mandelbrot => 0.0,
            FractalMode::Julia => 1.0,
        }
    }

    /// Integer value written to the `mode` uniform.
    pub const fn as_uniform(self) -> i32 {
        match self {
            FractalMode::Mandelbrot => 0,
            FractalMode::Julia => 1,
        }
    }
}

impl fmt::Display for FractalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FractalMode::Mandelbrot => f.write_str("mandelbrot"),
            FractalMode::Julia => f.write_str("julia"),
        }
    }
}

/// The scalars the host loop owns and pushes to the evaluator every frame.
///
/// Only keyboard input mutates a `ViewState`; center and zoom are carried as
/// uniforms but no control changes them yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    center: Complex32,
    zoom: f32,
    iteration_limit: u32,
    power: Power,
    mode: FractalMode,
}

impl ViewState {
    pub fn new(power: Power, mode: FractalMode) -> Self {
        Self {
            center: Complex32::new(0.0, 0.0),
            zoom: INITIAL_ZOOM,
            iteration_limit: ITERATION_LIMIT,
            power,
            mode,
        }
    }

    pub fn center(&self) -> Complex32 {
        self.center
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn iteration_limit(&self) -> u32 {
        self.iteration_limit
    }

    pub fn power(&self) -> Power {
        self.power
    }

    pub fn mode(&self) -> FractalMode {
        self.mode
    }

    /// Applies a single control and reports whether the loop should keep running.
    pub fn apply(&mut self, control: Control) -> Flow {
        match control {
            Control::Quit => return Flow::Exit,
            Control::Power(power) => self.power = power,
            Control::Mandelbrot => self.mode = FractalMode::Mandelbrot,
            Control::Julia => self.mode = FractalMode::Julia,
        }
        Flow::Continue
    }

    /// Polls the held controls once, applying only the highest-priority one.
    pub fn step(&mut self, held: &HeldControls) -> Flow {
        match held.resolve() {
            Some(control) => self.apply(control),
            None => Flow::Continue,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Power::default(), FractalMode::default())
    }
}
