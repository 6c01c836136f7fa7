//! Escape-time evaluation of `z -> z^power + k`.

use num_complex::Complex32;

use crate::view::{FractalMode, Power, ViewState};

/// Additive constant used in Julia mode.
pub const JULIA_CONSTANT: Complex32 = Complex32::new(0.6, 0.55);

/// Squared magnitude past which an orbit counts as escaped.
pub const ESCAPE_RADIUS_SQUARED: f32 = 4.0;

/// Starting point and additive constant of one orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub z: Complex32,
    pub constant: Complex32,
}

/// Derives the orbit seed for plane point `c`.
///
/// Both modes go through one formula with the mode's 0/1 selector `m`:
///
/// ```text
///   z0 = m * c
///   k  = (1 - m) * c + m * JULIA_CONSTANT
/// ```
///
/// `m = 0` gives the Mandelbrot parameterisation (`z0 = 0`, `k = c`) and
/// `m = 1` the Julia one (`z0 = c`, `k` fixed). The GPU stage evaluates the
/// same expression without branching, so keep the two in step.
pub fn seed(c: Complex32, mode: FractalMode) -> Seed {
    let m = mode.selector();
    Seed {
        z: c * m,
        constant: c * (1.0 - m) + JULIA_CONSTANT * m,
    }
}

/// `z^power` by repeated multiplication (`power - 1` products).
pub fn complex_pow(z: Complex32, power: Power) -> Complex32 {
    let mut w = z;
    for _ in 1..power.get() {
        w *= z;
    }
    w
}

/// Successive iterates `z1, z2, ...` of the map from a seed.
#[derive(Debug, Clone)]
pub struct Orbit {
    z: Complex32,
    constant: Complex32,
    power: Power,
}

impl Orbit {
    pub fn new(seed: Seed, power: Power) -> Self {
        Self {
            z: seed.z,
            constant: seed.constant,
            power,
        }
    }
}

impl Iterator for Orbit {
    type Item = Complex32;

    fn next(&mut self) -> Option<Self::Item> {
        self.z = complex_pow(self.z, self.power) + self.constant;
        Some(self.z)
    }
}

/// Index of the first iterate whose squared magnitude exceeds
/// [`ESCAPE_RADIUS_SQUARED`], or `limit` when the orbit stays bounded.
pub fn escape_time(seed: Seed, power: Power, limit: u32) -> u32 {
    Orbit::new(seed, power)
        .take(limit as usize)
        .position(|z| z.norm_sqr() > ESCAPE_RADIUS_SQUARED)
        .map_or(limit, |index| index as u32)
}

/// Normalised escape fraction `t = i / limit` fed to the palette.
pub fn escape_fraction(iterations: u32, limit: u32) -> f32 {
    iterations as f32 / limit as f32
}

/// Escape iteration count for plane point `c` under the current view.
pub fn evaluate(c: Complex32, view: &ViewState) -> u32 {
    escape_time(seed(c, view.mode()), view.power(), view.iteration_limit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power(value: u8) -> Power {
        Power::new(value).unwrap()
    }

    #[test]
    fn mandelbrot_constant_is_the_point_itself() {
        for c in [
            Complex32::new(-0.5, 0.0),
            Complex32::new(0.3, 0.5),
            Complex32::new(-1.75, 0.02),
        ] {
            let seed = seed(c, FractalMode::Mandelbrot);
            assert_eq!(seed.constant, c);
            assert_eq!(seed.z, Complex32::new(0.0, 0.0));
        }
    }

    #[test]
    fn julia_constant_ignores_the_point() {
        for c in [
            Complex32::new(-0.5, 0.0),
            Complex32::new(0.3, 0.5),
            Complex32::new(12.0, -7.5),
        ] {
            let seed = seed(c, FractalMode::Julia);
            assert_eq!(seed.constant, JULIA_CONSTANT);
            assert_eq!(seed.z, c);
        }
    }

    #[test]
    fn origin_never_escapes_for_power_two() {
        let seed = seed(Complex32::new(0.0, 0.0), FractalMode::Mandelbrot);
        assert_eq!(escape_time(seed, power(2), 100), 100);
    }

    #[test]
    fn escape_stops_at_first_step_over_radius() {
        // k = 1: iterates are 1, 2, 5, ... and 5 is the first with |z|^2 > 4.
        let seed = Seed {
            z: Complex32::new(0.0, 0.0),
            constant: Complex32::new(1.0, 0.0),
        };
        assert_eq!(escape_time(seed, power(2), 100), 2);
    }

    #[test]
    fn boundary_magnitude_does_not_escape() {
        // Iterates stay at exactly |z|^2 == 4, which is not strictly greater.
        let seed = Seed {
            z: Complex32::new(2.0, 0.0),
            constant: Complex32::new(-2.0, 0.0),
        };
        assert_eq!(escape_time(seed, power(2), 100), 100);
    }

    #[test]
    fn far_point_escapes_immediately() {
        let seed = seed(Complex32::new(3.0, 0.0), FractalMode::Mandelbrot);
        assert_eq!(escape_time(seed, power(5), 100), 0);
    }

    #[test]
    fn complex_pow_of_i_cycles() {
        let i = Complex32::new(0.0, 1.0);
        assert_eq!(complex_pow(i, power(2)), Complex32::new(-1.0, 0.0));
        assert_eq!(complex_pow(i, power(4)), Complex32::new(1.0, 0.0));
    }

    #[test]
    fn escape_fraction_spans_unit_interval() {
        assert_eq!(escape_fraction(0, 100), 0.0);
        assert_eq!(escape_fraction(50, 100), 0.5);
        assert_eq!(escape_fraction(100, 100), 1.0);
    }
}
