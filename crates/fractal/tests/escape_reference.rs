use fractal::escape::{escape_time, seed, Orbit, Seed, JULIA_CONSTANT};
use fractal::{Complex32, FractalMode, Power};

const SAMPLES: [Complex32; 4] = [
    Complex32::new(-0.5, 0.0),
    Complex32::new(0.3, 0.5),
    Complex32::new(-0.1, 0.65),
    Complex32::new(0.25, -0.25),
];

#[test]
fn each_step_matches_direct_exponentiation() {
    for power in Power::all() {
        let exponent = i32::from(power.get());
        for c in SAMPLES {
            for mode in [FractalMode::Mandelbrot, FractalMode::Julia] {
                let start = seed(c, mode);
                let mut previous = start.z;
                for (step, z) in Orbit::new(start, power).take(8).enumerate() {
                    let expected = previous.powi(exponent) + start.constant;
                    let scale = 1.0_f32.max(previous.norm().powi(exponent));
                    assert!(
                        (z - expected).norm() <= 1e-4 * scale,
                        "power {power} mode {mode} c {c} step {step}: {z} != {expected}"
                    );
                    if z.norm_sqr() > 1e4 {
                        break;
                    }
                    previous = z;
                }
            }
        }
    }
}

#[test]
fn escape_time_reports_first_iterate_past_radius() {
    let outside = [
        Complex32::new(1.0, 1.0),
        Complex32::new(-2.5, 0.0),
        Complex32::new(0.6, 0.9),
        Complex32::new(0.0, 1.5),
    ];
    for power in Power::all() {
        for c in outside {
            let start = seed(c, FractalMode::Mandelbrot);
            let escaped_at = escape_time(start, power, 100);
            assert!(escaped_at < 100, "power {power} c {c} never escaped");

            let orbit: Vec<Complex32> = Orbit::new(start, power)
                .take(escaped_at as usize + 1)
                .collect();
            let (last, earlier) = orbit.split_last().unwrap();
            assert!(last.norm_sqr() > 4.0);
            assert!(earlier.iter().all(|z| z.norm_sqr() <= 4.0));
        }
    }
}

#[test]
fn origin_is_bounded_for_every_power() {
    for power in Power::all() {
        let start = seed(Complex32::new(0.0, 0.0), FractalMode::Mandelbrot);
        assert_eq!(escape_time(start, power, 100), 100, "power {power}");
    }
}

#[test]
fn julia_orbit_uses_fixed_constant() {
    let start = seed(Complex32::new(0.1, -0.2), FractalMode::Julia);
    assert_eq!(
        start,
        Seed {
            z: Complex32::new(0.1, -0.2),
            constant: JULIA_CONSTANT,
        }
    );
    let first = Orbit::new(start, Power::default()).next().unwrap();
    let expected = Complex32::new(0.1, -0.2).powi(2) + JULIA_CONSTANT;
    assert!((first - expected).norm() < 1e-6);
}
