use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

use approx::assert_relative_eq;
use nalgebra::Vector3;
use twts::{
    error::TwtsError,
    grid::{Dimensionality, FieldPositions, GridSpec, YeeCell},
    params::PulseParams,
    sample::{sample_plane, Plane},
    settings::{self, Settings},
    twts::{TwtsField, TwtsFieldB, TwtsFieldE},
};

const DT: f64 = 8e-17;
const CELL: f64 = 5e-8;

/// Every field component sits on the cell corner.
struct CellCorners;

impl FieldPositions for CellCorners {
    fn e_field_offsets(&self, _dim: Dimensionality) -> [Vector3<f64>; 3] {
        [Vector3::zeros(); 3]
    }

    fn b_field_offsets(&self, _dim: Dimensionality) -> [Vector3<f64>; 3] {
        [Vector3::zeros(); 3]
    }
}

fn reference_pulse() -> PulseParams {
    PulseParams {
        focus_distance: 0.0,
        wavelength: 0.8e-6,
        pulse_duration: 30e-15,
        waist_x: 5e-6,
        waist_y: 5e-6,
        phi: 30.0 * PI / 180.0,
        beta0: 1.0,
        time_delay: 0.0,
        auto_time_delay: true,
    }
}

fn grid(dim: Dimensionality) -> GridSpec {
    GridSpec::new(
        dim,
        Vector3::new(32, 32, 32),
        Vector3::new(CELL, CELL, CELL),
        DT,
    )
}

/// Pulse whose centre passes the laser origin exactly at step 50.
fn centred_pulse(phi: f64) -> PulseParams {
    PulseParams {
        phi,
        time_delay: 50.0 * DT,
        auto_time_delay: false,
        ..reference_pulse()
    }
}

#[test]
fn end_to_end_reference_pulse() {
    for dim in [Dimensionality::Three, Dimensionality::Two] {
        let e_field = TwtsFieldE::new(reference_pulse(), grid(dim), &YeeCell).unwrap();
        let b_field = TwtsFieldB::new(reference_pulse(), grid(dim), &YeeCell).unwrap();

        let delay = e_field.time_delay_si();
        assert!(delay.is_finite() && delay > 0.0);
        assert_eq!(delay, b_field.time_delay_si());

        let step = (delay / DT).round() as u32;
        assert_eq!(step, e_field.step_for_time(0.0));

        let centre = e_field.grid().centre_cell();
        let e = e_field.try_evaluate(&centre, step).unwrap();
        let b = b_field.try_evaluate(&centre, step).unwrap();
        assert!(e.iter().any(|&v| v != 0.0), "{:?}", dim);
        assert!(b.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn singular_angles_fail_construction() {
    for phi in [0.0, PI] {
        let params = PulseParams {
            phi,
            ..reference_pulse()
        };
        assert_eq!(
            TwtsFieldE::new(params.clone(), grid(Dimensionality::Three), &YeeCell).err(),
            Some(TwtsError::SingularAngle { phi })
        );
        assert_eq!(
            TwtsFieldB::new(params, grid(Dimensionality::Two), &YeeCell).err(),
            Some(TwtsError::SingularAngle { phi })
        );
    }
}

#[test]
fn fields_at_laser_origin() {
    // at the origin and t = 0 the complex amplitude is exp(-i pi/4)
    for phi in [PI / 6.0, FRAC_PI_2, 2.0] {
        let e3 = TwtsFieldE::new(centred_pulse(phi), grid(Dimensionality::Three), &CellCorners)
            .unwrap();
        let origin = Vector3::new(16, 0, 16);
        let e = e3.evaluate(&origin, 50);
        assert_relative_eq!(e.x, FRAC_1_SQRT_2, epsilon = 1e-9);
        assert_eq!((e.y, e.z), (0.0, 0.0));

        let e2 =
            TwtsFieldE::new(centred_pulse(phi), grid(Dimensionality::Two), &CellCorners).unwrap();
        let e = e2.evaluate(&Vector3::new(16, 0, 0), 50);
        assert_relative_eq!(e.z, FRAC_1_SQRT_2, epsilon = 1e-9);
        assert_eq!((e.x, e.y), (0.0, 0.0));

        // By = exp(-i pi/4) and Bz = 0 in the laser frame, rotated back
        let b3 = TwtsFieldB::new(centred_pulse(phi), grid(Dimensionality::Three), &CellCorners)
            .unwrap();
        let b = b3.evaluate(&origin, 50);
        assert_eq!(b.x, 0.0);
        assert_relative_eq!(b.y, -phi.sin() * FRAC_1_SQRT_2, epsilon = 1e-9);
        assert_relative_eq!(b.z, -phi.cos() * FRAC_1_SQRT_2, epsilon = 1e-9);

        let b2 =
            TwtsFieldB::new(centred_pulse(phi), grid(Dimensionality::Two), &CellCorners).unwrap();
        let b = b2.evaluate(&Vector3::new(16, 0, 0), 50);
        // the 2-D remap flips E, so B carries the opposite sign
        assert_relative_eq!(b.x, phi.cos() * FRAC_1_SQRT_2, epsilon = 1e-9);
        assert_relative_eq!(b.y, phi.sin() * FRAC_1_SQRT_2, epsilon = 1e-9);
        assert_eq!(b.z, 0.0);
    }
}

#[test]
fn focus_moves_the_laser_origin() {
    let params = PulseParams {
        focus_distance: 10.0 * CELL,
        ..centred_pulse(1.0)
    };
    let e = TwtsFieldE::new(params, grid(Dimensionality::Three), &CellCorners).unwrap();
    let v = e.evaluate(&Vector3::new(16, 10, 16), 50);
    assert_relative_eq!(v.x, FRAC_1_SQRT_2, epsilon = 1e-9);
}

#[test]
fn central_plane_peaks_near_pulse_centre() {
    let params = PulseParams {
        phi: FRAC_PI_2,
        focus_distance: 16.0 * CELL,
        ..reference_pulse()
    };
    let e = TwtsFieldE::new(params, grid(Dimensionality::Three), &YeeCell).unwrap();
    let sample = sample_plane(&e, Plane::Xz, e.step_for_time(0.0), false).unwrap();
    let peak = sample.peak();
    assert!(peak.magnitude.is_finite() && peak.magnitude > 0.0);
    assert_eq!(sample.shape(), (32, 32));
}

#[test]
fn default_settings_build_functors() {
    let settings = settings::load_default_config().unwrap();
    let grid = settings.grid_spec();
    assert!(TwtsFieldE::new(settings.pulse.clone(), grid.clone(), &YeeCell).is_ok());
    assert!(TwtsFieldB::new(settings.pulse, grid, &YeeCell).is_ok());
}

#[test]
fn settings_from_toml_build_2d_functors() {
    let text = r#"
[pulse]
focus_distance = 1.0e-6
wavelength = 0.8e-6
pulse_duration = 30.0e-15
waist_x = 5.0e-6
waist_y = 5.0e-6
phi = 1.0

[grid]
dimensionality = "two"
global_size = [64, 64, 0]
cell_size = [5.0e-8, 5.0e-8, 0.0]
delta_t = 8.0e-17
"#;
    let settings = Settings::from_toml_str(text).unwrap();
    settings.validate().unwrap();
    let b = TwtsFieldB::new(settings.pulse.clone(), settings.grid_spec(), &YeeCell).unwrap();
    let v = b.evaluate(&Vector3::new(32, 20, 0), b.step_for_time(0.0));
    assert_eq!(v.z, 0.0);
    assert!(v.x.is_finite() && v.y.is_finite());
}
