//! Closed-form TWTS field expressions.
//!
//! The TWTS pulse is an exact paraxial solution of the wave equation with
//! built-in pulse-front tilt and angular dispersion. Ex, By and Bz are derived
//! independently from Maxwell's curl relations on the same scalar potential and
//! evaluated here as complex expressions; the physical field is the real part,
//! normalized to unit peak amplitude.
//!
//! The expressions are kept in the grouping of the physics derivation. The
//! `help*` terms lower the nesting depth so the code can be checked against the
//! derivation by hand, and they bound floating-point cancellation; do not
//! regroup them.
//!
//! # Units
//!
//! All quantities are made dimensionless with the speed of light set to one:
//! the unit of time is the simulation time step and the unit of length is
//! `c * dt`.
//!
//! # Singularities
//!
//! The expressions divide by `sin(phi_t)` and `cos(phi_t / 2)` and are
//! undefined for phi = 0 and phi = pi. This is a property of the model;
//! [`PulseParams::validate`] rejects such angles.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector3;
use num_complex::Complex64;

use crate::constants::SPEED_OF_LIGHT_SI;
use crate::params::PulseParams;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    const DT: f64 = 8e-17;

    fn params(phi: f64) -> PulseParams {
        PulseParams {
            focus_distance: 0.0,
            wavelength: 0.8e-6,
            pulse_duration: 30e-15,
            waist_x: 5e-6,
            waist_y: 5e-6,
            phi,
            beta0: 1.0,
            time_delay: 0.0,
            auto_time_delay: true,
        }
    }

    #[test]
    fn shared_constants() {
        let pulse = TwtsPulse::new(&params(PI / 2.0), DT);
        let unit_length = DT * SPEED_OF_LIGHT_SI;
        assert_relative_eq!(pulse.unit_length, unit_length);
        assert_relative_eq!(pulse.om0, 2.0 * PI * unit_length / 0.8e-6, max_relative = 1e-12);
        assert_relative_eq!(pulse.tau_g, 60e-15 / DT, max_relative = 1e-12);
        assert_relative_eq!(
            pulse.rho0,
            PI * 5e-6 * 5e-6 / 0.8e-6 / unit_length,
            max_relative = 1e-12
        );
        assert_eq!(pulse.k, pulse.om0);
        assert_eq!(pulse.phi_t, PI / 2.0);
    }

    #[test]
    fn centre_values() {
        // at the pulse centre every field is the bare carrier phase exp(-i pi/4)
        let origin = Vector3::zeros();
        for phi in [0.3, PI / 6.0, PI / 2.0, 2.5] {
            let pulse = TwtsPulse::new(&params(phi), DT);
            let ex = pulse.ex_complex(&origin, 0.0);
            let by = pulse.by_complex(&origin, 0.0);
            assert_relative_eq!(ex.re, FRAC_1_SQRT_2, epsilon = 1e-9);
            assert_relative_eq!(ex.im, -FRAC_1_SQRT_2, epsilon = 1e-9);
            assert_relative_eq!(by.re, FRAC_1_SQRT_2, epsilon = 1e-9);
            assert_relative_eq!(by.im, -FRAC_1_SQRT_2, epsilon = 1e-9);
            assert_eq!(pulse.bz(&origin, 0.0), 0.0);
        }
    }

    #[test]
    fn transverse_gaussian_profile() {
        let pulse = TwtsPulse::new(&params(PI / 3.0), DT);
        for x in [0.5e-6, 2e-6, 5e-6, 8e-6] {
            let ex = pulse.ex_complex(&Vector3::new(x, 0.0, 0.0), 0.0);
            let expected = (-(x / 5e-6) * (x / 5e-6)).exp();
            assert_relative_eq!(ex.norm(), expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn temporal_gaussian_envelope() {
        let pulse = TwtsPulse::new(&params(PI / 3.0), DT);
        for t in [5e-15, 20e-15, 60e-15, -40e-15] {
            let ex = pulse.ex_complex(&Vector3::zeros(), t);
            let expected = (-(t / 60e-15) * (t / 60e-15)).exp();
            assert_relative_eq!(ex.norm(), expected, max_relative = 1e-9);
        }
    }

    #[test]
    fn envelope_peaks_at_centre() {
        let pulse = TwtsPulse::new(&params(PI / 4.0), DT);
        let centre = pulse.ex_complex(&Vector3::zeros(), 0.0).norm();
        let samples = [
            (Vector3::new(1e-7, 0.0, 0.0), 0.0),
            (Vector3::new(-1e-7, 0.0, 0.0), 0.0),
            (Vector3::zeros(), 1e-15),
            (Vector3::zeros(), -1e-15),
        ];
        for (pos, t) in samples {
            assert!(pulse.ex_complex(&pos, t).norm() < centre);
        }
    }

    #[test]
    fn carrier_oscillates_in_time() {
        let pulse = TwtsPulse::new(&params(PI / 2.0), DT);
        // half a period after the centre, the real part changes sign
        let period = 0.8e-6 / SPEED_OF_LIGHT_SI;
        let early = pulse.ex(&Vector3::zeros(), 0.0);
        let later = pulse.ex(&Vector3::zeros(), 0.5 * period);
        assert!(early > 0.0);
        assert!(later < 0.0);
    }

    #[test]
    fn fields_are_finite_off_axis() {
        let pulse = TwtsPulse::new(&params(0.7), DT);
        let pos = Vector3::new(1.3e-6, -2.1e-6, 0.9e-6);
        for t in [-50e-15, 0.0, 25e-15] {
            assert!(pulse.ex(&pos, t).is_finite());
            assert!(pulse.by(&pos, t).is_finite());
            assert!(pulse.bz(&pos, t).is_finite());
        }
    }

    #[test]
    fn off_axis_reference_values() {
        // (phi, laser-frame position in m, time in s) -> (Ex, By, Bz)
        let cases = [
            (
                0.7,
                Vector3::new(1.2e-6, -0.8e-6, 0.4e-6),
                6e-15,
                (-0.6534978180143155, -0.6529379011890073, 2.0438559597282888e-4),
            ),
            (
                1.3,
                Vector3::new(-2.5e-6, 1.5e-6, -1.0e-6),
                -12e-15,
                (-0.4894665209709856, -0.4900516528938343, -4.4481986182324786e-4),
            ),
            (
                2.4,
                Vector3::new(0.6e-6, 3.0e-6, 2.0e-6),
                20e-15,
                (0.308925961384735, 0.31196164010714406, 7.808225950085292e-3),
            ),
        ];
        for (phi, pos, t, (ex, by, bz)) in cases {
            let pulse = TwtsPulse::new(&params(phi), DT);
            assert_relative_eq!(pulse.ex(&pos, t), ex, max_relative = 1e-8);
            assert_relative_eq!(pulse.by(&pos, t), by, max_relative = 1e-8);
            assert_relative_eq!(pulse.bz(&pos, t), bz, max_relative = 1e-6);
        }
    }
}

/// Dimensionless constants shared by the Ex, By and Bz expressions.
///
/// Derived once per functor so that all three components see bit-for-bit the
/// same preamble.
#[derive(Debug, Clone, PartialEq)]
pub struct TwtsPulse {
    /// Unit of time in s (the simulation time step).
    pub unit_time: f64,
    /// Unit of length in m (`c * dt`).
    pub unit_length: f64,
    /// Pulse-front tilt angle, see [`PulseParams::pulse_front_tilt`].
    pub phi_t: f64,
    /// Central angular frequency.
    pub om0: f64,
    /// Pulse duration parameter; the factor 2 stems from the convention of the laser formula.
    pub tau_g: f64,
    /// Rayleigh length of the focused (x) axis.
    pub rho0: f64,
    /// Waist of the line focus.
    pub wy: f64,
    /// Wavenumber.
    pub k: f64,
    sin_phi: f64,
    cos_phi: f64,
    sin_phi2: f64,
    cos_phi2: f64,
    tan_phi2: f64,
    /// `tan(pi/2 - phi_t)`
    cot_phi: f64,
}

impl TwtsPulse {
    pub fn new(params: &PulseParams, delta_t_si: f64) -> Self {
        let cspeed: f64 = 1.0;
        let unit_time = delta_t_si;
        let unit_length = unit_time * SPEED_OF_LIGHT_SI;

        let phi_t = params.pulse_front_tilt();

        let lambda0 = params.wavelength / unit_length;
        let om0 = 2.0 * PI * cspeed / lambda0;
        let tau_g = params.pulse_duration * 2.0 / unit_time;
        // w0 is the waist of the focused x axis
        let w0 = params.waist_x / unit_length;
        let rho0 = PI * w0 * w0 / lambda0;
        let wy = params.waist_y / unit_length;
        let k = 2.0 * PI / lambda0;

        log::debug!(
            "TWTS constants: phi_t = {:.6}, om0 = {:.6e}, tau_g = {:.6e}, rho0 = {:.6e}, wy = {:.6e}",
            phi_t,
            om0,
            tau_g,
            rho0,
            wy
        );

        Self {
            unit_time,
            unit_length,
            phi_t,
            om0,
            tau_g,
            rho0,
            wy,
            k,
            sin_phi: phi_t.sin(),
            cos_phi: phi_t.cos(),
            sin_phi2: (phi_t / 2.0).sin(),
            cos_phi2: (phi_t / 2.0).cos(),
            tan_phi2: (phi_t / 2.0).tan(),
            cot_phi: (FRAC_PI_2 - phi_t).tan(),
        }
    }

    /// Converts an SI position and time into the dimensionless unit system.
    fn scale(&self, pos: &Vector3<f64>, time: f64) -> (f64, f64, f64, f64) {
        (
            pos.x / self.unit_length,
            pos.y / self.unit_length,
            pos.z / self.unit_length,
            time / self.unit_time,
        )
    }

    /// Ex at laser-frame position `pos` (m) and time `time` (s).
    pub fn ex(&self, pos: &Vector3<f64>, time: f64) -> f64 {
        self.ex_complex(pos, time).re
    }

    /// By at laser-frame position `pos` (m) and time `time` (s).
    pub fn by(&self, pos: &Vector3<f64>, time: f64) -> f64 {
        self.by_complex(pos, time).re
    }

    /// Bz at laser-frame position `pos` (m) and time `time` (s).
    pub fn bz(&self, pos: &Vector3<f64>, time: f64) -> f64 {
        self.bz_complex(pos, time).re
    }

    /// Complex Ex; its modulus is the local field envelope.
    pub fn ex_complex(&self, pos: &Vector3<f64>, time: f64) -> Complex64 {
        let (x, y, z, t) = self.scale(pos, time);
        let i = Complex64::i();
        let cspeed: f64 = 1.0;
        let Self {
            om0,
            tau_g,
            rho0,
            wy,
            k,
            sin_phi,
            cos_phi,
            sin_phi2,
            cos_phi2,
            tan_phi2,
            cot_phi,
            ..
        } = *self;

        let help1 = i * rho0 - y * cos_phi - z * sin_phi;
        let help2 = -i * cspeed * om0 * tau_g * tau_g
            - y * cos_phi / cos_phi2 / cos_phi2 * tan_phi2
            - 2.0 * z * tan_phi2 * tan_phi2;
        let help3 = i * rho0 - y * cos_phi - z * sin_phi;

        let help4 = (-(cspeed * cspeed * k * om0 * tau_g * tau_g * wy * wy * x * x)
            - 2.0 * cspeed * cspeed * om0 * t * t * wy * wy * rho0
            + 2.0 * i * cspeed * cspeed * om0 * om0 * t * tau_g * tau_g * wy * wy * rho0
            - 2.0 * cspeed * cspeed * om0 * tau_g * tau_g * y * y * rho0
            + 4.0 * cspeed * om0 * t * wy * wy * z * rho0
            - 2.0 * i * cspeed * om0 * om0 * tau_g * tau_g * wy * wy * z * rho0
            - 2.0 * om0 * wy * wy * z * z * rho0
            - 8.0 * i * om0 * wy * wy * y * (cspeed * t - z) * z * sin_phi2 * sin_phi2
            + 8.0 * i / sin_phi
                * (2.0 * z * z * (cspeed * om0 * t * wy * wy + i * cspeed * y * y - om0 * wy * wy * z)
                    + y * (cspeed * k * wy * wy * x * x
                        - 2.0 * i * cspeed * om0 * t * wy * wy * rho0
                        + 2.0 * cspeed * y * y * rho0
                        + 2.0 * i * om0 * wy * wy * z * rho0)
                        * cot_phi
                        / sin_phi)
                * sin_phi2
                * sin_phi2
                * sin_phi2
                * sin_phi2
            - 2.0 * i * cspeed * cspeed * om0 * t * t * wy * wy * z * sin_phi
            - 2.0 * cspeed * cspeed * om0 * om0 * t * tau_g * tau_g * wy * wy * z * sin_phi
            - 2.0 * i * cspeed * cspeed * om0 * tau_g * tau_g * y * y * z * sin_phi
            + 4.0 * i * cspeed * om0 * t * wy * wy * z * z * sin_phi
            + 2.0 * cspeed * om0 * om0 * tau_g * tau_g * wy * wy * z * z * sin_phi
            - 2.0 * i * om0 * wy * wy * z * z * z * sin_phi
            - 4.0 * cspeed * om0 * t * wy * wy * y * rho0 * tan_phi2
            + 4.0 * om0 * wy * wy * y * z * rho0 * tan_phi2
            + 2.0 * i * y * y * (cspeed * om0 * t * wy * wy + i * cspeed * y * y - om0 * wy * wy * z)
                * cos_phi
                * cos_phi
                / cos_phi2
                / cos_phi2
                * tan_phi2
            + 2.0 * i * cspeed * k * wy * wy * x * x * z * tan_phi2 * tan_phi2
            - 2.0 * om0 * wy * wy * y * y * rho0 * tan_phi2 * tan_phi2
            + 4.0 * cspeed * om0 * t * wy * wy * z * rho0 * tan_phi2 * tan_phi2
            + 4.0 * i * cspeed * y * y * z * rho0 * tan_phi2 * tan_phi2
            - 4.0 * om0 * wy * wy * z * z * rho0 * tan_phi2 * tan_phi2
            - 2.0 * i * om0 * wy * wy * y * y * z * sin_phi * tan_phi2 * tan_phi2
            - 2.0 * y * cos_phi
                * (om0
                    * (cspeed * cspeed
                        * (i * t * t * wy * wy
                            + om0 * t * tau_g * tau_g * wy * wy
                            + i * tau_g * tau_g * y * y)
                        - cspeed * (2.0 * i * t + om0 * tau_g * tau_g) * wy * wy * z
                        + i * wy * wy * z * z)
                    + 2.0 * i * om0 * wy * wy * y * (cspeed * t - z) * tan_phi2
                    + i * tan_phi2
                        * tan_phi2
                        * (-4.0 * i * cspeed * y * y * z
                            + om0 * wy * wy * (y * y - 4.0 * (cspeed * t - z) * z))))
            / (2.0 * cspeed * wy * wy * help1 * help2);

        let help5 = cspeed * om0 * tau_g * tau_g
            - 8.0 * i * y * cot_phi / sin_phi / sin_phi * sin_phi2 * sin_phi2 * sin_phi2 * sin_phi2
            - 2.0 * i * z * tan_phi2 * tan_phi2;

        (help4.exp() * tau_g * ((cspeed * om0 * rho0) / help3).sqrt()) / help5.sqrt()
    }

    /// Complex By; its modulus is the local field envelope.
    pub fn by_complex(&self, pos: &Vector3<f64>, time: f64) -> Complex64 {
        let (x, y, z, t) = self.scale(pos, time);
        let i = Complex64::i();
        let cspeed: f64 = 1.0;
        let Self {
            om0,
            tau_g,
            rho0,
            wy,
            k,
            sin_phi,
            cos_phi,
            cos_phi2,
            tan_phi2,
            cot_phi,
            ..
        } = *self;

        let help1 = rho0 + i * y * cos_phi + i * z * sin_phi;
        let help2 = cspeed * om0 * tau_g * tau_g
            + 2.0 * i * (-z - y * cot_phi) * tan_phi2 * tan_phi2;
        let help3 = i * rho0 - y * cos_phi - z * sin_phi;

        let help4 = -1.0
            * (cspeed * cspeed * k * om0 * tau_g * tau_g * wy * wy * x * x
                + 2.0 * cspeed * cspeed * om0 * t * t * wy * wy * rho0
                - 2.0 * i * cspeed * cspeed * om0 * om0 * t * tau_g * tau_g * wy * wy * rho0
                + 2.0 * cspeed * cspeed * om0 * tau_g * tau_g * y * y * rho0
                - 4.0 * cspeed * om0 * t * wy * wy * z * rho0
                + 2.0 * i * cspeed * om0 * om0 * tau_g * tau_g * wy * wy * z * rho0
                + 2.0 * om0 * wy * wy * z * z * rho0
                + 4.0 * cspeed * om0 * t * wy * wy * y * rho0 * tan_phi2
                - 4.0 * om0 * wy * wy * y * z * rho0 * tan_phi2
                - 2.0 * i * cspeed * k * wy * wy * x * x * z * tan_phi2 * tan_phi2
                + 2.0 * om0 * wy * wy * y * y * rho0 * tan_phi2 * tan_phi2
                - 4.0 * cspeed * om0 * t * wy * wy * z * rho0 * tan_phi2 * tan_phi2
                - 4.0 * i * cspeed * y * y * z * rho0 * tan_phi2 * tan_phi2
                + 4.0 * om0 * wy * wy * z * z * rho0 * tan_phi2 * tan_phi2
                - 2.0 * i * cspeed * k * wy * wy * x * x * y * cot_phi * tan_phi2 * tan_phi2
                - 4.0 * cspeed * om0 * t * wy * wy * y * rho0 * cot_phi * tan_phi2 * tan_phi2
                - 4.0 * i * cspeed * y * y * y * rho0 * cot_phi * tan_phi2 * tan_phi2
                + 4.0 * om0 * wy * wy * y * z * rho0 * cot_phi * tan_phi2 * tan_phi2
                + 2.0 * z * sin_phi
                    * (om0
                        * (cspeed * cspeed
                            * (i * t * t * wy * wy
                                + om0 * t * tau_g * tau_g * wy * wy
                                + i * tau_g * tau_g * y * y)
                            - cspeed * (2.0 * i * t + om0 * tau_g * tau_g) * wy * wy * z
                            + i * wy * wy * z * z)
                        + 2.0 * i * om0 * wy * wy * y * (cspeed * t - z) * tan_phi2
                        + i * tan_phi2
                            * tan_phi2
                            * (-2.0 * i * cspeed * y * y * z
                                + om0 * wy * wy * (y * y - 2.0 * (cspeed * t - z) * z)))
                + 2.0 * y * cos_phi
                    * (om0
                        * (cspeed * cspeed
                            * (i * t * t * wy * wy
                                + om0 * t * tau_g * tau_g * wy * wy
                                + i * tau_g * tau_g * y * y)
                            - cspeed * (2.0 * i * t + om0 * tau_g * tau_g) * wy * wy * z
                            + i * wy * wy * z * z)
                        + 2.0 * i * om0 * wy * wy * y * (cspeed * t - z) * tan_phi2
                        + i * (-4.0 * i * cspeed * y * y * z
                            + om0 * wy * wy * (y * y - 4.0 * (cspeed * t - z) * z)
                            - 2.0 * y
                                * (cspeed * om0 * t * wy * wy + i * cspeed * y * y - om0 * wy * wy * z)
                                * cot_phi)
                            * tan_phi2
                            * tan_phi2))
            / (2.0 * cspeed * wy * wy * help1 * help2);

        let help5 = -i * cspeed * om0 * tau_g * tau_g
            + (-z - y * cot_phi) * tan_phi2 * tan_phi2 * 2.0;
        let help6 = (cspeed
            * (cspeed * om0 * tau_g * tau_g + 2.0 * i * (-z - y * cot_phi) * tan_phi2 * tan_phi2))
            / (om0 * rho0);

        (help4.exp() * tau_g / cos_phi2 / cos_phi2
            * (rho0 + i * y * cos_phi + i * z * sin_phi)
            * (2.0 * i * cspeed * t + cspeed * om0 * tau_g * tau_g - 4.0 * i * z
                + cspeed * (2.0 * i * t + om0 * tau_g * tau_g) * cos_phi
                + 2.0 * i * y * tan_phi2)
            * help3.powf(-1.5))
            / (2.0 * help5 * help6.sqrt())
    }

    /// Complex Bz; its modulus is the local field envelope.
    pub fn bz_complex(&self, pos: &Vector3<f64>, time: f64) -> Complex64 {
        let (x, y, z, t) = self.scale(pos, time);
        let i = Complex64::i();
        let cspeed: f64 = 1.0;
        let Self {
            om0,
            tau_g,
            rho0,
            wy,
            k,
            sin_phi,
            cos_phi,
            sin_phi2,
            cos_phi2,
            tan_phi2,
            cot_phi,
            ..
        } = *self;

        let help1 = -(cspeed * z) - cspeed * y * cot_phi + i * cspeed * rho0 / sin_phi;
        let help2 = i * rho0 - y * cos_phi - z * sin_phi;
        let help3 = help2 * cspeed;
        let help4 = cspeed * om0 * tau_g * tau_g
            - i * y * cos_phi / cos_phi2 / cos_phi2 * tan_phi2
            - 2.0 * i * z * tan_phi2 * tan_phi2;
        let help5 = 2.0 * cspeed * t - i * cspeed * om0 * tau_g * tau_g - 2.0 * z
            + 8.0 * y / sin_phi / sin_phi / sin_phi * sin_phi2 * sin_phi2 * sin_phi2 * sin_phi2
            - 2.0 * z * tan_phi2 * tan_phi2;

        let help6 = ((om0 * y * rho0 / cos_phi2 / cos_phi2 / cos_phi2 / cos_phi2) / help1
            - (2.0 * i * k * x * x) / help2
            - (i * om0 * om0 * tau_g * tau_g * rho0) / help2
            - (4.0 * i * y * y * rho0) / (wy * wy * help2)
            + (om0 * om0 * tau_g * tau_g * y * cos_phi) / help2
            + (4.0 * y * y * y * cos_phi) / (wy * wy * help2)
            + (om0 * om0 * tau_g * tau_g * z * sin_phi) / help2
            + (4.0 * y * y * z * sin_phi) / (wy * wy * help2)
            + (2.0 * i * om0 * y * y * cos_phi / cos_phi2 / cos_phi2 * tan_phi2) / help3
            + (om0 * y * rho0 * cos_phi / cos_phi2 / cos_phi2 * tan_phi2) / help3
            + (i * om0 * y * y * cos_phi * cos_phi / cos_phi2 / cos_phi2 * tan_phi2) / help3
            + (4.0 * i * om0 * y * z * tan_phi2 * tan_phi2) / help3
            - (2.0 * om0 * z * rho0 * tan_phi2 * tan_phi2) / help3
            - (2.0 * i * om0 * z * z * sin_phi * tan_phi2 * tan_phi2) / help3
            - (om0 * help5 * help5) / (cspeed * help4))
            / 4.0;

        let help7 = cspeed * om0 * tau_g * tau_g
            - i * y * cos_phi / cos_phi2 / cos_phi2 * tan_phi2
            - 2.0 * i * z * tan_phi2 * tan_phi2;

        (2.0 * i * help6.exp() * tau_g * tan_phi2
            * (cspeed * t - z + y * tan_phi2)
            * ((om0 * rho0) / help3).sqrt())
            / help7.powf(1.5)
    }
}
