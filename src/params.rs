//! Physical parameters of the TWTS laser pulse.
//!
//! All quantities are in SI units. A [`PulseParams`] is validated once, when a
//! field functor is constructed, so that no per-cell evaluation can run into a
//! singular or degenerate configuration.
//!
//! # Key Parameters
//!
//! - **phi**: interaction angle between the laser propagation direction and the
//!   simulation y-axis. The field expressions divide by `sin(phi_t)` and
//!   `cos(phi_t / 2)`, so phi must lie strictly inside (0, pi).
//! - **beta0**: propagation speed of the overlap region, normalized to c. The
//!   TWTS pulse is designed for `beta0` close to 1.
//! - **pulse_duration**: sigma of the Gaussian intensity envelope (E^2).

use std::f64::consts::PI;

use serde::Deserialize;

use crate::constants::{DEFAULT_BETA0, DEFAULT_PHI};
use crate::error::{Result, TwtsError};


/// Construction parameters of a TWTS pulse.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PulseParams {
    /// Distance of the laser focus from the simulation origin along y, in m.
    pub focus_distance: f64,
    /// Central wavelength in m.
    pub wavelength: f64,
    /// Sigma of the Gaussian intensity envelope in s.
    pub pulse_duration: f64,
    /// Waist along x (focused axis) in m.
    pub waist_x: f64,
    /// Waist along y (width of the line focus) in m.
    pub waist_y: f64,
    /// Interaction angle between laser propagation and the simulation y-axis, in rad.
    #[serde(default = "default_phi")]
    pub phi: f64,
    /// Propagation speed of the overlap region, normalized to c.
    #[serde(default = "default_beta0")]
    pub beta0: f64,
    /// Manual time delay in s, used when `auto_time_delay` is false.
    #[serde(default)]
    pub time_delay: f64,
    /// Compute the time delay so the pulse starts outside the simulation volume.
    #[serde(default = "default_auto_time_delay")]
    pub auto_time_delay: bool,
}

fn default_phi() -> f64 {
    DEFAULT_PHI
}

fn default_beta0() -> f64 {
    DEFAULT_BETA0
}

fn default_auto_time_delay() -> bool {
    true
}

impl PulseParams {
    /// Rejects parameter sets for which the field is undefined.
    pub fn validate(&self) -> Result<()> {
        positive("wavelength", self.wavelength)?;
        positive("pulse_duration", self.pulse_duration)?;
        positive("waist_x", self.waist_x)?;
        positive("waist_y", self.waist_y)?;

        if !(self.phi > 0.0 && self.phi < PI) {
            return Err(TwtsError::SingularAngle { phi: self.phi });
        }
        if !(self.beta0 > 0.0 && self.beta0 <= 1.0) {
            return Err(TwtsError::InvalidParameter {
                name: "beta0",
                value: self.beta0,
                reason: "must lie in (0, 1]",
            });
        }
        finite("focus_distance", self.focus_distance)?;
        finite("time_delay", self.time_delay)?;
        Ok(())
    }

    /// Pulse-front tilt angle used inside the field expressions.
    ///
    /// Generalizes phi to `beta0 != 1`: `2 atan2(1 - beta0 cos(phi), beta0 sin(phi))`,
    /// which equals phi at `beta0 = 1`. The dispersion is then slightly off the
    /// ideal TWTS pulse, since the model is defined for `beta0 = 1`.
    pub fn pulse_front_tilt(&self) -> f64 {
        if self.beta0 == 1.0 {
            return self.phi;
        }
        2.0 * (1.0 - self.beta0 * self.phi.cos()).atan2(self.beta0 * self.phi.sin())
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TwtsError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TwtsError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}
