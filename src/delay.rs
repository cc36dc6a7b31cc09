//! Automatic time delay of the TWTS pulse.
//!
//! Without a delay, the pulse centre would sit at the laser origin at step 0
//! and the leading part of the pulse would be missing. The automatic delay
//! shifts the pulse back in time until it only touches the simulation volume at
//! low intensity.

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector3;

use crate::constants::{AUTO_DELAY_SAFETY_FACTOR, SPEED_OF_LIGHT_SI};
use crate::grid::{Dimensionality, GridSpec};
use crate::params::PulseParams;


/// Returns the time delay in seconds that enters the field evaluation as
/// `t = step * dt - delay`.
///
/// With `auto_time_delay` unset this is the user supplied delay. Otherwise the
/// delay is the light travel time (at `beta0 * c`) over three distances along y:
/// the walk-off of the tilted pulse front across the projected half domain, a
/// margin of a few pulse lengths, and the focus distance.
pub fn estimate(params: &PulseParams, half_size: &Vector3<usize>, grid: &GridSpec) -> f64 {
    if !params.auto_time_delay {
        return params.time_delay;
    }

    // angle between the pulse front and the y-axis; good approximation for beta0 close to 1
    let eta = FRAC_PI_2 - params.phi / 2.0;

    // half extent of the axis the tilted front sweeps across
    let half_extent = match grid.dim {
        Dimensionality::Three => half_size.z as f64 * grid.cell_size_si.z,
        Dimensionality::Two => half_size.x as f64 * grid.cell_size_si.x,
    };

    // abs() keeps the walk-off positive for |phi| beyond 90 degrees
    let walk_off = half_extent * eta.cos().abs();
    let margin =
        AUTO_DELAY_SAFETY_FACTOR * params.pulse_duration * SPEED_OF_LIGHT_SI / eta.cos();
    let focus = params.focus_distance;

    (walk_off + margin + focus) / (SPEED_OF_LIGHT_SI * params.beta0)
}
