//! Entry-point functors of the TWTS background field.
//!
//! [`TwtsFieldE`] and [`TwtsFieldB`] are constructed once on the host and then
//! evaluated for every cell and time step. All state is immutable after
//! construction, so a functor can be shared between threads without locking.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::Vector3;
//! use twts::grid::{Dimensionality, GridSpec, YeeCell};
//! use twts::params::PulseParams;
//! use twts::twts::{TwtsField, TwtsFieldE};
//!
//! let params = PulseParams {
//!     focus_distance: 0.0,
//!     wavelength: 0.8e-6,
//!     pulse_duration: 30e-15,
//!     waist_x: 5e-6,
//!     waist_y: 5e-6,
//!     phi: 30f64.to_radians(),
//!     beta0: 1.0,
//!     time_delay: 0.0,
//!     auto_time_delay: true,
//! };
//! let grid = GridSpec::new(
//!     Dimensionality::Three,
//!     Vector3::new(32, 32, 32),
//!     Vector3::new(5e-8, 5e-8, 5e-8),
//!     8e-17,
//! );
//! let e_field = TwtsFieldE::new(params, grid, &YeeCell).unwrap();
//! let step = e_field.step_for_time(0.0);
//! let e = e_field.evaluate(&e_field.grid().centre_cell(), step);
//! assert!(e.iter().all(|v| v.is_finite()));
//! ```

use nalgebra::Vector3;

use crate::delay;
use crate::error::{Result, TwtsError};
use crate::field::TwtsPulse;
use crate::grid::{Dimensionality, FieldPositions, GridSpec};
use crate::params::PulseParams;
use crate::position::FieldPositionMapper;
use crate::rotation;


/// A background field that can be sampled cell by cell.
pub trait TwtsField: Sync {
    /// Name of the field, used in diagnostics.
    const NAME: &'static str;

    /// Grid the functor was built for.
    fn grid(&self) -> &GridSpec;

    /// Normalized field vector at `cell` and time step `step`.
    fn evaluate(&self, cell: &Vector3<i64>, step: u32) -> Vector3<f64>;

    /// Like [`TwtsField::evaluate`], but reports NaN or infinite values as an error.
    fn try_evaluate(&self, cell: &Vector3<i64>, step: u32) -> Result<Vector3<f64>> {
        let value = self.evaluate(cell, step);
        if value.iter().all(|v| v.is_finite()) {
            Ok(value)
        } else {
            Err(TwtsError::NonFinite {
                component: Self::NAME,
                cell: *cell,
                step,
            })
        }
    }
}

/// State shared by the E and B functors.
#[derive(Debug, Clone, PartialEq)]
struct TwtsState {
    params: PulseParams,
    grid: GridSpec,
    half_size: Vector3<usize>,
    time_delay_si: f64,
    mapper: FieldPositionMapper,
    pulse: TwtsPulse,
}

impl TwtsState {
    fn new(
        name: &str,
        params: PulseParams,
        grid: GridSpec,
        offsets: &impl FieldPositions,
    ) -> Result<Self> {
        params.validate()?;
        grid.validate()?;

        let half_size = grid.half_size();
        let time_delay_si = delay::estimate(&params, &half_size, &grid);
        let mapper = FieldPositionMapper::new(
            &grid,
            &half_size,
            params.focus_distance,
            params.phi,
            offsets,
        );
        let pulse = TwtsPulse::new(&params, grid.delta_t_si);

        if params.beta0 != 1.0 {
            log::warn!(
                "TWTS {} field: beta0 = {} != 1, the dispersion deviates slightly from the ideal TWTS pulse",
                name,
                params.beta0
            );
        }
        log::info!(
            "TWTS {} field: {:?} grid, phi = {:.4} rad, time delay = {:.4e} s ({:.1} steps)",
            name,
            grid.dim,
            params.phi,
            time_delay_si,
            time_delay_si / grid.delta_t_si
        );

        Ok(Self {
            params,
            grid,
            half_size,
            time_delay_si,
            mapper,
            pulse,
        })
    }

    fn time_si(&self, step: u32) -> f64 {
        step as f64 * self.grid.delta_t_si - self.time_delay_si
    }

    fn step_for_time(&self, time_si: f64) -> u32 {
        ((time_si + self.time_delay_si) / self.grid.delta_t_si)
            .round()
            .max(0.0) as u32
    }
}

/// Electric field of the TWTS pulse, normalized to unit peak amplitude.
#[derive(Debug, Clone, PartialEq)]
pub struct TwtsFieldE {
    state: TwtsState,
}

impl TwtsFieldE {
    pub fn new(
        params: PulseParams,
        grid: GridSpec,
        offsets: &impl FieldPositions,
    ) -> Result<Self> {
        Ok(Self {
            state: TwtsState::new(Self::NAME, params, grid, offsets)?,
        })
    }

    /// Pulse parameters the functor was built from.
    pub fn params(&self) -> &PulseParams {
        &self.state.params
    }

    /// Centre of the global domain in cells.
    pub fn half_size(&self) -> &Vector3<usize> {
        &self.state.half_size
    }

    /// Time delay in s subtracted from `step * dt`.
    pub fn time_delay_si(&self) -> f64 {
        self.state.time_delay_si
    }

    /// Pulse time in s at time step `step`.
    pub fn time_si(&self, step: u32) -> f64 {
        self.state.time_si(step)
    }

    /// Time step closest to pulse time `time_si`, clamped at zero.
    pub fn step_for_time(&self, time_si: f64) -> u32 {
        self.state.step_for_time(time_si)
    }
}

impl TwtsField for TwtsFieldE {
    const NAME: &'static str = "E";

    fn grid(&self) -> &GridSpec {
        &self.state.grid
    }

    fn evaluate(&self, cell: &Vector3<i64>, step: u32) -> Vector3<f64> {
        let state = &self.state;
        let time = state.time_si(step);
        let pos = state.mapper.e_position(cell);
        let ex = state.pulse.ex(&pos, time);
        debug_assert!(ex.is_finite(), "non-finite E at {:?}, step {}", cell, step);

        match state.grid.dim {
            Dimensionality::Three => Vector3::new(ex, 0.0, 0.0),
            // Ex of the laser frame is Ez of the 2-D simulation
            Dimensionality::Two => Vector3::new(0.0, 0.0, ex),
        }
    }
}

/// Magnetic field of the TWTS pulse, normalized to unit peak amplitude.
#[derive(Debug, Clone, PartialEq)]
pub struct TwtsFieldB {
    state: TwtsState,
}

impl TwtsFieldB {
    pub fn new(
        params: PulseParams,
        grid: GridSpec,
        offsets: &impl FieldPositions,
    ) -> Result<Self> {
        Ok(Self {
            state: TwtsState::new(Self::NAME, params, grid, offsets)?,
        })
    }

    pub fn params(&self) -> &PulseParams {
        &self.state.params
    }

    pub fn half_size(&self) -> &Vector3<usize> {
        &self.state.half_size
    }

    pub fn time_delay_si(&self) -> f64 {
        self.state.time_delay_si
    }

    pub fn time_si(&self, step: u32) -> f64 {
        self.state.time_si(step)
    }

    pub fn step_for_time(&self, time_si: f64) -> u32 {
        self.state.step_for_time(time_si)
    }
}

impl TwtsField for TwtsFieldB {
    const NAME: &'static str = "B";

    fn grid(&self) -> &GridSpec {
        &self.state.grid
    }

    fn evaluate(&self, cell: &Vector3<i64>, step: u32) -> Vector3<f64> {
        let state = &self.state;
        let phi = state.params.phi;
        let time = state.time_si(step);
        let pulse = &state.pulse;
        let [p_by, p_other] = state.mapper.b_positions(cell);

        // positions were rotated into the laser frame, so the field vector is
        // rotated back by -(pi/2 + phi)
        let value = match state.grid.dim {
            Dimensionality::Three => {
                let (by, _) =
                    rotation::rotate_pair_back(pulse.by(&p_by, time), pulse.bz(&p_by, time), phi);
                let (_, bz) = rotation::rotate_pair_back(
                    pulse.by(&p_other, time),
                    pulse.bz(&p_other, time),
                    phi,
                );
                Vector3::new(0.0, by, bz)
            }
            Dimensionality::Two => {
                // the remap turns laser Ex into -Ez; E is emitted as +Ez, so B flips sign
                let (by, _) =
                    rotation::rotate_pair_back(pulse.by(&p_by, time), pulse.bz(&p_by, time), phi);
                let (_, bx) = rotation::rotate_pair_back(
                    pulse.by(&p_other, time),
                    pulse.bz(&p_other, time),
                    phi,
                );
                Vector3::new(-bx, -by, 0.0)
            }
        };
        debug_assert!(
            value.iter().all(|v| v.is_finite()),
            "non-finite B at {:?}, step {}",
            cell,
            step
        );
        value
    }
}
