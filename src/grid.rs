//! Simulation grid collaborators: dimensionality, global extent, cell size,
//! time step and the staggered (Yee) sub-cell offsets of each field component.
//!
//! These are read once when a field functor is constructed. In 2-D the z axis
//! is inactive: its cell count, cell size and offsets are never used.

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::{Result, TwtsError};


/// Number of spatial dimensions of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dimensionality {
    Two,
    Three,
}

impl Dimensionality {
    /// Number of active axes.
    pub fn dims(self) -> usize {
        match self {
            Dimensionality::Two => 2,
            Dimensionality::Three => 3,
        }
    }

    /// Zeroes the components of `v` along inactive axes.
    pub fn project(self, v: Vector3<f64>) -> Vector3<f64> {
        match self {
            Dimensionality::Two => Vector3::new(v.x, v.y, 0.0),
            Dimensionality::Three => v,
        }
    }
}

/// Global domain extent and unit conversion of the host simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub dim: Dimensionality,
    /// Number of cells of the global domain along x, y, z.
    pub global_size: Vector3<usize>,
    /// Cell width, height and depth in metres.
    pub cell_size_si: Vector3<f64>,
    /// Duration of one time step in seconds.
    pub delta_t_si: f64,
}

impl GridSpec {
    pub fn new(
        dim: Dimensionality,
        global_size: Vector3<usize>,
        cell_size_si: Vector3<f64>,
        delta_t_si: f64,
    ) -> Self {
        Self {
            dim,
            global_size,
            cell_size_si,
            delta_t_si,
        }
    }

    /// Checks that every active axis has cells of positive size and that the
    /// time step is positive.
    pub fn validate(&self) -> Result<()> {
        for axis in 0..self.dim.dims() {
            if self.global_size[axis] == 0 {
                return Err(TwtsError::InvalidGrid(format!(
                    "axis {} of the global domain has no cells",
                    axis
                )));
            }
            let size = self.cell_size_si[axis];
            if !(size.is_finite() && size > 0.0) {
                return Err(TwtsError::InvalidGrid(format!(
                    "cell size along axis {} must be positive, got {}",
                    axis, size
                )));
            }
        }
        if !(self.delta_t_si.is_finite() && self.delta_t_si > 0.0) {
            return Err(TwtsError::InvalidGrid(format!(
                "time step must be positive, got {}",
                self.delta_t_si
            )));
        }
        Ok(())
    }

    /// Centre of the global domain in cells.
    pub fn half_size(&self) -> Vector3<usize> {
        let half = self.global_size.map(|n| n / 2);
        match self.dim {
            Dimensionality::Two => Vector3::new(half.x, half.y, 0),
            Dimensionality::Three => half,
        }
    }

    /// Cell index at the centre of the global domain.
    pub fn centre_cell(&self) -> Vector3<i64> {
        self.half_size().map(|n| n as i64)
    }
}

/// Fractional in-cell positions of the field components on a staggered grid.
///
/// Each method returns the offsets of the x, y and z components, in units of
/// cells. Components along inactive axes must be zero.
pub trait FieldPositions {
    fn e_field_offsets(&self, dim: Dimensionality) -> [Vector3<f64>; 3];
    fn b_field_offsets(&self, dim: Dimensionality) -> [Vector3<f64>; 3];
}

/// The standard Yee cell: E components sit on cell edges, B components on
/// cell faces.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YeeCell;

impl FieldPositions for YeeCell {
    fn e_field_offsets(&self, dim: Dimensionality) -> [Vector3<f64>; 3] {
        [
            Vector3::new(0.5, 0.0, 0.0),
            Vector3::new(0.0, 0.5, 0.0),
            Vector3::new(0.0, 0.0, 0.5),
        ]
        .map(|offset| dim.project(offset))
    }

    fn b_field_offsets(&self, dim: Dimensionality) -> [Vector3<f64>; 3] {
        [
            Vector3::new(0.0, 0.5, 0.5),
            Vector3::new(0.5, 0.0, 0.5),
            Vector3::new(0.5, 0.5, 0.0),
        ]
        .map(|offset| dim.project(offset))
    }
}
