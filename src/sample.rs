//! Parallel sampling of a field functor over a plane of cells.
//!
//! The plane passes through the centre of the global domain. Rows are
//! evaluated in parallel with rayon; a progress bar tracks finished rows.

use std::fmt;

use indicatif::{ProgressBar, ProgressStyle};
use itertools::iproduct;
use nalgebra::Vector3;
use ndarray::{Array2, Array3, Axis};
use rayon::prelude::*;
use serde::Deserialize;

use crate::error::{Result, TwtsError};
use crate::grid::Dimensionality;
use crate::twts::TwtsField;


/// Plane through the domain centre, named by its two in-plane axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    #[default]
    Xy,
    Xz,
    Yz,
}

impl Plane {
    /// Indices of the two in-plane axes.
    pub fn axes(self) -> (usize, usize) {
        match self {
            Plane::Xy => (0, 1),
            Plane::Xz => (0, 2),
            Plane::Yz => (1, 2),
        }
    }

    /// A 2-D simulation only has the xy plane.
    pub fn is_valid_for(self, dim: Dimensionality) -> bool {
        dim == Dimensionality::Three || self == Plane::Xy
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Plane::Xy => "xy",
            Plane::Xz => "xz",
            Plane::Yz => "yz",
        };
        write!(f, "{}", name)
    }
}

/// Location and size of the largest field magnitude in a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: (usize, usize),
    pub magnitude: f64,
}

/// Field vectors sampled over a plane, indexed `[i, j, component]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneSample {
    pub name: &'static str,
    pub plane: Plane,
    pub step: u32,
    pub values: Array3<f64>,
}

impl PlaneSample {
    /// Number of cells along the two in-plane axes.
    pub fn shape(&self) -> (usize, usize) {
        let (n0, n1, _) = self.values.dim();
        (n0, n1)
    }

    /// Euclidean norm of the field vector in every cell.
    pub fn magnitude(&self) -> Array2<f64> {
        self.values
            .map_axis(Axis(2), |v| v.iter().map(|c| c * c).sum::<f64>().sqrt())
    }

    pub fn peak(&self) -> Peak {
        let magnitude = self.magnitude();
        magnitude.indexed_iter().fold(
            Peak {
                index: (0, 0),
                magnitude: 0.0,
            },
            |peak, (index, &m)| {
                if m > peak.magnitude {
                    Peak { index, magnitude: m }
                } else {
                    peak
                }
            },
        )
    }

    /// Sum of the squared field over the plane, in normalized units per cell.
    pub fn energy(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }
}

impl fmt::Display for PlaneSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n0, n1) = self.shape();
        let peak = self.peak();
        write!(
            f,
            "{} field, {} plane, step {}:
  - Cells: {} x {}
  - Peak magnitude: {:.6} at ({}, {})
  - Sum of squares: {:.6}",
            self.name,
            self.plane,
            self.step,
            n0,
            n1,
            peak.magnitude,
            peak.index.0,
            peak.index.1,
            self.energy(),
        )
    }
}

/// Evaluates `field` over `plane` at time step `step`.
///
/// The plane passes through the centre cell of the global domain along its
/// normal axis. Any NaN or infinite value aborts the sample with
/// [`TwtsError::NonFinite`].
pub fn sample_plane<F: TwtsField>(
    field: &F,
    plane: Plane,
    step: u32,
    progress: bool,
) -> Result<PlaneSample> {
    let grid = field.grid();
    if !plane.is_valid_for(grid.dim) {
        return Err(TwtsError::InvalidGrid(format!(
            "{} plane requires a 3-D grid",
            plane
        )));
    }

    let (a0, a1) = plane.axes();
    let (n0, n1) = (grid.global_size[a0], grid.global_size[a1]);
    let centre = grid.centre_cell();

    let pb = if progress {
        ProgressBar::new(n0 as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:40.green/blue} {pos:>5}/{len:5} {msg} ETA: {eta_precise}",
    ) {
        pb.set_style(style.progress_chars("█▇▆▅▄▃▂▁"));
    }
    pb.set_message(format!("{} rows", F::NAME));

    let rows = (0..n0)
        .into_par_iter()
        .map(|i| {
            let row = (0..n1)
                .map(|j| {
                    let mut cell: Vector3<i64> = centre;
                    cell[a0] = i as i64;
                    cell[a1] = j as i64;
                    field.try_evaluate(&cell, step)
                })
                .collect::<Result<Vec<_>>>();
            pb.inc(1);
            row
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish_and_clear();

    let mut values = Array3::zeros((n0, n1, 3));
    for (i, j, c) in iproduct!(0..n0, 0..n1, 0..3) {
        values[[i, j, c]] = rows[i][j][c];
    }

    Ok(PlaneSample {
        name: F::NAME,
        plane,
        step,
        values,
    })
}
