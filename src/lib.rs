//! Analytic background field of a Traveling-Wave Thomson-Scattering (TWTS)
//! laser pulse for particle-in-cell simulations.
//!
//! The pulse has a tilted front and is focused to a line; the E and B
//! functors in [`twts`] return the normalized field at any cell of a
//! staggered grid and any time step.

pub mod constants;
pub mod delay;
pub mod error;
pub mod field;
pub mod grid;
pub mod params;
pub mod position;
pub mod rotation;
pub mod sample;
pub mod settings;
pub mod twts;
