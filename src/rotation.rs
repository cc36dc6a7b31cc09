//! Rotations between the simulation frame and the TWTS laser frame.
//!
//! The laser propagation direction encloses the angle phi with the simulation
//! y-axis (the sliding-window direction). Positions are therefore rotated about
//! the simulation x-axis before the field expressions are evaluated; those
//! expressions live in the non-rotated laser frame and use phi only for the
//! amount of pulse-front tilt.
//!
//! The (y, z) pair is rotated by `pi/2 + phi`. This includes a 180 degree flip
//! at `phi = pi/2`, because the coordinate system of the TWTS model is oriented
//! the other way round.
//!
//! In 2-D the laser propagates within the simulation (x, y) plane. The 3-D
//! expressions are reused after the axis remap
//!
//! | 3-D laser frame | 2-D simulation |
//! |-----------------|----------------|
//! | x               | -z (always 0)  |
//! | y               | y              |
//! | z               | x              |
//!
//! so that laser Ex becomes -Ez and laser Bz becomes Bx. The functors emit Ex
//! as +Ez and flip the sign of B to keep the pair a solution of Maxwell's equations.

use nalgebra::Vector3;

use crate::grid::Dimensionality;


/// Rotates the pair `(a, b)` by `pi/2 + phi`.
#[inline]
pub fn rotate_pair(a: f64, b: f64, phi: f64) -> (f64, f64) {
    let (sin, cos) = phi.sin_cos();
    (-sin * a - cos * b, cos * a - sin * b)
}

/// Rotates the pair `(a, b)` by `-(pi/2 + phi)`, undoing [`rotate_pair`].
#[inline]
pub fn rotate_pair_back(a: f64, b: f64, phi: f64) -> (f64, f64) {
    let (sin, cos) = phi.sin_cos();
    (-sin * a + cos * b, -cos * a - sin * b)
}

/// Rotates a 3-D simulation position into the laser frame.
pub fn rotate_3d(pos: &Vector3<f64>, phi: f64) -> Vector3<f64> {
    let (y, z) = rotate_pair(pos.y, pos.z, phi);
    Vector3::new(pos.x, y, z)
}

/// Maps a 2-D simulation vector `(x, y, z)` onto the 3-D laser axes `(-z, y, x)`.
pub fn remap_2d(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-v.z, v.y, v.x)
}

/// Inverse of [`remap_2d`].
pub fn unmap_2d(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.z, v.y, -v.x)
}

/// Rotates a 2-D simulation position into the laser frame.
///
/// Only the in-plane components are used; the laser-frame x component, which
/// holds the non-existing simulation z coordinate, is zero.
pub fn rotate_2d(pos: &Vector3<f64>, phi: f64) -> Vector3<f64> {
    let (y, z) = rotate_pair(pos.y, pos.x, phi);
    Vector3::new(0.0, y, z)
}

/// Rotates a simulation position into the laser frame.
pub fn rotate(pos: &Vector3<f64>, phi: f64, dim: Dimensionality) -> Vector3<f64> {
    match dim {
        Dimensionality::Two => rotate_2d(pos, phi),
        Dimensionality::Three => rotate_3d(pos, phi),
    }
}
