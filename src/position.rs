//! Positions of the staggered field components in the laser frame.
//!
//! The laser origin is centred transversally in the global domain and placed
//! longitudinally (y) at the focus distance. For every field component, the
//! fractional Yee offset is added to the cell index, the origin is subtracted,
//! the result is scaled to metres and finally rotated into the laser frame.

use nalgebra::Vector3;

use crate::grid::{Dimensionality, FieldPositions, GridSpec};
use crate::rotation;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::YeeCell;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn grid(dim: Dimensionality) -> GridSpec {
        GridSpec::new(
            dim,
            Vector3::new(32, 64, 16),
            Vector3::new(0.1e-6, 0.2e-6, 0.1e-6),
            1e-16,
        )
    }

    #[test]
    fn laser_origin_sits_at_focus() {
        let grid = grid(Dimensionality::Three);
        let mapper = FieldPositionMapper::new(&grid, &grid.half_size(), 2e-6, PI / 2.0, &YeeCell);
        assert_relative_eq!(mapper.origin, Vector3::new(16.0, 10.0, 8.0), epsilon = 1e-12);
    }

    #[test]
    fn position_is_offset_scaled_and_rotated() {
        let grid = grid(Dimensionality::Three);
        let phi = 1.0;
        let mapper = FieldPositionMapper::new(&grid, &grid.half_size(), 0.0, phi, &YeeCell);
        let cell = Vector3::new(17, 3, 8);
        let offset = Vector3::new(0.5, 0.0, 0.0);
        let unrotated = Vector3::new(1.5 * 0.1e-6, 3.0 * 0.2e-6, 0.0);
        assert_relative_eq!(
            mapper.position_si(&cell, &offset),
            rotation::rotate_3d(&unrotated, phi),
            epsilon = 1e-18
        );
    }

    #[test]
    fn e_position_uses_ez_offset_in_2d() {
        let grid = grid(Dimensionality::Two);
        let phi = 0.8;
        let mapper = FieldPositionMapper::new(&grid, &grid.half_size(), 0.0, phi, &YeeCell);
        // the Ez offset is zero in 2-D, so the cell corner is sampled
        let cell = Vector3::new(18, 5, 99);
        let expected = rotation::rotate_2d(&Vector3::new(2.0 * 0.1e-6, 5.0 * 0.2e-6, 0.0), phi);
        assert_relative_eq!(mapper.e_position(&cell), expected, epsilon = 1e-18);
        assert_eq!(mapper.e_position(&cell).x, 0.0);
    }

    #[test]
    fn b_positions_pick_by_and_transverse_partner() {
        let phi = 0.8;
        let cell = Vector3::new(16, 0, 8);

        let grid3 = grid(Dimensionality::Three);
        let mapper = FieldPositionMapper::new(&grid3, &grid3.half_size(), 0.0, phi, &YeeCell);
        let [by, bz] = mapper.b_positions(&cell);
        let offsets = YeeCell.b_field_offsets(Dimensionality::Three);
        assert_eq!(by, mapper.position_si(&cell, &offsets[1]));
        assert_eq!(bz, mapper.position_si(&cell, &offsets[2]));

        let grid2 = grid(Dimensionality::Two);
        let mapper = FieldPositionMapper::new(&grid2, &grid2.half_size(), 0.0, phi, &YeeCell);
        let [by, bx] = mapper.b_positions(&cell);
        let offsets = YeeCell.b_field_offsets(Dimensionality::Two);
        assert_eq!(by, mapper.position_si(&cell, &offsets[1]));
        assert_eq!(bx, mapper.position_si(&cell, &offsets[0]));
    }
}

/// Converts cell indices into laser-frame SI positions of the field components.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPositionMapper {
    dim: Dimensionality,
    phi: f64,
    cell_size_si: Vector3<f64>,
    /// Laser origin in units of cells.
    origin: Vector3<f64>,
    /// Offset of the single E component evaluated: Ex in 3-D, Ez in 2-D.
    e_offset: Vector3<f64>,
    /// Offsets of the two B components evaluated: By and Bz in 3-D, By and Bx in 2-D.
    b_offsets: [Vector3<f64>; 2],
}

impl FieldPositionMapper {
    pub fn new(
        grid: &GridSpec,
        half_size: &Vector3<usize>,
        focus_distance_si: f64,
        phi: f64,
        offsets: &impl FieldPositions,
    ) -> Self {
        let dim = grid.dim;
        let cell_size_si = dim.project(grid.cell_size_si);

        let mut origin = dim.project(half_size.map(|n| n as f64));
        origin.y = focus_distance_si / cell_size_si.y;

        let e = offsets.e_field_offsets(dim);
        let b = offsets.b_field_offsets(dim);
        let (e_offset, b_offsets) = match dim {
            Dimensionality::Three => (e[0], [b[1], b[2]]),
            // Ex -> Ez, By -> By, Bz -> Bx
            Dimensionality::Two => (e[2], [b[1], b[0]]),
        };

        Self {
            dim,
            phi,
            cell_size_si,
            origin,
            e_offset: dim.project(e_offset),
            b_offsets: b_offsets.map(|offset| dim.project(offset)),
        }
    }

    /// Laser-frame position in metres of a component with in-cell `offset`.
    pub fn position_si(&self, cell: &Vector3<i64>, offset: &Vector3<f64>) -> Vector3<f64> {
        let cell = self.dim.project(cell.map(|n| n as f64));
        let relative = cell + offset - self.origin;
        let position = relative.component_mul(&self.cell_size_si);
        rotation::rotate(&position, self.phi, self.dim)
    }

    /// Position of the E component the TWTS expression is evaluated for.
    pub fn e_position(&self, cell: &Vector3<i64>) -> Vector3<f64> {
        self.position_si(cell, &self.e_offset)
    }

    /// Positions of the two B components: `[By, Bz]` in 3-D, `[By, Bx]` in 2-D.
    pub fn b_positions(&self, cell: &Vector3<i64>) -> [Vector3<f64>; 2] {
        [
            self.position_si(cell, &self.b_offsets[0]),
            self.position_si(cell, &self.b_offsets[1]),
        ]
    }
}
