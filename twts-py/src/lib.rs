use nalgebra::Vector3;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use twts::grid::{Dimensionality, GridSpec, YeeCell};
use twts::params::PulseParams;
use twts::settings::Settings;
use twts::twts::{TwtsField, TwtsFieldB, TwtsFieldE};

/// E and B functors of one TWTS pulse on one grid.
#[pyclass(name = "TwtsField", frozen)]
struct PyTwtsField {
    e: TwtsFieldE,
    b: TwtsFieldB,
}

impl PyTwtsField {
    fn build(params: PulseParams, grid: GridSpec) -> PyResult<Self> {
        let e = TwtsFieldE::new(params.clone(), grid.clone(), &YeeCell).map_err(to_py_err)?;
        let b = TwtsFieldB::new(params, grid, &YeeCell).map_err(to_py_err)?;
        Ok(Self { e, b })
    }
}

#[pymethods]
impl PyTwtsField {
    #[new]
    #[pyo3(signature = (
        wavelength,
        pulse_duration,
        waist_x,
        waist_y,
        global_size,
        cell_size,
        delta_t,
        phi = std::f64::consts::FRAC_PI_2,
        beta0 = 1.0,
        focus_distance = 0.0,
        time_delay = None,
        three_dimensional = true,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        wavelength: f64,
        pulse_duration: f64,
        waist_x: f64,
        waist_y: f64,
        global_size: [usize; 3],
        cell_size: [f64; 3],
        delta_t: f64,
        phi: f64,
        beta0: f64,
        focus_distance: f64,
        time_delay: Option<f64>,
        three_dimensional: bool,
    ) -> PyResult<Self> {
        let params = PulseParams {
            focus_distance,
            wavelength,
            pulse_duration,
            waist_x,
            waist_y,
            phi,
            beta0,
            time_delay: time_delay.unwrap_or(0.0),
            auto_time_delay: time_delay.is_none(),
        };
        let dim = if three_dimensional {
            Dimensionality::Three
        } else {
            Dimensionality::Two
        };
        let grid = GridSpec::new(
            dim,
            Vector3::from(global_size),
            Vector3::from(cell_size),
            delta_t,
        );
        Self::build(params, grid)
    }

    /// Build from a TOML document in the format of config/default.toml.
    #[staticmethod]
    fn from_toml(text: &str) -> PyResult<Self> {
        let settings =
            Settings::from_toml_str(text).map_err(|e| PyValueError::new_err(format!("{:#}", e)))?;
        Self::build(settings.pulse, settings.grid_spec())
    }

    /// Normalized E at integer cell `cell` and time step `step`.
    fn e_field(&self, cell: [i64; 3], step: u32) -> PyResult<(f64, f64, f64)> {
        let v = self
            .e
            .try_evaluate(&Vector3::from(cell), step)
            .map_err(to_py_err)?;
        Ok((v.x, v.y, v.z))
    }

    /// Normalized B at integer cell `cell` and time step `step`.
    fn b_field(&self, cell: [i64; 3], step: u32) -> PyResult<(f64, f64, f64)> {
        let v = self
            .b
            .try_evaluate(&Vector3::from(cell), step)
            .map_err(to_py_err)?;
        Ok((v.x, v.y, v.z))
    }

    /// Time delay in s.
    #[getter]
    fn time_delay(&self) -> f64 {
        self.e.time_delay_si()
    }

    /// Time step closest to pulse time `time` in s.
    fn step_for_time(&self, time: f64) -> u32 {
        self.e.step_for_time(time)
    }
}

fn to_py_err(err: twts::error::TwtsError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python bindings for the TWTS background field.
#[pymodule]
fn _twts_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTwtsField>()?;
    Ok(())
}
