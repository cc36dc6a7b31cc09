use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{Config, Environment, File};
use nalgebra::Vector3;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::grid::{Dimensionality, GridSpec};
use crate::params::PulseParams;
use crate::sample::Plane;


/// Runtime configuration of the field generator.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub pulse: PulseParams,
    pub grid: GridSettings,
    #[serde(default)]
    pub sample: SampleSettings,
}

/// Simulation grid as written in the configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GridSettings {
    pub dimensionality: Dimensionality,
    /// Cells of the global domain along x, y, z.
    pub global_size: [usize; 3],
    /// Cell size in m along x, y, z.
    pub cell_size: [f64; 3],
    /// Time step in s.
    pub delta_t: f64,
}

/// What the `twts` binary samples.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SampleSettings {
    #[serde(default)]
    pub plane: Plane,
    /// Pulse time in s at which to sample; 0 is the pulse centre at focus.
    #[serde(default)]
    pub time: f64,
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_progress() -> bool {
    true
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            plane: Plane::default(),
            time: 0.0,
            progress: default_progress(),
        }
    }
}

impl Settings {
    /// Parses settings from a TOML document, without environment or CLI overrides.
    pub fn from_toml_str(s: &str) -> Result<Settings> {
        toml::from_str(s).context("Error deserializing TOML settings")
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(
            self.grid.dimensionality,
            Vector3::from(self.grid.global_size),
            Vector3::from(self.grid.cell_size),
            self.grid.delta_t,
        )
    }

    pub fn validate(&self) -> Result<()> {
        self.pulse.validate().context("Invalid pulse settings")?;
        self.grid_spec().validate().context("Invalid grid settings")?;
        if !self.sample.plane.is_valid_for(self.grid.dimensionality) {
            bail!(
                "Cannot sample the {} plane of a 2-D simulation",
                self.sample.plane
            );
        }
        if !self.sample.time.is_finite() {
            bail!("Sample time must be finite, got {}", self.sample.time);
        }
        Ok(())
    }

    /// Overrides settings with any values given on the command line.
    pub fn apply_args(&mut self, args: &CliArgs) {
        let pulse = &mut self.pulse;
        if let Some(w) = args.w {
            pulse.wavelength = w;
        }
        if let Some(duration) = args.duration {
            pulse.pulse_duration = duration;
        }
        if let Some(wx) = args.wx {
            pulse.waist_x = wx;
        }
        if let Some(wy) = args.wy {
            pulse.waist_y = wy;
        }
        if let Some(focus) = args.focus {
            pulse.focus_distance = focus;
        }
        if let Some(phi) = args.phi {
            pulse.phi = phi;
        } else if let Some(phi_deg) = args.phi_deg {
            pulse.phi = phi_deg.to_radians();
        }
        if let Some(beta0) = args.beta0 {
            pulse.beta0 = beta0;
        }
        if let Some(delay) = args.delay {
            pulse.time_delay = delay;
            pulse.auto_time_delay = false;
        }

        let grid = &mut self.grid;
        if let Some(dim) = args.dim {
            grid.dimensionality = dim;
        }
        if let Some(size) = &args.size {
            grid.global_size = [size[0], size[1], size[2]];
        }
        if let Some(cell) = &args.cell {
            grid.cell_size = [cell[0], cell[1], cell[2]];
        }
        if let Some(dt) = args.dt {
            grid.delta_t = dt;
        }

        if let Some(plane) = args.plane {
            self.sample.plane = plane;
        }
        if let Some(time) = args.time {
            self.sample.time = time;
        }
        if args.quiet {
            self.sample.progress = false;
        }
    }
}

/// Loads `config/default.toml` without environment or command-line overrides.
pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let default_config_file = root.join("config/default.toml");

    let settings = read_config(&default_config_file, false)?;
    settings.validate()?;
    Ok(settings)
}

/// Loads the configuration file, then `TWTS_*` environment variables, then
/// command-line arguments, each overriding the previous.
///
/// `config/local.toml` replaces `config/default.toml` when it exists.
pub fn load_config() -> Result<Settings> {
    let root = retrieve_project_root()?;

    let default_config_file = root.join("config/default.toml");
    let local_config = root.join("config/local.toml");

    let config_file = if local_config.exists() {
        log::info!("Using local configuration: {:?}", local_config);
        local_config
    } else {
        log::info!("Using default configuration: {:?}", default_config_file);
        default_config_file
    };

    let mut settings = read_config(&config_file, true)?;

    let args = CliArgs::parse();
    settings.apply_args(&args);

    settings.validate()?;
    log::debug!("{:#?}", settings);

    Ok(settings)
}

fn read_config(path: &Path, with_env: bool) -> Result<Settings> {
    let mut builder = Config::builder().add_source(File::from(path).required(true));
    if with_env {
        // e.g. TWTS_PULSE__PHI=0.5
        builder = builder.add_source(Environment::with_prefix("twts").separator("__"));
    }
    let config = builder
        .build()
        .with_context(|| format!("Error loading configuration from {:?}", path))?;
    config
        .try_deserialize()
        .with_context(|| format!("Error deserializing configuration from {:?}", path))
}

/// Retrieve the project root directory.
/// Tries, in order:
/// 1. the CARGO_MANIFEST_DIR environment variable (cargo run, cargo test),
/// 2. the TWTS_ROOT_DIR environment variable,
/// 3. the nearest directory containing a "config" subdirectory, walking up
///    from the executable.
fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("TWTS_ROOT_DIR") {
        return Ok(PathBuf::from(path));
    }

    let exe_path = env::current_exe().context("Failed to get current executable path")?;
    exe_path
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("config").is_dir())
        .map(Path::to_path_buf)
        .context("Could not find project root directory; set TWTS_ROOT_DIR")
}

#[derive(Parser, Debug)]
#[command(version, about = "TWTS - analytic background field of a tilted-front laser pulse")]
pub struct CliArgs {
    /// Central wavelength in m.
    #[arg(short, long)]
    w: Option<f64>,

    /// Sigma of the Gaussian intensity envelope in s.
    #[arg(long)]
    duration: Option<f64>,

    /// Waist along x in m.
    #[arg(long)]
    wx: Option<f64>,

    /// Waist along y (line-focus width) in m.
    #[arg(long)]
    wy: Option<f64>,

    /// Distance of the focus from the simulation origin along y, in m.
    #[arg(long)]
    focus: Option<f64>,

    /// Interaction angle in rad.
    #[arg(long, group = "angle")]
    phi: Option<f64>,

    /// Interaction angle in degrees.
    #[arg(long, group = "angle")]
    phi_deg: Option<f64>,

    /// Propagation speed of the overlap region, normalized to c.
    #[arg(long)]
    beta0: Option<f64>,

    /// Manual time delay in s. Disables the automatic delay.
    #[arg(long)]
    delay: Option<f64>,

    /// Dimensionality of the simulation.
    #[arg(long, value_enum)]
    dim: Option<Dimensionality>,

    /// Cells of the global domain along x, y, z.
    #[arg(long, num_args = 3, value_delimiter = ' ')]
    size: Option<Vec<usize>>,

    /// Cell size in m along x, y, z.
    #[arg(long, num_args = 3, value_delimiter = ' ')]
    cell: Option<Vec<f64>>,

    /// Time step in s.
    #[arg(long)]
    dt: Option<f64>,

    /// Plane through the domain centre to sample.
    #[arg(long, value_enum)]
    plane: Option<Plane>,

    /// Pulse time in s at which to sample.
    #[arg(long)]
    time: Option<f64>,

    /// Hide the progress bar.
    #[arg(short, long)]
    quiet: bool,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.pulse;
        let g = &self.grid;
        write!(
            f,
            "Settings:
  - Wavelength: {:.6e} m
  - Pulse Duration: {:.6e} s
  - Waist: {:.6e} m x {:.6e} m
  - Focus Distance: {:.6e} m
  - Phi: {:.6} rad ({:.3} deg)
  - Beta0: {:.6}
  - Time Delay: {}
  - Grid: {:?}, {:?} cells of {:?} m, dt = {:.6e} s
  - Sample: {} plane at t = {:.6e} s
  ",
            p.wavelength,
            p.pulse_duration,
            p.waist_x,
            p.waist_y,
            p.focus_distance,
            p.phi,
            p.phi.to_degrees(),
            p.beta0,
            if p.auto_time_delay {
                "auto".to_string()
            } else {
                format!("{:.6e} s", p.time_delay)
            },
            g.dimensionality,
            g.global_size,
            g.cell_size,
            g.delta_t,
            self.sample.plane,
            self.sample.time,
        )
    }
}
