/// Speed of light in vacuum in SI units of m/s.
pub const SPEED_OF_LIGHT_SI: f64 = 2.997_924_58e8;
/// Multiple of the pulse length added to the automatic time delay, so the pulse
/// enters the simulation volume at low intensity.
pub const AUTO_DELAY_SAFETY_FACTOR: f64 = 3.0;
/// Default propagation speed of the overlap region, normalized to c.
pub const DEFAULT_BETA0: f64 = 1.0;
/// Default interaction angle between laser propagation and the simulation y-axis.
pub const DEFAULT_PHI: f64 = std::f64::consts::FRAC_PI_2;
