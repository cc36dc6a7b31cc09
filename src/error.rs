//! Error types for TWTS field construction and evaluation.

use nalgebra::Vector3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TwtsError {
    #[error("invalid parameter `{name}` = {value:e}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("interaction angle phi = {phi} rad lies outside the open interval (0, pi); the field is singular there")]
    SingularAngle { phi: f64 },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("non-finite {component} field at cell {cell:?}, step {step}")]
    NonFinite {
        component: &'static str,
        cell: Vector3<i64>,
        step: u32,
    },
}

pub type Result<T> = std::result::Result<T, TwtsError>;
