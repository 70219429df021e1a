//! Animation error types

use thiserror::Error;

/// Problems found while compiling a single variable's keyframes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyframeError {
    /// A variable must describe at least one keyframe
    #[error("no keyframes")]
    Empty,

    /// Delay is negative, NaN or infinite
    #[error("keyframe {index}: invalid delay {delay}")]
    InvalidDelay { index: usize, delay: f64 },

    /// Duration is negative, NaN or infinite
    #[error("keyframe {index}: invalid duration {duration}")]
    InvalidDuration { index: usize, duration: f64 },

    /// Target value is NaN or infinite
    #[error("keyframe {index}: non-finite value {value}")]
    NonFiniteValue { index: usize, value: f64 },

    /// Initial value is NaN or infinite
    #[error("non-finite initial value {0}")]
    NonFiniteInitialValue(f64),
}

/// Animation-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A timeline variable could not be compiled
    #[error("invalid variable '{name}'")]
    InvalidVariable {
        name: String,
        #[source]
        source: KeyframeError,
    },

    /// Easing name not present in the catalog
    #[error("unknown easing '{0}'")]
    UnknownEasing(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
