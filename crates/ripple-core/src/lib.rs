//! Coupled-inductor ripple library — closed-form ΔIout/ΔIleg curves.
//!
//! Pure math with no plotting dependencies.

// Curve generation
pub mod domain;
pub mod ripple;

// Parameters and presets
pub mod error;
pub mod figure;
pub mod params;

// Text output
pub mod output;

pub use error::{Result, RippleError};
