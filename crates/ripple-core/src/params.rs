//! Converter and sweep parameters.
//!
//! A `RippleConfig` is everything one figure needs: how the ripple is
//! scaled, the converter values behind the scale, and the sampled domain.
//! Presets live in `figure`; a config can also be read from JSON:
//!
//! ```json
//! {
//!   "normalization": "absolute",
//!   "converter": { "vin": 12.0, "fs": 100000.0, "l_self": 1e-5 },
//!   "sweep": { "k_max": 0.6, "samples": 1000, "duties": [0.15, 0.25, 0.35] }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{self, DEFAULT_SAMPLES};
use crate::error::{Result, RippleError};
use crate::ripple::{self, Scale, Sweep};

/// How the ripple expressions are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Amperes, from Vin, fs and Lself.
    Absolute,
    /// Dimensionless, in units of Vin/(fs·Lself).
    Normalized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterParams {
    /// Input voltage (V). Not needed for normalized figures.
    #[serde(default)]
    pub vin: Option<f64>,
    /// Switching frequency (Hz).
    pub fs: f64,
    /// Self inductance of one coupled winding (H).
    pub l_self: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    /// Half-width of the k domain; must stay below 1.
    pub k_max: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Duty cycles, one curve pair each, in plotting order.
    pub duties: Vec<f64>,
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RippleConfig {
    pub normalization: Normalization,
    pub converter: ConverterParams,
    pub sweep: SweepParams,
}

impl RippleConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject parameters that cannot describe a sweep.
    ///
    /// Duty cycles outside (0, 0.5) still evaluate and are only logged.
    pub fn validate(&self) -> Result<()> {
        require_positive("fs", self.converter.fs)?;
        require_positive("Lself", self.converter.l_self)?;
        match (self.normalization, self.converter.vin) {
            (_, Some(vin)) => require_positive("Vin", vin)?,
            (Normalization::Absolute, None) => return Err(RippleError::MissingInputVoltage),
            (Normalization::Normalized, None) => {}
        }

        let k_max = self.sweep.k_max;
        if !(k_max > 0.0 && k_max < 1.0) {
            return Err(RippleError::InvalidParameter {
                name: "k_max",
                value: k_max,
                requirement: "in (0, 1)",
            });
        }
        if self.sweep.samples < 2 {
            return Err(RippleError::TooFewSamples(self.sweep.samples));
        }
        if self.sweep.duties.is_empty() {
            return Err(RippleError::NoDutyCycles);
        }
        for &duty in &self.sweep.duties {
            if !duty.is_finite() {
                return Err(RippleError::InvalidParameter {
                    name: "duty cycle",
                    value: duty,
                    requirement: "finite",
                });
            }
            if !(duty > 0.0 && duty < 0.5) {
                tracing::warn!(duty, "duty cycle outside (0, 0.5); curve is not physical");
            }
        }
        Ok(())
    }

    /// Scale constants for this normalization.
    pub fn scale(&self) -> Result<Scale> {
        match self.normalization {
            Normalization::Normalized => Ok(Scale::NORMALIZED),
            Normalization::Absolute => {
                let vin = self.converter.vin.ok_or(RippleError::MissingInputVoltage)?;
                Ok(Scale::absolute(vin, self.converter.fs, self.converter.l_self))
            }
        }
    }

    pub fn domain(&self) -> Vec<f64> {
        domain::coupling_domain(self.sweep.k_max, self.sweep.samples)
    }

    /// Validate, then evaluate every duty cycle over the k domain.
    pub fn evaluate(&self) -> Result<Sweep> {
        self.validate()?;
        let scale = self.scale()?;
        Ok(ripple::sweep(&scale, self.domain(), &self.sweep.duties))
    }

    /// Unit label of the ripple values.
    pub fn unit(&self) -> &'static str {
        match self.normalization {
            Normalization::Absolute => "A",
            Normalization::Normalized => "Vin/(fs·Lself)",
        }
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RippleError::InvalidParameter {
            name,
            value,
            requirement: "positive",
        })
    }
}
