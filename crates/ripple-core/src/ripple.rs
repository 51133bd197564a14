//! Closed-form current ripple of a two-phase coupled inductor.
//!
//! For coupling factor k and effective duty cycle D (0 < D < 0.5):
//!
//! ```text
//! ΔIout(k) = C1 * D * (0.5 - D) / (1 + k)
//! ΔIleg(k) = C2 * D * [ 2/(1 + k) * (0.5 - D) + 1/(1 - k) ]
//! ```
//!
//! C1 and C2 depend on the normalization. In absolute units
//! C1 = 2·Vin/(fs·Lself) and C2 = Vin/(2·fs·Lself), giving amperes.
//! Factoring Vin/(fs·Lself) out leaves C1 = 2 and C2 = 1/2.
//!
//! Evaluation is a pure function of its inputs. k = -1 is a pole of both
//! expressions and k = 1 a pole of ΔIleg; values at or past the poles come
//! out as inf/NaN and are returned as-is.

/// Scale constants (C1, C2) of the two ripple expressions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// C1, multiplier of ΔIout.
    pub c_out: f64,
    /// C2, multiplier of ΔIleg.
    pub c_leg: f64,
}

impl Scale {
    /// Dimensionless ripple in units of Vin/(fs·Lself).
    pub const NORMALIZED: Scale = Scale {
        c_out: 2.0,
        c_leg: 0.5,
    };

    /// Ripple in amperes for input voltage `vin` (V), switching frequency
    /// `fs` (Hz) and self inductance `l_self` (H).
    pub fn absolute(vin: f64, fs: f64, l_self: f64) -> Self {
        let volt_seconds = vin / (fs * l_self);
        Self {
            c_out: 2.0 * volt_seconds,
            c_leg: 0.5 * volt_seconds,
        }
    }

    /// Peak-to-peak output current ripple at coupling `k`, duty `duty`.
    #[inline]
    pub fn delta_i_out(&self, k: f64, duty: f64) -> f64 {
        self.c_out * duty * (0.5 - duty) / (1.0 + k)
    }

    /// Peak-to-peak per-leg (winding) current ripple at coupling `k`, duty `duty`.
    #[inline]
    pub fn delta_i_leg(&self, k: f64, duty: f64) -> f64 {
        self.c_leg * duty * (2.0 / (1.0 + k) * (0.5 - duty) + 1.0 / (1.0 - k))
    }
}

/// Both ripple sequences for one duty cycle, sampled on a shared k grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RippleCurve {
    pub duty: f64,
    pub delta_i_out: Vec<f64>,
    pub delta_i_leg: Vec<f64>,
}

/// A k grid with one curve pair per duty cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub k: Vec<f64>,
    pub curves: Vec<RippleCurve>,
}

impl Sweep {
    /// Largest finite ΔIout across all curves, if any.
    pub fn max_delta_i_out(&self) -> Option<f64> {
        finite_max(self.curves.iter().flat_map(|c| c.delta_i_out.iter()))
    }

    /// Largest finite ΔIleg across all curves, if any.
    pub fn max_delta_i_leg(&self) -> Option<f64> {
        finite_max(self.curves.iter().flat_map(|c| c.delta_i_leg.iter()))
    }
}

fn finite_max<'a>(values: impl Iterator<Item = &'a f64>) -> Option<f64> {
    values
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// Evaluate ΔIout and ΔIleg pointwise over `k` for one duty cycle.
pub fn evaluate(scale: &Scale, k: &[f64], duty: f64) -> RippleCurve {
    RippleCurve {
        duty,
        delta_i_out: k.iter().map(|&k| scale.delta_i_out(k, duty)).collect(),
        delta_i_leg: k.iter().map(|&k| scale.delta_i_leg(k, duty)).collect(),
    }
}

/// Evaluate every duty cycle in order over a shared k grid.
pub fn sweep(scale: &Scale, k: Vec<f64>, duties: &[f64]) -> Sweep {
    let curves = duties.iter().map(|&d| evaluate(scale, &k, d)).collect();
    tracing::debug!(
        samples = k.len(),
        duties = duties.len(),
        c_out = scale.c_out,
        c_leg = scale.c_leg,
        "evaluated ripple sweep"
    );
    Sweep { k, curves }
}
