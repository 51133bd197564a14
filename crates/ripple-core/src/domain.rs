//! Sampled coupling-factor domain.
//!
//! The k axis is a closed, evenly spaced grid over [-k_max, k_max]. Both
//! endpoints are included and the last sample lands exactly on the upper
//! bound, so a grid of odd length contains k = 0.

/// Default number of k samples per curve.
pub const DEFAULT_SAMPLES: usize = 1000;

/// `n` evenly spaced samples from `start` to `end`, endpoints included.
///
/// `n == 0` yields an empty grid and `n == 1` yields `[start]`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut grid: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            // Accumulated rounding must not move the upper bound.
            grid[n - 1] = end;
            grid
        }
    }
}

/// Symmetric coupling-factor grid over [-k_max, k_max].
///
/// No range check here: a k_max at or above 1 puts samples on or past the
/// poles of the ripple expressions, and the evaluated curves carry the
/// resulting infinities through unchanged.
pub fn coupling_domain(k_max: f64, n: usize) -> Vec<f64> {
    linspace(-k_max, k_max, n)
}
