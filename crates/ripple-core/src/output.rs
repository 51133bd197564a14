//! Text output: CSV curves and the parameter summary.

use std::io::Write;

use crate::error::Result;
use crate::figure::{FigureSpec, Series, display};
use crate::params::Normalization;
use crate::ripple::{Scale, Sweep};

/// Write a sweep as CSV, one row per k sample.
///
/// Format:
/// ```csv
/// k,delta_i_out_d0.15,delta_i_leg_d0.15,delta_i_out_d0.25,...
/// -0.6,0.65625,1.1625,...
/// ```
pub fn write_csv<W: Write>(sweep: &Sweep, writer: &mut W) -> Result<()> {
    write!(writer, "k")?;
    for curve in &sweep.curves {
        write!(
            writer,
            ",delta_i_out_d{d},delta_i_leg_d{d}",
            d = curve.duty
        )?;
    }
    writeln!(writer)?;

    for (i, k) in sweep.k.iter().enumerate() {
        write!(writer, "{k}")?;
        for curve in &sweep.curves {
            write!(writer, ",{},{}", curve.delta_i_out[i], curve.delta_i_leg[i])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the "Parameters used" block printed after every figure.
///
/// ```text
/// Parameters used:
/// Vin = 12 V
/// fs = 100 kHz
/// Lself = 10 μH
/// Duty cycles: [0.15, 0.25, 0.35]
/// k range: -0.6 to 0.6
/// Colors: ΔIout = #2E86AB, ΔIleg = #A23B72
/// ```
///
/// followed by the scale constants and the annotated reference values.
pub fn write_summary<W: Write>(figure: &FigureSpec, scale: &Scale, writer: &mut W) -> Result<()> {
    let config = &figure.config;
    let converter = &config.converter;

    writeln!(writer, "Parameters used:")?;
    match (config.normalization, converter.vin) {
        (Normalization::Absolute, Some(vin)) => writeln!(writer, "Vin = {} V", display(vin))?,
        (Normalization::Absolute, None) => writeln!(writer, "Vin = unset")?,
        // The normalized scale never reads Vin, even when one is given.
        (Normalization::Normalized, _) => writeln!(writer, "Vin = normalized")?,
    }
    writeln!(writer, "fs = {} kHz", display(converter.fs / 1e3))?;
    writeln!(writer, "Lself = {} μH", display(converter.l_self * 1e6))?;
    writeln!(writer, "Duty cycles: {:?}", config.sweep.duties)?;
    writeln!(
        writer,
        "k range: -{k} to {k}",
        k = config.sweep.k_max
    )?;
    writeln!(
        writer,
        "Colors: {} = {}, {} = {}",
        Series::OutputRipple.label(),
        figure.out_color().hex(),
        Series::LegRipple.label(),
        figure.leg_color().hex()
    )?;

    let mode = match config.normalization {
        Normalization::Absolute => "absolute",
        Normalization::Normalized => "normalized",
    };
    writeln!(
        writer,
        "Scale ({mode}): C1 = {}, C2 = {}",
        display(scale.c_out),
        display(scale.c_leg)
    )?;
    for note in &figure.annotations {
        writeln!(
            writer,
            "{}(k={}, D={}) = {:.4} {}",
            note.series.label(),
            note.k,
            note.duty,
            series_value(scale, note.series, note.k, note.duty),
            config.unit()
        )?;
    }
    Ok(())
}

/// Value of one series at a single point.
pub fn series_value(scale: &Scale, series: Series, k: f64, duty: f64) -> f64 {
    match series {
        Series::OutputRipple => scale.delta_i_out(k, duty),
        Series::LegRipple => scale.delta_i_leg(k, duty),
    }
}
