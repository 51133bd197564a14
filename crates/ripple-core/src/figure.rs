//! Figure presets — parameters plus the styling each published figure uses.
//!
//! Three figures share the same two expressions:
//!   - `Absolute`: amperes, both series on one y axis.
//!   - `Normalized`: ripple in units of Vin/(fs·Lself), one y axis.
//!   - `DualAxis`: amperes, ΔIout on the left axis and ΔIleg on the right.
//!
//! Each figure keeps its own duty-cycle set; they are separate figures, not
//! one figure with options.

use crate::domain::DEFAULT_SAMPLES;
use crate::params::{ConverterParams, Normalization, RippleConfig, SweepParams};

/// Reference converter: 12 V in, 100 kHz, 10 μH per winding.
pub const REFERENCE_VIN: f64 = 12.0;
pub const REFERENCE_FS: f64 = 100e3;
pub const REFERENCE_L_SELF: f64 = 10e-6;
pub const REFERENCE_K_MAX: f64 = 0.6;

/// Marker spacing, in samples.
pub const MARK_EVERY: usize = 50;
/// Tighter ΔIout marker spacing for the third trace; keeps its markers clear
/// of the neighbouring ΔIleg markers.
pub const MARK_EVERY_OFFSET: usize = 25;

pub const OUT_COLOR: Rgb = Rgb(0x2E, 0x86, 0xAB);
pub const LEG_COLOR: Rgb = Rgb(0xA2, 0x3B, 0x72);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#RRGGBB`, upper case.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMode {
    /// Both series share one y axis.
    Single,
    /// ΔIout on the left y axis, ΔIleg on the right.
    Dual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    OutputRipple,
    LegRipple,
}

impl Series {
    pub fn label(self) -> &'static str {
        match self {
            Series::OutputRipple => "ΔIout",
            Series::LegRipple => "ΔIleg",
        }
    }
}

/// Styling of one duty cycle's curve pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceStyle {
    pub line: LineStyle,
    pub marker: Marker,
    pub mark_every_out: usize,
    pub mark_every_leg: usize,
}

/// Text label pinned to a series at (k, duty).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub series: Series,
    pub k: f64,
    pub duty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    Absolute,
    Normalized,
    DualAxis,
}

impl FigureKind {
    pub const ALL: [FigureKind; 3] = [
        FigureKind::Absolute,
        FigureKind::Normalized,
        FigureKind::DualAxis,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FigureKind::Absolute => "absolute",
            FigureKind::Normalized => "normalized",
            FigureKind::DualAxis => "dual-axis",
        }
    }

    pub fn preset(self) -> FigureSpec {
        match self {
            FigureKind::Absolute => FigureSpec {
                kind: self,
                config: reference_config(Normalization::Absolute, vec![0.15, 0.25, 0.35]),
                axis_mode: AxisMode::Single,
                annotations: reference_annotations(),
            },
            FigureKind::Normalized => FigureSpec {
                kind: self,
                config: reference_config(Normalization::Normalized, vec![0.125, 0.25, 0.375]),
                axis_mode: AxisMode::Single,
                annotations: reference_annotations(),
            },
            FigureKind::DualAxis => FigureSpec {
                kind: self,
                config: reference_config(Normalization::Absolute, vec![0.1, 0.25, 0.4]),
                axis_mode: AxisMode::Dual,
                annotations: reference_annotations(),
            },
        }
    }
}

fn reference_config(normalization: Normalization, duties: Vec<f64>) -> RippleConfig {
    let vin = match normalization {
        Normalization::Absolute => Some(REFERENCE_VIN),
        Normalization::Normalized => None,
    };
    RippleConfig {
        normalization,
        converter: ConverterParams {
            vin,
            fs: REFERENCE_FS,
            l_self: REFERENCE_L_SELF,
        },
        sweep: SweepParams {
            k_max: REFERENCE_K_MAX,
            samples: DEFAULT_SAMPLES,
            duties,
        },
    }
}

fn reference_annotations() -> Vec<Annotation> {
    vec![
        Annotation {
            series: Series::OutputRipple,
            k: 0.0,
            duty: 0.25,
        },
        Annotation {
            series: Series::LegRipple,
            k: -0.3,
            duty: 0.25,
        },
    ]
}

/// Everything needed to draw and describe one figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec {
    pub kind: FigureKind,
    pub config: RippleConfig,
    pub axis_mode: AxisMode,
    pub annotations: Vec<Annotation>,
}

impl FigureSpec {
    pub fn out_color(&self) -> Rgb {
        OUT_COLOR
    }

    pub fn leg_color(&self) -> Rgb {
        LEG_COLOR
    }

    pub fn series_color(&self, series: Series) -> Rgb {
        match series {
            Series::OutputRipple => self.out_color(),
            Series::LegRipple => self.leg_color(),
        }
    }

    /// Style of the `index`-th duty cycle. Line styles and markers cycle.
    pub fn trace_style(&self, index: usize) -> TraceStyle {
        const LINES: [LineStyle; 3] = [LineStyle::Dashed, LineStyle::DashDot, LineStyle::Dotted];
        const MARKERS: [Marker; 3] = [Marker::Circle, Marker::Square, Marker::Triangle];
        TraceStyle {
            line: LINES[index % LINES.len()],
            marker: MARKERS[index % MARKERS.len()],
            mark_every_out: if index == 2 { MARK_EVERY_OFFSET } else { MARK_EVERY },
            mark_every_leg: MARK_EVERY,
        }
    }

    /// Left y axis label. Follows the configured normalization, so a
    /// parameter file can switch units under any preset.
    pub fn y_label(&self) -> String {
        match (self.axis_mode, self.config.normalization) {
            (AxisMode::Single, Normalization::Absolute) => "Current Ripple (A)".into(),
            (AxisMode::Single, Normalization::Normalized) => "ΔI · fs·Lself / Vin".into(),
            (AxisMode::Dual, _) => {
                format!("{} ({})", Series::OutputRipple.label(), self.config.unit())
            }
        }
    }

    /// Right y axis label, dual-axis figures only.
    pub fn y_label_right(&self) -> Option<String> {
        match self.axis_mode {
            AxisMode::Single => None,
            AxisMode::Dual => Some(format!("{} ({})", Series::LegRipple.label(), self.config.unit())),
        }
    }

    /// Annotations whose anchor lies inside the plotted k range.
    pub fn visible_annotations(&self) -> impl Iterator<Item = &Annotation> {
        let k_max = self.config.sweep.k_max;
        self.annotations.iter().filter(move |note| note.k.abs() <= k_max)
    }

    pub fn title(&self) -> String {
        let c = &self.config.converter;
        let fs_l = format!("fs={}kHz, Lself={}μH", display(c.fs / 1e3), display(c.l_self * 1e6));
        match self.config.normalization {
            Normalization::Absolute => match c.vin {
                Some(vin) => format!(
                    "Current Ripple vs Coupling Factor k (Vin={}V, {fs_l})",
                    display(vin)
                ),
                None => format!("Current Ripple vs Coupling Factor k ({fs_l})"),
            },
            // Vin does not enter the normalized scale.
            Normalization::Normalized => {
                format!("Normalized Current Ripple vs Coupling Factor k ({fs_l})")
            }
        }
    }
}

/// Compact decimal for engineering values: rounded to 1e-6, no trailing zeros.
pub fn display(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        // Avoid "-0".
        "0".into()
    } else {
        format!("{rounded}")
    }
}
