/// SVG figure rendering.
///
/// Axes, grid, ticks and caption come from plotters. Curves, markers,
/// annotations and the legend are drawn straight onto the root area in
/// backend pixels, after mapping each sample through the chart's coordinate
/// transform, so dash patterns and marker sizes are exact on screen.

use std::error::Error;
use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontStyle;

use ripple_core::figure::{AxisMode, FigureSpec, LineStyle, Marker, Rgb, Series};
use ripple_core::output::series_value;
use ripple_core::ripple::{Scale, Sweep};

use crate::stroke::{dash_pattern, finite_runs, split_dashes};

pub const FIGURE_SIZE: (u32, u32) = (1200, 800);

const LINE_WIDTH: u32 = 2;
const MARKER_RADIUS: i32 = 4;
/// ΔIleg traces sit slightly behind ΔIout.
const LEG_OPACITY: f64 = 0.8;
/// Annotation offset from its anchor point, pixels right and up.
const ANNOTATION_OFFSET: (i32, i32) = (15, 10);

const TEXT_GRAY: RGBColor = RGBColor(0x33, 0x33, 0x33);
const SPINE_GRAY: RGBColor = RGBColor(0x66, 0x66, 0x66);
const GRID_GRAY: RGBColor = RGBColor(0xCC, 0xCC, 0xCC);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type DrawResult = Result<(), Box<dyn Error>>;

/// Data (k, value) to backend pixel for one y axis.
type PixelMap<'m> = &'m dyn Fn(f64, f64) -> (i32, i32);

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Render `sweep` as an SVG file at `path`.
pub fn render_svg(path: &Path, figure: &FigureSpec, scale: &Scale, sweep: &Sweep) -> DrawResult {
    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    match figure.axis_mode {
        AxisMode::Single => render_single(&root, figure, scale, sweep)?,
        AxisMode::Dual => render_dual(&root, figure, scale, sweep)?,
    }

    root.present()?;
    tracing::info!(path = %path.display(), figure = figure.kind.name(), "wrote figure");
    Ok(())
}

// ─── Axis layouts ───────────────────────────────────────────────────────────

fn render_single(root: &Area, figure: &FigureSpec, scale: &Scale, sweep: &Sweep) -> DrawResult {
    let k_max = figure.config.sweep.k_max;
    let all = sweep
        .curves
        .iter()
        .flat_map(|c| c.delta_i_out.iter().chain(c.delta_i_leg.iter()))
        .copied();
    let y = padded_range(all);

    let mut chart = ChartBuilder::on(root)
        .caption(figure.title(), ("sans-serif", 22).into_font().color(&TEXT_GRAY))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-k_max..k_max, y)?;
    configure_axes(&mut chart, figure, TEXT_GRAY)?;

    let map = |k: f64, v: f64| chart.backend_coord(&(k, v));
    draw_traces(root, figure, sweep, &map, &map)?;
    draw_annotations(root, figure, scale, &map, &map)?;
    draw_legend(root, figure, chart.plotting_area().get_pixel_range())?;
    Ok(())
}

fn render_dual(root: &Area, figure: &FigureSpec, scale: &Scale, sweep: &Sweep) -> DrawResult {
    let k_max = figure.config.sweep.k_max;
    let out_color = rgb(figure.out_color());
    let leg_color = rgb(figure.leg_color());
    let y_out = padded_range(sweep.curves.iter().flat_map(|c| c.delta_i_out.iter()).copied());
    let y_leg = padded_range(sweep.curves.iter().flat_map(|c| c.delta_i_leg.iter()).copied());

    let mut chart = ChartBuilder::on(root)
        .caption(figure.title(), ("sans-serif", 22).into_font().color(&TEXT_GRAY))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .right_y_label_area_size(80)
        .build_cartesian_2d(-k_max..k_max, y_out)?
        .set_secondary_coord(-k_max..k_max, y_leg);
    configure_axes(&mut chart, figure, out_color)?;

    let right_label = figure
        .y_label_right()
        .unwrap_or_else(|| Series::LegRipple.label().to_string());
    chart
        .configure_secondary_axes()
        .y_desc(right_label)
        .axis_desc_style(("sans-serif", 16).into_font().color(&leg_color))
        .label_style(("sans-serif", 13).into_font().color(&leg_color))
        .axis_style(SPINE_GRAY)
        .draw()?;

    let left = |k: f64, v: f64| chart.backend_coord(&(k, v));
    let right = |k: f64, v: f64| chart.borrow_secondary().backend_coord(&(k, v));
    draw_traces(root, figure, sweep, &left, &right)?;
    draw_annotations(root, figure, scale, &left, &right)?;
    draw_legend(root, figure, chart.plotting_area().get_pixel_range())?;
    Ok(())
}

fn configure_axes(chart: &mut Chart<'_, '_>, figure: &FigureSpec, y_color: RGBColor) -> DrawResult {
    chart
        .configure_mesh()
        .x_desc("k")
        .y_desc(figure.y_label())
        .axis_desc_style(("sans-serif", 16).into_font().color(&y_color))
        .x_label_style(("sans-serif", 13).into_font().color(&TEXT_GRAY))
        .y_label_style(("sans-serif", 13).into_font().color(&y_color))
        .bold_line_style(GRID_GRAY.mix(0.3))
        .light_line_style(WHITE.mix(0.0))
        .axis_style(SPINE_GRAY)
        .draw()?;
    Ok(())
}

/// Finite min..max of `values` with 5% headroom on both sides.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return 0.0..1.0;
    }
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 * lo.abs().max(1.0) };
    (lo - pad)..(hi + pad)
}

// ─── Curves and markers ─────────────────────────────────────────────────────

fn draw_traces(
    root: &Area,
    figure: &FigureSpec,
    sweep: &Sweep,
    left: PixelMap,
    right: PixelMap,
) -> DrawResult {
    let out_color = rgb(figure.out_color()).mix(1.0);
    let leg_color = rgb(figure.leg_color()).mix(LEG_OPACITY);

    for (i, curve) in sweep.curves.iter().enumerate() {
        let style = figure.trace_style(i);
        draw_trace(
            root,
            &sweep.k,
            &curve.delta_i_out,
            left,
            out_color,
            style.line,
            style.marker,
            style.mark_every_out,
        )?;
        draw_trace(
            root,
            &sweep.k,
            &curve.delta_i_leg,
            right,
            leg_color,
            style.line,
            style.marker,
            style.mark_every_leg,
        )?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_trace(
    root: &Area,
    k: &[f64],
    values: &[f64],
    map: PixelMap,
    color: RGBAColor,
    line: LineStyle,
    marker: Marker,
    mark_every: usize,
) -> DrawResult {
    // Non-finite samples (poles) break the line instead of drawing through.
    let mapped: Vec<Option<(i32, i32)>> = k
        .iter()
        .zip(values)
        .map(|(&k, &v)| v.is_finite().then(|| map(k, v)))
        .collect();

    let stroke = color.stroke_width(LINE_WIDTH);
    for run in finite_runs(&mapped) {
        for dash in split_dashes(&run, dash_pattern(line)) {
            root.draw(&PathElement::new(dash, stroke))?;
        }
    }

    for p in mapped.iter().step_by(mark_every.max(1)).flatten() {
        draw_marker(root, marker, *p, color.filled())?;
    }
    Ok(())
}

fn draw_marker(root: &Area, marker: Marker, at: (i32, i32), style: ShapeStyle) -> DrawResult {
    let r = MARKER_RADIUS;
    match marker {
        Marker::Circle => root.draw(&Circle::new(at, r, style))?,
        Marker::Square => {
            root.draw(&Rectangle::new([(at.0 - r, at.1 - r), (at.0 + r, at.1 + r)], style))?
        }
        Marker::Triangle => root.draw(&TriangleMarker::new(at, r + 1, style))?,
    }
    Ok(())
}

// ─── Labels ─────────────────────────────────────────────────────────────────

fn draw_annotations(
    root: &Area,
    figure: &FigureSpec,
    scale: &Scale,
    left: PixelMap,
    right: PixelMap,
) -> DrawResult {
    // Anchors past ±k_max would land on the axis labels.
    for note in figure.visible_annotations() {
        let value = series_value(scale, note.series, note.k, note.duty);
        if !value.is_finite() {
            continue;
        }
        let map = match note.series {
            Series::OutputRipple => left,
            Series::LegRipple => right,
        };
        let color = rgb(figure.series_color(note.series));
        let (x, y) = map(note.k, value);
        let (tx, ty) = (x + ANNOTATION_OFFSET.0, y - ANNOTATION_OFFSET.1);

        let label = note.series.label();
        // No font metrics needed: ~10 px per glyph at 15 pt bold.
        let width = label.chars().count() as i32 * 10;
        let frame = [(tx - 6, ty - 22), (tx + width + 6, ty + 4)];
        root.draw(&Rectangle::new(frame, WHITE.mix(0.9).filled()))?;
        root.draw(&Rectangle::new(frame, color.stroke_width(1)))?;
        root.draw(&Text::new(
            label,
            (tx, ty - 18),
            ("sans-serif", 15)
                .into_font()
                .style(FontStyle::Bold)
                .color(&color),
        ))?;
    }
    Ok(())
}

/// One black entry per duty cycle, upper left of the plotting area.
fn draw_legend(root: &Area, figure: &FigureSpec, plot: (Range<i32>, Range<i32>)) -> DrawResult {
    let duties = &figure.config.sweep.duties;
    let (x0, y0) = (plot.0.start + 14, plot.1.start + 14);
    let row = 24;
    let frame = [(x0, y0), (x0 + 150, y0 + row * duties.len() as i32 + 10)];
    root.draw(&Rectangle::new(frame, WHITE.mix(0.9).filled()))?;
    root.draw(&Rectangle::new(frame, BLACK.stroke_width(1)))?;

    for (i, duty) in duties.iter().enumerate() {
        let style = figure.trace_style(i);
        let y = y0 + 17 + row * i as i32;
        let sample = [(x0 + 10, y), (x0 + 60, y)];
        for dash in split_dashes(&sample, dash_pattern(style.line)) {
            root.draw(&PathElement::new(dash, BLACK.stroke_width(LINE_WIDTH)))?;
        }
        draw_marker(root, style.marker, (x0 + 35, y), BLACK.filled())?;
        root.draw(&Text::new(
            format!("D = {duty}"),
            (x0 + 72, y - 8),
            ("sans-serif", 14).into_font().color(&BLACK),
        ))?;
    }
    Ok(())
}
