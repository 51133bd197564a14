/// Dash patterns in backend pixel space.
///
/// Curves are drawn as polylines in pixel coordinates, so dash lengths stay
/// constant on screen regardless of how steep the curve is in data space.

use ripple_core::figure::LineStyle;

/// On/off lengths in pixels, alternating, starting with "on".
/// Empty means a continuous line.
pub fn dash_pattern(style: LineStyle) -> &'static [f64] {
    match style {
        LineStyle::Solid => &[],
        LineStyle::Dashed => &[14.0, 6.0],
        LineStyle::DashDot => &[14.0, 5.0, 3.0, 5.0],
        LineStyle::Dotted => &[3.0, 5.0],
    }
}

/// Split a polyline into the visible dashes of `pattern`.
///
/// `pattern` must have an even number of entries. The pattern phase carries
/// across vertices, so a dash may bend around a corner.
pub fn split_dashes(points: &[(i32, i32)], pattern: &[f64]) -> Vec<Vec<(i32, i32)>> {
    if points.len() < 2 {
        return Vec::new();
    }
    if pattern.is_empty() {
        return vec![points.to_vec()];
    }

    let mut dashes = Vec::new();
    let mut current = vec![points[0]];
    let mut slot = 0;
    let mut left = pattern[0];

    for pair in points.windows(2) {
        let (x0, y0) = (pair[0].0 as f64, pair[0].1 as f64);
        let (x1, y1) = (pair[1].0 as f64, pair[1].1 as f64);
        let len = (x1 - x0).hypot(y1 - y0);
        let mut pos = 0.0;

        while len - pos > left {
            pos += left;
            let t = pos / len;
            let p = (
                (x0 + t * (x1 - x0)).round() as i32,
                (y0 + t * (y1 - y0)).round() as i32,
            );
            // Closes the dash in an "on" slot, opens the next one otherwise.
            current.push(p);
            if slot % 2 == 0 {
                dashes.push(std::mem::take(&mut current));
            }
            slot = (slot + 1) % pattern.len();
            left = pattern[slot];
        }

        left -= len - pos;
        if slot % 2 == 0 {
            current.push(pair[1]);
        }
    }

    if slot % 2 == 0 && current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

/// Split mapped samples into runs of consecutive finite points.
pub fn finite_runs(points: &[Option<(i32, i32)>]) -> Vec<Vec<(i32, i32)>> {
    let mut runs = Vec::new();
    let mut run = Vec::new();
    for p in points {
        match p {
            Some(p) => run.push(*p),
            None => {
                if run.len() >= 2 {
                    runs.push(std::mem::take(&mut run));
                } else {
                    run.clear();
                }
            }
        }
    }
    if run.len() >= 2 {
        runs.push(run);
    }
    runs
}
