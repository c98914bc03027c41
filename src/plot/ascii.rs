//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks of model assumptions in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observations: `o`
//! - reference line: `-` (zero residual, or `y = x` on a Q-Q plot)

use crate::domain::FittedModel;
use crate::math::normal_quantile;

/// Residuals against fitted values, with a zero line.
pub fn render_residual_plot(model: &FittedModel, width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = model
        .fitted
        .iter()
        .copied()
        .zip(model.residuals.iter().copied())
        .collect();
    let Some((x_min, x_max)) = x_range(&points) else {
        return "Residuals vs fitted: n/a\n".to_string();
    };
    let zero = [(x_min, 0.0), (x_max, 0.0)];
    render_plot("Residuals vs fitted", ("fitted", "residual"), &points, &zero, (x_min, x_max), width, height)
}

/// Normal Q-Q plot of the standardized residuals, with the line `y = x`.
pub fn render_qq_plot(model: &FittedModel, width: usize, height: usize) -> String {
    let points = qq_points(&model.residuals, model.sigma);
    let Some((x_min, x_max)) = x_range(&points) else {
        return "Normal Q-Q: n/a\n".to_string();
    };
    let lo = x_min.min(points.first().map_or(x_min, |p| p.1));
    let hi = x_max.max(points.last().map_or(x_max, |p| p.1));
    let diagonal = [(lo, lo), (hi, hi)];
    render_plot("Normal Q-Q", ("theoretical", "sample"), &points, &diagonal, (x_min, x_max), width, height)
}

/// `(theoretical, sample)` pairs: sorted `residual / sigma` against normal
/// quantiles at the plotting positions `(i - a) / (n + 1 - 2a)`, with
/// `a = 3/8` for `n <= 10` and `1/2` otherwise.
pub fn qq_points(residuals: &[f64], sigma: f64) -> Vec<(f64, f64)> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Vec::new();
    }
    let mut sample: Vec<f64> = residuals.iter().map(|e| e / sigma).collect();
    sample.sort_by(f64::total_cmp);

    let n = sample.len() as f64;
    let a = if sample.len() <= 10 { 0.375 } else { 0.5 };
    sample
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let p = (i as f64 + 1.0 - a) / (n + 1.0 - 2.0 * a);
            (normal_quantile(p), s)
        })
        .collect()
}

fn render_plot(
    title: &str,
    (x_label, y_label): (&str, &str),
    points: &[(f64, f64)],
    reference: &[(f64, f64)],
    (x_min, x_max): (f64, f64),
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(points, reference).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Reference first so points overlay it.
    draw_polyline(&mut grid, reference, (x_min, x_max), (y_min, y_max));

    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{title}: {x_label}=[{x_min:.3}, {x_max:.3}] | {y_label}=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if !(min_x.is_finite() && max_x.is_finite()) {
        return None;
    }
    if max_x > min_x {
        Some((min_x, max_x))
    } else {
        Some((min_x - 0.5, max_x + 0.5))
    }
}

fn y_range(points: &[(f64, f64)], reference: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points.iter().chain(reference) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y max is row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], line: &[(f64, f64)], (x_min, x_max): (f64, f64), (y_min, y_max): (f64, f64)) {
    let height = grid.len();
    let width = grid[0].len();

    let cells: Vec<(usize, usize)> = line
        .iter()
        .map(|&(x, y)| (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height)))
        .collect();
    for pair in cells.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        draw_line(grid, x0, y0, x1, y1, '-');
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
