//! Pearson correlation, least-squares regression, and strength bands.
//!
//! All functions are pure and never fail on degenerate input: zero variance
//! yields `r = 0` and a flat regression line through the mean of `ys`.
//! Paired inputs of unequal length are truncated to the shorter series.

use crate::error::CoreError;
use crate::model::{Correlation, DataSet, Direction, RegressionResult, StrengthLabel};

/// Lower bound of the "very strong" band.
pub const VERY_STRONG_THRESHOLD: f64 = 0.7;
/// Lower bound of the "strong" band.
pub const STRONG_THRESHOLD: f64 = 0.4;
/// Lower bound of the "weak" band; below it there is no correlation.
pub const WEAK_THRESHOLD: f64 = 0.2;

/// Centered sums shared by correlation and regression.
///
/// The sums are taken over values divided by each series' largest magnitude,
/// so they stay finite for any finite input.
#[derive(Debug, Clone, Copy)]
struct Moments {
    mean_x: f64,
    mean_y: f64,
    scale_x: f64,
    scale_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl Moments {
    fn of(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len().min(ys.len());
        let (xs, ys) = (&xs[..n], &ys[..n]);
        let mean_x = mean(xs);
        let mean_y = mean(ys);
        let scale_x = magnitude(xs);
        let scale_y = magnitude(ys);
        let (cx, cy) = (mean_x / scale_x, mean_y / scale_y);

        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;
        for (&x, &y) in xs.iter().zip(ys) {
            let dx = x / scale_x - cx;
            let dy = y / scale_y - cy;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        // A constant series can leave rounding residue around its mean.
        if is_constant(xs) {
            sxx = 0.0;
        }
        if is_constant(ys) {
            syy = 0.0;
        }

        Self {
            mean_x,
            mean_y,
            scale_x,
            scale_y,
            sxx,
            syy,
            sxy,
        }
    }
}

/// Largest absolute value, or `1.0` for an all-zero series.
fn magnitude(values: &[f64]) -> f64 {
    let max = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let plain = values.iter().sum::<f64>() / n;
    if plain.is_finite() {
        return plain;
    }
    // The plain sum overflowed; average the terms instead.
    values.iter().map(|v| v / n).sum()
}

/// Pearson product-moment correlation of paired samples.
///
/// r = Sxy / sqrt(Sxx * Syy)
///
/// Returns `0.0` when either series has zero variance (including a single
/// sample). The result is clamped into `[-1, 1]`.
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let m = Moments::of(xs, ys);
    if m.sxx == 0.0 || m.syy == 0.0 {
        return 0.0;
    }
    let r = m.sxy / (m.sxx.sqrt() * m.syy.sqrt());
    if r.is_nan() {
        return 0.0;
    }
    r.clamp(-1.0, 1.0)
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
///
/// When `xs` has zero variance the line is flat through the mean of `ys`.
pub fn regression(xs: &[f64], ys: &[f64]) -> RegressionResult {
    let m = Moments::of(xs, ys);
    if m.sxx == 0.0 {
        return RegressionResult {
            slope: 0.0,
            intercept: m.mean_y,
        };
    }
    let slope = (m.sxy / m.sxx) * (m.scale_y / m.scale_x);
    RegressionResult {
        slope,
        intercept: m.mean_y - slope * m.mean_x,
    }
}

/// Evaluate the line at `x`.
pub fn predict(x: f64, slope: f64, intercept: f64) -> f64 {
    slope * x + intercept
}

/// Map `|r|` onto the ordered strength bands. Lower bounds are inclusive.
pub fn classify_strength(r: f64) -> StrengthLabel {
    let magnitude = r.abs();
    if magnitude >= VERY_STRONG_THRESHOLD {
        StrengthLabel::VeryStrong
    } else if magnitude >= STRONG_THRESHOLD {
        StrengthLabel::Strong
    } else if magnitude >= WEAK_THRESHOLD {
        StrengthLabel::Weak
    } else {
        StrengthLabel::None
    }
}

/// Attach strength and direction labels to a coefficient.
pub fn characterize(r: f64) -> Correlation {
    let strength = classify_strength(r);
    let direction = match strength {
        StrengthLabel::None => None,
        _ if r < 0.0 => Some(Direction::Negative),
        _ => Some(Direction::Positive),
    };
    Correlation {
        r,
        strength,
        direction,
    }
}

/// Correlation between two columns of a dataset.
pub fn correlate_columns(dataset: &DataSet, x: &str, y: &str) -> Result<Correlation, CoreError> {
    let (xs, ys) = dataset.pair(x, y)?;
    Ok(characterize(correlation(&xs, &ys)))
}

/// Regression of column `y` on column `x`.
pub fn fit_columns(dataset: &DataSet, x: &str, y: &str) -> Result<RegressionResult, CoreError> {
    let (xs, ys) = dataset.pair(x, y)?;
    Ok(regression(&xs, &ys))
}

/// Correlation for every unordered pair of declared columns, in column order.
pub fn correlation_matrix(dataset: &DataSet) -> Result<Vec<(String, String, f64)>, CoreError> {
    let columns = dataset
        .columns
        .iter()
        .map(|c| Ok((c.key.as_str(), dataset.column_values(&c.key)?)))
        .collect::<Result<Vec<_>, CoreError>>()?;

    let mut pairs = Vec::new();
    for (i, (x_key, xs)) in columns.iter().enumerate() {
        for (y_key, ys) in &columns[i + 1..] {
            pairs.push((x_key.to_string(), y_key.to_string(), correlation(xs, ys)));
        }
    }
    Ok(pairs)
}
