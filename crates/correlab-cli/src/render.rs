//! Plain-text rendering of scatter plots.

use correlab_core::model::DataPoint;

const WIDTH: usize = 48;
const HEIGHT: usize = 16;

/// Draw points on a character grid, y growing upwards.
pub fn scatter(points: &[DataPoint]) -> String {
    scatter_sized(points, WIDTH, HEIGHT)
}

fn scatter_sized(points: &[DataPoint], width: usize, height: usize) -> String {
    let mut grid = vec![vec![' '; width]; height];

    if !points.is_empty() {
        let (min_x, max_x) = bounds(points.iter().map(|p| p.x));
        let (min_y, max_y) = bounds(points.iter().map(|p| p.y));
        for p in points {
            let col = cell(p.x, min_x, max_x, width);
            let row = height - 1 - cell(p.y, min_y, max_y, height);
            grid[row][col] = match grid[row][col] {
                ' ' => '·',
                _ => '●',
            };
        }
    }

    let mut out = String::new();
    for line in grid {
        out.push('│');
        out.extend(line);
        out.push('\n');
    }
    out.push('└');
    out.extend(std::iter::repeat('─').take(width));
    out.push('\n');
    out
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn cell(value: f64, min: f64, max: f64, cells: usize) -> usize {
    if max <= min {
        return cells / 2;
    }
    let scaled = (value - min) / (max - min) * (cells - 1) as f64;
    (scaled.round() as usize).min(cells - 1)
}
