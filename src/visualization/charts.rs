use colored::{Color, Colorize};

use crate::analysis::ScenarioEvaluation;
use crate::visualization::tables::format_value;

const MARKERS: [char; 8] = ['*', '+', 'o', 'x', '#', '@', '%', '&'];
const COLORS: [Color; 6] = [
    Color::Green,
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Red,
];

const MIN_WIDTH: usize = 10;
const MIN_HEIGHT: usize = 5;
const LABEL_WIDTH: usize = 10;

/// Format every curve as an overlaid ASCII line chart.
///
/// Each scenario gets its own marker; where curves overlap the later one in
/// table order is drawn on top. Non-finite values are left off the plot.
pub fn format_line_chart(evaluation: &ScenarioEvaluation, width: usize, height: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Population Over Time".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let series: Vec<_> = evaluation.iter().collect();
    if series.is_empty() {
        output.push_str("  No curves to display.\n");
        return output;
    }

    let width = width.max(MIN_WIDTH);
    let height = height.max(MIN_HEIGHT);

    let finite = series
        .iter()
        .flat_map(|(_, curve)| curve.values().iter().copied())
        .filter(|v| v.is_finite());
    let (mut lo, mut hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        output.push_str("  No finite values to display.\n");
        return output;
    }
    if hi - lo < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let horizon = series
        .iter()
        .map(|(_, curve)| curve.times().horizon())
        .fold(0.0f64, f64::max);

    // grid[row][col] holds the index of the series drawn there
    let mut grid: Vec<Vec<Option<usize>>> = vec![vec![None; width]; height];
    for (idx, (_, curve)) in series.iter().enumerate() {
        for col in 0..width {
            let t = horizon * col as f64 / (width - 1) as f64;
            let Some(v) = curve.value_near(t) else {
                continue;
            };
            if !v.is_finite() {
                continue;
            }
            let frac = (v - lo) / (hi - lo);
            let row = ((1.0 - frac) * (height - 1) as f64).round() as usize;
            grid[row.min(height - 1)][col] = Some(idx);
        }
    }

    for (row, cells) in grid.iter().enumerate() {
        let label = if row == 0 {
            format_value(hi)
        } else if row == height - 1 {
            format_value(lo)
        } else if row == (height - 1) / 2 {
            format_value((hi + lo) / 2.0)
        } else {
            String::new()
        };
        output.push_str(&format!("{label:>LABEL_WIDTH$} |"));
        for cell in cells {
            match cell {
                Some(idx) => output.push_str(&marker(*idx).to_string()),
                None => output.push(' '),
            }
        }
        output.push('\n');
    }

    output.push_str(&format!("{:>LABEL_WIDTH$} +{}\n", "", "-".repeat(width)));
    let end = format!("{horizon:.1}");
    output.push_str(&format!(
        "{:>LABEL_WIDTH$}  {:<pad$}{}\n",
        "",
        "0",
        end,
        pad = width.saturating_sub(end.len()),
    ));

    output.push('\n');
    for (idx, (scenario, _)) in series.iter().enumerate() {
        output.push_str(&format!(
            "  {} {} ({})\n",
            marker(idx),
            scenario.name,
            scenario.model
        ));
    }
    output
}

fn marker(idx: usize) -> colored::ColoredString {
    MARKERS[idx % MARKERS.len()]
        .to_string()
        .color(COLORS[idx % COLORS.len()])
}

/// Print an ASCII line chart of every curve.
pub fn print_line_chart(evaluation: &ScenarioEvaluation, width: usize, height: usize) {
    print!("{}", format_line_chart(evaluation, width, height));
}
