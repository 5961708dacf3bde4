use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::analysis::{CurveSummary, ScenarioEvaluation};
use crate::models::{CellValue, ModelKind, ScenarioRow, ScenarioTable, ValidationIssue};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format a value compactly: fixed notation for ordinary magnitudes, scientific otherwise.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let abs = v.abs();
    if abs != 0.0 && !(1e-3..1e7).contains(&abs) {
        format!("{v:.3e}")
    } else {
        format!("{v:.2}")
    }
}

fn cell_text(cell: &Option<CellValue>) -> String {
    match cell {
        Some(value) => value.to_string(),
        None => "-".to_string(),
    }
}

/// Format the scenario table with a status column showing which rows will be skipped.
pub fn format_scenario_table(table: &ScenarioTable) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Scenarios".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut t = new_table();
    t.set_header(vec!["Name", "Model", "N0", "r", "K", "Status"]);

    for (i, row) in table.rows().iter().enumerate() {
        let status = match row.to_scenario(i) {
            Ok(_) => "ok".to_string(),
            Err(issues) => format!(
                "invalid: {}",
                issues
                    .iter()
                    .map(|issue| issue.field.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        t.add_row(vec![
            Cell::new(row.name.as_deref().unwrap_or("-")),
            Cell::new(row.model.as_deref().unwrap_or("-")),
            Cell::new(cell_text(&row.n0)),
            Cell::new(cell_text(&row.r)),
            Cell::new(k_text(row)),
            Cell::new(status),
        ]);
    }

    output.push_str(&format!("{t}"));
    output
}

fn k_text(row: &ScenarioRow) -> String {
    let is_exponential = row
        .model
        .as_deref()
        .and_then(|m| m.parse::<ModelKind>().ok())
        == Some(ModelKind::Exponential);
    if is_exponential {
        "n/a".to_string()
    } else {
        cell_text(&row.k)
    }
}

/// Print the scenario table.
pub fn print_scenario_table(table: &ScenarioTable) {
    print!("{}", format_scenario_table(table));
}

/// Format per-scenario curve summaries as a string.
pub fn format_summary_table(summaries: &[CurveSummary]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Curve Summary".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut table = new_table();
    table.set_header(vec![
        "Scenario", "Model", "Initial", "Final", "Min", "Max", "% of K", "Doubling t",
    ]);

    for s in summaries {
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(s.model.to_string()),
            Cell::new(format_value(s.initial)),
            Cell::new(format_value(s.final_value)),
            Cell::new(format_value(s.min)),
            Cell::new(format_value(s.max)),
            Cell::new(
                s.percent_of_capacity
                    .map(|p| format!("{p:.1}%"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                s.doubling_time
                    .map(|d| format!("{d:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print per-scenario curve summaries.
pub fn print_summary_table(summaries: &[CurveSummary]) {
    print!("{}", format_summary_table(summaries));
}

/// Format `samples` evenly spaced rows of every curve, one column per scenario.
pub fn format_curve_table(evaluation: &ScenarioEvaluation, samples: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Growth Curves".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut table = new_table();
    let mut header = vec!["t".to_string()];
    header.extend(evaluation.iter().map(|(s, _)| s.name.clone()));
    table.set_header(header);

    let Some((_, first)) = evaluation.iter().next() else {
        output.push_str(&format!("{table}"));
        return output;
    };

    for idx in sample_indices(first.len(), samples) {
        let t = first.times().get(idx).unwrap_or(f64::NAN);
        let mut row = vec![Cell::new(format!("{t:.2}"))];
        for (_, curve) in evaluation.iter() {
            let value = curve.values().get(idx).copied().unwrap_or(f64::NAN);
            row.push(Cell::new(format_value(value)));
        }
        table.add_row(row);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print sampled curve values.
pub fn print_curve_table(evaluation: &ScenarioEvaluation, samples: usize) {
    print!("{}", format_curve_table(evaluation, samples));
}

/// Evenly spaced indices into a sequence of length `len`, always including both ends.
pub(crate) fn sample_indices(len: usize, samples: usize) -> Vec<usize> {
    if len == 0 || samples == 0 {
        return Vec::new();
    }
    if samples >= len {
        return (0..len).collect();
    }
    if samples == 1 {
        return vec![0];
    }
    let mut indices: Vec<usize> = (0..samples)
        .map(|i| (i as f64 * (len - 1) as f64 / (samples - 1) as f64).round() as usize)
        .collect();
    indices.dedup();
    indices
}

/// Format the list of skipped rows and why.
pub fn format_issues(issues: &[ValidationIssue]) -> String {
    let mut output = String::new();
    if issues.is_empty() {
        return output;
    }
    output.push_str(&format!("\n{}\n", "Skipped Scenarios".bold().yellow()));
    output.push_str(&format!("{}\n", "=".repeat(50)));
    for issue in issues {
        output.push_str(&format!("  - {issue}\n"));
    }
    output
}

/// Print the list of skipped rows.
pub fn print_issues(issues: &[ValidationIssue]) {
    print!("{}", format_issues(issues));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{evaluate_all, summarize};
    use crate::models::{ScenarioDefaults, TimeSequence};

    fn sample_table() -> ScenarioTable {
        let mut table = ScenarioTable::seeded(&ScenarioDefaults::default());
        table
            .push(ScenarioRow::new("Boom", ModelKind::Exponential, 10.0, 0.1, 0.0))
            .unwrap();
        table
            .push(ScenarioRow {
                name: Some("Broken".to_string()),
                model: Some("logistic".to_string()),
                n0: Some(10.0.into()),
                r: Some(CellValue::Text("fast".to_string())),
                k: Some(100.0.into()),
            })
            .unwrap();
        table
    }

    fn sample_eval() -> ScenarioEvaluation {
        let t = TimeSequence::generate(50.0, 51).unwrap();
        evaluate_all(sample_table().rows(), &t)
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(12.3456), "12.35");
        assert_eq!(format_value(0.0), "0.00");
        assert_eq!(format_value(f64::INFINITY), "inf");
        assert!(format_value(1.5e9).contains('e'));
        assert!(format_value(1e-12).contains('e'));
    }

    #[test]
    fn test_format_scenario_table_status() {
        let output = format_scenario_table(&sample_table());
        assert!(output.contains("Scenarios"));
        assert!(output.contains("Base"));
        assert!(output.contains("Boom"));
        assert!(output.contains("invalid: r"));
        assert!(output.contains("n/a"));
    }

    #[test]
    fn test_format_summary_table_contains_headers() {
        let output = format_summary_table(&summarize(&sample_eval()));
        assert!(output.contains("Scenario"));
        assert!(output.contains("Final"));
        assert!(output.contains("% of K"));
        assert!(output.contains("Doubling t"));
        assert!(output.contains("Logistic"));
        assert!(output.contains("Exponential"));
    }

    #[test]
    fn test_format_curve_table_columns_and_rows() {
        let output = format_curve_table(&sample_eval(), 6);
        assert!(output.contains("Base"));
        assert!(output.contains("Boom"));
        assert!(!output.contains("Broken"));
        assert!(output.contains("50.00"));
        assert!(output.contains("1484.13"));
    }

    #[test]
    fn test_format_curve_table_empty() {
        let t = TimeSequence::generate(10.0, 10).unwrap();
        let eval = evaluate_all(&[], &t);
        let output = format_curve_table(&eval, 5);
        assert!(output.contains("Growth Curves"));
    }

    #[test]
    fn test_sample_indices() {
        assert_eq!(sample_indices(11, 3), vec![0, 5, 10]);
        assert_eq!(sample_indices(3, 10), vec![0, 1, 2]);
        assert_eq!(sample_indices(5, 1), vec![0]);
        assert!(sample_indices(0, 4).is_empty());
        let idx = sample_indices(500, 11);
        assert_eq!(idx.first(), Some(&0));
        assert_eq!(idx.last(), Some(&499));
    }

    #[test]
    fn test_format_issues() {
        let eval = sample_eval();
        let output = format_issues(&eval.issues);
        assert!(output.contains("Skipped Scenarios"));
        assert!(output.contains("Broken"));
        assert!(format_issues(&[]).is_empty());
    }
}
