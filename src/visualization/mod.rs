mod tables;
mod charts;

pub use tables::{
    format_scenario_table, print_scenario_table,
    format_summary_table, print_summary_table,
    format_curve_table, print_curve_table,
    format_issues, print_issues,
    format_value,
};
pub use charts::{format_line_chart, print_line_chart};
