use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::ScenarioEvaluation;
use crate::error::ExplorerError;
use crate::models::{ScenarioRow, ScenarioTable};

/// Accepted shapes of a scenario JSON document.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioDocument {
    Wrapped { scenarios: Vec<ScenarioRow> },
    Bare(Vec<ScenarioRow>),
}

#[derive(Serialize)]
struct ScenarioDocumentOut<'a> {
    scenarios: &'a [ScenarioRow],
}

fn parse_document(content: &str) -> Result<ScenarioTable, ExplorerError> {
    let doc: ScenarioDocument = serde_json::from_str(content)?;
    let rows = match doc {
        ScenarioDocument::Wrapped { scenarios } => scenarios,
        ScenarioDocument::Bare(rows) => rows,
    };
    Ok(ScenarioTable::from_rows(rows))
}

/// Read a scenario table from a JSON file: either an array of rows or
/// an object with a `scenarios` array.
pub fn read_scenarios_json(path: impl AsRef<Path>) -> Result<ScenarioTable, ExplorerError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let table = parse_document(&content)?;
    info!(path = %path.display(), rows = table.len(), "read scenario table");
    Ok(table)
}

/// Read a scenario table from JSON bytes.
pub fn read_scenarios_json_from_bytes(data: &[u8]) -> Result<ScenarioTable, ExplorerError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| ExplorerError::ParseError(format!("Invalid UTF-8: {e}")))?;
    parse_document(content)
}

/// Write a scenario table as `{ "scenarios": [...] }`.
pub fn write_scenarios_json(
    table: &ScenarioTable,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ExplorerError> {
    let doc = ScenarioDocumentOut {
        scenarios: table.rows(),
    };
    let content = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}

/// Write evaluated curves, skipped-row issues included, as JSON.
pub fn write_curves_json(
    evaluation: &ScenarioEvaluation,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ExplorerError> {
    let content = if pretty {
        serde_json::to_string_pretty(evaluation)?
    } else {
        serde_json::to_string(evaluation)?
    };
    std::fs::write(path.as_ref(), content)?;
    info!(path = %path.as_ref().display(), "wrote curves");
    Ok(())
}
