use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::analysis::ScenarioEvaluation;
use crate::error::ExplorerError;
use crate::models::{CellValue, ScenarioRow, ScenarioTable};

/// CSV row structure for a scenario. Every cell is read as text so that a bad
/// number becomes a validation issue rather than a read failure.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ScenarioRecord {
    name: Option<String>,
    model: Option<String>,
    n0: Option<String>,
    r: Option<String>,
    k: Option<String>,
}

impl From<ScenarioRecord> for ScenarioRow {
    fn from(rec: ScenarioRecord) -> Self {
        let cell = |raw: Option<String>| {
            raw.filter(|s| !s.trim().is_empty())
                .map(|s| CellValue::parse(&s))
        };
        ScenarioRow {
            name: rec.name.filter(|s| !s.trim().is_empty()),
            model: rec.model.filter(|s| !s.trim().is_empty()),
            n0: cell(rec.n0),
            r: cell(rec.r),
            k: cell(rec.k),
        }
    }
}

impl From<&ScenarioRow> for ScenarioRecord {
    fn from(row: &ScenarioRow) -> Self {
        Self {
            name: row.name.clone(),
            model: row.model.clone(),
            n0: row.n0.as_ref().map(CellValue::to_string),
            r: row.r.as_ref().map(CellValue::to_string),
            k: row.k.as_ref().map(CellValue::to_string),
        }
    }
}

/// Long-format curve row: one line per scenario and time point.
#[derive(Debug, serde::Serialize)]
struct CurvePointRecord<'a> {
    scenario: &'a str,
    model: String,
    t: f64,
    value: f64,
}

fn parse_csv_records<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<ScenarioRow>, ExplorerError> {
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: ScenarioRecord = result?;
        rows.push(record.into());
    }
    Ok(rows)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Read a scenario table from a CSV file with a `name,model,n0,r,k` header.
pub fn read_scenarios_csv(path: impl AsRef<Path>) -> Result<ScenarioTable, ExplorerError> {
    let path = path.as_ref();
    let mut rdr = reader_builder().from_path(path)?;
    let rows = parse_csv_records(&mut rdr)?;
    info!(path = %path.display(), rows = rows.len(), "read scenario table");
    Ok(ScenarioTable::from_rows(rows))
}

/// Read a scenario table from CSV bytes.
pub fn read_scenarios_csv_from_bytes(data: &[u8]) -> Result<ScenarioTable, ExplorerError> {
    let mut rdr = reader_builder().from_reader(data);
    Ok(ScenarioTable::from_rows(parse_csv_records(&mut rdr)?))
}

/// Write a scenario table to a CSV file.
pub fn write_scenarios_csv(
    table: &ScenarioTable,
    path: impl AsRef<Path>,
) -> Result<(), ExplorerError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for row in table.rows() {
        wtr.serialize(ScenarioRecord::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write evaluated curves in long format (`scenario,model,t,value`) to any writer.
pub fn write_curves_csv_to<W: Write>(
    evaluation: &ScenarioEvaluation,
    writer: W,
) -> Result<(), ExplorerError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (scenario, curve) in evaluation.iter() {
        let model = scenario.model.to_string();
        for (t, value) in curve.points() {
            wtr.serialize(CurvePointRecord {
                scenario: &scenario.name,
                model: model.clone(),
                t,
                value,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Write evaluated curves to a CSV file.
pub fn write_curves_csv(
    evaluation: &ScenarioEvaluation,
    path: impl AsRef<Path>,
) -> Result<(), ExplorerError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_curves_csv_to(evaluation, std::io::BufWriter::new(file))?;
    info!(path = %path.as_ref().display(), "wrote curves");
    Ok(())
}
