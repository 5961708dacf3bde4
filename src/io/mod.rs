mod csv_io;
mod json_io;

use std::path::Path;

use crate::error::ExplorerError;
use crate::models::ScenarioTable;

pub use csv_io::{
    read_scenarios_csv, read_scenarios_csv_from_bytes, write_curves_csv, write_curves_csv_to,
    write_scenarios_csv,
};
pub use json_io::{
    read_scenarios_json, read_scenarios_json_from_bytes, write_curves_json, write_scenarios_json,
};

/// Trait for reading a scenario table from a file.
pub trait ScenarioReader {
    fn read(&self, path: &Path) -> Result<ScenarioTable, ExplorerError>;
}

/// Trait for writing a scenario table to a file.
pub trait ScenarioWriter {
    fn write(&self, table: &ScenarioTable, path: &Path) -> Result<(), ExplorerError>;
}

/// CSV format reader/writer.
pub struct CsvFormat;

impl ScenarioReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<ScenarioTable, ExplorerError> {
        read_scenarios_csv(path)
    }
}

impl ScenarioWriter for CsvFormat {
    fn write(&self, table: &ScenarioTable, path: &Path) -> Result<(), ExplorerError> {
        write_scenarios_csv(table, path)
    }
}

/// JSON format reader/writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl ScenarioReader for JsonFormat {
    fn read(&self, path: &Path) -> Result<ScenarioTable, ExplorerError> {
        read_scenarios_json(path)
    }
}

impl ScenarioWriter for JsonFormat {
    fn write(&self, table: &ScenarioTable, path: &Path) -> Result<(), ExplorerError> {
        write_scenarios_json(table, path, self.pretty)
    }
}

/// Pick a reader from the file extension (`.csv` or `.json`).
pub fn reader_for(path: &Path) -> Result<Box<dyn ScenarioReader>, ExplorerError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat::default())),
        ext => Err(ExplorerError::ParseError(format!(
            "Unsupported file format: .{ext}. Use .csv or .json"
        ))),
    }
}

/// Pick a writer from the file extension (`.csv` or `.json`).
pub fn writer_for(path: &Path, pretty: bool) -> Result<Box<dyn ScenarioWriter>, ExplorerError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat { pretty })),
        ext => Err(ExplorerError::ParseError(format!(
            "Unsupported file format: .{ext}. Use .csv or .json"
        ))),
    }
}

/// Lowercased file extension, or an empty string when there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
