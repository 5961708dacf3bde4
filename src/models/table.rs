use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CellValue, ModelKind, Scenario, ScenarioRow, ValidationIssue};
use crate::error::ExplorerError;

/// Parameters used for seeded and newly added rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioDefaults {
    pub model: ModelKind,
    pub n0: f64,
    pub r: f64,
    pub k: f64,
}

impl Default for ScenarioDefaults {
    fn default() -> Self {
        Self {
            model: ModelKind::Logistic,
            n0: 10.0,
            r: 0.1,
            k: 100.0,
        }
    }
}

impl ScenarioDefaults {
    pub fn validate(&self) -> Result<(), ExplorerError> {
        self.row("defaults").to_scenario(0).map(|_| ()).map_err(|issues| {
            ExplorerError::ValidationError(
                issues
                    .iter()
                    .map(|i| format!("{}: {}", i.field, i.message))
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })
    }

    fn row(&self, name: impl Into<String>) -> ScenarioRow {
        ScenarioRow::new(name, self.model, self.n0, self.r, self.k)
    }
}

/// Partial update applied to one row. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub n0: Option<CellValue>,
    #[serde(default)]
    pub r: Option<CellValue>,
    #[serde(default)]
    pub k: Option<CellValue>,
}

/// Ordered, user-editable collection of scenario rows.
///
/// Rows may be invalid; they are only checked when the table is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTable {
    pub rows: Vec<ScenarioRow>,
}

impl ScenarioTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<ScenarioRow>) -> Self {
        Self { rows }
    }

    /// A table with a single `Base` row built from the defaults.
    pub fn seeded(defaults: &ScenarioDefaults) -> Self {
        Self {
            rows: vec![defaults.row("Base")],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ScenarioRow] {
        &self.rows
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioRow> {
        self.position(name).map(|i| &self.rows[i])
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.rows.iter().position(|r| r.display_name() == Some(name))
    }

    /// Next free `Scenario N` label.
    fn next_name(&self) -> String {
        let mut n = self.rows.len() + 1;
        loop {
            let candidate = format!("Scenario {n}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Append a row populated from the defaults under a fresh name.
    pub fn add_row(&mut self, defaults: &ScenarioDefaults) -> &ScenarioRow {
        let name = self.next_name();
        debug!(%name, "adding scenario row");
        self.rows.push(defaults.row(name));
        &self.rows[self.rows.len() - 1]
    }

    /// Append a caller-supplied row. A missing name is filled in; a taken name is rejected.
    pub fn push(&mut self, mut row: ScenarioRow) -> Result<&ScenarioRow, ExplorerError> {
        match row.display_name() {
            Some(name) if self.contains(name) => {
                return Err(ExplorerError::ValidationError(format!(
                    "a scenario named '{name}' already exists"
                )));
            }
            Some(_) => {}
            None => row.name = Some(self.next_name()),
        }
        self.rows.push(row);
        Ok(&self.rows[self.rows.len() - 1])
    }

    /// Apply a patch to the row called `name`.
    pub fn update_row(
        &mut self,
        name: &str,
        patch: ScenarioPatch,
    ) -> Result<&ScenarioRow, ExplorerError> {
        let idx = self
            .position(name)
            .ok_or_else(|| ExplorerError::NotFound(format!("scenario '{name}'")))?;

        if let Some(new_name) = patch.name.as_deref().map(str::trim) {
            if new_name.is_empty() {
                return Err(ExplorerError::ValidationError(
                    "scenario name cannot be empty".to_string(),
                ));
            }
            if self.position(new_name).is_some_and(|other| other != idx) {
                return Err(ExplorerError::ValidationError(format!(
                    "a scenario named '{new_name}' already exists"
                )));
            }
        }

        let row = &mut self.rows[idx];
        if let Some(new_name) = patch.name {
            row.name = Some(new_name.trim().to_string());
        }
        if let Some(model) = patch.model {
            row.model = Some(model);
        }
        if let Some(n0) = patch.n0 {
            row.n0 = Some(n0);
        }
        if let Some(r) = patch.r {
            row.r = Some(r);
        }
        if let Some(k) = patch.k {
            row.k = Some(k);
        }
        debug!(scenario = name, "updated scenario row");
        Ok(&self.rows[idx])
    }

    pub fn remove_row(&mut self, name: &str) -> Result<ScenarioRow, ExplorerError> {
        let idx = self
            .position(name)
            .ok_or_else(|| ExplorerError::NotFound(format!("scenario '{name}'")))?;
        Ok(self.rows.remove(idx))
    }

    pub fn remove_last(&mut self) -> Option<ScenarioRow> {
        self.rows.pop()
    }

    /// Discard all rows and re-seed from the defaults.
    pub fn reset(&mut self, defaults: &ScenarioDefaults) {
        *self = Self::seeded(defaults);
    }

    /// Convert every row, failing on the first invalid one.
    pub fn scenarios(&self) -> Result<Vec<Scenario>, ExplorerError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.to_scenario(i).map_err(|issues| {
                    ExplorerError::InvalidScenario(
                        issues
                            .iter()
                            .map(ValidationIssue::to_string)
                            .collect::<Vec<_>>()
                            .join("; "),
                    )
                })
            })
            .collect()
    }
}

impl From<Vec<Scenario>> for ScenarioTable {
    fn from(scenarios: Vec<Scenario>) -> Self {
        Self {
            rows: scenarios.into_iter().map(ScenarioRow::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_table_has_base_row() {
        let table = ScenarioTable::seeded(&ScenarioDefaults::default());
        assert_eq!(table.len(), 1);
        let base = table.get("Base").unwrap();
        let s = base.to_scenario(0).unwrap();
        assert_eq!(s.model, ModelKind::Logistic);
        assert_eq!(s.n0, 10.0);
        assert_eq!(s.k, 100.0);
    }

    #[test]
    fn test_add_row_names_sequentially() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::seeded(&defaults);
        assert_eq!(table.add_row(&defaults).name.as_deref(), Some("Scenario 2"));
        assert_eq!(table.add_row(&defaults).name.as_deref(), Some("Scenario 3"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_add_row_skips_taken_names() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::from_rows(vec![ScenarioRow::new(
            "Scenario 2",
            ModelKind::Exponential,
            1.0,
            0.1,
            0.0,
        )]);
        assert_eq!(table.add_row(&defaults).name.as_deref(), Some("Scenario 3"));
    }

    #[test]
    fn test_push_rejects_duplicate_name() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::seeded(&defaults);
        let dup = ScenarioRow::new("Base", ModelKind::Exponential, 1.0, 0.1, 0.0);
        assert!(table.push(dup).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_push_fills_missing_name() {
        let mut table = ScenarioTable::new();
        let row = table.push(ScenarioRow::default()).unwrap();
        assert_eq!(row.name.as_deref(), Some("Scenario 1"));
    }

    #[test]
    fn test_update_row_changes_fields() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::seeded(&defaults);
        let patch = ScenarioPatch {
            r: Some(0.5.into()),
            model: Some("exponential".to_string()),
            ..Default::default()
        };
        let row = table.update_row("Base", patch).unwrap();
        let s = row.to_scenario(0).unwrap();
        assert_eq!(s.r, 0.5);
        assert_eq!(s.model, ModelKind::Exponential);
        assert_eq!(s.n0, 10.0);
    }

    #[test]
    fn test_update_row_rename() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::seeded(&defaults);
        table.add_row(&defaults);
        let patch = ScenarioPatch {
            name: Some("Slow".to_string()),
            ..Default::default()
        };
        table.update_row("Scenario 2", patch).unwrap();
        assert!(table.contains("Slow"));
        assert!(!table.contains("Scenario 2"));
    }

    #[test]
    fn test_update_row_rename_conflict() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::seeded(&defaults);
        table.add_row(&defaults);
        let patch = ScenarioPatch {
            name: Some("Base".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            table.update_row("Scenario 2", patch),
            Err(ExplorerError::ValidationError(_))
        ));
    }

    #[test]
    fn test_update_missing_row() {
        let mut table = ScenarioTable::new();
        assert!(matches!(
            table.update_row("Nope", ScenarioPatch::default()),
            Err(ExplorerError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_row() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::seeded(&defaults);
        table.add_row(&defaults);
        let removed = table.remove_row("Base").unwrap();
        assert_eq!(removed.name.as_deref(), Some("Base"));
        assert_eq!(table.len(), 1);
        assert!(table.remove_row("Base").is_err());
    }

    #[test]
    fn test_remove_last_and_reset() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::seeded(&defaults);
        table.add_row(&defaults);
        table.add_row(&defaults);
        assert_eq!(
            table.remove_last().unwrap().name.as_deref(),
            Some("Scenario 3")
        );
        table.reset(&defaults);
        assert_eq!(table, ScenarioTable::seeded(&defaults));
    }

    #[test]
    fn test_scenarios_strict_conversion() {
        let defaults = ScenarioDefaults::default();
        let mut table = ScenarioTable::seeded(&defaults);
        assert_eq!(table.scenarios().unwrap().len(), 1);
        table.rows.push(ScenarioRow {
            name: Some("Bad".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            table.scenarios(),
            Err(ExplorerError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_defaults_validate() {
        assert!(ScenarioDefaults::default().validate().is_ok());
        let bad = ScenarioDefaults {
            n0: -3.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
