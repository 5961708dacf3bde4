use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ExplorerError;

/// Which closed-form growth law a scenario follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// N(t) = N0 * e^(r*t)
    Exponential,
    /// N(t) = K / (1 + ((K - N0)/N0) * e^(-r*t))
    Logistic,
}

impl ModelKind {
    /// Lowercase token used in files and the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Exponential => "exponential",
            ModelKind::Logistic => "logistic",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Exponential => write!(f, "Exponential"),
            ModelKind::Logistic => write!(f, "Logistic"),
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exponential" | "exp" => Ok(ModelKind::Exponential),
            "logistic" | "log" => Ok(ModelKind::Logistic),
            _ => Err(ExplorerError::ParseError(format!(
                "Unknown growth model: '{s}'"
            ))),
        }
    }
}

/// A fully validated, named parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display key, unique within a table
    pub name: String,
    pub model: ModelKind,
    /// Initial value (>= 0)
    pub n0: f64,
    /// Growth rate; negative values model decline
    pub r: f64,
    /// Carrying capacity (>= 0), only used by the logistic model
    pub k: f64,
}

impl Scenario {
    pub fn exponential(name: impl Into<String>, n0: f64, r: f64) -> Self {
        Self {
            name: name.into(),
            model: ModelKind::Exponential,
            n0,
            r,
            k: 0.0,
        }
    }

    pub fn logistic(name: impl Into<String>, n0: f64, r: f64, k: f64) -> Self {
        Self {
            name: name.into(),
            model: ModelKind::Logistic,
            n0,
            r,
            k,
        }
    }

    /// Validate parameters. Returns `ExplorerError::InvalidScenario` on failure.
    pub fn validate(&self) -> Result<(), ExplorerError> {
        let row: ScenarioRow = self.into();
        match row.to_scenario(0) {
            Ok(_) => Ok(()),
            Err(issues) => Err(ExplorerError::InvalidScenario(
                issues
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
        }
    }
}

/// A single table cell that should hold a number but may hold anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// Booleans, arrays and objects from JSON input
    Other(serde_json::Value),
}

impl CellValue {
    /// Interpret raw text from a file or form, keeping it as text if it is not numeric.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Other(_) => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Other(v) => write!(f, "{v}"),
        }
    }
}

/// A problem found while turning a scenario row into a `Scenario`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Position of the row in its table (0-based)
    pub row_index: usize,
    pub name: Option<String>,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(
                f,
                "row {} ({}): {}: {}",
                self.row_index + 1,
                name,
                self.field,
                self.message
            ),
            None => write!(f, "row {}: {}: {}", self.row_index + 1, self.field, self.message),
        }
    }
}

/// Editable, possibly incomplete form of a scenario as it arrives from a file,
/// the web API, or the table editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model: Option<String>,
    #[serde(default)]
    pub n0: Option<CellValue>,
    #[serde(default)]
    pub r: Option<CellValue>,
    #[serde(default)]
    pub k: Option<CellValue>,
}

impl ScenarioRow {
    /// Fully populated numeric row.
    pub fn new(name: impl Into<String>, model: ModelKind, n0: f64, r: f64, k: f64) -> Self {
        Self {
            name: Some(name.into()),
            model: Some(model.as_str().to_string()),
            n0: Some(n0.into()),
            r: Some(r.into()),
            k: Some(k.into()),
        }
    }

    /// Trimmed, non-empty name if present.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Convert to a `Scenario`, collecting every issue instead of stopping at the first.
    pub fn to_scenario(&self, row_index: usize) -> Result<Scenario, Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        let name = self.display_name().map(str::to_string);
        let issue = |field: &str, message: String| ValidationIssue {
            row_index,
            name: name.clone(),
            field: field.to_string(),
            message,
        };

        if name.is_none() {
            issues.push(issue("name", "name is missing".to_string()));
        }

        let model = match self.model.as_deref() {
            None => {
                issues.push(issue("model", "model is missing".to_string()));
                None
            }
            Some(raw) => match raw.parse::<ModelKind>() {
                Ok(m) => Some(m),
                Err(_) => {
                    issues.push(issue(
                        "model",
                        format!("unknown model '{raw}', expected exponential or logistic"),
                    ));
                    None
                }
            },
        };

        let mut check = |cell: &Option<CellValue>, field: &str, non_negative: bool| {
            match numeric_field(cell, field, non_negative) {
                Ok(value) => Some(value),
                Err(message) => {
                    issues.push(issue(field, message));
                    None
                }
            }
        };

        let n0 = check(&self.n0, "n0", true);
        let r = check(&self.r, "r", false);
        let k = match model {
            Some(ModelKind::Logistic) => check(&self.k, "k", true),
            // exponential rows ignore K
            _ => Some(
                self.k
                    .as_ref()
                    .and_then(CellValue::as_f64)
                    .filter(|k| k.is_finite() && *k >= 0.0)
                    .unwrap_or(0.0),
            ),
        };

        match (name, model, n0, r, k) {
            (Some(name), Some(model), Some(n0), Some(r), Some(k)) if issues.is_empty() => {
                Ok(Scenario {
                    name,
                    model,
                    n0,
                    r,
                    k,
                })
            }
            _ => Err(issues),
        }
    }
}

/// Text field that keeps non-string JSON values as their JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn numeric_field(
    cell: &Option<CellValue>,
    field: &str,
    non_negative: bool,
) -> Result<f64, String> {
    let cell = cell.as_ref().ok_or_else(|| format!("{field} is missing"))?;
    let value = cell
        .as_f64()
        .ok_or_else(|| format!("'{cell}' is not a number"))?;
    if !value.is_finite() {
        return Err(format!("{field} must be finite, got {value}"));
    }
    if non_negative && value < 0.0 {
        return Err(format!("{field} must be non-negative, got {value}"));
    }
    Ok(value)
}

impl From<&Scenario> for ScenarioRow {
    fn from(s: &Scenario) -> Self {
        ScenarioRow::new(s.name.clone(), s.model, s.n0, s.r, s.k)
    }
}

impl From<Scenario> for ScenarioRow {
    fn from(s: Scenario) -> Self {
        ScenarioRow::from(&s)
    }
}
