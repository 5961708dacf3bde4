use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::Explorer;
use crate::error::ExplorerError;
use crate::io;
use crate::models::{ScenarioPatch, ScenarioRow, TimeConfig, ValidationIssue};

use super::state::{AppState, Session};

// ---------------------------------------------------------------------------
// Error wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    details: String,
}

#[derive(Debug)]
pub(crate) struct WebError(ExplorerError);

impl From<ExplorerError> for WebError {
    fn from(e: ExplorerError) -> Self {
        WebError(e)
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            ExplorerError::ValidationError(_)
            | ExplorerError::ParseError(_)
            | ExplorerError::InvalidScenario(_) => StatusCode::BAD_REQUEST,
            ExplorerError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorBody {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            details: self.0.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Snapshot of a session: its rows, time settings, and which rows would be skipped.
#[derive(Debug, Serialize, Deserialize)]
struct SessionView {
    id: Uuid,
    time: TimeConfig,
    scenarios: Vec<ScenarioRow>,
    issues: Vec<ValidationIssue>,
}

impl SessionView {
    fn new(id: Uuid, session: &Session) -> Self {
        Self {
            id,
            time: session.explorer.time_config(),
            scenarios: session.table.rows().to_vec(),
            issues: session.explorer.evaluate(&session.table).issues,
        }
    }
}

/// Sanitize a name for use in Content-Disposition headers.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.' || *c == ' ')
        .collect::<String>()
        .replace("..", "")
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

pub async fn create_session(state: web::Data<AppState>) -> Result<HttpResponse, WebError> {
    let (id, session) = state.create_session()?;
    Ok(HttpResponse::Created().json(SessionView::new(id, &session)))
}

pub async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let view = state.with_session(&id, |s| Ok(SessionView::new(id, s)))?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn set_time(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<TimeConfig>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let config = body.into_inner();
    let view = state.with_session(&id, |s| {
        s.explorer.set_time_config(config)?;
        Ok(SessionView::new(id, s))
    })?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn reset_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let defaults = state.config().defaults;
    let view = state.with_session(&id, |s| {
        s.table.reset(&defaults);
        Ok(SessionView::new(id, s))
    })?;
    Ok(HttpResponse::Ok().json(view))
}

// ---------------------------------------------------------------------------
// Scenario row handlers
// ---------------------------------------------------------------------------

/// Append a row: the posted row if the body is non-empty, otherwise a default row.
/// A body that is not a JSON row is rejected.
pub async fn add_scenario(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let posted = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let row: ScenarioRow = serde_json::from_slice(&body)
            .map_err(|e| ExplorerError::ParseError(format!("Invalid scenario row: {e}")))?;
        Some(row)
    };
    let defaults = state.config().defaults;
    let row = state.with_session(&id, |s| match posted {
        Some(row) => s.table.push(row).cloned(),
        None => Ok(s.table.add_row(&defaults).clone()),
    })?;
    Ok(HttpResponse::Created().json(row))
}

pub async fn update_scenario(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    body: web::Json<ScenarioPatch>,
) -> Result<HttpResponse, WebError> {
    let (id, name) = path.into_inner();
    let patch = body.into_inner();
    let row = state.with_session(&id, |s| s.table.update_row(&name, patch).cloned())?;
    Ok(HttpResponse::Ok().json(row))
}

pub async fn delete_scenario(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, WebError> {
    let (id, name) = path.into_inner();
    state.with_session(&id, |s| s.table.remove_row(&name))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Drop the last row of the table.
pub async fn remove_last_scenario(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let row = state.with_session(&id, |s| {
        s.table.remove_last().ok_or_else(|| {
            ExplorerError::ValidationError("scenario table is already empty".to_string())
        })
    })?;
    Ok(HttpResponse::Ok().json(row))
}

// ---------------------------------------------------------------------------
// Evaluation handlers
// ---------------------------------------------------------------------------

pub async fn curves(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let evaluation = state.with_session(&id, |s| Ok(s.explorer.evaluate(&s.table)))?;
    Ok(HttpResponse::Ok().json(evaluation))
}

#[derive(Deserialize)]
pub struct ExportQuery {
    format: Option<String>,
}

pub async fn export(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let evaluation = state.with_session(&id, |s| Ok(s.explorer.evaluate(&s.table)))?;
    let fmt = query.format.as_deref().unwrap_or("csv");
    let safe_name = sanitize_filename(&format!("curves-{id}"));

    match fmt {
        "csv" => {
            let mut data = Vec::new();
            io::write_curves_csv_to(&evaluation, &mut data)?;
            Ok(HttpResponse::Ok()
                .content_type("text/csv")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{safe_name}.csv\""),
                ))
                .body(data))
        }
        "json" => {
            let data = serde_json::to_string_pretty(&evaluation).map_err(ExplorerError::from)?;
            Ok(HttpResponse::Ok()
                .content_type("application/json")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{safe_name}.json\""),
                ))
                .body(data))
        }
        _ => Err(WebError(ExplorerError::ParseError(format!(
            "Unsupported export format: {fmt}. Use csv or json."
        )))),
    }
}

#[derive(Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    time: TimeConfig,
    scenarios: Vec<ScenarioRow>,
}

/// Stateless evaluation of a posted table.
pub async fn evaluate(body: web::Json<EvaluateRequest>) -> Result<HttpResponse, WebError> {
    let request = body.into_inner();
    let explorer = Explorer::new(request.time)?;
    Ok(HttpResponse::Ok().json(explorer.evaluate_rows(&request.scenarios)))
}
