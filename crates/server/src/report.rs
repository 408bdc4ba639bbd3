//! Closed projects report, as JSON or CSV.

use api_types::report::{ReportResponse, ReportRow};
use axum::{
    Extension, Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::{ServerError, server::ServerState, user};

const CSV_HEADER: [&str; 3] = ["name", "duration", "description"];

async fn rows(state: &ServerState, user: &user::Model) -> Result<Vec<ReportRow>, ServerError> {
    let rows = state.engine.closed_projects_report(&user.username).await?;
    Ok(rows
        .into_iter()
        .map(|row| ReportRow {
            duration: engine::format_duration(row.duration),
            duration_seconds: row.duration.num_seconds(),
            name: row.name,
            description: row.description,
        })
        .collect())
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ReportResponse>, ServerError> {
    let projects = rows(&state, &user).await?;
    Ok(Json(ReportResponse {
        generated_at: Utc::now(),
        projects,
    }))
}

pub async fn export_csv(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Response, ServerError> {
    let rows = rows(&state, &user).await?;
    let body = to_csv(&rows).map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"report.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

fn to_csv(rows: &[ReportRow]) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.name.as_str(),
            row.duration.as_str(),
            row.description.as_str(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
