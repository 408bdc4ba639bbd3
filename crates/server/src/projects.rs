//! Charity project API endpoints

use api_types::project::{ProjectNew, ProjectUpdate, ProjectView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::Project;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(project: Project) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        description: project.description,
        full_amount: project.funding.target_amount,
        invested_amount: project.funding.invested_amount,
        fully_invested: project.funding.fully_invested,
        create_date: project.funding.created_at,
        close_date: project.funding.closed_at,
    }
}

/// List every project. No authentication needed.
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProjectView>>, ServerError> {
    let projects = state.engine.projects().await?;
    Ok(Json(projects.into_iter().map(view).collect()))
}

/// Handle requests for creating a new project
pub async fn project_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<Json<ProjectView>, ServerError> {
    let project = state
        .engine
        .new_project(engine::ProjectNew::new(
            user.username,
            payload.name,
            payload.description,
            payload.full_amount,
        ))
        .await?;

    Ok(Json(view(project)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<ProjectView>, ServerError> {
    let mut cmd = engine::ProjectUpdate::new(user.username);
    cmd.name = payload.name;
    cmd.description = payload.description;
    cmd.full_amount = payload.full_amount;
    if cmd.is_empty() {
        return Err(ServerError::Generic("nothing to update".to_string()));
    }

    let project = state.engine.update_project(project_id, cmd).await?;
    Ok(Json(view(project)))
}

/// Delete a project, returning it as it was.
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectView>, ServerError> {
    let project = state
        .engine
        .delete_project(project_id, &user.username)
        .await?;
    Ok(Json(view(project)))
}
