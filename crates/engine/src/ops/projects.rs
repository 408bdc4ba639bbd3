use chrono::Utc;
use sea_orm::{ActiveModelTrait, TransactionTrait};
use uuid::Uuid;

use crate::{
    Donation, EngineError, Fundable, Project, ProjectNew, ProjectUpdate, ResultEngine, projects,
    repository::Repository,
    util::{normalize_project_name, normalize_required_text},
};

use super::{Engine, run_sweep, with_tx, with_write_tx};

impl Engine {
    /// Return a project snapshot from DB.
    pub async fn project(&self, project_id: Uuid) -> ResultEngine<Project> {
        with_tx!(self, |db_tx| {
            Repository::<Project>::new(&db_tx).require(project_id).await
        })
    }

    /// Every project, oldest first.
    pub async fn projects(&self) -> ResultEngine<Vec<Project>> {
        with_tx!(self, |db_tx| { Repository::<Project>::new(&db_tx).list().await })
    }

    /// Create a project and fund it with the open donations.
    ///
    /// Open donations are consumed oldest first. The returned project may
    /// already be fully invested.
    ///
    /// Authorization: superuser only.
    pub async fn new_project(&self, cmd: ProjectNew) -> ResultEngine<Project> {
        let name = normalize_project_name(&cmd.name)?;
        let description = normalize_required_text(&cmd.description, "project description")?;

        with_write_tx!(self, |db_tx| {
            let now = Utc::now();
            let mut project = Project::new(name, description, cmd.full_amount, now)?;

            self.require_superuser(&db_tx, &cmd.user_id).await?;
            self.ensure_project_name_free(&db_tx, &project.name, None)
                .await?;

            let project_model: projects::ActiveModel = (&project).into();
            project_model.insert(&db_tx).await?;

            let sweep = run_sweep::<Donation, Project>(&db_tx, &mut project, now).await?;
            tracing::info!(
                project = %project.id,
                name = %project.name,
                full_amount = project.target_amount(),
                invested_amount = project.invested_amount(),
                donations_used = sweep.touched.len(),
                "project created"
            );
            Ok(project)
        })
    }

    /// Edit an open project.
    ///
    /// The project must not be closed, a new name must not belong to another
    /// project and a new `full_amount` cannot go below what was already
    /// invested. Setting `full_amount` exactly to the invested amount closes
    /// the project.
    ///
    /// Authorization: superuser only.
    pub async fn update_project(
        &self,
        project_id: Uuid,
        cmd: ProjectUpdate,
    ) -> ResultEngine<Project> {
        let name = cmd
            .name
            .as_deref()
            .map(normalize_project_name)
            .transpose()?;
        let description = cmd
            .description
            .as_deref()
            .map(|value| normalize_required_text(value, "project description"))
            .transpose()?;

        with_write_tx!(self, |db_tx| {
            self.require_superuser(&db_tx, &cmd.user_id).await?;
            let mut project = Repository::<Project>::new(&db_tx)
                .require(project_id)
                .await?;
            if project.closed_at().is_some() {
                return Err(EngineError::ProjectClosed(project.name));
            }

            if let Some(name) = name {
                self.ensure_project_name_free(&db_tx, &name, Some(project_id))
                    .await?;
                project.name = name;
            }
            if let Some(description) = description {
                project.description = description;
            }
            if let Some(full_amount) = cmd.full_amount {
                project.funding.set_target(full_amount)?;
                if project.remaining() == 0 {
                    project.close(Utc::now());
                }
            }

            let project_model: projects::ActiveModel = (&project).into();
            project_model.update(&db_tx).await?;
            tracing::info!(project = %project.id, closed = project.is_fulfilled(), "project updated");
            Ok(project)
        })
    }

    /// Delete a project that never received money.
    ///
    /// Authorization: superuser only.
    pub async fn delete_project(&self, project_id: Uuid, user_id: &str) -> ResultEngine<Project> {
        with_write_tx!(self, |db_tx| {
            self.require_superuser(&db_tx, user_id).await?;
            let repo = Repository::<Project>::new(&db_tx);
            let project = repo.require(project_id).await?;
            if project.invested_amount() > 0 {
                return Err(EngineError::ProjectInvested(project.name));
            }
            repo.delete(project_id).await?;
            tracing::info!(project = %project.id, name = %project.name, "project deleted");
            Ok(project)
        })
    }
}
