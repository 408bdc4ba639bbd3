use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, projects, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Only superusers manage projects and read everybody's donations.
    pub(super) async fn require_superuser(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        let user = self.require_user(db, username).await?;
        if !user.is_superuser {
            return Err(EngineError::Forbidden(format!(
                "{username} is not a superuser"
            )));
        }
        Ok(user)
    }

    /// Fails if another project already uses `name`, ignoring case.
    pub(super) async fn ensure_project_name_free(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = projects::Entity::find()
            .filter(projects::Column::NameKey.eq(projects::name_key(name)));
        if let Some(id) = except {
            query = query.filter(projects::Column::Id.ne(id.to_string()));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(name.to_string()));
        }
        Ok(())
    }
}
