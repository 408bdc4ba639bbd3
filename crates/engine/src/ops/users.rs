use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users, util::normalize_required_text};

use super::{Engine, with_write_tx};

impl Engine {
    /// Register a user. Usernames are unique.
    pub async fn new_user(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
    ) -> ResultEngine<()> {
        let username = normalize_required_text(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::InvalidName(
                "password must not be empty".to_string(),
            ));
        }

        with_write_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }

            users::Entity::insert(users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password.to_string()),
                is_superuser: ActiveValue::Set(is_superuser),
            })
            .exec(&db_tx)
            .await?;

            tracing::info!(user = %username, is_superuser, "user created");
            Ok(())
        })
    }
}
