use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, User, users, util::normalize_required_name};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a user. Usernames are unique.
    pub async fn register_user(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = normalize_required_name(username, "username")?;
        if password.trim().is_empty() {
            return Err(EngineError::InvalidName(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                Err(EngineError::ExistingKey(username.clone()))
            } else {
                let active = users::ActiveModel {
                    username: ActiveValue::Set(username.clone()),
                    password: ActiveValue::Set(password.to_string()),
                    created_at: ActiveValue::Set(Utc::now()),
                };
                active.insert(&db_tx).await?;
                tracing::info!(username = %username, "user registered");
                Ok(User { username })
            }
        })
    }

    /// Returns the user when both username and password match exactly.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        let user = users::Entity::find_by_id(username.to_string())
            .filter(users::Column::Password.eq(password))
            .one(&self.database)
            .await?;
        Ok(user.map(User::from))
    }
}
