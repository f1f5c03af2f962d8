use chrono::{Datelike, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    DEFAULT_GOAL_COLOR, EngineError, Goal, GoalPatch, GoalStatus, GoalStatusCounts, GoalSummary,
    NewGoal, ResultEngine, goals,
    util::{ensure_non_negative, ensure_positive, normalize_optional_text, normalize_required_name},
};

use super::Engine;

impl Engine {
    /// Lists the owner's goals, most recently created first.
    pub async fn list_goals(&self, user_id: &str) -> ResultEngine<Vec<Goal>> {
        goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_desc(goals::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Goal::try_from)
            .collect()
    }

    pub async fn goal(&self, user_id: &str, id: Uuid) -> ResultEngine<Goal> {
        Goal::try_from(self.require_goal(user_id, id).await?)
    }

    pub async fn create_goal(&self, user_id: &str, new: NewGoal) -> ResultEngine<Goal> {
        ensure_positive(new.target_minor, "target amount")?;
        let current_minor = new.current_minor.unwrap_or(0);
        ensure_non_negative(current_minor, "current amount")?;

        let now = Utc::now();
        let goal = Goal {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: normalize_required_name(&new.name, "goal name")?,
            target: new.target_minor.into(),
            current: current_minor.into(),
            deadline: new.deadline,
            category: normalize_optional_text(new.category.as_deref()),
            status: new.status.unwrap_or_default(),
            color: normalize_optional_text(new.color.as_deref())
                .unwrap_or_else(|| DEFAULT_GOAL_COLOR.to_string()),
            created_at: now,
            updated_at: now,
        };

        goals::ActiveModel::from(&goal).insert(&self.database).await?;
        tracing::debug!(user_id, id = %goal.id, "goal created");
        Ok(goal)
    }

    pub async fn update_goal(
        &self,
        user_id: &str,
        id: Uuid,
        patch: GoalPatch,
    ) -> ResultEngine<Goal> {
        let model = self.require_goal(user_id, id).await?;

        let mut active: goals::ActiveModel = model.into();
        if let Some(name) = patch.name {
            active.name = ActiveValue::Set(normalize_required_name(&name, "goal name")?);
        }
        if let Some(target_minor) = patch.target_minor {
            ensure_positive(target_minor, "target amount")?;
            active.target_minor = ActiveValue::Set(target_minor);
        }
        if let Some(current_minor) = patch.current_minor {
            ensure_non_negative(current_minor, "current amount")?;
            active.current_minor = ActiveValue::Set(current_minor);
        }
        if let Some(deadline) = patch.deadline {
            active.deadline = ActiveValue::Set(Some(deadline));
        }
        if let Some(category) = patch.category {
            active.category = ActiveValue::Set(normalize_optional_text(Some(&category)));
        }
        if let Some(status) = patch.status {
            active.status = ActiveValue::Set(status.as_str().to_string());
        }
        if let Some(color) = patch.color {
            active.color = ActiveValue::Set(normalize_required_name(&color, "color")?);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        Goal::try_from(active.update(&self.database).await?)
    }

    pub async fn delete_goal(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let result = goals::Entity::delete_many()
            .filter(goals::Column::Id.eq(id))
            .filter(goals::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("goal not exists".to_string()));
        }
        Ok(())
    }

    /// Counts the owner's goals per status and those created this year.
    pub async fn goal_summary(&self, user_id: &str) -> ResultEngine<GoalSummary> {
        let goals = self.list_goals(user_id).await?;
        let current_year = Utc::now().year();

        let mut summary = GoalSummary {
            total: goals.len(),
            ..Default::default()
        };
        for goal in &goals {
            if goal.created_at.year() == current_year {
                summary.this_year += 1;
            }
            let counts: &mut GoalStatusCounts = &mut summary.status_counts;
            match goal.status {
                GoalStatus::NotStarted => counts.not_started += 1,
                GoalStatus::InProgress => counts.in_progress += 1,
                GoalStatus::Canceled => counts.canceled += 1,
                GoalStatus::Finished => counts.finished += 1,
            }
        }

        Ok(summary)
    }

    async fn require_goal(&self, user_id: &str, id: Uuid) -> ResultEngine<goals::Model> {
        goals::Entity::find_by_id(id)
            .filter(goals::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))
    }
}
