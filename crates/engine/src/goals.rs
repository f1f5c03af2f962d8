//! Savings goals.
//!
//! A goal's status is set by its owner; nothing derives it from the current
//! amount.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

pub const DEFAULT_GOAL_COLOR: &str = "#8470FF";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Canceled,
    Finished,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Canceled => "canceled",
            Self::Finished => "finished",
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "not started" => Ok(Self::NotStarted),
            "in progress" => Ok(Self::InProgress),
            "canceled" => Ok(Self::Canceled),
            "finished" => Ok(Self::Finished),
            other => Err(EngineError::InvalidName(format!(
                "invalid goal status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub target: MoneyCents,
    pub current: MoneyCents,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
    pub status: GoalStatus,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewGoal {
    pub name: String,
    pub target_minor: i64,
    pub current_minor: Option<i64>,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
    pub status: Option<GoalStatus>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target_minor: Option<i64>,
    pub current_minor: Option<i64>,
    pub deadline: Option<NaiveDate>,
    pub category: Option<String>,
    pub status: Option<GoalStatus>,
    pub color: Option<String>,
}

/// Number of goals in each status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GoalStatusCounts {
    pub not_started: usize,
    pub in_progress: usize,
    pub canceled: usize,
    pub finished: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GoalSummary {
    pub total: usize,
    /// Goals created during the current calendar year.
    pub this_year: usize,
    pub status_counts: GoalStatusCounts,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub deadline: Option<Date>,
    pub category: Option<String>,
    pub status: String,
    pub color: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id),
            user_id: ActiveValue::Set(goal.user_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_minor: ActiveValue::Set(goal.target.cents()),
            current_minor: ActiveValue::Set(goal.current.cents()),
            deadline: ActiveValue::Set(goal.deadline),
            category: ActiveValue::Set(goal.category.clone()),
            status: ActiveValue::Set(goal.status.as_str().to_string()),
            color: ActiveValue::Set(goal.color.clone()),
            created_at: ActiveValue::Set(goal.created_at),
            updated_at: ActiveValue::Set(goal.updated_at),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            target: MoneyCents::new(model.target_minor),
            current: MoneyCents::new(model.current_minor),
            deadline: model.deadline,
            category: model.category,
            status: GoalStatus::try_from(model.status.as_str())?,
            color: model.color,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
