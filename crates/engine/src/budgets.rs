//! Budget records and their status tiers.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, DateWindow, EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for BudgetPeriod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidName(format!(
                "invalid budget period: {other}"
            ))),
        }
    }
}

/// How close a budget is to its ceiling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[default]
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "on track",
            Self::NearLimit => "near limit",
            Self::OverBudget => "over budget",
        }
    }

    /// Tier implied by `spent / amount`.
    ///
    /// - `>= 1.0` is over budget,
    /// - `>= 0.8` is near limit,
    /// - anything lower is on track.
    ///
    /// A zero (or negative) ceiling saturates to over budget.
    pub fn for_spend(spent: MoneyCents, amount: MoneyCents) -> Self {
        if amount.cents() <= 0 {
            return Self::OverBudget;
        }
        if spent.reaches_fraction_of(amount, 1, 1) {
            Self::OverBudget
        } else if spent.reaches_fraction_of(amount, 8, 10) {
            Self::NearLimit
        } else {
            Self::OnTrack
        }
    }
}

impl TryFrom<&str> for BudgetStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "on track" => Ok(Self::OnTrack),
            "near limit" => Ok(Self::NearLimit),
            "over budget" => Ok(Self::OverBudget),
            other => Err(EngineError::InvalidName(format!(
                "invalid budget status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: String,
    pub category: Category,
    /// Ceiling.
    pub amount: MoneyCents,
    pub spent: MoneyCents,
    pub period: BudgetPeriod,
    pub month: u32,
    pub year: i32,
    pub status: BudgetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Instants whose expenses count against this budget: the stored
    /// `(month, year)`. The period is a label and does not widen it.
    pub fn window(&self) -> ResultEngine<DateWindow> {
        DateWindow::month(self.year, self.month)
    }
}

#[derive(Clone, Debug)]
pub struct NewBudget {
    pub category: String,
    pub amount_minor: i64,
    pub period: Option<BudgetPeriod>,
    /// Defaults to the current month.
    pub month: Option<i64>,
    /// Defaults to the current year.
    pub year: Option<i64>,
}

/// Partial update. `spent` and `status` may be edited directly; the next sync
/// overwrites them.
#[derive(Clone, Debug, Default)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub amount_minor: Option<i64>,
    pub spent_minor: Option<i64>,
    pub period: Option<BudgetPeriod>,
    pub month: Option<i64>,
    pub year: Option<i64>,
    pub status: Option<BudgetStatus>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub category: String,
    pub amount_minor: i64,
    pub spent_minor: i64,
    pub period: String,
    pub month: i32,
    pub year: i32,
    pub status: String,
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

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id),
            user_id: ActiveValue::Set(budget.user_id.clone()),
            category: ActiveValue::Set(budget.category.as_str().to_string()),
            amount_minor: ActiveValue::Set(budget.amount.cents()),
            spent_minor: ActiveValue::Set(budget.spent.cents()),
            period: ActiveValue::Set(budget.period.as_str().to_string()),
            month: ActiveValue::Set(budget.month as i32),
            year: ActiveValue::Set(budget.year),
            status: ActiveValue::Set(budget.status.as_str().to_string()),
            created_at: ActiveValue::Set(budget.created_at),
            updated_at: ActiveValue::Set(budget.updated_at),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let month = u32::try_from(model.month)
            .map_err(|_| EngineError::InvalidFilter(format!("invalid month {}", model.month)))?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            category: Category::from(model.category),
            amount: MoneyCents::new(model.amount_minor),
            spent: MoneyCents::new(model.spent_minor),
            period: BudgetPeriod::try_from(model.period.as_str())?,
            month,
            year: model.year,
            status: BudgetStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(spent: i64, amount: i64) -> BudgetStatus {
        BudgetStatus::for_spend(MoneyCents::new(spent), MoneyCents::new(amount))
    }

    #[test]
    fn status_boundaries() {
        assert_eq!(tier(79_999, 100_000), BudgetStatus::OnTrack);
        assert_eq!(tier(80_000, 100_000), BudgetStatus::NearLimit);
        assert_eq!(tier(99_900, 100_000), BudgetStatus::NearLimit);
        assert_eq!(tier(100_000, 100_000), BudgetStatus::OverBudget);
        assert_eq!(tier(150_000, 100_000), BudgetStatus::OverBudget);
    }

    #[test]
    fn nothing_spent_is_on_track() {
        assert_eq!(tier(0, 50_000), BudgetStatus::OnTrack);
    }

    #[test]
    fn zero_ceiling_saturates() {
        assert_eq!(tier(0, 0), BudgetStatus::OverBudget);
        assert_eq!(tier(1_000, 0), BudgetStatus::OverBudget);
    }

    #[test]
    fn yearly_budget_counts_its_stored_month() {
        let budget = Budget {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            category: Category::from("Travel"),
            amount: MoneyCents::new(100_000),
            spent: MoneyCents::ZERO,
            period: BudgetPeriod::Yearly,
            month: 6,
            year: 2025,
            status: BudgetStatus::OnTrack,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(budget.window().unwrap(), DateWindow::month(2025, 6).unwrap());
    }
}
