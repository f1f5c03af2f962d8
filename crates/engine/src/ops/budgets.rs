use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Budget, BudgetPatch, BudgetStatus, Category, EngineError, MoneyCents, NewBudget, PeriodQuery,
    ResultEngine, TransactionFilter, TransactionKind, aggregate, budgets,
    filter::{validate_month, validate_year},
    money,
    util::{ensure_non_negative, normalize_required_name},
};

use super::Engine;

/// Outcome of one budget in a sync batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetSyncEntry {
    pub id: Uuid,
    pub category: Category,
    pub spent: MoneyCents,
    pub status: BudgetStatus,
}

/// A budget that could not be synced. Its stored values are unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetSyncFailure {
    pub id: Uuid,
    pub error: String,
}

/// Result of [`Engine::sync_budgets`].
///
/// A failing budget never aborts the batch: it is listed in `failed` while
/// the others are still written.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetSyncReport {
    pub year: i32,
    pub month: u32,
    pub synced: Vec<BudgetSyncEntry>,
    pub failed: Vec<BudgetSyncFailure>,
}

impl BudgetSyncReport {
    /// `true` when every budget of the batch was synced.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Totals over the budgets of one month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BudgetSummary {
    pub total_budget: MoneyCents,
    pub total_spent: MoneyCents,
    pub remaining: MoneyCents,
    pub budget_count: usize,
}

impl Engine {
    /// Lists the owner's budgets ordered by category.
    ///
    /// With a period only the budgets stored for that `(month, year)` are
    /// returned.
    pub async fn list_budgets(
        &self,
        user_id: &str,
        period: Option<PeriodQuery>,
    ) -> ResultEngine<Vec<Budget>> {
        let mut query = budgets::Entity::find().filter(budgets::Column::UserId.eq(user_id));
        if let Some(period) = period {
            let (year, month) = period.resolve()?;
            query = query
                .filter(budgets::Column::Month.eq(month as i32))
                .filter(budgets::Column::Year.eq(year));
        }

        query
            .order_by_asc(budgets::Column::Category)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    pub async fn budget(&self, user_id: &str, id: Uuid) -> ResultEngine<Budget> {
        Budget::try_from(self.require_budget(user_id, id).await?)
    }

    /// Creates a budget with nothing spent yet. Month and year default to the
    /// current calendar month.
    pub async fn create_budget(&self, user_id: &str, new: NewBudget) -> ResultEngine<Budget> {
        ensure_non_negative(new.amount_minor, "budget amount")?;
        let (year, month) = PeriodQuery::new(new.month, new.year).resolve()?;
        let now = Utc::now();
        let budget = Budget {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            category: normalize_required_name(&new.category, "category")?.into(),
            amount: new.amount_minor.into(),
            spent: MoneyCents::ZERO,
            period: new.period.unwrap_or_default(),
            month,
            year,
            status: BudgetStatus::OnTrack,
            created_at: now,
            updated_at: now,
        };

        budgets::ActiveModel::from(&budget)
            .insert(&self.database)
            .await?;
        tracing::debug!(user_id, id = %budget.id, category = %budget.category, "budget created");
        Ok(budget)
    }

    pub async fn update_budget(
        &self,
        user_id: &str,
        id: Uuid,
        patch: BudgetPatch,
    ) -> ResultEngine<Budget> {
        let model = self.require_budget(user_id, id).await?;

        let mut active: budgets::ActiveModel = model.into();
        if let Some(category) = patch.category {
            active.category = ActiveValue::Set(normalize_required_name(&category, "category")?);
        }
        if let Some(amount_minor) = patch.amount_minor {
            ensure_non_negative(amount_minor, "budget amount")?;
            active.amount_minor = ActiveValue::Set(amount_minor);
        }
        if let Some(spent_minor) = patch.spent_minor {
            ensure_non_negative(spent_minor, "spent")?;
            active.spent_minor = ActiveValue::Set(spent_minor);
        }
        if let Some(period) = patch.period {
            active.period = ActiveValue::Set(period.as_str().to_string());
        }
        if let Some(month) = patch.month {
            active.month = ActiveValue::Set(validate_month(month)? as i32);
        }
        if let Some(year) = patch.year {
            active.year = ActiveValue::Set(validate_year(year)?);
        }
        if let Some(status) = patch.status {
            active.status = ActiveValue::Set(status.as_str().to_string());
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        Budget::try_from(active.update(&self.database).await?)
    }

    pub async fn delete_budget(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let result = budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(id))
            .filter(budgets::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        Ok(())
    }

    /// Sums ceilings and recorded spend over the budgets of one month.
    pub async fn budget_summary(
        &self,
        user_id: &str,
        period: PeriodQuery,
    ) -> ResultEngine<BudgetSummary> {
        let budgets = self.list_budgets(user_id, Some(period)).await?;
        let total_budget = money::sum(budgets.iter().map(|b| b.amount))?;
        let total_spent = money::sum(budgets.iter().map(|b| b.spent))?;

        Ok(BudgetSummary {
            total_budget,
            total_spent,
            remaining: money::sub(total_budget, total_spent)?,
            budget_count: budgets.len(),
        })
    }

    /// Recomputes `spent` and `status` of the owner's budgets for one month.
    ///
    /// The batch contains the budgets stored for `(month, year)`, whatever
    /// their period label, which is the same set [`Engine::list_budgets`]
    /// returns for that period. For each of them the expenses of the same
    /// category inside that month are summed and the status tier is derived
    /// from `spent / amount`. Budgets are written one by one; a failure is
    /// recorded in the report and the batch moves on.
    pub async fn sync_budgets(
        &self,
        user_id: &str,
        period: PeriodQuery,
    ) -> ResultEngine<BudgetSyncReport> {
        let (year, month) = period.resolve()?;

        let models = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::Month.eq(month as i32))
            .filter(budgets::Column::Year.eq(year))
            .order_by_asc(budgets::Column::Category)
            .all(&self.database)
            .await?;
        tracing::debug!(user_id, year, month, budgets = models.len(), "syncing budgets");

        let mut report = BudgetSyncReport {
            year,
            month,
            synced: Vec::with_capacity(models.len()),
            failed: Vec::new(),
        };
        for model in models {
            let id = model.id;
            match self.sync_budget(user_id, model).await {
                Ok(entry) => report.synced.push(entry),
                Err(err) => {
                    tracing::warn!(user_id, %id, "failed to sync budget: {err}");
                    report.failed.push(BudgetSyncFailure {
                        id,
                        error: err.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    async fn sync_budget(
        &self,
        user_id: &str,
        model: budgets::Model,
    ) -> ResultEngine<BudgetSyncEntry> {
        let budget = Budget::try_from(model)?;
        let filter = TransactionFilter {
            window: Some(budget.window()?),
            category: Some(budget.category.clone()),
            kind: Some(TransactionKind::Expense),
        };
        let expenses = self.find_transactions(user_id, &filter).await?;
        let spent = aggregate::summarize(&expenses)?.expense;
        let status = BudgetStatus::for_spend(spent, budget.amount);

        // Scoped to the owner; a budget deleted since the batch was read
        // matches no row.
        let result = budgets::Entity::update_many()
            .col_expr(budgets::Column::SpentMinor, Expr::value(spent.cents()))
            .col_expr(budgets::Column::Status, Expr::value(status.as_str()))
            .col_expr(budgets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(budgets::Column::Id.eq(budget.id))
            .filter(budgets::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        tracing::debug!(id = %budget.id, spent = %spent, status = status.as_str(), "budget synced");

        Ok(BudgetSyncEntry {
            id: budget.id,
            category: budget.category,
            spent,
            status,
        })
    }

    async fn require_budget(&self, user_id: &str, id: Uuid) -> ResultEngine<budgets::Model> {
        budgets::Entity::find_by_id(id)
            .filter(budgets::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))
    }
}
