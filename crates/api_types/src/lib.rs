use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Query string of `GET /transactions` and of the transaction reports.
    ///
    /// Every field is optional. `month` requires `year`; `year` alone selects
    /// the whole calendar year.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListParams {
        pub month: Option<i64>,
        pub year: Option<i64>,
        pub category: Option<String>,
        /// `income` or `expense`.
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub currency: String,
        pub category: String,
        pub occurred_at: DateTime<Utc>,
        pub description: Option<String>,
        pub method: Option<String>,
        pub status: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        /// ISO code, `USD` when omitted.
        pub currency: Option<String>,
        pub category: String,
        /// Defaults to the time of the request.
        pub occurred_at: Option<DateTime<Utc>>,
        pub description: Option<String>,
        pub method: Option<String>,
        pub status: Option<String>,
    }

    /// Partial update: omitted fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: Option<TransactionKind>,
        pub amount_minor: Option<i64>,
        pub currency: Option<String>,
        pub category: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
        pub description: Option<String>,
        pub method: Option<String>,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub income_minor: i64,
        pub expense_minor: i64,
        /// `income_minor - expense_minor`, may be negative.
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryShareView {
        pub name: String,
        pub amount_minor: i64,
        /// Percent of the total, one decimal.
        pub percentage: f64,
        /// `#RRGGBB`, stable for a given category name.
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryBreakdownView {
        pub categories: Vec<CategoryShareView>,
        pub total_minor: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MonthlyFlowParams {
        pub year: Option<i64>,
        /// Number of most recent months to return, 6 when omitted.
        pub months: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthFlowView {
        /// Display label such as `Jan 2025`.
        pub month: String,
        pub year: i32,
        pub month_number: u32,
        pub income_minor: i64,
        pub expense_minor: i64,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetPeriod {
        Monthly,
        Yearly,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum BudgetStatus {
        #[serde(rename = "on track")]
        OnTrack,
        #[serde(rename = "near limit")]
        NearLimit,
        #[serde(rename = "over budget")]
        OverBudget,
    }

    /// `month`/`year` pair used by the budget listing, the summaries and the
    /// sync request. Missing parts default to the current month.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PeriodParams {
        pub month: Option<i64>,
        pub year: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category: String,
        pub amount_minor: i64,
        pub spent_minor: i64,
        pub period: BudgetPeriod,
        pub month: u32,
        pub year: i32,
        pub status: BudgetStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: String,
        pub amount_minor: i64,
        pub period: Option<BudgetPeriod>,
        pub month: Option<i64>,
        pub year: Option<i64>,
    }

    /// Partial update. `spent_minor` and `status` may be edited directly;
    /// the next sync overwrites them.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub category: Option<String>,
        pub amount_minor: Option<i64>,
        pub spent_minor: Option<i64>,
        pub period: Option<BudgetPeriod>,
        pub month: Option<i64>,
        pub year: Option<i64>,
        pub status: Option<BudgetStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSummaryView {
        pub total_budget_minor: i64,
        pub total_spent_minor: i64,
        pub remaining_minor: i64,
        pub budget_count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TopExpenseView {
        pub category: String,
        pub amount_minor: i64,
        pub percentage: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSyncResult {
        pub id: Uuid,
        pub category: String,
        pub spent_minor: i64,
        pub status: BudgetStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSyncFailure {
        pub id: Uuid,
        pub error: String,
    }

    /// Outcome of a sync batch. `ok` is `false` when at least one budget
    /// failed; the listed `results` were written regardless.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSyncResponse {
        pub ok: bool,
        pub year: i32,
        pub month: u32,
        pub results: Vec<BudgetSyncResult>,
        pub failed: Vec<BudgetSyncFailure>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum GoalStatus {
        #[serde(rename = "not started")]
        NotStarted,
        #[serde(rename = "in progress")]
        InProgress,
        #[serde(rename = "canceled")]
        Canceled,
        #[serde(rename = "finished")]
        Finished,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_minor: i64,
        pub current_minor: i64,
        pub deadline: Option<NaiveDate>,
        pub category: Option<String>,
        pub status: GoalStatus,
        pub color: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_minor: i64,
        pub current_minor: Option<i64>,
        pub deadline: Option<NaiveDate>,
        pub category: Option<String>,
        pub status: Option<GoalStatus>,
        pub color: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub target_minor: Option<i64>,
        pub current_minor: Option<i64>,
        pub deadline: Option<NaiveDate>,
        pub category: Option<String>,
        pub status: Option<GoalStatus>,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalStatusCountsView {
        pub not_started: usize,
        pub in_progress: usize,
        pub canceled: usize,
        pub finished: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalSummaryView {
        pub total: usize,
        /// Goals created during the current calendar year.
        pub this_year: usize,
        pub status_counts: GoalStatusCountsView,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterUser {
        pub username: String,
        pub password: String,
    }
}
