//! Domain core of the finance tracker.
//!
//! - the record store for transactions, budgets and goals ([`Engine`]),
//! - pure aggregations over transactions ([`aggregate`]),
//! - budget spend synchronization ([`Engine::sync_budgets`]),
//! - validation of caller supplied filters ([`filter`]).

pub use aggregate::{
    CategoryBreakdown, CategoryShare, IncomeExpenseSummary, MonthBucket, TOP_EXPENSES_LIMIT,
};
pub use budgets::{Budget, BudgetPatch, BudgetPeriod, BudgetStatus, NewBudget};
pub use category::{CATEGORY_PALETTE, Category};
pub use error::EngineError;
pub use filter::{PeriodQuery, TransactionFilter, TransactionQuery};
pub use goals::{
    DEFAULT_GOAL_COLOR, Goal, GoalPatch, GoalStatus, GoalStatusCounts, GoalSummary, NewGoal,
};
pub use money::MoneyCents;
pub use ops::{
    BudgetSummary, BudgetSyncEntry, BudgetSyncFailure, BudgetSyncReport, Engine, EngineBuilder,
};
pub use period::DateWindow;
pub use transactions::{
    DEFAULT_CURRENCY, NewTransaction, Transaction, TransactionKind, TransactionPatch,
};
pub use users::User;

pub mod aggregate;
mod budgets;
mod category;
mod error;
pub mod filter;
mod goals;
mod money;
mod ops;
mod period;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
