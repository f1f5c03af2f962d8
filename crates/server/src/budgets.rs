//! Budgets API endpoints

use api_types::budget::{
    BudgetNew, BudgetPeriod as ApiPeriod, BudgetStatus as ApiStatus, BudgetSummaryView,
    BudgetSyncFailure, BudgetSyncResponse, BudgetSyncResult, BudgetUpdate, BudgetView,
    PeriodParams, TopExpenseView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use engine::PeriodQuery;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_period(period: engine::BudgetPeriod) -> ApiPeriod {
    match period {
        engine::BudgetPeriod::Monthly => ApiPeriod::Monthly,
        engine::BudgetPeriod::Yearly => ApiPeriod::Yearly,
    }
}

fn map_api_period(period: ApiPeriod) -> engine::BudgetPeriod {
    match period {
        ApiPeriod::Monthly => engine::BudgetPeriod::Monthly,
        ApiPeriod::Yearly => engine::BudgetPeriod::Yearly,
    }
}

fn map_status(status: engine::BudgetStatus) -> ApiStatus {
    match status {
        engine::BudgetStatus::OnTrack => ApiStatus::OnTrack,
        engine::BudgetStatus::NearLimit => ApiStatus::NearLimit,
        engine::BudgetStatus::OverBudget => ApiStatus::OverBudget,
    }
}

fn map_api_status(status: ApiStatus) -> engine::BudgetStatus {
    match status {
        ApiStatus::OnTrack => engine::BudgetStatus::OnTrack,
        ApiStatus::NearLimit => engine::BudgetStatus::NearLimit,
        ApiStatus::OverBudget => engine::BudgetStatus::OverBudget,
    }
}

fn to_view(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category: budget.category.to_string(),
        amount_minor: budget.amount.cents(),
        spent_minor: budget.spent.cents(),
        period: map_period(budget.period),
        month: budget.month,
        year: budget.year,
        status: map_status(budget.status),
        created_at: budget.created_at,
        updated_at: budget.updated_at,
    }
}

fn to_period(params: &PeriodParams) -> PeriodQuery {
    PeriodQuery::new(params.month, params.year)
}

/// Lists the caller's budgets, optionally restricted to one `(month, year)`.
pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let Query(params) = params?;
    let period = (params.month.is_some() || params.year.is_some()).then(|| to_period(&params));
    let budgets = state.engine.list_budgets(&user.username, period).await?;

    Ok(Json(budgets.into_iter().map(to_view).collect()))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .create_budget(
            &user.username,
            engine::NewBudget {
                category: payload.category,
                amount_minor: payload.amount_minor,
                period: payload.period.map(map_api_period),
                month: payload.month,
                year: payload.year,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_view(budget))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .update_budget(
            &user.username,
            id,
            engine::BudgetPatch {
                category: payload.category,
                amount_minor: payload.amount_minor,
                spent_minor: payload.spent_minor,
                period: payload.period.map(map_api_period),
                month: payload.month,
                year: payload.year,
                status: payload.status.map(map_api_status),
            },
        )
        .await?;

    Ok(Json(to_view(budget)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<BudgetSummaryView>, ServerError> {
    let Query(params) = params?;
    let summary = state
        .engine
        .budget_summary(&user.username, to_period(&params))
        .await?;

    Ok(Json(BudgetSummaryView {
        total_budget_minor: summary.total_budget.cents(),
        total_spent_minor: summary.total_spent.cents(),
        remaining_minor: summary.remaining.cents(),
        budget_count: summary.budget_count,
    }))
}

pub async fn top_expenses(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<Vec<TopExpenseView>>, ServerError> {
    let Query(params) = params?;
    let shares = state
        .engine
        .top_expenses(&user.username, to_period(&params))
        .await?;

    Ok(Json(
        shares
            .into_iter()
            .map(|share| TopExpenseView {
                category: share.category.to_string(),
                amount_minor: share.amount.cents(),
                percentage: share.percentage,
            })
            .collect(),
    ))
}

/// Recomputes spent and status of the month's budgets.
///
/// The body is optional; an empty body syncs the current month. Budgets that
/// fail are reported in `failed` and do not turn the response into an error.
pub async fn sync(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    payload: Option<Json<PeriodParams>>,
) -> Result<Json<BudgetSyncResponse>, ServerError> {
    let params = payload.map(|Json(params)| params).unwrap_or_default();
    let report = state
        .engine
        .sync_budgets(&user.username, to_period(&params))
        .await?;

    Ok(Json(BudgetSyncResponse {
        ok: report.is_complete(),
        year: report.year,
        month: report.month,
        results: report
            .synced
            .into_iter()
            .map(|entry| BudgetSyncResult {
                id: entry.id,
                category: entry.category.to_string(),
                spent_minor: entry.spent.cents(),
                status: map_status(entry.status),
            })
            .collect(),
        failed: report
            .failed
            .into_iter()
            .map(|failure| BudgetSyncFailure {
                id: failure.id,
                error: failure.error,
            })
            .collect(),
    }))
}
