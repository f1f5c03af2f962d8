//! Transactions API endpoints

use api_types::transaction::{
    CategoryBreakdownView, CategoryShareView, MonthFlowView, MonthlyFlowParams, SummaryView,
    TransactionKind as ApiKind, TransactionListParams, TransactionNew, TransactionUpdate,
    TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn to_query(params: TransactionListParams) -> engine::TransactionQuery {
    engine::TransactionQuery {
        month: params.month,
        year: params.year,
        category: params.category,
        kind: params.kind,
    }
}

fn to_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount.cents(),
        currency: tx.currency,
        category: tx.category.to_string(),
        occurred_at: tx.occurred_at,
        description: tx.description,
        method: tx.method,
        status: tx.status,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

fn share_view(share: engine::CategoryShare) -> CategoryShareView {
    CategoryShareView {
        name: share.category.to_string(),
        amount_minor: share.amount.cents(),
        percentage: share.percentage,
        color: share.color.to_string(),
    }
}

/// Lists the caller's transactions, newest first.
pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    params: Result<Query<TransactionListParams>, QueryRejection>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let Query(params) = params?;
    let transactions = state
        .engine
        .list_transactions(&user.username, to_query(params))
        .await?;

    Ok(Json(transactions.into_iter().map(to_view).collect()))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .create_transaction(
            &user.username,
            engine::NewTransaction {
                kind: map_api_kind(payload.kind),
                amount_minor: payload.amount_minor,
                currency: payload.currency,
                category: payload.category,
                occurred_at: payload.occurred_at,
                description: payload.description,
                method: payload.method,
                status: payload.status,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_view(tx))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(
            &user.username,
            id,
            engine::TransactionPatch {
                kind: payload.kind.map(map_api_kind),
                amount_minor: payload.amount_minor,
                currency: payload.currency,
                category: payload.category,
                occurred_at: payload.occurred_at,
                description: payload.description,
                method: payload.method,
                status: payload.status,
            },
        )
        .await?;

    Ok(Json(to_view(tx)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    params: Result<Query<TransactionListParams>, QueryRejection>,
) -> Result<Json<SummaryView>, ServerError> {
    let Query(params) = params?;
    let summary = state
        .engine
        .transaction_summary(&user.username, to_query(params))
        .await?;

    Ok(Json(SummaryView {
        income_minor: summary.income.cents(),
        expense_minor: summary.expense.cents(),
        balance_minor: summary.balance.cents(),
    }))
}

/// Per category totals; `type` defaults to `expense`.
pub async fn breakdown(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    params: Result<Query<TransactionListParams>, QueryRejection>,
) -> Result<Json<CategoryBreakdownView>, ServerError> {
    let Query(params) = params?;
    let breakdown = state
        .engine
        .category_breakdown(&user.username, to_query(params))
        .await?;

    Ok(Json(CategoryBreakdownView {
        total_minor: breakdown.total.cents(),
        categories: breakdown.categories.into_iter().map(share_view).collect(),
    }))
}

pub async fn monthly_flow(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    params: Result<Query<MonthlyFlowParams>, QueryRejection>,
) -> Result<Json<Vec<MonthFlowView>>, ServerError> {
    let Query(params) = params?;
    let buckets = state
        .engine
        .monthly_flow(&user.username, params.year, params.months)
        .await?;

    Ok(Json(
        buckets
            .into_iter()
            .map(|bucket| MonthFlowView {
                month: bucket.label(),
                year: bucket.year,
                month_number: bucket.month,
                income_minor: bucket.income.cents(),
                expense_minor: bucket.expense.cents(),
            })
            .collect(),
    ))
}
