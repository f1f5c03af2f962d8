//! Goals API endpoints

use api_types::goal::{
    GoalNew, GoalStatus as ApiStatus, GoalStatusCountsView, GoalSummaryView, GoalUpdate,
    GoalView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_status(status: engine::GoalStatus) -> ApiStatus {
    match status {
        engine::GoalStatus::NotStarted => ApiStatus::NotStarted,
        engine::GoalStatus::InProgress => ApiStatus::InProgress,
        engine::GoalStatus::Canceled => ApiStatus::Canceled,
        engine::GoalStatus::Finished => ApiStatus::Finished,
    }
}

fn map_api_status(status: ApiStatus) -> engine::GoalStatus {
    match status {
        ApiStatus::NotStarted => engine::GoalStatus::NotStarted,
        ApiStatus::InProgress => engine::GoalStatus::InProgress,
        ApiStatus::Canceled => engine::GoalStatus::Canceled,
        ApiStatus::Finished => engine::GoalStatus::Finished,
    }
}

fn to_view(goal: engine::Goal) -> GoalView {
    GoalView {
        id: goal.id,
        name: goal.name,
        target_minor: goal.target.cents(),
        current_minor: goal.current.cents(),
        deadline: goal.deadline,
        category: goal.category,
        status: map_status(goal.status),
        color: goal.color,
        created_at: goal.created_at,
        updated_at: goal.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<GoalView>>, ServerError> {
    let goals = state.engine.list_goals(&user.username).await?;
    Ok(Json(goals.into_iter().map(to_view).collect()))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state
        .engine
        .create_goal(
            &user.username,
            engine::NewGoal {
                name: payload.name,
                target_minor: payload.target_minor,
                current_minor: payload.current_minor,
                deadline: payload.deadline,
                category: payload.category,
                status: payload.status.map(map_api_status),
                color: payload.color,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_view(goal))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state
        .engine
        .update_goal(
            &user.username,
            id,
            engine::GoalPatch {
                name: payload.name,
                target_minor: payload.target_minor,
                current_minor: payload.current_minor,
                deadline: payload.deadline,
                category: payload.category,
                status: payload.status.map(map_api_status),
                color: payload.color,
            },
        )
        .await?;

    Ok(Json(to_view(goal)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<GoalSummaryView>, ServerError> {
    let summary = state.engine.goal_summary(&user.username).await?;
    let counts = summary.status_counts;

    Ok(Json(GoalSummaryView {
        total: summary.total,
        this_year: summary.this_year,
        status_counts: GoalStatusCountsView {
            not_started: counts.not_started,
            in_progress: counts.in_progress,
            canceled: counts.canceled,
            finished: counts.finished,
        },
    }))
}
