use chrono::{TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    BudgetPeriod, BudgetStatus, Engine, EngineError, NewBudget, NewTransaction, PeriodQuery,
    TransactionKind,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.register_user("alice", "password").await.unwrap();
    engine.register_user("bob", "hunter2").await.unwrap();
    (engine, db)
}

async fn record(
    engine: &Engine,
    user: &str,
    kind: TransactionKind,
    cents: i64,
    category: &str,
    (month, day): (u32, u32),
) {
    engine
        .create_transaction(
            user,
            NewTransaction {
                kind,
                amount_minor: cents,
                currency: None,
                category: category.to_string(),
                occurred_at: Some(Utc.with_ymd_and_hms(2025, month, day, 12, 0, 0).unwrap()),
                description: None,
                method: None,
                status: None,
            },
        )
        .await
        .unwrap();
}

async fn monthly_budget(
    engine: &Engine,
    user: &str,
    category: &str,
    cents: i64,
    month: i64,
) -> uuid::Uuid {
    engine
        .create_budget(
            user,
            NewBudget {
                category: category.to_string(),
                amount_minor: cents,
                period: None,
                month: Some(month),
                year: Some(2025),
            },
        )
        .await
        .unwrap()
        .id
}

fn january() -> PeriodQuery {
    PeriodQuery::new(Some(1), Some(2025))
}

#[tokio::test]
async fn sync_near_limit() {
    let (engine, _db) = engine_with_db().await;
    let id = monthly_budget(&engine, "alice", "Food", 50_000, 1).await;
    record(&engine, "alice", TransactionKind::Expense, 30_000, "Food", (1, 5)).await;
    record(&engine, "alice", TransactionKind::Expense, 15_000, "Food", (1, 28)).await;
    // Not part of the spend: other category, income, other month, other owner.
    record(&engine, "alice", TransactionKind::Expense, 99_000, "Rent", (1, 2)).await;
    record(&engine, "alice", TransactionKind::Income, 70_000, "Food", (1, 3)).await;
    record(&engine, "alice", TransactionKind::Expense, 20_000, "Food", (2, 1)).await;
    record(&engine, "bob", TransactionKind::Expense, 40_000, "Food", (1, 6)).await;

    let report = engine.sync_budgets("alice", january()).await.unwrap();

    assert!(report.is_complete());
    assert_eq!((report.year, report.month), (2025, 1));
    assert_eq!(report.synced.len(), 1);
    assert_eq!(report.synced[0].id, id);
    assert_eq!(report.synced[0].spent.cents(), 45_000);
    assert_eq!(report.synced[0].status, BudgetStatus::NearLimit);

    let stored = engine.budget("alice", id).await.unwrap();
    assert_eq!(stored.spent.cents(), 45_000);
    assert_eq!(stored.status, BudgetStatus::NearLimit);
    assert_eq!(stored.amount.cents(), 50_000);
}

#[tokio::test]
async fn sync_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let id = monthly_budget(&engine, "alice", "Food", 10_000, 1).await;
    record(&engine, "alice", TransactionKind::Expense, 12_000, "Food", (1, 5)).await;

    let first = engine.sync_budgets("alice", january()).await.unwrap();
    let second = engine.sync_budgets("alice", january()).await.unwrap();

    assert_eq!(first, second);
    let stored = engine.budget("alice", id).await.unwrap();
    assert_eq!(stored.spent.cents(), 12_000);
    assert_eq!(stored.status, BudgetStatus::OverBudget);
}

#[tokio::test]
async fn sync_tiers_at_boundaries() {
    let (engine, _db) = engine_with_db().await;
    let on_track = monthly_budget(&engine, "alice", "Books", 10_000, 1).await;
    let near = monthly_budget(&engine, "alice", "Food", 10_000, 1).await;
    let over = monthly_budget(&engine, "alice", "Games", 10_000, 1).await;
    let empty = monthly_budget(&engine, "alice", "Travel", 10_000, 1).await;
    let zero = monthly_budget(&engine, "alice", "Zero", 0, 1).await;
    record(&engine, "alice", TransactionKind::Expense, 7_999, "Books", (1, 5)).await;
    record(&engine, "alice", TransactionKind::Expense, 8_000, "Food", (1, 5)).await;
    record(&engine, "alice", TransactionKind::Expense, 10_000, "Games", (1, 5)).await;

    engine.sync_budgets("alice", january()).await.unwrap();

    for (id, expected) in [
        (on_track, BudgetStatus::OnTrack),
        (near, BudgetStatus::NearLimit),
        (over, BudgetStatus::OverBudget),
        (empty, BudgetStatus::OnTrack),
        (zero, BudgetStatus::OverBudget),
    ] {
        assert_eq!(engine.budget("alice", id).await.unwrap().status, expected);
    }
}

#[tokio::test]
async fn sync_only_touches_the_requested_month() {
    let (engine, _db) = engine_with_db().await;
    let january_id = monthly_budget(&engine, "alice", "Food", 10_000, 1).await;
    let february_id = monthly_budget(&engine, "alice", "Food", 10_000, 2).await;
    record(&engine, "alice", TransactionKind::Expense, 9_000, "Food", (1, 5)).await;
    record(&engine, "alice", TransactionKind::Expense, 2_000, "Food", (2, 5)).await;

    let report = engine.sync_budgets("alice", january()).await.unwrap();
    assert_eq!(report.synced.len(), 1);

    assert_eq!(engine.budget("alice", january_id).await.unwrap().spent.cents(), 9_000);
    assert!(engine.budget("alice", february_id).await.unwrap().spent.is_zero());
}

async fn yearly_budget(engine: &Engine, category: &str, cents: i64, month: i64) -> uuid::Uuid {
    engine
        .create_budget(
            "alice",
            NewBudget {
                category: category.to_string(),
                amount_minor: cents,
                period: Some(BudgetPeriod::Yearly),
                month: Some(month),
                year: Some(2025),
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn yearly_budget_counts_only_its_stored_month() {
    let (engine, _db) = engine_with_db().await;
    let food = yearly_budget(&engine, "Food", 100_000, 3).await;
    let rent = yearly_budget(&engine, "Rent", 100_000, 1).await;
    record(&engine, "alice", TransactionKind::Expense, 40_000, "Food", (1, 10)).await;
    record(&engine, "alice", TransactionKind::Expense, 10_000, "Food", (3, 10)).await;
    record(&engine, "alice", TransactionKind::Expense, 90_000, "Rent", (1, 2)).await;

    let march = PeriodQuery::new(Some(3), Some(2025));
    let report = engine.sync_budgets("alice", march).await.unwrap();

    let synced: Vec<_> = report.synced.iter().map(|entry| entry.id).collect();
    assert_eq!(synced, vec![food]);
    assert_eq!(report.synced[0].spent.cents(), 10_000);
    assert_eq!(report.synced[0].status, BudgetStatus::OnTrack);

    // The batch is exactly what the listing shows for the same period.
    let listed: Vec<_> = engine
        .list_budgets("alice", Some(march))
        .await
        .unwrap()
        .into_iter()
        .map(|budget| budget.id)
        .collect();
    assert_eq!(listed, synced);

    let stored = engine.budget("alice", food).await.unwrap();
    assert_eq!(stored.spent.cents(), 10_000);
    assert!(engine.budget("alice", rent).await.unwrap().spent.is_zero());
}

#[tokio::test]
async fn a_broken_budget_does_not_stop_the_batch() {
    let (engine, db) = engine_with_db().await;
    let food = monthly_budget(&engine, "alice", "Food", 10_000, 1).await;
    let broken = monthly_budget(&engine, "alice", "Broken", 10_000, 1).await;
    let rent = monthly_budget(&engine, "alice", "Rent", 10_000, 1).await;
    record(&engine, "alice", TransactionKind::Expense, 5_000, "Food", (1, 5)).await;
    record(&engine, "alice", TransactionKind::Expense, 11_000, "Rent", (1, 5)).await;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "UPDATE budgets SET status = 'bogus' WHERE category = 'Broken'".to_string(),
    ))
    .await
    .unwrap();

    let report = engine.sync_budgets("alice", january()).await.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, broken);
    let synced: Vec<_> = report.synced.iter().map(|entry| entry.id).collect();
    assert_eq!(synced, vec![food, rent]);

    assert_eq!(engine.budget("alice", food).await.unwrap().spent.cents(), 5_000);
    assert_eq!(
        engine.budget("alice", rent).await.unwrap().status,
        BudgetStatus::OverBudget
    );
}

#[tokio::test]
async fn sync_without_budgets_is_empty() {
    let (engine, _db) = engine_with_db().await;
    record(&engine, "alice", TransactionKind::Expense, 5_000, "Food", (1, 5)).await;

    let report = engine.sync_budgets("alice", january()).await.unwrap();
    assert!(report.synced.is_empty());
    assert!(report.is_complete());
}

#[tokio::test]
async fn budget_summary_totals() {
    let (engine, _db) = engine_with_db().await;
    monthly_budget(&engine, "alice", "Food", 50_000, 1).await;
    monthly_budget(&engine, "alice", "Rent", 120_000, 1).await;
    monthly_budget(&engine, "alice", "Fun", 30_000, 2).await;
    record(&engine, "alice", TransactionKind::Expense, 45_000, "Food", (1, 5)).await;
    record(&engine, "alice", TransactionKind::Expense, 125_000, "Rent", (1, 1)).await;
    engine.sync_budgets("alice", january()).await.unwrap();

    let summary = engine.budget_summary("alice", january()).await.unwrap();
    assert_eq!(summary.budget_count, 2);
    assert_eq!(summary.total_budget.cents(), 170_000);
    assert_eq!(summary.total_spent.cents(), 170_000);
    assert!(summary.remaining.is_zero());
}

#[tokio::test]
async fn a_budget_deleted_during_the_batch_is_not_found() {
    let (engine, db) = engine_with_db().await;
    let food = monthly_budget(&engine, "alice", "Food", 10_000, 1).await;
    let rent = monthly_budget(&engine, "alice", "Rent", 10_000, 1).await;
    record(&engine, "alice", TransactionKind::Expense, 5_000, "Food", (1, 5)).await;

    // Food is synced first; writing it removes Rent before Rent is written.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE TRIGGER drop_rent AFTER UPDATE ON budgets WHEN NEW.category = 'Food' \
         BEGIN DELETE FROM budgets WHERE category = 'Rent'; END"
            .to_string(),
    ))
    .await
    .unwrap();

    let report = engine.sync_budgets("alice", january()).await.unwrap();

    let synced: Vec<_> = report.synced.iter().map(|entry| entry.id).collect();
    assert_eq!(synced, vec![food]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, rent);
    assert!(
        report.failed[0].error.contains("not found"),
        "unexpected error: {}",
        report.failed[0].error
    );
    assert!(matches!(
        engine.budget("alice", rent).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn overflowing_spend_fails_only_that_budget() {
    let (engine, _db) = engine_with_db().await;
    let food = monthly_budget(&engine, "alice", "Food", 10_000, 1).await;
    let rent = monthly_budget(&engine, "alice", "Rent", 10_000, 1).await;
    let half = i64::MAX / 2 + 1;
    record(&engine, "alice", TransactionKind::Expense, half, "Food", (1, 5)).await;
    record(&engine, "alice", TransactionKind::Expense, half, "Food", (1, 6)).await;
    record(&engine, "alice", TransactionKind::Expense, 3_000, "Rent", (1, 5)).await;

    let report = engine.sync_budgets("alice", january()).await.unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, food);
    assert_eq!(report.synced.len(), 1);
    assert_eq!(report.synced[0].id, rent);
    let stored = engine.budget("alice", food).await.unwrap();
    assert!(stored.spent.is_zero());
    assert_eq!(stored.status, BudgetStatus::OnTrack);
}

#[tokio::test]
async fn overflowing_budget_summary_is_an_error() {
    let (engine, _db) = engine_with_db().await;
    monthly_budget(&engine, "alice", "Food", i64::MAX, 1).await;
    monthly_budget(&engine, "alice", "Rent", 1, 1).await;

    let err = engine.budget_summary("alice", january()).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}
