//! Pure reductions over transaction records.
//!
//! Nothing in here touches the store: callers fetch and filter the records
//! first, then hand the slice over. Empty input always produces zero sums and
//! empty lists. Sums that leave the `i64` range are reported as
//! [`crate::EngineError::InvalidAmount`] instead of wrapping.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::{Category, MoneyCents, ResultEngine, Transaction, TransactionKind, money};

/// Maximum number of entries returned by [`top_expenses`].
pub const TOP_EXPENSES_LIMIT: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncomeExpenseSummary {
    pub income: MoneyCents,
    pub expense: MoneyCents,
    /// `income - expense`, may be negative.
    pub balance: MoneyCents,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: MoneyCents,
    /// Share of the grand total in percent, one decimal.
    pub percentage: f64,
    pub color: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryBreakdown {
    pub categories: Vec<CategoryShare>,
    pub total: MoneyCents,
}

/// Income and expense totals of one calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub income: MoneyCents,
    pub expense: MoneyCents,
}

impl MonthBucket {
    /// Short label such as `Jan 2025`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{:04}-{:02}", self.year, self.month))
    }
}

/// Partition by kind and sum each side.
pub fn summarize(transactions: &[Transaction]) -> ResultEngine<IncomeExpenseSummary> {
    let (income, expense) = transactions.iter().try_fold(
        (MoneyCents::ZERO, MoneyCents::ZERO),
        |(income, expense), tx| -> ResultEngine<_> {
            Ok(match tx.kind {
                TransactionKind::Income => (money::add(income, tx.amount)?, expense),
                TransactionKind::Expense => (income, money::add(expense, tx.amount)?),
            })
        },
    )?;

    Ok(IncomeExpenseSummary {
        income,
        expense,
        balance: money::sub(income, expense)?,
    })
}

/// Group the transactions of `kind` by category.
///
/// Entries are sorted by amount, largest first; equal amounts are ordered by
/// category label.
pub fn category_breakdown(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> ResultEngine<CategoryBreakdown> {
    let mut totals: BTreeMap<&Category, MoneyCents> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.kind == kind) {
        let entry = totals.entry(&tx.category).or_default();
        *entry = money::add(*entry, tx.amount)?;
    }

    let total = money::sum(totals.values().copied())?;
    let mut categories: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.clone(),
            amount,
            percentage: amount.percentage_of(total),
            color: category.color(),
        })
        .collect();
    // Stable sort keeps the label order of the BTreeMap for ties.
    categories.sort_by(|a, b| b.amount.cmp(&a.amount));

    Ok(CategoryBreakdown { categories, total })
}

/// The [`TOP_EXPENSES_LIMIT`] largest expense categories.
///
/// Percentages are relative to all expenses, not only to the returned ones.
pub fn top_expenses(transactions: &[Transaction]) -> ResultEngine<Vec<CategoryShare>> {
    let mut breakdown = category_breakdown(transactions, TransactionKind::Expense)?;
    breakdown.categories.truncate(TOP_EXPENSES_LIMIT);
    Ok(breakdown.categories)
}

/// Monthly income/expense buckets in chronological order.
///
/// Only the `months` most recent buckets are kept. Months without any
/// transaction do not produce a bucket.
pub fn monthly_flow(transactions: &[Transaction], months: usize) -> ResultEngine<Vec<MonthBucket>> {
    let mut buckets: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();
    for tx in transactions {
        let key = (tx.occurred_at.year(), tx.occurred_at.month());
        let bucket = buckets.entry(key).or_insert(MonthBucket {
            year: key.0,
            month: key.1,
            income: MoneyCents::ZERO,
            expense: MoneyCents::ZERO,
        });
        match tx.kind {
            TransactionKind::Income => bucket.income = money::add(bucket.income, tx.amount)?,
            TransactionKind::Expense => bucket.expense = money::add(bucket.expense, tx.amount)?,
        }
    }

    let skip = buckets.len().saturating_sub(months);
    Ok(buckets.into_values().skip(skip).collect())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::EngineError;

    fn tx(kind: TransactionKind, cents: i64, category: &str, year: i32, month: u32) -> Transaction {
        let at = Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap();
        Transaction {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            kind,
            amount: MoneyCents::new(cents),
            currency: "USD".to_string(),
            category: Category::from(category),
            occurred_at: at,
            description: None,
            method: None,
            status: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn january() -> Vec<Transaction> {
        vec![
            tx(TransactionKind::Expense, 125_000, "Rent", 2025, 1),
            tx(TransactionKind::Expense, 45_000, "Food", 2025, 1),
            tx(TransactionKind::Income, 300_000, "Salary", 2025, 1),
        ]
    }

    #[test]
    fn summary_of_january() {
        let summary = summarize(&january()).unwrap();
        assert_eq!(summary.income, MoneyCents::new(300_000));
        assert_eq!(summary.expense, MoneyCents::new(170_000));
        assert_eq!(summary.balance, MoneyCents::new(130_000));
    }

    #[test]
    fn summary_balance_can_go_negative() {
        let txs = vec![
            tx(TransactionKind::Income, 1_000, "Gift", 2025, 2),
            tx(TransactionKind::Expense, 2_500, "Food", 2025, 2),
        ];
        assert_eq!(summarize(&txs).unwrap().balance, MoneyCents::new(-1_500));
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(summarize(&[]).unwrap(), IncomeExpenseSummary::default());
        let breakdown = category_breakdown(&[], TransactionKind::Expense).unwrap();
        assert!(breakdown.categories.is_empty());
        assert_eq!(breakdown.total, MoneyCents::ZERO);
        assert!(top_expenses(&[]).unwrap().is_empty());
        assert!(monthly_flow(&[], 6).unwrap().is_empty());
    }

    #[test]
    fn expense_breakdown_of_january() {
        let breakdown = category_breakdown(&january(), TransactionKind::Expense).unwrap();
        assert_eq!(breakdown.total, MoneyCents::new(170_000));
        let got: Vec<(&str, i64, f64)> = breakdown
            .categories
            .iter()
            .map(|share| (share.category.as_str(), share.amount.cents(), share.percentage))
            .collect();
        assert_eq!(got, vec![("Rent", 125_000, 73.5), ("Food", 45_000, 26.5)]);
        for share in &breakdown.categories {
            assert_eq!(share.color, share.category.color());
        }
    }

    #[test]
    fn breakdown_merges_same_category() {
        let txs = vec![
            tx(TransactionKind::Expense, 1_000, "Food", 2025, 1),
            tx(TransactionKind::Expense, 2_000, "Food", 2025, 2),
            tx(TransactionKind::Expense, 1_000, "Fun", 2025, 2),
        ];
        let breakdown = category_breakdown(&txs, TransactionKind::Expense).unwrap();
        assert_eq!(breakdown.categories.len(), 2);
        assert_eq!(breakdown.categories[0].amount, MoneyCents::new(3_000));
        assert_eq!(breakdown.categories[0].percentage, 75.0);
    }

    #[test]
    fn percentages_add_up_to_one_hundred() {
        let txs = vec![
            tx(TransactionKind::Expense, 1_000, "A", 2025, 1),
            tx(TransactionKind::Expense, 1_000, "B", 2025, 1),
            tx(TransactionKind::Expense, 1_000, "C", 2025, 1),
        ];
        let sum: f64 = category_breakdown(&txs, TransactionKind::Expense)
            .unwrap()
            .categories
            .iter()
            .map(|share| share.percentage)
            .sum();
        assert!((sum - 100.0).abs() <= 0.2, "sum was {sum}");
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let txs = vec![
            tx(TransactionKind::Expense, 0, "A", 2025, 1),
            tx(TransactionKind::Expense, 0, "B", 2025, 1),
        ];
        let breakdown = category_breakdown(&txs, TransactionKind::Expense).unwrap();
        assert_eq!(breakdown.categories.len(), 2);
        assert!(breakdown.categories.iter().all(|share| share.percentage == 0.0));
    }

    #[test]
    fn top_expenses_keeps_the_eight_largest() {
        let txs: Vec<Transaction> = (1..=10)
            .map(|i| tx(TransactionKind::Expense, i * 100, &format!("cat{i:02}"), 2025, 1))
            .chain(std::iter::once(tx(
                TransactionKind::Income,
                1_000_000,
                "Salary",
                2025,
                1,
            )))
            .collect();
        let top = top_expenses(&txs).unwrap();
        assert_eq!(top.len(), TOP_EXPENSES_LIMIT);
        assert_eq!(top[0].category.as_str(), "cat10");
        assert_eq!(top[7].category.as_str(), "cat03");
        assert!(top.windows(2).all(|pair| pair[0].amount >= pair[1].amount));
    }

    #[test]
    fn monthly_flow_is_chronological() {
        let txs = vec![
            tx(TransactionKind::Expense, 500, "Food", 2025, 3),
            tx(TransactionKind::Income, 1_000, "Salary", 2024, 12),
            tx(TransactionKind::Income, 2_000, "Salary", 2025, 3),
            tx(TransactionKind::Expense, 300, "Food", 2025, 1),
        ];
        let flow = monthly_flow(&txs, 6).unwrap();
        let keys: Vec<(i32, u32)> = flow.iter().map(|b| (b.year, b.month)).collect();
        assert_eq!(keys, vec![(2024, 12), (2025, 1), (2025, 3)]);
        assert_eq!(flow[2].income, MoneyCents::new(2_000));
        assert_eq!(flow[2].expense, MoneyCents::new(500));
        assert_eq!(flow[0].label(), "Dec 2024");
    }

    #[test]
    fn monthly_flow_keeps_most_recent_buckets() {
        let txs: Vec<Transaction> = (1..=9)
            .map(|month| tx(TransactionKind::Expense, 100, "Food", 2025, month))
            .collect();
        let flow = monthly_flow(&txs, 6).unwrap();
        let months: Vec<u32> = flow.iter().map(|b| b.month).collect();
        assert_eq!(months, vec![4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn overflowing_sums_are_errors() {
        let half = i64::MAX / 2 + 1;
        let txs = vec![
            tx(TransactionKind::Expense, half, "Food", 2025, 1),
            tx(TransactionKind::Expense, half, "Food", 2025, 1),
        ];
        assert!(matches!(summarize(&txs), Err(EngineError::InvalidAmount(_))));
        assert!(matches!(
            category_breakdown(&txs, TransactionKind::Expense),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(top_expenses(&txs), Err(EngineError::InvalidAmount(_))));
        assert!(matches!(monthly_flow(&txs, 6), Err(EngineError::InvalidAmount(_))));

        // Two categories that fit on their own but not as a grand total.
        let split = vec![
            tx(TransactionKind::Expense, half, "Food", 2025, 1),
            tx(TransactionKind::Expense, half, "Rent", 2025, 1),
        ];
        assert!(matches!(
            category_breakdown(&split, TransactionKind::Expense),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn negative_balance_that_overflows_is_an_error() {
        let txs = vec![
            tx(TransactionKind::Income, -2, "Refund", 2025, 1),
            tx(TransactionKind::Expense, i64::MAX, "Rent", 2025, 1),
        ];
        assert!(matches!(summarize(&txs), Err(EngineError::InvalidAmount(_))));
    }
}
