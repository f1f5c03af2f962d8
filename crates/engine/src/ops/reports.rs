//! Report endpoints: store reads composed with the pure aggregations.

use crate::{
    CategoryBreakdown, CategoryShare, DateWindow, IncomeExpenseSummary, MonthBucket, PeriodQuery,
    ResultEngine, TransactionFilter, TransactionKind, TransactionQuery, aggregate,
    filter::{validate_flow_months, validate_year},
};

use super::Engine;

impl Engine {
    /// Income, expense and balance over the transactions matching `query`.
    pub async fn transaction_summary(
        &self,
        user_id: &str,
        query: TransactionQuery,
    ) -> ResultEngine<IncomeExpenseSummary> {
        let transactions = self.list_transactions(user_id, query).await?;
        aggregate::summarize(&transactions)
    }

    /// Per category totals of one kind (expenses unless `query.kind` says
    /// otherwise).
    pub async fn category_breakdown(
        &self,
        user_id: &str,
        query: TransactionQuery,
    ) -> ResultEngine<CategoryBreakdown> {
        let mut filter = query.validate()?;
        let kind = *filter.kind.get_or_insert(TransactionKind::Expense);
        let transactions = self.find_transactions(user_id, &filter).await?;
        aggregate::category_breakdown(&transactions, kind)
    }

    /// The largest expense categories of one month (current month by default).
    pub async fn top_expenses(
        &self,
        user_id: &str,
        period: PeriodQuery,
    ) -> ResultEngine<Vec<CategoryShare>> {
        let (year, month) = period.resolve()?;
        let filter = TransactionFilter {
            window: Some(DateWindow::month(year, month)?),
            kind: Some(TransactionKind::Expense),
            ..Default::default()
        };
        let transactions = self.find_transactions(user_id, &filter).await?;
        aggregate::top_expenses(&transactions)
    }

    /// Monthly income/expense buckets, optionally restricted to one year,
    /// keeping the `months` most recent ones (6 by default).
    pub async fn monthly_flow(
        &self,
        user_id: &str,
        year: Option<i64>,
        months: Option<i64>,
    ) -> ResultEngine<Vec<MonthBucket>> {
        let months = validate_flow_months(months)?;
        let window = year
            .map(|year| validate_year(year).and_then(DateWindow::year))
            .transpose()?;
        let filter = TransactionFilter {
            window,
            ..Default::default()
        };
        let transactions = self.find_transactions(user_id, &filter).await?;
        aggregate::monthly_flow(&transactions, months)
    }
}
