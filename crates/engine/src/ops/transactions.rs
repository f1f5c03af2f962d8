use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTransaction, ResultEngine, Transaction, TransactionFilter, TransactionPatch,
    TransactionQuery, transactions,
    util::{ensure_non_negative, normalize_currency, normalize_optional_text, normalize_required_name},
};

use super::Engine;

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(window) = filter.window {
            self = self
                .filter(transactions::Column::OccurredAt.gte(window.start))
                .filter(transactions::Column::OccurredAt.lt(window.end));
        }
        if let Some(category) = &filter.category {
            self = self.filter(transactions::Column::Category.eq(category.as_str()));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        self
    }
}

impl Engine {
    /// Lists the owner's transactions matching `query`, newest first.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        query: TransactionQuery,
    ) -> ResultEngine<Vec<Transaction>> {
        let filter = query.validate()?;
        self.find_transactions(user_id, &filter).await
    }

    /// Same as [`Engine::list_transactions`] with an already validated filter.
    pub async fn find_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .apply_tx_filters(filter)
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Returns one transaction of the owner.
    pub async fn transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<Transaction> {
        Transaction::try_from(self.require_transaction(user_id, id).await?)
    }

    pub async fn create_transaction(
        &self,
        user_id: &str,
        new: NewTransaction,
    ) -> ResultEngine<Transaction> {
        ensure_non_negative(new.amount_minor, "amount")?;
        let now = Utc::now();
        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind: new.kind,
            amount: new.amount_minor.into(),
            currency: normalize_currency(new.currency.as_deref())?,
            category: normalize_required_name(&new.category, "category")?.into(),
            occurred_at: new.occurred_at.unwrap_or(now),
            description: normalize_optional_text(new.description.as_deref()),
            method: normalize_optional_text(new.method.as_deref()),
            status: normalize_optional_text(new.status.as_deref()),
            created_at: now,
            updated_at: now,
        };

        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;
        tracing::debug!(user_id, id = %tx.id, kind = tx.kind.as_str(), "transaction created");
        Ok(tx)
    }

    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        let model = self.require_transaction(user_id, id).await?;
        if patch.is_empty() {
            return Transaction::try_from(model);
        }

        let mut active: transactions::ActiveModel = model.into();
        if let Some(kind) = patch.kind {
            active.kind = ActiveValue::Set(kind.as_str().to_string());
        }
        if let Some(amount_minor) = patch.amount_minor {
            ensure_non_negative(amount_minor, "amount")?;
            active.amount_minor = ActiveValue::Set(amount_minor);
        }
        if let Some(currency) = patch.currency {
            active.currency = ActiveValue::Set(normalize_currency(Some(&currency))?);
        }
        if let Some(category) = patch.category {
            active.category = ActiveValue::Set(normalize_required_name(&category, "category")?);
        }
        if let Some(occurred_at) = patch.occurred_at {
            active.occurred_at = ActiveValue::Set(occurred_at);
        }
        if let Some(description) = patch.description {
            active.description = ActiveValue::Set(normalize_optional_text(Some(&description)));
        }
        if let Some(method) = patch.method {
            active.method = ActiveValue::Set(normalize_optional_text(Some(&method)));
        }
        if let Some(status) = patch.status {
            active.status = ActiveValue::Set(normalize_optional_text(Some(&status)));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        Transaction::try_from(active.update(&self.database).await?)
    }

    pub async fn delete_transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("transaction not exists".to_string()));
        }
        Ok(())
    }

    async fn require_transaction(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }
}
