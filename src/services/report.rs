//! Report service
//!
//! Stages one user's rows into a [`FinancialSnapshot`] so the analytics
//! layer can run without touching storage. The rows come from
//! [`LiveCache`]s subscribed to the repositories on first use, so a
//! long-lived service sees every later write without re-reading the tables.

use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use tracing::debug;

use crate::analytics::FinancialSnapshot;
use crate::error::FinsightResult;
use crate::models::{Budget, Category, Transaction, UserId};
use crate::storage::transactions::newest_first;
use crate::storage::{LiveCache, Storage};

struct LiveRows {
    transactions: Arc<LiveCache<Transaction>>,
    categories: Arc<LiveCache<Category>>,
    budgets: Arc<LiveCache<Budget>>,
}

impl LiveRows {
    fn subscribe(storage: &Storage, user_id: UserId) -> FinsightResult<Self> {
        let transactions = Arc::new(LiveCache::new(
            user_id,
            storage.transactions.get_for_user(user_id)?,
        ));
        let categories = Arc::new(LiveCache::new(
            user_id,
            storage.categories.get_for_user(user_id)?,
        ));
        let budgets = Arc::new(LiveCache::new(user_id, storage.budgets.get_for_user(user_id)?));

        storage.transactions.events().subscribe(transactions.clone());
        storage.categories.events().subscribe(categories.clone());
        storage.budgets.events().subscribe(budgets.clone());

        Ok(Self {
            transactions,
            categories,
            budgets,
        })
    }
}

pub struct ReportService<'a> {
    storage: &'a Storage,
    user_id: UserId,
    live: OnceLock<LiveRows>,
}

impl<'a> ReportService<'a> {
    pub fn new(storage: &'a Storage, user_id: UserId) -> Self {
        Self {
            storage,
            user_id,
            live: OnceLock::new(),
        }
    }

    fn live(&self) -> FinsightResult<&LiveRows> {
        if let Some(live) = self.live.get() {
            return Ok(live);
        }
        let rows = LiveRows::subscribe(self.storage, self.user_id)?;
        Ok(self.live.get_or_init(|| rows))
    }

    /// Everything the analytics need, as of `today`
    pub fn snapshot(&self, today: NaiveDate, insight_limit: usize) -> FinsightResult<FinancialSnapshot> {
        let live = self.live()?;

        let mut transactions = live.transactions.rows();
        newest_first(&mut transactions);
        let mut categories = live.categories.rows();
        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        let mut budgets = live.budgets.rows();
        budgets.sort_by(|a, b| b.month.cmp(&a.month));

        debug!(
            transactions = transactions.len(),
            categories = categories.len(),
            budgets = budgets.len(),
            "snapshot staged"
        );

        Ok(FinancialSnapshot::new(transactions, categories, budgets, today)
            .with_insight_limit(insight_limit))
    }
}
