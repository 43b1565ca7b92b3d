use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::period::Period;
use crate::core::summary::{self, BalanceTotals, OverviewSummary};
use crate::domain::{Subscription, Transaction};
use crate::errors::Result;
use crate::storage::{SnapshotStore, SUBSCRIPTIONS_KEY, TRANSACTIONS_KEY};

/// Facade that owns both record collections and mirrors every mutation to
/// the snapshot store. The in-memory state is authoritative for the
/// session; snapshots are a write-through copy.
pub struct Tracker {
    transactions: Vec<Transaction>,
    subscriptions: Vec<Subscription>,
    store: Box<dyn SnapshotStore>,
}

impl Tracker {
    /// Loads both collections from the store. A missing or unreadable
    /// snapshot degrades that collection to empty; opening never fails.
    pub fn open(store: Box<dyn SnapshotStore>) -> Self {
        let transactions = load_collection(store.as_ref(), TRANSACTIONS_KEY);
        let subscriptions = load_collection(store.as_ref(), SUBSCRIPTIONS_KEY);
        debug!(
            "Tracker opened with {} transaction(s), {} subscription(s).",
            transactions.len(),
            subscriptions.len()
        );
        Self {
            transactions,
            subscriptions,
            store,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Appends a transaction and persists the collection. On a failed
    /// write the record stays in memory and the error is returned.
    pub fn add_transaction(&mut self, txn: Transaction) -> Result<Uuid> {
        let id = txn.id;
        self.transactions.push(txn);
        debug!("Added transaction {}.", id);
        self.persist_transactions()?;
        Ok(id)
    }

    /// Removes by id. `Ok(false)` when nothing matched; the store is only
    /// touched when a record was actually removed.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<bool> {
        let before = self.transactions.len();
        self.transactions.retain(|txn| txn.id != id);
        if self.transactions.len() == before {
            return Ok(false);
        }
        debug!("Removed transaction {}.", id);
        self.persist_transactions()?;
        Ok(true)
    }

    /// Appends a subscription and persists the collection.
    pub fn add_subscription(&mut self, sub: Subscription) -> Result<Uuid> {
        let id = sub.id;
        self.subscriptions.push(sub);
        debug!("Added subscription {}.", id);
        self.persist_subscriptions()?;
        Ok(id)
    }

    /// Removes by id. `Ok(false)` when nothing matched.
    pub fn remove_subscription(&mut self, id: Uuid) -> Result<bool> {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        if self.subscriptions.len() == before {
            return Ok(false);
        }
        debug!("Removed subscription {}.", id);
        self.persist_subscriptions()?;
        Ok(true)
    }

    /// Case-insensitive substring match on description or category,
    /// newest first. An empty query returns everything.
    pub fn search_transactions(&self, query: &str) -> Vec<&Transaction> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|txn| {
                needle.is_empty()
                    || txn.description.to_lowercase().contains(&needle)
                    || txn.category.to_lowercase().contains(&needle)
            })
            .collect();
        matches.sort_by(|a, b| b.date.cmp(&a.date));
        matches
    }

    /// Case-insensitive substring match on name or category, ordered by
    /// next billing date, soonest first.
    pub fn search_subscriptions(&self, query: &str) -> Vec<&Subscription> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<&Subscription> = self
            .subscriptions
            .iter()
            .filter(|sub| {
                needle.is_empty()
                    || sub.name.to_lowercase().contains(&needle)
                    || sub.category.to_lowercase().contains(&needle)
            })
            .collect();
        matches.sort_by(|a, b| a.next_billing_date.cmp(&b.next_billing_date));
        matches
    }

    /// Period summary over the current collections.
    pub fn summarize(&self, period: Period, now: DateTime<Utc>) -> OverviewSummary {
        summary::summarize(&self.transactions, &self.subscriptions, period, now)
    }

    /// All-time totals, no window applied.
    pub fn overall_totals(&self) -> BalanceTotals {
        BalanceTotals::overall(&self.transactions, &self.subscriptions)
    }

    fn persist_transactions(&self) -> Result<()> {
        persist_collection(self.store.as_ref(), TRANSACTIONS_KEY, &self.transactions)
    }

    fn persist_subscriptions(&self) -> Result<()> {
        persist_collection(self.store.as_ref(), SUBSCRIPTIONS_KEY, &self.subscriptions)
    }
}

fn load_collection<T: DeserializeOwned>(store: &dyn SnapshotStore, key: &str) -> Vec<T> {
    let payload = match store.read(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("Failed to read snapshot `{}`: {}. Starting empty.", key, err);
            return Vec::new();
        }
    };
    match serde_json::from_str(&payload) {
        Ok(records) => records,
        Err(err) => {
            warn!(
                "Discarding unparseable snapshot `{}`: {}. Starting empty.",
                key, err
            );
            Vec::new()
        }
    }
}

fn persist_collection<T: Serialize>(
    store: &dyn SnapshotStore,
    key: &str,
    records: &[T],
) -> Result<()> {
    let payload = serde_json::to_string_pretty(records)?;
    store.write(key, &payload)
}
