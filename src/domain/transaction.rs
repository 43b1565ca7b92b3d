use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Amounted, Categorized, Dated, Identifiable};
use crate::errors::ValidationError;

/// Direction of a money movement. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

/// A single recorded money movement. Records are immutable once created;
/// the only lifecycle operations are insertion and deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Creates a transaction dated at the given instant. Fails when the
    /// amount is not strictly positive.
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        category: impl Into<String>,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            description: description.into(),
            kind,
            category: category.into().trim().to_string(),
            date,
        })
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, TransactionKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Dated for Transaction {
    fn occurred_at(&self) -> DateTime<Utc> {
        self.date
    }
}

impl Categorized for Transaction {
    fn category(&self) -> &str {
        &self.category
    }
}
