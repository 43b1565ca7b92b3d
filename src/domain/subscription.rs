use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{shift_month, shift_year, Amounted, Categorized, Identifiable};
use crate::errors::ValidationError;

const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// How often a subscription charges. Closed set; unrecognized cycle
/// strings are rejected at parse time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    /// Next charge date after `from`. Month-based cycles clamp to the last
    /// valid day of the target month (Jan 31 -> Feb 29 -> Mar 29).
    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        match self {
            BillingCycle::Weekly => from + Duration::days(7),
            BillingCycle::Monthly => shift_month(from, 1),
            BillingCycle::Quarterly => shift_month(from, 3),
            BillingCycle::Yearly => shift_year(from, 1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillingCycle::Weekly => "Weekly",
            BillingCycle::Monthly => "Monthly",
            BillingCycle::Quarterly => "Quarterly",
            BillingCycle::Yearly => "Yearly",
        }
    }
}

impl FromStr for BillingCycle {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "weekly" => Ok(BillingCycle::Weekly),
            "monthly" => Ok(BillingCycle::Monthly),
            "quarterly" => Ok(BillingCycle::Quarterly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(ValidationError::UnknownBillingCycle(other.to_string())),
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a subscription's next charge relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

impl DueStatus {
    /// A charge is due soon when it falls within the next seven days,
    /// today included. Past-due charges are overdue, never due soon.
    pub fn classify(next_billing: NaiveDate, today: NaiveDate) -> DueStatus {
        if next_billing < today {
            return DueStatus::Overdue;
        }
        let due_cutoff = today + Duration::days(DUE_SOON_WINDOW_DAYS);
        if next_billing <= due_cutoff {
            DueStatus::DueSoon
        } else {
            DueStatus::Upcoming
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Overdue => "Overdue",
            DueStatus::DueSoon => "Due soon",
            DueStatus::Upcoming => "Upcoming",
        }
    }
}

/// A recurring charge. The stored `next_billing_date` is both the next
/// expected payment and the anchor for projecting the cycle after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub billing_cycle: BillingCycle,
    pub next_billing_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Creates a subscription. Fails when the trimmed name is empty or the
    /// amount is not strictly positive.
    pub fn new(
        name: impl Into<String>,
        amount: Decimal,
        billing_cycle: BillingCycle,
        next_billing_date: NaiveDate,
        category: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            amount,
            description: description.into(),
            category: category.into().trim().to_string(),
            billing_cycle,
            next_billing_date,
            created_at,
        })
    }

    /// The charge date one cycle after the stored one. Display-only
    /// projection; the stored date is never advanced automatically.
    pub fn following_billing_date(&self) -> NaiveDate {
        self.billing_cycle.next_date(self.next_billing_date)
    }

    pub fn due_status(&self, today: NaiveDate) -> DueStatus {
        DueStatus::classify(self.next_billing_date, today)
    }

    pub fn is_due_soon(&self, today: NaiveDate) -> bool {
        matches!(self.due_status(today), DueStatus::DueSoon)
    }
}

impl Identifiable for Subscription {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Subscription {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Categorized for Subscription {
    fn category(&self) -> &str {
        &self.category
    }
}
