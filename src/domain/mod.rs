pub mod common;
pub mod subscription;
pub mod transaction;

pub use common::{Amounted, Categorized, Dated, Identifiable};
pub use subscription::{BillingCycle, DueStatus, Subscription};
pub use transaction::{Transaction, TransactionKind};
