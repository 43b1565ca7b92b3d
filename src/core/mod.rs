pub mod period;
pub mod store;
pub mod summary;

pub use period::Period;
pub use store::Tracker;
pub use summary::{summarize, BalanceTotals, BreakdownSlice, CategoryTotal, OverviewSummary};
