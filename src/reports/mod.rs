//! Reports
//!
//! Category breakdowns and monthly cash flow, each with a terminal
//! rendering and CSV export.

pub mod aggregator;
pub mod cash_flow;
pub mod category_summary;

pub use aggregator::ReportAggregator;
pub use cash_flow::{CashFlowReport, MonthlyFlow};
pub use category_summary::{CategoryReport, CategorySummary, ReportKind};
