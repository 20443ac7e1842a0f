pub mod ledger_service;
pub mod report_service;

pub use ledger_service::{LedgerService, LedgerWarning};
pub use report_service::{BudgetLine, ReportService, Totals};
