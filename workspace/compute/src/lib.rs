//! Reporting & Aggregation Engine.
//!
//! Reads employees and vacations through a [`store::RecordStore`], filters
//! them by date windows, buckets ages and tenures, and aggregates the result
//! into titled reports.

pub mod aggregate;
pub mod buckets;
pub mod dashboard;
pub mod error;
pub mod report;
pub mod store;
pub mod window;

#[cfg(test)]
mod testing;

pub use buckets::TenureBasis;
pub use error::{ReportError, Result};
pub use report::{Report, ReportAssembler, ReportParams, ReportType};
pub use store::{DbRecordStore, EmployeeQuery, RecordStore, VacationQuery};
pub use window::DateWindow;
