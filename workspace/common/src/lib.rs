//! Transport-layer types shared between the reporting engine and the HTTP layer.

mod dashboard;
mod reports;

pub use dashboard::DashboardSummary;
pub use reports::{
    AdmissionsTerminations, AggregationRow, Birthday, EmployeeSummary, MonthlyCount, ReportData,
    ReportResult, ReportTypeInfo,
};
