use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Headcount and calendar figures shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_servidores: u64,
    pub ativos: u64,
    pub inativos: u64,
    /// Approved vacations covering today
    pub em_ferias_hoje: u64,
    /// Employees with a birthday in the current month
    pub aniversariantes_mes: u64,
    /// Admissions in the current calendar year
    pub admissoes_ano: u64,
}
