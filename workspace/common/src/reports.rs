use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One group of a field or bucket aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AggregationRow {
    /// Group key (field value or bucket label)
    pub chave: String,
    /// Number of records in the group
    pub total: u64,
}

impl AggregationRow {
    pub fn new(chave: impl Into<String>, total: u64) -> Self {
        Self {
            chave: chave.into(),
            total,
        }
    }
}

/// Count for one calendar month of a year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MonthlyCount {
    /// Month number (1-12)
    pub mes: u32,
    pub total: u64,
}

/// Employee line of the employee listing report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub id: i32,
    pub nome: String,
    pub status: String,
    pub setor: Option<String>,
    pub cargo: Option<String>,
    pub cidade: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub data_admissao: Option<NaiveDate>,
    pub data_demissao: Option<NaiveDate>,
}

/// Employee having a birthday in the queried month.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Birthday {
    pub id: i32,
    pub nome: String,
    pub setor: Option<String>,
    pub data_nascimento: NaiveDate,
    /// Day of the month of the birthday
    pub dia: u32,
    /// Current age plus one
    pub idade_a_completar: i32,
}

/// Admissions and terminations counted inside a date window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AdmissionsTerminations {
    /// First day of the window (inclusive)
    pub inicio: NaiveDate,
    /// Last day of the window (inclusive)
    pub fim: NaiveDate,
    pub admissoes: u64,
    pub demissoes: u64,
}

/// Payload of a generated report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum ReportData {
    Employees(Vec<EmployeeSummary>),
    Rows(Vec<AggregationRow>),
    Months(Vec<MonthlyCount>),
    Birthdays(Vec<Birthday>),
    AdmissionsTerminations(AdmissionsTerminations),
}

impl ReportData {
    /// Element count for sequences, `1` for a single object.
    pub fn total(&self) -> usize {
        match self {
            ReportData::Employees(items) => items.len(),
            ReportData::Rows(items) => items.len(),
            ReportData::Months(items) => items.len(),
            ReportData::Birthdays(items) => items.len(),
            ReportData::AdmissionsTerminations(_) => 1,
        }
    }
}

/// Titled report envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ReportResult {
    pub title: String,
    pub data: ReportData,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    pub total: usize,
}

impl ReportResult {
    pub fn new(title: impl Into<String>, data: ReportData, generated_at: DateTime<Utc>) -> Self {
        let total = data.total();
        Self {
            title: title.into(),
            data,
            generated_at,
            total,
        }
    }
}

/// Entry of the report catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ReportTypeInfo {
    /// Report-type identifier used in the URL
    pub tipo: String,
    pub titulo: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_total_counts_sequence_elements() {
        let data = ReportData::Rows(vec![
            AggregationRow::new("RH", 3),
            AggregationRow::new("TI", 1),
        ]);
        let result = ReportResult::new("Funcionários por Setor", data, Utc::now());
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_total_is_one_for_single_object() {
        let data = ReportData::AdmissionsTerminations(AdmissionsTerminations {
            inicio: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            fim: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            admissoes: 5,
            demissoes: 2,
        });
        let result = ReportResult::new("Admissões e Demissões", data, Utc::now());
        assert_eq!(result.total, 1);
    }

    #[test]
    fn test_envelope_serializes_generated_at_in_camel_case() {
        let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let result = ReportResult::new(
            "Férias por Mês",
            ReportData::Months(vec![MonthlyCount { mes: 1, total: 4 }]),
            generated_at,
        );

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["title"], "Férias por Mês");
        assert_eq!(json["total"], 1);
        assert_eq!(json["data"][0]["mes"], 1);
        assert_eq!(json["data"][0]["total"], 4);
        assert!(json.get("generatedAt").is_some());
        assert!(json.get("generated_at").is_none());
    }
}
