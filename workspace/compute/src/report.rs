//! Report Assembler.
//!
//! A report request is parsed once into a [`Report`] variant carrying exactly
//! the parameters that report needs. [`ReportAssembler::generate`] then
//! dispatches over the variants with a total `match`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use common::{
    AdmissionsTerminations, Birthday, EmployeeSummary, ReportData, ReportResult, ReportTypeInfo,
};
use model::entities::servidor;
use model::records::{EmployeeField, EmployeeRecord};

use crate::aggregate::{bucket_count, group_count, month_count, tally};
use crate::buckets::{AgeBucket, TenureBasis, TenureBucket, age_on, next_age, tenure_years};
use crate::error::{ReportError, Result};
use crate::store::{EmployeeQuery, RecordStore, VacationQuery};
use crate::window::{
    DateWindow, filter_contains, filter_month_of_year, filter_overlapping, validate_month,
    validate_year,
};

/// Closed set of report identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    ListaFuncionarios,
    FuncionariosPorSetor,
    FuncionariosPorStatus,
    FuncionariosPorCidade,
    FuncionariosPorCargo,
    FeriasPorMes,
    AniversariantesPorMes,
    AdmissoesDemissoes,
    FeriasPorSetor,
    IdadeFuncionarios,
    TempoServico,
}

impl ReportType {
    pub const ALL: [ReportType; 11] = [
        ReportType::ListaFuncionarios,
        ReportType::FuncionariosPorSetor,
        ReportType::FuncionariosPorStatus,
        ReportType::FuncionariosPorCidade,
        ReportType::FuncionariosPorCargo,
        ReportType::FeriasPorMes,
        ReportType::AniversariantesPorMes,
        ReportType::AdmissoesDemissoes,
        ReportType::FeriasPorSetor,
        ReportType::IdadeFuncionarios,
        ReportType::TempoServico,
    ];

    /// Identifier used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::ListaFuncionarios => "lista_funcionarios",
            ReportType::FuncionariosPorSetor => "funcionarios_por_setor",
            ReportType::FuncionariosPorStatus => "funcionarios_por_status",
            ReportType::FuncionariosPorCidade => "funcionarios_por_cidade",
            ReportType::FuncionariosPorCargo => "funcionarios_por_cargo",
            ReportType::FeriasPorMes => "ferias_por_mes",
            ReportType::AniversariantesPorMes => "aniversariantes_por_mes",
            ReportType::AdmissoesDemissoes => "admissoes_demissoes",
            ReportType::FeriasPorSetor => "ferias_por_setor",
            ReportType::IdadeFuncionarios => "idade_funcionarios",
            ReportType::TempoServico => "tempo_servico",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportType::ListaFuncionarios => "Lista de Funcionários",
            ReportType::FuncionariosPorSetor => "Funcionários por Setor",
            ReportType::FuncionariosPorStatus => "Funcionários por Status",
            ReportType::FuncionariosPorCidade => "Funcionários por Cidade",
            ReportType::FuncionariosPorCargo => "Funcionários por Cargo",
            ReportType::FeriasPorMes => "Férias por Mês",
            ReportType::AniversariantesPorMes => "Aniversariantes do Mês",
            ReportType::AdmissoesDemissoes => "Admissões e Demissões",
            ReportType::FeriasPorSetor => "Férias por Setor",
            ReportType::IdadeFuncionarios => "Faixa Etária dos Funcionários",
            ReportType::TempoServico => "Tempo de Serviço",
        }
    }

    /// Catalogue of every supported report.
    pub fn catalogue() -> Vec<ReportTypeInfo> {
        Self::ALL
            .iter()
            .map(|tipo| ReportTypeInfo {
                tipo: tipo.as_str().to_string(),
                titulo: tipo.title().to_string(),
            })
            .collect()
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|tipo| tipo.as_str() == s)
            .ok_or_else(|| ReportError::validation(format!("Unknown report type '{s}'")))
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw report query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportParams {
    pub mes: Option<u32>,
    pub ano: Option<i32>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}

/// A fully parameterized report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    EmployeeList,
    EmployeesBySector,
    EmployeesByStatus,
    EmployeesByCity,
    EmployeesByRole,
    VacationsByMonth { year: i32 },
    BirthdaysInMonth { month: u32 },
    AdmissionsTerminations { window: DateWindow },
    VacationsBySector { window: DateWindow },
    AgeDistribution,
    TenureDistribution,
}

impl Report {
    /// Builds the report from its identifier and raw parameters.
    ///
    /// `mes` and `ano` are validated whenever present. `ano` defaults to the
    /// year of `today`, `mes` to its month.
    pub fn from_request(tipo: ReportType, params: &ReportParams, today: NaiveDate) -> Result<Self> {
        let month = params.mes.map(validate_month).transpose()?;
        let year = params.ano.map(validate_year).transpose()?;
        let year = year.unwrap_or_else(|| today.year());

        let report = match tipo {
            ReportType::ListaFuncionarios => Report::EmployeeList,
            ReportType::FuncionariosPorSetor => Report::EmployeesBySector,
            ReportType::FuncionariosPorStatus => Report::EmployeesByStatus,
            ReportType::FuncionariosPorCidade => Report::EmployeesByCity,
            ReportType::FuncionariosPorCargo => Report::EmployeesByRole,
            ReportType::FeriasPorMes => Report::VacationsByMonth { year },
            ReportType::AniversariantesPorMes => Report::BirthdaysInMonth {
                month: month.unwrap_or_else(|| today.month()),
            },
            ReportType::AdmissoesDemissoes => Report::AdmissionsTerminations {
                window: requested_window(params, year)?,
            },
            ReportType::FeriasPorSetor => Report::VacationsBySector {
                window: requested_window(params, year)?,
            },
            ReportType::IdadeFuncionarios => Report::AgeDistribution,
            ReportType::TempoServico => Report::TenureDistribution,
        };
        Ok(report)
    }

    pub fn report_type(&self) -> ReportType {
        match self {
            Report::EmployeeList => ReportType::ListaFuncionarios,
            Report::EmployeesBySector => ReportType::FuncionariosPorSetor,
            Report::EmployeesByStatus => ReportType::FuncionariosPorStatus,
            Report::EmployeesByCity => ReportType::FuncionariosPorCidade,
            Report::EmployeesByRole => ReportType::FuncionariosPorCargo,
            Report::VacationsByMonth { .. } => ReportType::FeriasPorMes,
            Report::BirthdaysInMonth { .. } => ReportType::AniversariantesPorMes,
            Report::AdmissionsTerminations { .. } => ReportType::AdmissoesDemissoes,
            Report::VacationsBySector { .. } => ReportType::FeriasPorSetor,
            Report::AgeDistribution => ReportType::IdadeFuncionarios,
            Report::TenureDistribution => ReportType::TempoServico,
        }
    }
}

/// Explicit range when both bounds are given, otherwise the whole year.
fn requested_window(params: &ReportParams, year: i32) -> Result<DateWindow> {
    match (params.data_inicio, params.data_fim) {
        (Some(start), Some(end)) => DateWindow::new(start, end),
        (None, None) => DateWindow::year(year),
        _ => Err(ReportError::validation(
            "data_inicio and data_fim must be provided together",
        )),
    }
}

/// Runs reports against a [`RecordStore`] as of a reference date.
pub struct ReportAssembler<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    today: NaiveDate,
    tenure_basis: TenureBasis,
}

impl<'a, S: RecordStore + ?Sized> ReportAssembler<'a, S> {
    pub fn new(store: &'a S, today: NaiveDate) -> Self {
        Self {
            store,
            today,
            tenure_basis: TenureBasis::default(),
        }
    }

    pub fn with_tenure_basis(mut self, tenure_basis: TenureBasis) -> Self {
        self.tenure_basis = tenure_basis;
        self
    }

    /// Generates a report. A store error aborts the whole report.
    #[instrument(skip(self), fields(today = %self.today))]
    pub async fn generate(&self, report: Report) -> Result<ReportResult> {
        let tipo = report.report_type();
        debug!("Generating report {}", tipo);

        let data = match report {
            Report::EmployeeList => ReportData::Employees(self.employee_list().await?),
            Report::EmployeesBySector => ReportData::Rows(self.by_field(EmployeeField::Setor).await?),
            Report::EmployeesByStatus => ReportData::Rows(self.by_field(EmployeeField::Status).await?),
            Report::EmployeesByCity => ReportData::Rows(self.by_field(EmployeeField::Cidade).await?),
            Report::EmployeesByRole => ReportData::Rows(self.by_field(EmployeeField::Cargo).await?),
            Report::VacationsByMonth { year } => {
                let vacations = self.store.find_vacations(&VacationQuery::all()).await?;
                ReportData::Months(month_count(year, &vacations)?)
            }
            Report::BirthdaysInMonth { month } => ReportData::Birthdays(self.birthdays(month).await?),
            Report::AdmissionsTerminations { window } => {
                ReportData::AdmissionsTerminations(self.admissions_terminations(window).await?)
            }
            Report::VacationsBySector { window } => {
                let vacations = self.store.find_vacations(&VacationQuery::all()).await?;
                let overlapping = filter_overlapping(&vacations, &window, |v| Some(v.span()));
                ReportData::Rows(group_count(overlapping.iter().map(|v| v.setor.as_deref())))
            }
            Report::AgeDistribution => {
                let employees = self.store.find_employees(&EmployeeQuery::all()).await?;
                let today = self.today;
                ReportData::Rows(bucket_count(
                    employees
                        .iter()
                        .filter_map(|e| e.data_nascimento)
                        .map(|birth| AgeBucket::from_value(age_on(birth, today))),
                ))
            }
            Report::TenureDistribution => {
                let employees = self.store.find_employees(&EmployeeQuery::all()).await?;
                let (today, basis) = (self.today, self.tenure_basis);
                ReportData::Rows(bucket_count(
                    employees
                        .iter()
                        .filter_map(|e| e.data_admissao)
                        .map(|admission| TenureBucket::from_value(tenure_years(admission, today, basis))),
                ))
            }
        };

        let result = ReportResult::new(tipo.title(), data, Utc::now());
        info!("Report {} generated with {} entries", tipo, result.total);
        Ok(result)
    }

    async fn employee_list(&self) -> Result<Vec<EmployeeSummary>> {
        let employees = self.store.find_employees(&EmployeeQuery::all()).await?;
        Ok(employees.into_iter().map(summary_of).collect())
    }

    async fn by_field(&self, field: EmployeeField) -> Result<Vec<common::AggregationRow>> {
        let counts = self
            .store
            .group_count_employees(field, &EmployeeQuery::all())
            .await?;
        Ok(tally(counts))
    }

    async fn birthdays(&self, month: u32) -> Result<Vec<Birthday>> {
        let employees = self.store.find_employees(&EmployeeQuery::all()).await?;
        let mut birthdays: Vec<Birthday> = filter_month_of_year(&employees, month, |e| e.data_nascimento)?
            .into_iter()
            .filter_map(|e| {
                let birth = e.data_nascimento?;
                Some(Birthday {
                    id: e.id,
                    nome: e.nome.clone(),
                    setor: e.setor.clone(),
                    data_nascimento: birth,
                    dia: birth.day(),
                    idade_a_completar: next_age(birth, self.today),
                })
            })
            .collect();
        birthdays.sort_by(|a, b| a.dia.cmp(&b.dia).then_with(|| a.nome.cmp(&b.nome)));
        Ok(birthdays)
    }

    async fn admissions_terminations(&self, window: DateWindow) -> Result<AdmissionsTerminations> {
        let employees = self.store.find_employees(&EmployeeQuery::all()).await?;
        let admissoes = filter_contains(&employees, &window, |e| e.data_admissao).len() as u64;

        let inactive = EmployeeQuery::with_status(servidor::STATUS_INATIVO);
        let terminated: Vec<&EmployeeRecord> = employees.iter().filter(|e| inactive.matches(e)).collect();
        let demissoes = filter_contains(&terminated, &window, |e| e.data_demissao).len() as u64;

        Ok(AdmissionsTerminations {
            inicio: window.start(),
            fim: window.end(),
            admissoes,
            demissoes,
        })
    }
}

fn summary_of(record: EmployeeRecord) -> EmployeeSummary {
    EmployeeSummary {
        id: record.id,
        nome: record.nome,
        status: record.status,
        setor: record.setor,
        cargo: record.cargo,
        cidade: record.cidade,
        data_nascimento: record.data_nascimento,
        data_admissao: record.data_admissao,
        data_demissao: record.data_demissao,
    }
}
