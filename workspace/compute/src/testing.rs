//! In-memory fixtures for engine tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DbErr;

use model::records::{EmployeeRecord, VacationRecord};

use crate::error::{ReportError, Result};
use crate::store::{EmployeeQuery, RecordStore, VacationQuery};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Store backed by plain vectors. `failing()` makes every call error.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub employees: Vec<EmployeeRecord>,
    pub vacations: Vec<VacationRecord>,
    pub fail: bool,
}

impl MemoryStore {
    pub fn new(employees: Vec<EmployeeRecord>, vacations: Vec<VacationRecord>) -> Self {
        Self {
            employees,
            vacations,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(ReportError::Database(DbErr::Custom(
                "connection refused".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_employees(&self, query: &EmployeeQuery) -> Result<Vec<EmployeeRecord>> {
        self.check()?;
        let mut found: Vec<EmployeeRecord> = self
            .employees
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.nome.cmp(&b.nome).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn count_employees(&self, query: &EmployeeQuery) -> Result<u64> {
        self.check()?;
        Ok(self.employees.iter().filter(|e| query.matches(e)).count() as u64)
    }

    async fn find_vacations(&self, query: &VacationQuery) -> Result<Vec<VacationRecord>> {
        self.check()?;
        Ok(self
            .vacations
            .iter()
            .filter(|v| query.matches(v))
            .cloned()
            .collect())
    }
}

pub struct EmployeeBuilder(EmployeeRecord);

pub fn employee(id: i32, nome: &str) -> EmployeeBuilder {
    EmployeeBuilder(EmployeeRecord {
        id,
        nome: nome.to_string(),
        status: "ativo".to_string(),
        setor: None,
        cargo: None,
        data_nascimento: None,
        data_admissao: None,
        data_demissao: None,
        cidade: None,
    })
}

impl EmployeeBuilder {
    pub fn status(mut self, status: &str) -> Self {
        self.0.status = status.to_string();
        self
    }

    pub fn setor(mut self, setor: &str) -> Self {
        self.0.setor = Some(setor.to_string());
        self
    }

    pub fn cargo(mut self, cargo: &str) -> Self {
        self.0.cargo = Some(cargo.to_string());
        self
    }

    pub fn cidade(mut self, cidade: &str) -> Self {
        self.0.cidade = Some(cidade.to_string());
        self
    }

    pub fn nascimento(mut self, y: i32, m: u32, d: u32) -> Self {
        self.0.data_nascimento = Some(date(y, m, d));
        self
    }

    pub fn admissao(mut self, y: i32, m: u32, d: u32) -> Self {
        self.0.data_admissao = Some(date(y, m, d));
        self
    }

    pub fn demissao(mut self, y: i32, m: u32, d: u32) -> Self {
        self.0.data_demissao = Some(date(y, m, d));
        self
    }

    pub fn build(self) -> EmployeeRecord {
        self.0
    }
}

pub struct VacationBuilder(VacationRecord);

pub fn vacation(
    id: i32,
    servidor_id: i32,
    inicio: (i32, u32, u32),
    fim: (i32, u32, u32),
) -> VacationBuilder {
    let data_inicio = date(inicio.0, inicio.1, inicio.2);
    let data_fim = date(fim.0, fim.1, fim.2);
    VacationBuilder(VacationRecord {
        id,
        servidor_id,
        servidor_nome: None,
        setor: None,
        data_inicio,
        data_fim,
        dias: ((data_fim - data_inicio).num_days() + 1) as i32,
        ano_referencia: inicio.0,
        status: "programadas".to_string(),
        observacoes: None,
    })
}

impl VacationBuilder {
    pub fn status(mut self, status: &str) -> Self {
        self.0.status = status.to_string();
        self
    }

    pub fn setor(mut self, setor: &str) -> Self {
        self.0.setor = Some(setor.to_string());
        self
    }

    pub fn build(self) -> VacationRecord {
        self.0
    }
}
