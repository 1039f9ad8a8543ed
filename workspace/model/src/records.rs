//! Immutable value records the reporting engine works on.
//!
//! They are built from the sea-orm models by the store layer and flatten the
//! relations a report needs (an employee's city, a vacation's owner), so the
//! engine never touches live entities.

use chrono::NaiveDate;

use crate::entities::{endereco, ferias, servidor};

/// Categorical employee fields that can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeField {
    Status,
    Setor,
    Cargo,
    Cidade,
}

/// An employee as seen by reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: i32,
    pub nome: String,
    pub status: String,
    pub setor: Option<String>,
    pub cargo: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub data_admissao: Option<NaiveDate>,
    pub data_demissao: Option<NaiveDate>,
    /// City of the employee's address, if one is registered.
    pub cidade: Option<String>,
}

impl EmployeeRecord {
    pub fn from_entity(servidor: servidor::Model, endereco: Option<endereco::Model>) -> Self {
        Self {
            id: servidor.id,
            nome: servidor.nome,
            status: servidor.status,
            setor: servidor.setor,
            cargo: servidor.cargo,
            data_nascimento: servidor.data_nascimento,
            data_admissao: servidor.data_admissao,
            data_demissao: servidor.data_demissao,
            cidade: endereco.and_then(|e| e.cidade),
        }
    }

    /// Value of a categorical field, `None` when unset.
    pub fn field(&self, field: EmployeeField) -> Option<&str> {
        match field {
            EmployeeField::Status => Some(self.status.as_str()),
            EmployeeField::Setor => self.setor.as_deref(),
            EmployeeField::Cargo => self.cargo.as_deref(),
            EmployeeField::Cidade => self.cidade.as_deref(),
        }
    }
}

/// A vacation joined with the owning employee's name and sector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacationRecord {
    pub id: i32,
    pub servidor_id: i32,
    pub servidor_nome: Option<String>,
    pub setor: Option<String>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub dias: i32,
    pub ano_referencia: i32,
    pub status: String,
    pub observacoes: Option<String>,
}

impl VacationRecord {
    pub fn from_entity(ferias: ferias::Model, servidor: Option<&servidor::Model>) -> Self {
        Self {
            id: ferias.id,
            servidor_id: ferias.servidor_id,
            servidor_nome: servidor.map(|s| s.nome.clone()),
            setor: servidor.and_then(|s| s.setor.clone()),
            data_inicio: ferias.data_inicio,
            data_fim: ferias.data_fim,
            dias: ferias.dias,
            ano_referencia: ferias.ano_referencia,
            status: ferias.status,
            observacoes: ferias.observacoes,
        }
    }

    /// The stored `(data_inicio, data_fim)` pair, in stored order.
    pub fn span(&self) -> (NaiveDate, NaiveDate) {
        (self.data_inicio, self.data_fim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servidor(status: &str) -> servidor::Model {
        servidor::Model {
            id: 7,
            nome: "Ana Souza".to_string(),
            email: None,
            telefone: None,
            status: status.to_string(),
            setor: Some("RH".to_string()),
            cargo: None,
            data_nascimento: NaiveDate::from_ymd_opt(1990, 3, 15),
            data_admissao: None,
            data_demissao: None,
            foto: None,
        }
    }

    #[test]
    fn test_employee_record_takes_city_from_address() {
        let endereco = endereco::Model {
            id: 1,
            servidor_id: 7,
            logradouro: None,
            numero: None,
            complemento: None,
            bairro: None,
            cidade: Some("Recife".to_string()),
            estado: Some("PE".to_string()),
            cep: None,
            pais: endereco::PAIS_PADRAO.to_string(),
        };

        let record = EmployeeRecord::from_entity(servidor("ativo"), Some(endereco));

        assert_eq!(record.field(EmployeeField::Cidade), Some("Recife"));
        assert_eq!(record.field(EmployeeField::Setor), Some("RH"));
        assert_eq!(record.field(EmployeeField::Cargo), None);
    }

    #[test]
    fn test_status_is_kept_verbatim() {
        let record = EmployeeRecord::from_entity(servidor(" Inativo "), None);
        assert_eq!(record.field(EmployeeField::Status), Some(" Inativo "));
        assert_eq!(record.cidade, None);
    }

    #[test]
    fn test_vacation_record_without_owner() {
        let ferias = ferias::Model {
            id: 3,
            servidor_id: 7,
            data_inicio: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            data_fim: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            dias: 15,
            ano_referencia: 2024,
            status: ferias::STATUS_APROVADO.to_string(),
            observacoes: None,
        };

        let record = VacationRecord::from_entity(ferias, None);

        assert_eq!(record.servidor_nome, None);
        assert_eq!(record.status, ferias::STATUS_APROVADO);
        assert_eq!(
            record.span(),
            (
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
            )
        );
    }
}
