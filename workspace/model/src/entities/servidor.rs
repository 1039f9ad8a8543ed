use sea_orm::entity::prelude::*;

use super::{endereco, ferias};

/// Status value for an employee currently in service.
pub const STATUS_ATIVO: &str = "ativo";
/// Status value for a terminated employee.
pub const STATUS_INATIVO: &str = "inativo";

/// An employee ("servidor").
///
/// `status` is free text. Any value is accepted on write, and `data_demissao`
/// is only meaningful when the status is `inativo`, which is not enforced here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "servidores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    #[sea_orm(default_value = "ativo")]
    pub status: String,
    /// Organizational sector.
    pub setor: Option<String>,
    /// Role or title.
    pub cargo: Option<String>,
    pub data_nascimento: Option<Date>,
    pub data_admissao: Option<Date>,
    pub data_demissao: Option<Date>,
    /// Path of the uploaded photo, if any.
    pub foto: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::endereco::Entity")]
    Endereco,
    #[sea_orm(has_many = "super::ferias::Entity")]
    Ferias,
}

impl Related<endereco::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Endereco.def()
    }
}

impl Related<ferias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ferias.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
