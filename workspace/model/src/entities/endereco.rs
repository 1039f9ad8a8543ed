use sea_orm::entity::prelude::*;

use super::servidor;

/// Country stored when an address is saved without one.
pub const PAIS_PADRAO: &str = "Brasil";

/// Postal address of an employee. At most one per employee.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "enderecos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub servidor_id: i32,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    #[sea_orm(default_value = "Brasil")]
    pub pais: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "servidor::Entity",
        from = "Column::ServidorId",
        to = "servidor::Column::Id",
        on_delete = "Cascade"
    )]
    Servidor,
}

impl Related<servidor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Servidor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
