use sea_orm::entity::prelude::*;

use super::servidor;

/// Status assigned to a vacation when none is given.
pub const STATUS_PROGRAMADAS: &str = "programadas";
/// Status treated as approved (active) by the dashboard.
pub const STATUS_APROVADO: &str = "aprovado";

/// A vacation ("férias") period taken by one employee.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ferias")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub servidor_id: i32,
    pub data_inicio: Date,
    pub data_fim: Date,
    /// Number of vacation days.
    pub dias: i32,
    /// The service year this vacation refers to.
    pub ano_referencia: i32,
    #[sea_orm(default_value = "programadas")]
    pub status: String,
    pub observacoes: Option<String>,
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
