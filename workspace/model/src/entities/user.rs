use sea_orm::entity::prelude::*;

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Parses the wire name of a role.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// A login account of the administration backend.
///
/// `password_hash` and `reset_token_hash` must never leave the server; the
/// HTTP layer builds its responses by selecting fields explicitly.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: UserRole,
    pub password_hash: String,
    /// SHA-256 hex digest of the pending password-reset token.
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTimeUtc>,
    #[sea_orm(default_value = "true")]
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
