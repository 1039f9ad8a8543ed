//! Root of the SeaORM entity modules for the HR administration backend.

pub mod endereco;
pub mod ferias;
pub mod servidor;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::endereco::Entity as Endereco;
    pub use super::ferias::Entity as Ferias;
    pub use super::servidor::Entity as Servidor;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys so cascades apply
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_servidor(db: &DatabaseConnection, nome: &str) -> Result<servidor::Model, DbErr> {
        servidor::ActiveModel {
            nome: Set(nome.to_string()),
            status: Set(servidor::STATUS_ATIVO.to_string()),
            setor: Set(Some("Financeiro".to_string())),
            data_nascimento: Set(NaiveDate::from_ymd_opt(1985, 7, 2)),
            data_admissao: Set(NaiveDate::from_ymd_opt(2015, 2, 1)),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let servidor = insert_servidor(&db, "Carlos Lima").await?;

        endereco::ActiveModel {
            servidor_id: Set(servidor.id),
            cidade: Set(Some("Curitiba".to_string())),
            pais: Set(endereco::PAIS_PADRAO.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        ferias::ActiveModel {
            servidor_id: Set(servidor.id),
            data_inicio: Set(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
            data_fim: Set(NaiveDate::from_ymd_opt(2024, 1, 24).unwrap()),
            dias: Set(15),
            ano_referencia: Set(2023),
            status: Set(ferias::STATUS_PROGRAMADAS.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let with_address = Servidor::find_by_id(servidor.id)
            .find_also_related(Endereco)
            .one(&db)
            .await?
            .expect("servidor should exist");
        assert_eq!(
            with_address.1.and_then(|e| e.cidade),
            Some("Curitiba".to_string())
        );

        let vacations = servidor.find_related(Ferias).all(&db).await?;
        assert_eq!(vacations.len(), 1);
        assert_eq!(vacations[0].dias, 15);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_servidor_cascades() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let servidor = insert_servidor(&db, "Beatriz Nunes").await?;
        let other = insert_servidor(&db, "Diego Alves").await?;

        for owner in [&servidor, &other] {
            ferias::ActiveModel {
                servidor_id: Set(owner.id),
                data_inicio: Set(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                data_fim: Set(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
                dias: Set(10),
                ano_referencia: Set(2024),
                status: Set(ferias::STATUS_PROGRAMADAS.to_string()),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }
        endereco::ActiveModel {
            servidor_id: Set(servidor.id),
            pais: Set(endereco::PAIS_PADRAO.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        Servidor::delete_by_id(servidor.id).exec(&db).await?;

        let remaining = Ferias::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].servidor_id, other.id);

        let addresses = Endereco::find()
            .filter(endereco::Column::ServidorId.eq(servidor.id))
            .count(&db)
            .await?;
        assert_eq!(addresses, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_user_email_is_unique() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let account = |email: &str| user::ActiveModel {
            nome: Set("Admin".to_string()),
            email: Set(email.to_string()),
            role: Set(user::UserRole::Admin),
            password_hash: Set("$argon2id$placeholder".to_string()),
            ativo: Set(true),
            ..Default::default()
        };

        account("admin@example.com").insert(&db).await?;
        let duplicate = account("admin@example.com").insert(&db).await;
        assert!(duplicate.is_err());

        let stored = User::find().one(&db).await?.expect("user should exist");
        assert_eq!(stored.role, user::UserRole::Admin);
        assert_eq!(stored.reset_token_hash, None);

        Ok(())
    }
}
