//! Record store access for the reporting engine.
//!
//! Reports only read through [`RecordStore`], so they can run against the
//! database or an in-memory fixture.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use tracing::{debug, instrument, trace};

use model::entities::{endereco, ferias, servidor};
use model::records::{EmployeeField, EmployeeRecord, VacationRecord};

use crate::error::Result;

/// Employee predicate. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeQuery {
    pub status: Option<String>,
    pub setor: Option<String>,
}

impl EmployeeQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        self.status.as_ref().is_none_or(|status| &record.status == status)
            && self
                .setor
                .as_ref()
                .is_none_or(|setor| record.setor.as_ref() == Some(setor))
    }
}

/// Vacation predicate. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacationQuery {
    pub servidor_id: Option<i32>,
    pub status: Option<String>,
}

impl VacationQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &VacationRecord) -> bool {
        self.servidor_id.is_none_or(|id| record.servidor_id == id)
            && self.status.as_ref().is_none_or(|status| &record.status == status)
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Employees matching `query`, ordered by name.
    async fn find_employees(&self, query: &EmployeeQuery) -> Result<Vec<EmployeeRecord>>;

    async fn count_employees(&self, query: &EmployeeQuery) -> Result<u64>;

    /// `(value, count)` per distinct value of `field` among matching employees.
    async fn group_count_employees(
        &self,
        field: EmployeeField,
        query: &EmployeeQuery,
    ) -> Result<Vec<(Option<String>, u64)>> {
        let records = self.find_employees(query).await?;
        let mut counts: Vec<(Option<String>, u64)> = Vec::new();
        for record in &records {
            let value = record.field(field).map(str::to_string);
            match counts.iter_mut().find(|(key, _)| *key == value) {
                Some((_, count)) => *count += 1,
                None => counts.push((value, 1)),
            }
        }
        Ok(counts)
    }

    /// Vacations matching `query`, ordered by start date, each joined with
    /// its owner's name and sector.
    async fn find_vacations(&self, query: &VacationQuery) -> Result<Vec<VacationRecord>>;
}

/// [`RecordStore`] over a sea-orm connection.
#[derive(Debug, Clone)]
pub struct DbRecordStore {
    db: DatabaseConnection,
}

impl DbRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn employee_select(query: &EmployeeQuery) -> Select<servidor::Entity> {
        let mut select = servidor::Entity::find();
        if let Some(status) = &query.status {
            select = select.filter(servidor::Column::Status.eq(status.as_str()));
        }
        if let Some(setor) = &query.setor {
            select = select.filter(servidor::Column::Setor.eq(setor.as_str()));
        }
        select
    }
}

#[async_trait]
impl RecordStore for DbRecordStore {
    #[instrument(skip(self))]
    async fn find_employees(&self, query: &EmployeeQuery) -> Result<Vec<EmployeeRecord>> {
        let rows = Self::employee_select(query)
            .order_by_asc(servidor::Column::Nome)
            .order_by_asc(servidor::Column::Id)
            .find_also_related(endereco::Entity)
            .all(&self.db)
            .await?;

        debug!("Loaded {} employees", rows.len());
        Ok(rows
            .into_iter()
            .map(|(servidor, endereco)| EmployeeRecord::from_entity(servidor, endereco))
            .collect())
    }

    #[instrument(skip(self))]
    async fn count_employees(&self, query: &EmployeeQuery) -> Result<u64> {
        let total = Self::employee_select(query).count(&self.db).await?;
        trace!("Counted {} employees", total);
        Ok(total)
    }

    /// Grouped in SQL. Groups come back in the order their first member
    /// appears in `find_employees`.
    #[instrument(skip(self))]
    async fn group_count_employees(
        &self,
        field: EmployeeField,
        query: &EmployeeQuery,
    ) -> Result<Vec<(Option<String>, u64)>> {
        let (column, needs_address) = match field {
            EmployeeField::Status => (Expr::col((servidor::Entity, servidor::Column::Status)), false),
            EmployeeField::Setor => (Expr::col((servidor::Entity, servidor::Column::Setor)), false),
            EmployeeField::Cargo => (Expr::col((servidor::Entity, servidor::Column::Cargo)), false),
            EmployeeField::Cidade => (Expr::col((endereco::Entity, endereco::Column::Cidade)), true),
        };
        let column = SimpleExpr::from(column);

        let mut select = Self::employee_select(query).select_only();
        if needs_address {
            select = select.join(JoinType::LeftJoin, servidor::Relation::Endereco.def());
        }

        let rows: Vec<(Option<String>, i64)> = select
            .column_as(column.clone(), "chave")
            .column_as(servidor::Column::Id.count(), "total")
            .group_by(column.clone())
            .order_by_asc(Expr::col((servidor::Entity, servidor::Column::Nome)).min())
            .order_by_asc(Expr::col((servidor::Entity, servidor::Column::Id)).min())
            .order_by_asc(column)
            .into_tuple()
            .all(&self.db)
            .await?;

        debug!("Grouped employees on {:?} into {} rows", field, rows.len());
        Ok(rows
            .into_iter()
            .map(|(value, count)| (value, u64::try_from(count).unwrap_or(0)))
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_vacations(&self, query: &VacationQuery) -> Result<Vec<VacationRecord>> {
        let mut select = ferias::Entity::find();
        if let Some(servidor_id) = query.servidor_id {
            select = select.filter(ferias::Column::ServidorId.eq(servidor_id));
        }
        if let Some(status) = &query.status {
            select = select.filter(ferias::Column::Status.eq(status.as_str()));
        }

        let rows = select
            .order_by_asc(ferias::Column::DataInicio)
            .order_by_asc(ferias::Column::Id)
            .find_also_related(servidor::Entity)
            .all(&self.db)
            .await?;

        debug!("Loaded {} vacations", rows.len());
        Ok(rows
            .into_iter()
            .map(|(ferias, servidor)| VacationRecord::from_entity(ferias, servidor.as_ref()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DbErr, Set};

    async fn setup_db() -> std::result::Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        Migrator::up(&db, None).await?;
        Ok(db)
    }

    async fn insert_servidor(
        db: &DatabaseConnection,
        nome: &str,
        status: &str,
        setor: Option<&str>,
        cidade: Option<&str>,
    ) -> servidor::Model {
        let servidor = servidor::ActiveModel {
            nome: Set(nome.to_string()),
            status: Set(status.to_string()),
            setor: Set(setor.map(str::to_string)),
            data_nascimento: Set(NaiveDate::from_ymd_opt(1990, 3, 15)),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert servidor");

        if let Some(cidade) = cidade {
            endereco::ActiveModel {
                servidor_id: Set(servidor.id),
                cidade: Set(Some(cidade.to_string())),
                pais: Set(endereco::PAIS_PADRAO.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await
            .expect("Failed to insert endereco");
        }
        servidor
    }

    #[tokio::test]
    async fn test_find_employees_joins_city_and_orders_by_name() {
        let db = setup_db().await.unwrap();
        insert_servidor(&db, "Carla", "ativo", Some("TI"), Some("Recife")).await;
        insert_servidor(&db, "Ana", "ativo", Some("RH"), None).await;
        insert_servidor(&db, "Bruno", "inativo", Some("TI"), Some("Olinda")).await;
        let store = DbRecordStore::new(db);

        let all = store.find_employees(&EmployeeQuery::all()).await.unwrap();
        let names: Vec<_> = all.iter().map(|e| e.nome.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
        assert_eq!(all[0].cidade, None);
        assert_eq!(all[2].cidade.as_deref(), Some("Recife"));

        let ativos = store
            .count_employees(&EmployeeQuery::with_status("ativo"))
            .await
            .unwrap();
        assert_eq!(ativos, 2);
    }

    #[tokio::test]
    async fn test_group_count_in_sql() {
        let db = setup_db().await.unwrap();
        insert_servidor(&db, "Ana", "ativo", Some("RH"), Some("Recife")).await;
        insert_servidor(&db, "Bruno", "ativo", Some("TI"), Some("Recife")).await;
        insert_servidor(&db, "Carla", "ativo", Some("TI"), None).await;
        let store = DbRecordStore::new(db);

        let setores = store
            .group_count_employees(EmployeeField::Setor, &EmployeeQuery::all())
            .await
            .unwrap();
        assert_eq!(
            setores,
            vec![(Some("RH".to_string()), 1), (Some("TI".to_string()), 2)]
        );

        let cidades = store
            .group_count_employees(EmployeeField::Cidade, &EmployeeQuery::all())
            .await
            .unwrap();
        let total: u64 = cidades.iter().map(|(_, count)| count).sum();
        assert_eq!(total, 3);
        assert!(cidades.contains(&(None, 1)));
        assert!(cidades.contains(&(Some("Recife".to_string()), 2)));
    }

    #[tokio::test]
    async fn test_sql_groups_follow_name_order() {
        let db = setup_db().await.unwrap();
        insert_servidor(&db, "Zeca", "ativo", Some("Almoxarifado"), None).await;
        insert_servidor(&db, "Ana", "ativo", Some("TI"), None).await;
        insert_servidor(&db, "Marta", "ativo", Some("RH"), None).await;
        let store = DbRecordStore::new(db);

        let grouped = store
            .group_count_employees(EmployeeField::Setor, &EmployeeQuery::all())
            .await
            .unwrap();
        let encountered: Vec<Option<String>> = store
            .find_employees(&EmployeeQuery::all())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.setor)
            .collect();

        let keys: Vec<Option<String>> = grouped.into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, encountered);
        assert_eq!(keys[0].as_deref(), Some("TI"));
    }

    #[tokio::test]
    async fn test_status_filter_is_exact() {
        let db = setup_db().await.unwrap();
        insert_servidor(&db, "Ana", "inativo", None, None).await;
        insert_servidor(&db, "Bruno", "Inativo", None, None).await;
        let store = DbRecordStore::new(db);

        let query = EmployeeQuery::with_status("inativo");
        assert_eq!(store.count_employees(&query).await.unwrap(), 1);
        let found = store.find_employees(&query).await.unwrap();
        assert!(found.iter().all(|e| query.matches(e)));
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_find_vacations_carries_owner() {
        let db = setup_db().await.unwrap();
        let ana = insert_servidor(&db, "Ana", "ativo", Some("RH"), None).await;
        ferias::ActiveModel {
            servidor_id: Set(ana.id),
            data_inicio: Set(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            data_fim: Set(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
            dias: Set(30),
            ano_referencia: Set(2024),
            status: Set(ferias::STATUS_APROVADO.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let store = DbRecordStore::new(db);

        let vacations = store
            .find_vacations(&VacationQuery {
                servidor_id: Some(ana.id),
                status: None,
            })
            .await
            .unwrap();

        assert_eq!(vacations.len(), 1);
        assert_eq!(vacations[0].servidor_nome.as_deref(), Some("Ana"));
        assert_eq!(vacations[0].setor.as_deref(), Some("RH"));
        assert_eq!(vacations[0].status, ferias::STATUS_APROVADO);

        let none = store
            .find_vacations(&VacationQuery {
                servidor_id: Some(ana.id + 100),
                status: None,
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
