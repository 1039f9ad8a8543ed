use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, instrument};

use common::DashboardSummary;
use model::entities::{ferias, servidor};

use crate::error::Result;
use crate::store::{EmployeeQuery, RecordStore, VacationQuery};
use crate::window::{DateWindow, filter_contains, filter_month_of_year};

/// Headline numbers for the dashboard as of `today`.
///
/// `em_ferias_hoje` counts distinct employees with an approved vacation
/// covering `today`.
#[instrument(skip(store))]
pub async fn summary<S: RecordStore + ?Sized>(store: &S, today: NaiveDate) -> Result<DashboardSummary> {
    let total_servidores = store.count_employees(&EmployeeQuery::all()).await?;
    let ativos = store
        .count_employees(&EmployeeQuery::with_status(servidor::STATUS_ATIVO))
        .await?;
    let inativos = store
        .count_employees(&EmployeeQuery::with_status(servidor::STATUS_INATIVO))
        .await?;

    let approved = store
        .find_vacations(&VacationQuery {
            servidor_id: None,
            status: Some(ferias::STATUS_APROVADO.to_string()),
        })
        .await?;
    let today_window = DateWindow::day(today);
    let em_ferias_hoje = approved
        .iter()
        .filter(|v| {
            let (start, end) = v.span();
            today_window.overlaps(start, end)
        })
        .map(|v| v.servidor_id)
        .collect::<HashSet<_>>()
        .len() as u64;

    let employees = store.find_employees(&EmployeeQuery::all()).await?;
    let aniversariantes_mes =
        filter_month_of_year(&employees, today.month(), |e| e.data_nascimento)?.len() as u64;
    let admissoes_ano =
        filter_contains(&employees, &DateWindow::year(today.year())?, |e| e.data_admissao).len() as u64;

    debug!("Dashboard: {} employees, {} on vacation", total_servidores, em_ferias_hoje);
    Ok(DashboardSummary {
        total_servidores,
        ativos,
        inativos,
        em_ferias_hoje,
        aniversariantes_mes,
        admissoes_ano,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::report::{Report, ReportAssembler};
    use crate::testing::{MemoryStore, date, employee, vacation};
    use crate::window::DateWindow;
    use common::ReportData;

    #[tokio::test]
    async fn test_summary_counts() {
        let store = MemoryStore::new(
            vec![
                employee(1, "Ana").nascimento(1990, 3, 2).admissao(2024, 1, 10).build(),
                employee(2, "Bruno").nascimento(1985, 7, 7).admissao(2019, 5, 1).build(),
                employee(3, "Carla").status("inativo").nascimento(1970, 3, 30).build(),
                employee(4, "Davi").status("afastado").build(),
            ],
            vec![
                vacation(1, 1, (2024, 3, 1), (2024, 3, 20)).status("aprovado").build(),
                vacation(2, 1, (2024, 3, 10), (2024, 3, 15)).status("aprovado").build(),
                vacation(3, 2, (2024, 3, 10), (2024, 3, 30)).build(),
                vacation(4, 3, (2024, 2, 1), (2024, 2, 15)).status("aprovado").build(),
            ],
        );

        let summary = summary(&store, date(2024, 3, 14)).await.unwrap();

        assert_eq!(summary.total_servidores, 4);
        assert_eq!(summary.ativos, 2);
        assert_eq!(summary.inativos, 1);
        assert_eq!(summary.em_ferias_hoje, 1);
        assert_eq!(summary.aniversariantes_mes, 2);
        assert_eq!(summary.admissoes_ano, 1);
    }

    #[tokio::test]
    async fn test_summary_propagates_store_errors() {
        let result = summary(&MemoryStore::failing(), date(2024, 3, 14)).await;
        assert!(matches!(result, Err(ReportError::Database(_))));
    }

    #[tokio::test]
    async fn test_inactive_count_agrees_with_terminations_report() {
        let store = MemoryStore::new(
            vec![
                employee(1, "Ana").status("inativo").demissao(2024, 2, 1).build(),
                employee(2, "Bruno").status("Inativo").demissao(2024, 3, 1).build(),
                employee(3, "Carla").status(" inativo ").demissao(2024, 4, 1).build(),
                employee(4, "Davi").demissao(2024, 5, 1).build(),
            ],
            vec![],
        );
        let today = date(2024, 6, 1);

        let dashboard = summary(&store, today).await.unwrap();
        let report = ReportAssembler::new(&store, today)
            .generate(Report::AdmissionsTerminations {
                window: DateWindow::year(2024).unwrap(),
            })
            .await
            .unwrap();

        let ReportData::AdmissionsTerminations(counts) = report.data else {
            panic!("expected admissions and terminations");
        };
        assert_eq!(dashboard.inativos, 1);
        assert_eq!(counts.demissoes, dashboard.inativos);
    }
}
