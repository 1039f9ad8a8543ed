//! Grouping of records into ordered `(key, count)` rows.

use std::collections::HashMap;

use chrono::Datelike;
use common::{AggregationRow, MonthlyCount};
use model::records::{EmployeeField, EmployeeRecord, VacationRecord};

use crate::buckets::Bucket;
use crate::error::Result;
use crate::window::{DateWindow, filter_overlapping};

/// Group label for records with no value in the grouped field.
pub const UNSET_LABEL: &str = "Não informado";

fn normalize_key<K: AsRef<str>>(key: Option<K>) -> String {
    match key {
        Some(key) if !key.as_ref().trim().is_empty() => key.as_ref().trim().to_string(),
        _ => UNSET_LABEL.to_string(),
    }
}

/// Merges pre-counted `(key, count)` pairs.
///
/// Keys are trimmed and blank or missing keys collapse into [`UNSET_LABEL`].
/// Rows come out sorted descending by count; ties keep the order in which the
/// key was first seen.
pub fn tally<I, K>(counts: I) -> Vec<AggregationRow>
where
    I: IntoIterator<Item = (Option<K>, u64)>,
    K: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<AggregationRow> = Vec::new();

    for (key, count) in counts {
        let key = normalize_key(key);
        match index.get(&key) {
            Some(&position) => rows[position].total += count,
            None => {
                index.insert(key.clone(), rows.len());
                rows.push(AggregationRow::new(key, count));
            }
        }
    }

    // sort_by is stable
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// One row per distinct key, counting each occurrence once.
pub fn group_count<I, K>(keys: I) -> Vec<AggregationRow>
where
    I: IntoIterator<Item = Option<K>>,
    K: AsRef<str>,
{
    tally(keys.into_iter().map(|key| (key, 1)))
}

/// Groups employees on a categorical field.
pub fn group_by_field(records: &[EmployeeRecord], field: EmployeeField) -> Vec<AggregationRow> {
    group_count(records.iter().map(|record| record.field(field)))
}

/// Counts per bucket, every bucket present in ascending order.
pub fn bucket_count<B, I>(buckets: I) -> Vec<AggregationRow>
where
    B: Bucket,
    I: IntoIterator<Item = B>,
{
    let mut totals = vec![0u64; B::ALL.len()];
    for bucket in buckets {
        if let Some(position) = B::ALL.iter().position(|candidate| *candidate == bucket) {
            totals[position] += 1;
        }
    }

    B::ALL
        .iter()
        .zip(totals)
        .map(|(bucket, total)| AggregationRow::new(bucket.label(), total))
        .collect()
}

/// Vacations overlapping each month of `year`, months 1 through 12 in order.
pub fn month_count(year: i32, vacations: &[VacationRecord]) -> Result<Vec<MonthlyCount>> {
    let mut months = Vec::with_capacity(12);
    for month in 1..=12 {
        let window = DateWindow::month(year, month)?;
        let total = filter_overlapping(vacations, &window, |vacation| Some(vacation.span())).len() as u64;
        months.push(MonthlyCount {
            mes: window.start().month(),
            total,
        });
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::{AgeBucket, TenureBucket};
    use crate::testing::{employee, vacation};

    #[test]
    fn test_group_count_sorted_descending_and_stable() {
        let keys = vec![Some("RH"), Some("TI"), Some("TI"), Some("Financeiro"), Some("RH"), Some("Jurídico")];

        let rows = group_count(keys);

        assert_eq!(
            rows,
            vec![
                AggregationRow::new("RH", 2),
                AggregationRow::new("TI", 2),
                AggregationRow::new("Financeiro", 1),
                AggregationRow::new("Jurídico", 1),
            ]
        );
    }

    #[test]
    fn test_missing_and_blank_keys_share_a_group() {
        let keys: Vec<Option<&str>> = vec![None, Some("  "), Some("TI"), Some(""), Some(" TI ")];

        let rows = group_count(keys);

        assert_eq!(rows[0], AggregationRow::new(UNSET_LABEL, 3));
        assert_eq!(rows[1], AggregationRow::new("TI", 2));
    }

    #[test]
    fn test_grouped_counts_sum_to_cardinality() {
        let records = vec![
            employee(1, "Ana").setor("RH").cidade("Recife").build(),
            employee(2, "Bruno").setor("TI").build(),
            employee(3, "Carla").build(),
            employee(4, "Davi").setor("TI").cidade("Olinda").build(),
            employee(5, "Elis").status("inativo").setor("RH").build(),
        ];

        for field in [
            EmployeeField::Status,
            EmployeeField::Setor,
            EmployeeField::Cargo,
            EmployeeField::Cidade,
        ] {
            let rows = group_by_field(&records, field);
            let sum: u64 = rows.iter().map(|row| row.total).sum();
            assert_eq!(sum, records.len() as u64, "field {field:?}");
        }
    }

    #[test]
    fn test_field_grouping_omits_unrepresented_values() {
        let records = vec![employee(1, "Ana").build(), employee(2, "Bruno").build()];
        let rows = group_by_field(&records, EmployeeField::Status);
        assert_eq!(rows, vec![AggregationRow::new("ativo", 2)]);
    }

    #[test]
    fn test_tally_merges_precounted_pairs() {
        let rows = tally(vec![
            (Some("TI".to_string()), 3),
            (None, 1),
            (Some(String::new()), 4),
            (Some("RH".to_string()), 3),
        ]);

        assert_eq!(
            rows,
            vec![
                AggregationRow::new(UNSET_LABEL, 5),
                AggregationRow::new("TI", 3),
                AggregationRow::new("RH", 3),
            ]
        );
    }

    #[test]
    fn test_bucket_count_always_emits_every_bucket() {
        let rows = bucket_count(vec![AgeBucket::From36To45, AgeBucket::From36To45]);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], AggregationRow::new("18-25", 0));
        assert_eq!(rows[2], AggregationRow::new("36-45", 2));

        let empty = bucket_count(Vec::<TenureBucket>::new());
        assert_eq!(empty.len(), 5);
        assert!(empty.iter().all(|row| row.total == 0));
        assert_eq!(empty[4].chave, "20+");
    }

    #[test]
    fn test_month_count_uses_overlap() {
        let vacations = vec![
            vacation(1, 1, (2024, 5, 20), (2024, 7, 10)).build(),
            vacation(2, 1, (2024, 12, 20), (2025, 1, 10)).build(),
            vacation(3, 2, (2023, 12, 28), (2024, 1, 3)).build(),
        ];

        let months = month_count(2024, &vacations).unwrap();

        assert_eq!(months.len(), 12);
        let totals: Vec<u64> = months.iter().map(|m| m.total).collect();
        assert_eq!(totals, vec![1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 1]);
        let order: Vec<u32> = months.iter().map(|m| m.mes).collect();
        assert_eq!(order, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_month_count_counts_reversed_span_once() {
        let vacations = vec![vacation(1, 1, (2024, 6, 15), (2024, 6, 1)).build()];
        let months = month_count(2024, &vacations).unwrap();
        let sum: u64 = months.iter().map(|m| m.total).sum();
        assert_eq!(sum, 1);
        assert_eq!(months[5].total, 1);
    }
}
