//! Cleaning stages applied before the join
//!
//! Normalizes the sales extract in place (channel names, department names,
//! blank states and blank prices), drops rows that fail the price sanity
//! filter, and deduplicates the customer extract on its join key.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{EtlError, Result};
use crate::models::{CustomerRecord, SalesTable};
use crate::report::RunReport;

/// Channel code rewritten during cleaning.
pub const CANAL_APP: &str = "APP";
/// Display name the APP channel code is expanded to.
pub const CANAL_APP_EXPANDIDO: &str = "Aplicativo";

/// Normalize the sales extract in place.
///
/// Expands the APP channel code, replaces spaces in department names with
/// underscores, fills blank states with `default_estado` and blank prices
/// with the mean of the prices that are present.
///
/// Fails with [`EtlError::PriceColumnEmpty`] when prices are missing and
/// there is no value to average.
pub fn clean_sales(
    table: &mut SalesTable,
    default_estado: &str,
    report: &mut RunReport,
) -> Result<()> {
    expand_canal(table, report);
    normalize_departamentos(table, report);
    fill_missing_estados(table, default_estado, report);
    fill_missing_precos(table, report)?;
    Ok(())
}

/// Rewrite the APP channel code to its display name, a literal substring replace.
fn expand_canal(table: &mut SalesTable, report: &mut RunReport) {
    for row in &mut table.rows {
        if let Some(canal) = row.idcanalvenda.as_mut() {
            if canal.contains(CANAL_APP) {
                *canal = canal.replace(CANAL_APP, CANAL_APP_EXPANDIDO);
                report.channels_expanded += 1;
            }
        }
    }
}

/// Replace every space in department names with an underscore.
fn normalize_departamentos(table: &mut SalesTable, report: &mut RunReport) {
    for row in &mut table.rows {
        if let Some(departamento) = row.nome_departamento.as_mut() {
            if departamento.contains(' ') {
                *departamento = departamento.replace(' ', "_");
                report.departments_normalized += 1;
            }
        }
    }
}

/// Fill blank state codes with the configured default. Non-blank values
/// are never touched.
fn fill_missing_estados(table: &mut SalesTable, default_estado: &str, report: &mut RunReport) {
    for row in &mut table.rows {
        if row.estado.is_none() {
            row.estado = Some(default_estado.to_string());
            report.states_defaulted += 1;
        }
    }
}

/// Fill blank prices with the mean of the prices that are present.
///
/// The mean is computed once, before any fill, so imputed values never
/// feed back into it.
fn fill_missing_precos(table: &mut SalesTable, report: &mut RunReport) -> Result<()> {
    let missing = table.rows.iter().filter(|r| r.preco.is_none()).count();
    if missing == 0 {
        return Ok(());
    }

    let (sum, count) = table
        .rows
        .iter()
        .filter_map(|r| r.preco)
        .fold((0.0_f64, 0_usize), |(sum, count), preco| {
            (sum + preco, count + 1)
        });
    if count == 0 {
        return Err(EtlError::PriceColumnEmpty);
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = sum / count as f64;
    for row in &mut table.rows {
        if row.preco.is_none() {
            row.preco = Some(mean);
            report.prices_imputed += 1;
        }
    }

    debug!(mean, filled = missing, "Filled blank prices with the column mean");
    Ok(())
}

/// Keep only rows whose price is strictly below the freight-inclusive price.
///
/// Rows missing either price are dropped. Row order is preserved.
pub fn filter_valid_prices(table: &mut SalesTable, report: &mut RunReport) {
    let before = table.rows.len();
    table.rows.retain(|row| match (row.preco, row.preco_com_frete) {
        (Some(preco), Some(frete)) => preco < frete,
        _ => false,
    });
    report.rows_dropped_by_filter = before - table.rows.len();

    debug!(
        kept = table.rows.len(),
        dropped = report.rows_dropped_by_filter,
        "Filtered rows by price sanity check"
    );
}

/// Drop duplicate customers, keeping the first occurrence of each key.
pub fn dedup_customers(customers: &mut Vec<CustomerRecord>, report: &mut RunReport) {
    let before = customers.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    customers.retain(|c| seen.insert(c.cliente_log.clone()));
    report.duplicate_customers_dropped = before - customers.len();

    debug!(
        kept = customers.len(),
        dropped = report.duplicate_customers_dropped,
        "Deduplicated customer extract"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleRecord;

    fn sale(canal: Option<&str>, estado: Option<&str>, preco: Option<f64>) -> SaleRecord {
        SaleRecord {
            cliente_log: "C1".to_string(),
            idcanalvenda: canal.map(String::from),
            bandeira: None,
            nome_departamento: None,
            estado: estado.map(String::from),
            preco,
            preco_com_frete: Some(10_000.0),
            data: None,
        }
    }

    fn table(rows: Vec<SaleRecord>) -> SalesTable {
        SalesTable {
            rows,
            has_data_column: false,
        }
    }

    fn customer(cliente: &str, idade: u32) -> CustomerRecord {
        CustomerRecord {
            cliente_log: cliente.to_string(),
            idade: Some(idade),
            renda: Some(1000.0),
        }
    }

    #[test]
    fn test_clean_expands_app_channel() {
        let mut report = RunReport::default();
        let mut table = table(vec![
            sale(Some("APP"), Some("SP"), Some(10.0)),
            sale(Some("Internet"), Some("SP"), Some(10.0)),
            sale(None, Some("SP"), Some(10.0)),
        ]);

        clean_sales(&mut table, "MS", &mut report).unwrap();

        assert_eq!(table.rows[0].idcanalvenda.as_deref(), Some("Aplicativo"));
        assert_eq!(table.rows[1].idcanalvenda.as_deref(), Some("Internet"));
        assert_eq!(table.rows[2].idcanalvenda, None);
        assert_eq!(report.channels_expanded, 1);
    }

    #[test]
    fn test_clean_expands_app_as_substring() {
        let mut report = RunReport::default();
        let mut table = table(vec![sale(Some("APP-mobile"), Some("SP"), Some(10.0))]);

        clean_sales(&mut table, "MS", &mut report).unwrap();

        assert_eq!(
            table.rows[0].idcanalvenda.as_deref(),
            Some("Aplicativo-mobile")
        );
    }

    #[test]
    fn test_clean_normalizes_department_spaces() {
        let mut report = RunReport::default();
        let mut rows = table(vec![sale(None, Some("SP"), Some(10.0))]);
        rows.rows[0].nome_departamento = Some("Esporte e Lazer".to_string());

        clean_sales(&mut rows, "MS", &mut report).unwrap();

        assert_eq!(
            rows.rows[0].nome_departamento.as_deref(),
            Some("Esporte_e_Lazer")
        );
        assert_eq!(report.departments_normalized, 1);
    }

    #[test]
    fn test_clean_fills_blank_states_only() {
        let mut report = RunReport::default();
        let mut table = table(vec![
            sale(None, None, Some(10.0)),
            sale(None, Some("SP"), Some(10.0)),
            sale(None, None, Some(10.0)),
        ]);

        clean_sales(&mut table, "MS", &mut report).unwrap();

        assert_eq!(table.rows[0].estado.as_deref(), Some("MS"));
        assert_eq!(table.rows[1].estado.as_deref(), Some("SP"));
        assert_eq!(table.rows[2].estado.as_deref(), Some("MS"));
        assert_eq!(report.states_defaulted, 2);
    }

    #[test]
    fn test_clean_fills_blank_prices_with_mean_of_present_values() {
        let mut report = RunReport::default();
        let mut table = table(vec![
            sale(None, Some("SP"), None),
            sale(None, Some("SP"), Some(50.0)),
        ]);

        clean_sales(&mut table, "MS", &mut report).unwrap();

        assert_eq!(table.rows[0].preco, Some(50.0));
        assert_eq!(report.prices_imputed, 1);
    }

    #[test]
    fn test_mean_is_computed_before_any_fill() {
        let mut report = RunReport::default();
        let mut table = table(vec![
            sale(None, Some("SP"), Some(10.0)),
            sale(None, Some("SP"), None),
            sale(None, Some("SP"), Some(30.0)),
            sale(None, Some("SP"), None),
        ]);

        clean_sales(&mut table, "MS", &mut report).unwrap();

        // Mean of 10 and 30, not influenced by the fills themselves.
        assert_eq!(table.rows[1].preco, Some(20.0));
        assert_eq!(table.rows[3].preco, Some(20.0));
        assert_eq!(report.prices_imputed, 2);
    }

    #[test]
    fn test_all_blank_prices_is_an_error() {
        let mut report = RunReport::default();
        let mut table = table(vec![
            sale(None, Some("SP"), None),
            sale(None, Some("SP"), None),
        ]);

        let err = clean_sales(&mut table, "MS", &mut report).unwrap_err();
        assert!(matches!(err, EtlError::PriceColumnEmpty));
    }

    #[test]
    fn test_no_blank_prices_needs_no_mean() {
        let mut report = RunReport::default();
        let mut table = table(vec![sale(None, Some("SP"), Some(10.0))]);

        clean_sales(&mut table, "MS", &mut report).unwrap();
        assert_eq!(report.prices_imputed, 0);
    }

    #[test]
    fn test_clean_accepts_empty_extract() {
        let mut report = RunReport::default();
        let mut table = table(vec![]);

        clean_sales(&mut table, "MS", &mut report).unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_filter_keeps_strictly_cheaper_rows_in_order() {
        let mut report = RunReport::default();
        let mut table = table(vec![
            sale(Some("A"), Some("SP"), Some(10.0)),
            sale(Some("B"), Some("SP"), Some(10.0)),
            sale(Some("C"), Some("SP"), Some(10.0)),
        ]);
        table.rows[0].preco_com_frete = Some(20.0);
        table.rows[1].preco_com_frete = Some(10.0); // equal, must go
        table.rows[2].preco_com_frete = Some(50.0);

        filter_valid_prices(&mut table, &mut report);

        let canais: Vec<_> = table
            .rows
            .iter()
            .map(|r| r.idcanalvenda.as_deref())
            .collect();
        assert_eq!(canais, [Some("A"), Some("C")]);
        assert_eq!(report.rows_dropped_by_filter, 1);
    }

    #[test]
    fn test_filter_drops_rows_missing_either_price() {
        let mut report = RunReport::default();
        let mut table = table(vec![sale(None, Some("SP"), None)]);
        table.rows[0].preco_com_frete = None;

        filter_valid_prices(&mut table, &mut report);

        assert!(table.rows.is_empty());
        assert_eq!(report.rows_dropped_by_filter, 1);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut report = RunReport::default();
        let mut customers = vec![customer("C1", 25), customer("C2", 40), customer("C1", 99)];

        dedup_customers(&mut customers, &mut report);

        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].cliente_log, "C1");
        assert_eq!(customers[0].idade, Some(25));
        assert_eq!(customers[1].cliente_log, "C2");
        assert_eq!(report.duplicate_customers_dropped, 1);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let mut report = RunReport::default();
        let mut customers = vec![customer("C1", 25), customer("c1", 40)];

        dedup_customers(&mut customers, &mut report);

        assert_eq!(customers.len(), 2);
        assert_eq!(report.duplicate_customers_dropped, 0);
    }
}
