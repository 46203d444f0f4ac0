//! Left join of sales against the customer extract

use std::collections::HashMap;

use tracing::debug;

use crate::models::{CustomerRecord, JoinedSale, SaleRecord};
use crate::report::RunReport;

/// Attach customer attributes to every sale, a left join on the customer key.
///
/// Every sale row survives. Sales without a matching customer keep empty
/// customer fields and are counted as join misses. When the customer slice
/// still contains duplicate keys the first occurrence wins, matching the
/// deduplication stage.
pub fn join_customers(
    sales: Vec<SaleRecord>,
    customers: &[CustomerRecord],
    report: &mut RunReport,
) -> Vec<JoinedSale> {
    let mut index: HashMap<&str, &CustomerRecord> = HashMap::with_capacity(customers.len());
    for customer in customers {
        index
            .entry(customer.cliente_log.as_str())
            .or_insert(customer);
    }

    let joined: Vec<JoinedSale> = sales
        .into_iter()
        .map(|sale| match index.get(sale.cliente_log.as_str()) {
            Some(customer) => JoinedSale {
                idade: customer.idade,
                renda: customer.renda,
                sale,
            },
            None => {
                report.join_misses += 1;
                JoinedSale {
                    idade: None,
                    renda: None,
                    sale,
                }
            }
        })
        .collect();

    debug!(
        rows = joined.len(),
        misses = report.join_misses,
        "Joined sales with customer attributes"
    );
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(cliente: &str) -> SaleRecord {
        SaleRecord {
            cliente_log: cliente.to_string(),
            idcanalvenda: None,
            bandeira: None,
            nome_departamento: None,
            estado: Some("SP".to_string()),
            preco: Some(10.0),
            preco_com_frete: Some(20.0),
            data: None,
        }
    }

    fn customer(cliente: &str, idade: u32, renda: f64) -> CustomerRecord {
        CustomerRecord {
            cliente_log: cliente.to_string(),
            idade: Some(idade),
            renda: Some(renda),
        }
    }

    #[test]
    fn test_join_attaches_matching_customer() {
        let mut report = RunReport::default();
        let joined = join_customers(
            vec![sale("C1")],
            &[customer("C1", 25, 1500.0)],
            &mut report,
        );

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].idade, Some(25));
        assert_eq!(joined[0].renda, Some(1500.0));
        assert_eq!(report.join_misses, 0);
    }

    #[test]
    fn test_join_keeps_unmatched_sales_with_empty_fields() {
        let mut report = RunReport::default();
        let joined = join_customers(
            vec![sale("C1"), sale("C9")],
            &[customer("C1", 25, 1500.0)],
            &mut report,
        );

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[1].sale.cliente_log, "C9");
        assert_eq!(joined[1].idade, None);
        assert_eq!(joined[1].renda, None);
        assert_eq!(report.join_misses, 1);
    }

    #[test]
    fn test_join_key_is_case_sensitive() {
        let mut report = RunReport::default();
        let joined = join_customers(vec![sale("c1")], &[customer("C1", 25, 1500.0)], &mut report);

        assert_eq!(joined[0].idade, None);
        assert_eq!(report.join_misses, 1);
    }

    #[test]
    fn test_join_prefers_first_duplicate_customer() {
        let mut report = RunReport::default();
        let joined = join_customers(
            vec![sale("C1")],
            &[customer("C1", 25, 1500.0), customer("C1", 99, 9.0)],
            &mut report,
        );

        assert_eq!(joined[0].idade, Some(25));
        assert_eq!(joined[0].renda, Some(1500.0));
    }

    #[test]
    fn test_join_preserves_sale_order() {
        let mut report = RunReport::default();
        let joined = join_customers(
            vec![sale("C3"), sale("C1"), sale("C2")],
            &[customer("C1", 25, 1500.0)],
            &mut report,
        );

        let keys: Vec<_> = joined.iter().map(|j| j.sale.cliente_log.as_str()).collect();
        assert_eq!(keys, ["C3", "C1", "C2"]);
    }
}
