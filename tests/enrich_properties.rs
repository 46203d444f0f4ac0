//! Property-based tests for the enrichment lookup tables.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use varejo_etl::enrich::{
    dia_da_semana, faixa_idade, faixa_preco, faixa_renda, mes_abreviado, nome_estado, parse_data,
    DESCONHECIDO, DIAS_DA_SEMANA, FAIXAS_IDADE, FAIXAS_PRECO, FAIXAS_RENDA, MESES,
};

fn preco_bucket(preco: f64) -> usize {
    FAIXAS_PRECO
        .iter()
        .position(|label| *label == faixa_preco(preco))
        .expect("price label missing from the bracket table")
}

fn renda_bucket(renda: f64) -> usize {
    FAIXAS_RENDA
        .iter()
        .position(|label| *label == faixa_renda(renda))
        .expect("income label missing from the bracket table")
}

fn idade_bucket(idade: u32) -> usize {
    FAIXAS_IDADE
        .iter()
        .position(|label| *label == faixa_idade(idade))
        .expect("age label missing from the bracket table")
}

proptest! {
    /// Every price maps to exactly one of the published labels.
    #[test]
    fn faixa_preco_is_total(preco in -1.0e9f64..1.0e9) {
        prop_assert!(FAIXAS_PRECO.contains(&faixa_preco(preco)));
    }

    /// A higher price never lands in a lower bracket.
    #[test]
    fn faixa_preco_is_monotonic(a in -1.0e9f64..1.0e9, b in -1.0e9f64..1.0e9) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(preco_bucket(lo) <= preco_bucket(hi));
    }

    #[test]
    fn faixa_renda_is_total_and_monotonic(a in -1.0e9f64..1.0e9, b in -1.0e9f64..1.0e9) {
        prop_assert!(FAIXAS_RENDA.contains(&faixa_renda(a)));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(renda_bucket(lo) <= renda_bucket(hi));
    }

    #[test]
    fn faixa_idade_is_total_and_monotonic(a in 0u32..200, b in 0u32..200) {
        prop_assert!(FAIXAS_IDADE.contains(&faixa_idade(a)));
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(idade_bucket(lo) <= idade_bucket(hi));
    }

    /// The missing-value placeholder never collides with a real bracket label,
    /// so dashboard groupings stay unambiguous.
    #[test]
    fn placeholder_is_not_a_bracket_label(preco in -1.0e9f64..1.0e9) {
        prop_assert_ne!(faixa_preco(preco), DESCONHECIDO);
        prop_assert!(!FAIXAS_IDADE.contains(&DESCONHECIDO));
        prop_assert!(!FAIXAS_RENDA.contains(&DESCONHECIDO));
    }

    /// Arbitrary input never panics the date parser.
    #[test]
    fn parse_data_is_total(raw in any::<String>()) {
        let _ = parse_data(&raw);
    }

    /// A well-formed date roundtrips and its calendar fields come from the
    /// published tables.
    #[test]
    fn calendar_fields_come_from_the_tables(y in 2000i32..2100, m in 1u32..=12, d in 1u32..=28) {
        let date = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        let raw = date.format("%Y-%m-%d").to_string();

        prop_assert_eq!(parse_data(&raw), Some(date));
        prop_assert_eq!(mes_abreviado(date), MESES[(m - 1) as usize]);
        prop_assert!(DIAS_DA_SEMANA.contains(&dia_da_semana(date.weekday())));
    }

    /// Arbitrary two-letter codes either resolve to a full state name or
    /// to nothing, never to an empty string.
    #[test]
    fn nome_estado_never_returns_empty(code in "[A-Z]{2}") {
        if let Some(nome) = nome_estado(&code) {
            prop_assert!(!nome.is_empty());
        }
    }
}
