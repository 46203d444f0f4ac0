//! Enrichment stage: derived categorical fields for the dashboard
//!
//! Takes the joined sales and appends price, age and income brackets,
//! calendar fields from the transaction date, and the full state name.
//! Bracket labels and their order are part of the output contract, so
//! they live here as public constants.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use tracing::debug;

use crate::models::{EnrichedSale, JoinedSale};
use crate::report::RunReport;

/// Label used when a bracket cannot be derived because the input is missing.
pub const DESCONHECIDO: &str = "Desconhecido";

/// Price bracket labels, in ascending order.
pub const FAIXAS_PRECO: [&str; 5] = [
    "até 500",
    "500 a 1.499",
    "1.500 a 2.999",
    "3.000 a 4.999",
    "5.000 ou mais",
];

/// Age bracket labels, in ascending order.
pub const FAIXAS_IDADE: [&str; 5] = ["até 20", "20 a 34", "35 a 49", "50 a 79", "80 ou mais"];

/// Income bracket labels, in ascending order.
pub const FAIXAS_RENDA: [&str; 5] = [
    "até 2000",
    "2.000 a 3.999",
    "4.000 a 9.999",
    "10.000 a 14.999",
    "15.000 ou mais",
];

/// Abbreviated month names in Portuguese, uppercase, January first.
pub const MESES: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

/// Full weekday names in Portuguese, Monday first.
pub const DIAS_DA_SEMANA: [&str; 7] = [
    "Segunda-feira",
    "Terça-feira",
    "Quarta-feira",
    "Quinta-feira",
    "Sexta-feira",
    "Sábado",
    "Domingo",
];

/// Date-only formats accepted for the transaction date.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Date-time formats accepted for the transaction date. The time part is dropped.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Price bracket for a value in BRL.
#[must_use]
pub fn faixa_preco(preco: f64) -> &'static str {
    if preco < 500.0 {
        FAIXAS_PRECO[0]
    } else if preco < 1500.0 {
        FAIXAS_PRECO[1]
    } else if preco < 3000.0 {
        FAIXAS_PRECO[2]
    } else if preco < 5000.0 {
        FAIXAS_PRECO[3]
    } else {
        FAIXAS_PRECO[4]
    }
}

/// Age bracket for an age in years.
#[must_use]
pub const fn faixa_idade(idade: u32) -> &'static str {
    if idade < 20 {
        FAIXAS_IDADE[0]
    } else if idade < 35 {
        FAIXAS_IDADE[1]
    } else if idade < 50 {
        FAIXAS_IDADE[2]
    } else if idade < 80 {
        FAIXAS_IDADE[3]
    } else {
        FAIXAS_IDADE[4]
    }
}

/// Income bracket for a monthly income in BRL.
#[must_use]
pub fn faixa_renda(renda: f64) -> &'static str {
    if renda < 2000.0 {
        FAIXAS_RENDA[0]
    } else if renda < 4000.0 {
        FAIXAS_RENDA[1]
    } else if renda < 10000.0 {
        FAIXAS_RENDA[2]
    } else if renda < 15000.0 {
        FAIXAS_RENDA[3]
    } else {
        FAIXAS_RENDA[4]
    }
}

/// Abbreviated month name for a date.
#[must_use]
pub fn mes_abreviado(date: NaiveDate) -> &'static str {
    MESES[date.month0() as usize]
}

/// Full weekday name for a weekday.
#[must_use]
pub fn dia_da_semana(weekday: Weekday) -> &'static str {
    DIAS_DA_SEMANA[weekday.num_days_from_monday() as usize]
}

/// Full state name for a two-letter state code, case-sensitive.
///
/// Returns `None` for codes outside the 27 federation units.
#[must_use]
pub fn nome_estado(uf: &str) -> Option<&'static str> {
    let nome = match uf {
        "AC" => "Acre",
        "AL" => "Alagoas",
        "AP" => "Amapá",
        "AM" => "Amazonas",
        "BA" => "Bahia",
        "CE" => "Ceará",
        "DF" => "Distrito Federal",
        "ES" => "Espírito Santo",
        "GO" => "Goiás",
        "MA" => "Maranhão",
        "MT" => "Mato Grosso",
        "MS" => "Mato Grosso do Sul",
        "MG" => "Minas Gerais",
        "PA" => "Pará",
        "PB" => "Paraíba",
        "PR" => "Paraná",
        "PE" => "Pernambuco",
        "PI" => "Piauí",
        "RJ" => "Rio de Janeiro",
        "RN" => "Rio Grande do Norte",
        "RS" => "Rio Grande do Sul",
        "RO" => "Rondônia",
        "RR" => "Roraima",
        "SC" => "Santa Catarina",
        "SP" => "São Paulo",
        "SE" => "Sergipe",
        "TO" => "Tocantins",
        _ => return None,
    };
    Some(nome)
}

/// Parse a raw transaction date, trying the accepted formats in order.
///
/// Returns `None` when no format matches. Blank values should be filtered
/// out before calling this.
#[must_use]
pub fn parse_data(raw: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(datetime.date());
        }
    }
    None
}

/// Enrich the joined sales with all derived categorical fields.
///
/// When the extract had no `Data` column every row gets the unknown
/// placeholder for month and weekday.
pub fn enrich_sales(
    joined: Vec<JoinedSale>,
    has_data_column: bool,
    report: &mut RunReport,
) -> Vec<EnrichedSale> {
    let rows: Vec<EnrichedSale> = joined
        .into_iter()
        .map(|j| enrich_one(j, has_data_column, report))
        .collect();

    debug!(rows = rows.len(), "Enriched sales with derived fields");
    rows
}

fn enrich_one(joined: JoinedSale, has_data_column: bool, report: &mut RunReport) -> EnrichedSale {
    let JoinedSale { sale, idade, renda } = joined;

    let data = if has_data_column {
        parse_row_date(sale.data.as_deref(), report)
    } else {
        None
    };
    let (mes, dia) = match data {
        Some(d) => (mes_abreviado(d), dia_da_semana(d.weekday())),
        None => (DESCONHECIDO, DESCONHECIDO),
    };

    // The filter stage only keeps rows where both prices are present.
    let preco = sale.preco.unwrap_or_default();
    let preco_com_frete = sale.preco_com_frete.unwrap_or_default();
    let estado = sale.estado.unwrap_or_default();

    let nome = nome_estado(&estado);
    if nome.is_none() {
        report.states_unmapped += 1;
    }

    EnrichedSale {
        cliente_log: sale.cliente_log,
        idcanalvenda: sale.idcanalvenda,
        bandeira: sale.bandeira,
        nome_departamento: sale.nome_departamento,
        estado,
        data,
        preco,
        preco_com_frete,
        idade,
        renda,
        faixa_preco: faixa_preco(preco),
        faixa_idade: idade.map_or(DESCONHECIDO, faixa_idade),
        faixa_renda: renda.map_or(DESCONHECIDO, faixa_renda),
        mes,
        dia_da_semana: dia,
        nome_estado: nome,
    }
}

fn parse_row_date(raw: Option<&str>, report: &mut RunReport) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse_data(raw);
    if parsed.is_none() {
        report.dates_unparsed += 1;
    }
    parsed
}
