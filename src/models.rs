//! Data models for the sales enrichment pipeline
//!
//! This module contains all data structures flowing through the pipeline,
//! from the raw extract rows to the enriched output rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Join key column shared by both extracts
pub const COL_CLIENTE: &str = "cliente_Log";
/// Sales channel column
pub const COL_CANAL: &str = "idcanalvenda";
/// Store banner column (optional passthrough)
pub const COL_BANDEIRA: &str = "bandeira";
/// Department name column
pub const COL_DEPARTAMENTO: &str = "Nome_Departamento";
/// Two-letter state code column
pub const COL_ESTADO: &str = "estado";
/// Item price column
pub const COL_PRECO: &str = "Preço";
/// Price including freight column
pub const COL_PRECO_COM_FRETE: &str = "Preço_com_frete";
/// Transaction date column (optional)
pub const COL_DATA: &str = "Data";
/// Customer age column
pub const COL_IDADE: &str = "idade";
/// Customer monthly income column
pub const COL_RENDA: &str = "renda";

/// Columns the sales extract must provide. `Data` and `bandeira` are optional.
pub const REQUIRED_SALES_COLUMNS: &[&str] = &[
    COL_CLIENTE,
    COL_CANAL,
    COL_DEPARTAMENTO,
    COL_ESTADO,
    COL_PRECO,
    COL_PRECO_COM_FRETE,
];

/// Columns the customer extract must provide.
pub const REQUIRED_CUSTOMER_COLUMNS: &[&str] = &[COL_CLIENTE, COL_IDADE, COL_RENDA];

/// Output column names, in the order [`EnrichedSale`] serializes them.
pub const OUTPUT_COLUMNS: &[&str] = &[
    "cliente_Log",
    "idcanalvenda",
    "bandeira",
    "Nome_Departamento",
    "estado",
    "Data",
    "Preço",
    "Preço_com_frete",
    "idade",
    "renda",
    "Faixa de Preço",
    "Faixa de Idade",
    "Faixa de Renda",
    "Mes",
    "Dia_da_Semana",
    "Nome_Estado",
];

/// One row of the raw sales extract
///
/// Every non-key field is optional because the upstream export leaves
/// blanks wherever the source system had no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Customer identifier, the join key against the customer extract
    #[serde(rename = "cliente_Log")]
    pub cliente_log: String,
    /// Sales channel code (APP, WEB, ...)
    pub idcanalvenda: Option<String>,
    /// Store banner the sale went through
    #[serde(default)]
    pub bandeira: Option<String>,
    /// Department the sold item belongs to
    #[serde(rename = "Nome_Departamento")]
    pub nome_departamento: Option<String>,
    /// Two-letter state code of the delivery address
    pub estado: Option<String>,
    /// Item price in BRL
    #[serde(rename = "Preço")]
    pub preco: Option<f64>,
    /// Item price plus freight in BRL
    #[serde(rename = "Preço_com_frete")]
    pub preco_com_frete: Option<f64>,
    /// Raw transaction date as exported, parsed later during enrichment
    #[serde(rename = "Data", default)]
    pub data: Option<String>,
}

/// One row of the customer extract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Customer identifier, the join key against the sales extract
    #[serde(rename = "cliente_Log")]
    pub cliente_log: String,
    /// Customer age in years
    pub idade: Option<u32>,
    /// Customer monthly income in BRL
    pub renda: Option<f64>,
}

/// The sales extract plus schema facts discovered at load time
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    /// All rows of the extract, in file order
    pub rows: Vec<SaleRecord>,
    /// Whether the optional `Data` column was present in the header
    pub has_data_column: bool,
}

/// A filtered sale with its customer attributes attached by the left join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedSale {
    /// The cleaned and filtered sale row
    pub sale: SaleRecord,
    /// Age of the matched customer, if any
    pub idade: Option<u32>,
    /// Income of the matched customer, if any
    pub renda: Option<f64>,
}

/// One row of the enriched output dataset
///
/// Field order is the output column order. Serialized headers match the
/// names the downstream dashboard reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSale {
    /// Customer identifier
    #[serde(rename = "cliente_Log")]
    pub cliente_log: String,
    /// Sales channel, with the APP code expanded to its display name
    pub idcanalvenda: Option<String>,
    /// Store banner, carried through unchanged
    pub bandeira: Option<String>,
    /// Department name with spaces replaced by underscores
    #[serde(rename = "Nome_Departamento")]
    pub nome_departamento: Option<String>,
    /// Two-letter state code, never empty after cleaning
    pub estado: String,
    /// Parsed transaction date, empty when missing or unparseable
    #[serde(rename = "Data")]
    pub data: Option<NaiveDate>,
    /// Item price in BRL, imputed when the extract had a blank
    #[serde(rename = "Preço")]
    pub preco: f64,
    /// Item price plus freight in BRL
    #[serde(rename = "Preço_com_frete")]
    pub preco_com_frete: f64,
    /// Age of the matched customer
    pub idade: Option<u32>,
    /// Income of the matched customer
    pub renda: Option<f64>,
    /// Price bracket label
    #[serde(rename = "Faixa de Preço")]
    pub faixa_preco: &'static str,
    /// Age bracket label
    #[serde(rename = "Faixa de Idade")]
    pub faixa_idade: &'static str,
    /// Income bracket label
    #[serde(rename = "Faixa de Renda")]
    pub faixa_renda: &'static str,
    /// Abbreviated month name in Portuguese, uppercase
    #[serde(rename = "Mes")]
    pub mes: &'static str,
    /// Full weekday name in Portuguese
    #[serde(rename = "Dia_da_Semana")]
    pub dia_da_semana: &'static str,
    /// Full state name, empty for codes outside the federation table
    #[serde(rename = "Nome_Estado")]
    pub nome_estado: Option<&'static str>,
}
