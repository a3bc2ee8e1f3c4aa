// Record types returned by the callejero API.
//
// Field names follow the domain; serde renames preserve the wire contract
// (the API mixes uppercase INE column names with lowercase ones).

use serde::{Deserialize, Serialize};

/// Autonomous community -- top-level geographic unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Community code (e.g. `"13"` for Madrid).
    #[serde(rename = "CCOM")]
    pub code: String,
    /// Display name.
    #[serde(rename = "AUTO")]
    pub name: String,
}

/// Province, child of exactly one [`Region`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    /// Province code (e.g. `"28"`).
    #[serde(rename = "CODPRO")]
    pub code: String,
    /// Display name.
    #[serde(rename = "PRO")]
    pub name: String,
    /// Parent community code.
    #[serde(rename = "CCOM")]
    pub region_code: String,
    /// Parent community name.
    #[serde(rename = "AUTO")]
    pub region_name: String,
}

/// Municipality, child of exactly one province. The parent relation is
/// implicit in the query that produced the list; it is not carried on
/// the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    /// Municipality code within the province.
    #[serde(rename = "cmun")]
    pub code: u32,
    /// Settlement (unidad poblacional) code.
    #[serde(rename = "cun")]
    pub settlement_code: u32,
    /// Display name.
    #[serde(rename = "nentsic")]
    pub name: String,
}

/// A named thoroughfare, result of a postal-code-scoped search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
    #[serde(rename = "cpos")]
    pub postal_code: u32,
    #[serde(rename = "cpro")]
    pub province_code: u32,
    #[serde(rename = "cmun")]
    pub municipality_code: u32,
    #[serde(rename = "cvia")]
    pub street_code: u32,
    /// Municipality name.
    #[serde(rename = "nentsic")]
    pub municipality_name: String,
    /// Street-type label (`"Calle"`, `"Plaza"`, ...).
    #[serde(rename = "tvia")]
    pub kind: String,
    /// Street name.
    #[serde(rename = "nvia")]
    pub name: String,
}
