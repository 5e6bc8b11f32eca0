use serde::{Deserialize, Serialize};

/// Selectable area as served by `GET /api/v1/areas`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Area {
    #[serde(rename = "ID", alias = "id")]
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Area paired with the number of people registered in it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AreaCount {
    #[serde(alias = "ID")]
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "personas")]
    pub person_count: u64,
}
