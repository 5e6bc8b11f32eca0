use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/personas`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewPersona {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub area_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    #[serde(rename = "ID", alias = "id")]
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub area_id: u64,
}

/// Success body returned when a persona is created.
///
/// Both fields are optional: any 2xx answer means the person was stored.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedPersona {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Persona>,
}
