use serde::{Deserialize, Serialize};

/// Observation as submitted from the assessment page. Every field is optional;
/// the page decides what to fill in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewObservation {
    #[serde(default, alias = "allievo")]
    pub student: Option<String>,
    #[serde(default, alias = "classe")]
    pub class_name: Option<String>,
    #[serde(default, alias = "disciplina")]
    pub discipline: Option<String>,
    #[serde(default, alias = "situazione")]
    pub situation: Option<String>,
    #[serde(default, alias = "osservazione")]
    pub observation: Option<String>,
    #[serde(default, alias = "dimensione")]
    pub dimension: Option<String>,
    #[serde(default, alias = "processo")]
    pub process: Option<String>,
    #[serde(default, alias = "livello")]
    pub level: Option<String>,
    #[serde(default, alias = "id_descrittore")]
    pub descriptor_id: Option<i64>,
}

/// Stored observation row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub id: i64,
    pub student: Option<String>,
    pub class_name: Option<String>,
    pub discipline: Option<String>,
    pub situation: Option<String>,
    pub observation: Option<String>,
    pub dimension: Option<String>,
    pub process: Option<String>,
    pub level: Option<String>,
    pub descriptor_id: Option<i64>,
    pub created_at: String,
}

/// Observation joined with the text of its linked descriptor, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationDetails {
    #[serde(flatten)]
    pub observation: Observation,
    pub descriptor_text: Option<String>,
}

/// Search criteria. Blank fields are ignored; student and class match by
/// substring, discipline and dimension exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationFilter {
    #[serde(default, alias = "allievo")]
    pub student: String,
    #[serde(default, alias = "classe")]
    pub class_name: String,
    #[serde(default, alias = "disciplina")]
    pub discipline: String,
    #[serde(default, alias = "dimensione")]
    pub dimension: String,
}
