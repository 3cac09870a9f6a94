use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub specialty_id: Option<Uuid>,
}

/// A medical department used to group doctors and filter their sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Specialty {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}
