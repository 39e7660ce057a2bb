use serde::{Deserialize, Serialize};

/// The school linked to the signed-in user. Resolved once per dashboard
/// load and treated as read-only by this workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "usuario_id", default)]
    pub user_id: i64,
}
