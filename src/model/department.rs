use serde::{Deserialize, Serialize};

/// Policy scoping unit; employees resolve their work-hours policy through it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub id: u64,
    pub name: String,
}
