use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generic named key-value row. Site settings live here under the
/// `system.site_settings` key, next to unrelated configuration.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: Uuid,
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct VariableInsert {
    pub id: Uuid,
    pub name: String,
    pub value: String,
}

impl VariableInsert {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        VariableInsert {
            id: Uuid::new_v4(),
            name: name.into(),
            value: value.into(),
        }
    }
}
