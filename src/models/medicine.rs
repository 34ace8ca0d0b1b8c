use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A medicine owned by a user. Reminders hold a non-owning reference to one;
/// existence and ownership are checked when the reminder is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Medicine {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: name.into(),
            notes: None,
            created_at: chrono::Local::now().naive_local(),
        }
    }
}
