use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Phonebook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub number: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonBody {
    pub name: Option<String>,
    pub number: Option<String>,
}
