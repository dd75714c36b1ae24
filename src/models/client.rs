use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents a client whose ledger is kept here.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// The unique identifier for the client.
    pub id: Uuid,
    /// The client's display name.
    pub name: String,
    /// The client's email address.
    pub email: Option<String>,
    /// The client's phone number.
    pub phone: Option<String>,
    /// The timestamp when the client was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the client was last updated.
    pub updated_at: DateTime<Utc>,
}
