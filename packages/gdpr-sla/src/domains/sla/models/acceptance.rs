use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{AcceptanceId, ContactId};

/// A contact's acceptance of one Terms & Conditions document version
///
/// Immutable once stored. Never updated or deleted by this crate.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceEvent {
    pub id: AcceptanceId,
    pub contact_id: ContactId,
    pub accepted_at: DateTime<Utc>,
    /// Document accepted; `None` when no document URL was configured
    pub document_url: Option<String>,
}

/// Acceptance activity to be written to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAcceptance {
    /// Contact who accepted; recorded as both source and target of the activity
    pub contact_id: ContactId,
    pub accepted_at: DateTime<Utc>,
    pub document_url: Option<String>,
    /// Key of the custom field the document URL is stored under (`custom_<id>`)
    pub document_field_key: String,
    pub activity_type: String,
    pub subject: String,
    pub status: String,
}

impl AcceptanceEvent {
    /// Find the latest acceptance for a contact
    ///
    /// UUIDv7 ids are insertion ordered, so `id DESC` breaks timestamp ties
    /// in favour of the newest record.
    pub async fn find_latest_for_contact(
        contact_id: ContactId,
        activity_type: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT id, contact_id, accepted_at, document_url
             FROM sla_acceptances
             WHERE contact_id = $1 AND activity_type = $2
             ORDER BY accepted_at DESC, id DESC
             LIMIT 1",
        )
        .bind(contact_id)
        .bind(activity_type)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}

impl NewAcceptance {
    /// Insert the acceptance and return the stored event
    pub async fn insert(&self, pool: &PgPool) -> Result<AcceptanceEvent> {
        sqlx::query_as::<_, AcceptanceEvent>(
            "INSERT INTO sla_acceptances (
                id,
                contact_id,
                activity_type,
                subject,
                status,
                accepted_at,
                document_field_key,
                document_url
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, contact_id, accepted_at, document_url",
        )
        .bind(AcceptanceId::new())
        .bind(self.contact_id)
        .bind(&self.activity_type)
        .bind(&self.subject)
        .bind(&self.status)
        .bind(self.accepted_at)
        .bind(&self.document_field_key)
        .bind(&self.document_url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
