use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Definition of a host custom field
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: i64,
    pub name: String,
    pub group_name: String,
    pub label: Option<String>,
}

impl CustomField {
    /// Key the host uses for this field's value on a record
    pub fn key(&self) -> String {
        format!("custom_{}", self.id)
    }

    /// Find a field by its name and its group's name
    ///
    /// Returns `None` when either name is empty.
    pub async fn find_by_name(
        field_name: &str,
        group_name: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        if field_name.is_empty() || group_name.is_empty() {
            return Ok(None);
        }

        sqlx::query_as::<_, Self>(
            "SELECT f.id, f.name, g.name AS group_name, f.label
             FROM custom_fields f
             JOIN custom_groups g ON g.id = f.custom_group_id
             WHERE f.name = $1 AND g.name = $2
             ORDER BY f.id
             LIMIT 1",
        )
        .bind(field_name)
        .bind(group_name)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
