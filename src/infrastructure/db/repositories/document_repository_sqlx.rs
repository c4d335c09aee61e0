use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::document_repository::DocumentRepository;
use crate::domain::documents::document::{Document as DomainDocument, GrantableRole};
use crate::infrastructure::db::PgPool;

const DOCUMENT_COLUMNS: &str = "id, name, description, owner_id, read_only_users, read_write_users, created_at, updated_at";

pub struct SqlxDocumentRepository {
    pub pool: PgPool,
}

impl SqlxDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_document(r: PgRow) -> DomainDocument {
    DomainDocument {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        owner_id: r.get("owner_id"),
        read_only_users: r.get("read_only_users"),
        read_write_users: r.get("read_write_users"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

// Column names come from a closed enum, never from input.
fn role_column(role: GrantableRole) -> &'static str {
    match role {
        GrantableRole::ReadOnly => "read_only_users",
        GrantableRole::ReadWrite => "read_write_users",
    }
}

#[async_trait]
impl DocumentRepository for SqlxDocumentRepository {
    async fn insert(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> anyhow::Result<DomainDocument> {
        let sql = format!(
            "INSERT INTO documents (name, description, owner_id) VALUES ($1, $2, $3) RETURNING {}",
            DOCUMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(name)
            .bind(description)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(map_document(row))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<DomainDocument>> {
        let sql = format!("SELECT {} FROM documents WHERE id = $1", DOCUMENT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_document))
    }

    async fn find_by_name_and_owner(
        &self,
        name: &str,
        owner_id: Uuid,
    ) -> anyhow::Result<Option<DomainDocument>> {
        let sql = format!(
            "SELECT {} FROM documents WHERE name = $1 AND owner_id = $2 ORDER BY created_at ASC LIMIT 1",
            DOCUMENT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(name)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_document))
    }

    async fn list_visible_to(&self, user_id: Uuid) -> anyhow::Result<Vec<DomainDocument>> {
        let sql = format!(
            r#"SELECT {} FROM documents
               WHERE owner_id = $1 OR $1 = ANY(read_only_users) OR $1 = ANY(read_write_users)
               ORDER BY created_at ASC, id ASC"#,
            DOCUMENT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_document).collect())
    }

    async fn remove(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn add_to_role_set(
        &self,
        id: Uuid,
        role: GrantableRole,
        user_id: Uuid,
    ) -> anyhow::Result<bool> {
        let col = role_column(role);
        // Matches the row even when the member is already present, so 0 rows means no document
        let sql = format!(
            r#"UPDATE documents
               SET {col} = CASE WHEN $2 = ANY({col}) THEN {col} ELSE array_append({col}, $2) END,
                   updated_at = now()
               WHERE id = $1"#
        );
        let res = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn remove_from_role_set(
        &self,
        id: Uuid,
        role: GrantableRole,
        user_id: Uuid,
    ) -> anyhow::Result<bool> {
        let col = role_column(role);
        let sql = format!(
            "UPDATE documents SET {col} = array_remove({col}, $2), updated_at = now() WHERE id = $1"
        );
        let res = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_columns_match_schema() {
        assert_eq!(role_column(GrantableRole::ReadOnly), "read_only_users");
        assert_eq!(role_column(GrantableRole::ReadWrite), "read_write_users");
    }
}
