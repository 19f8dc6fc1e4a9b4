use sqlx::postgres::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::StoreError;
use crate::domain::entities::AuthorRecord;

use super::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: Uuid,
    name: Option<String>,
    email: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<AuthorRow> for AuthorRecord {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub(super) async fn find_authors(pool: &PgPool) -> Result<Vec<AuthorRecord>, StoreError> {
    let rows: Vec<AuthorRow> = sqlx::query_as(
        "SELECT id, name, email, created_at, updated_at FROM authors ORDER BY email",
    )
    .fetch_all(pool)
    .await
    .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(Into::into).collect())
}
