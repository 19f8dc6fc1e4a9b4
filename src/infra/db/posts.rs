use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{BlogListQuery, BlogStore, NewBlogPost, StoreError};
use crate::domain::entities::{AuthorRecord, PostRecord};

use super::{PostgresStore, map_sqlx_error};

const POST_COLUMNS: &str = "id, title, content, published, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: Option<String>,
    published: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BlogStore for PostgresStore {
    async fn create_post(&self, params: NewBlogPost) -> Result<PostRecord, StoreError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row: PostRow = sqlx::query_as(
            "INSERT INTO posts (id, title, content, published, created_at, updated_at) \
             VALUES ($1, $2, $3, TRUE, $4, $4) \
             RETURNING id, title, content, published, created_at, updated_at",
        )
        .bind(id)
        .bind(&params.title)
        .bind(&params.content)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_post_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> Result<Option<PostRecord>, StoreError> {
        let now = OffsetDateTime::now_utc();
        let row: Option<PostRow> = sqlx::query_as(
            "UPDATE posts SET published = $2, updated_at = $3 WHERE id = $1 \
             RETURNING id, title, content, published, created_at, updated_at",
        )
        .bind(id)
        .bind(published)
        .bind(now)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_post_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, StoreError> {
        let row: Option<PostRow> = sqlx::query_as(
            "SELECT id, title, content, published, created_at, updated_at \
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_posts(&self, query: &BlogListQuery) -> Result<Vec<PostRecord>, StoreError> {
        let mut qb = QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE 1=1 "));
        if let Some(published) = query.published {
            qb.push(" AND published = ");
            qb.push_bind(published);
        }
        qb.push(" ORDER BY created_at DESC, id DESC ");

        let rows: Vec<PostRow> = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_authors(&self) -> Result<Vec<AuthorRecord>, StoreError> {
        super::authors::find_authors(self.pool()).await
    }
}
