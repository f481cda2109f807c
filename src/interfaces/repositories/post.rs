use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    entities::post::{Post, PostForm, PostInsert, PostSummary},
    errors::AppError,
    repositories::sqlx_repo::SqlxPostRepo,
};

const SUMMARY_SELECT: &str = r#"
    SELECT p.id, p.author_id, p.title, p.subtitle, p.text, p.created_date, p.published_date,
           COUNT(c.id) FILTER (WHERE c.approved_comment) AS approved_comments
    FROM blog_post p
    LEFT JOIN blog_comment c ON c.post_id = p.id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError>;
    async fn get_post_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;
    /// Rewrites title, subtitle and text; author and dates are left alone.
    async fn update_post(&self, id: i64, form: &PostForm) -> Result<Post, AppError>;
    async fn publish_post(&self, id: i64, published_at: DateTime<Utc>) -> Result<Post, AppError>;
    /// Newest publication first.
    async fn list_published(&self) -> Result<Vec<PostSummary>, AppError>;
    /// Newest creation first.
    async fn list_drafts(&self) -> Result<Vec<PostSummary>, AppError>;
    /// Removes the post together with its comments.
    async fn delete_post(&self, id: i64) -> Result<(), AppError>;
}

pub(crate) fn post_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Post {} not found", id))
}

impl SqlxPostRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxPostRepo { pool }
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepo {
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(
            r#"INSERT INTO blog_post (author_id, title, subtitle, text, created_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *"#,
        )
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.subtitle)
        .bind(&post.text)
        .bind(post.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        sqlx::query_as::<_, Post>("SELECT * FROM blog_post WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update_post(&self, id: i64, form: &PostForm) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(
            r#"UPDATE blog_post SET title = $2, subtitle = $3, text = $4
            WHERE id = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(&form.title)
        .bind(&form.subtitle)
        .bind(&form.text)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| post_not_found(id))
    }

    async fn publish_post(&self, id: i64, published_at: DateTime<Utc>) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(
            "UPDATE blog_post SET published_date = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(published_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| post_not_found(id))
    }

    async fn list_published(&self) -> Result<Vec<PostSummary>, AppError> {
        let sql = format!(
            "{SUMMARY_SELECT} WHERE p.published_date IS NOT NULL GROUP BY p.id ORDER BY p.published_date DESC, p.id DESC"
        );
        sqlx::query_as::<_, PostSummary>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_drafts(&self) -> Result<Vec<PostSummary>, AppError> {
        let sql = format!(
            "{SUMMARY_SELECT} WHERE p.published_date IS NULL GROUP BY p.id ORDER BY p.created_date DESC, p.id DESC"
        );
        sqlx::query_as::<_, PostSummary>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        // blog_comment.post_id cascades
        let result = sqlx::query("DELETE FROM blog_post WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(post_not_found(id));
        }
        Ok(())
    }
}
