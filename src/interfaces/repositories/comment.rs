use async_trait::async_trait;

use crate::{
    entities::comment::{Comment, CommentInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxCommentRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, comment: &CommentInsert) -> Result<Comment, AppError>;
    async fn get_comment_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;
    /// Oldest first.
    async fn list_for_post(&self, post_id: i64, approved_only: bool) -> Result<Vec<Comment>, AppError>;
    async fn approve_comment(&self, id: i64) -> Result<Comment, AppError>;
    /// Returns the removed comment so callers can find its post.
    async fn delete_comment(&self, id: i64) -> Result<Comment, AppError>;
}

pub(crate) fn comment_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Comment {} not found", id))
}

impl SqlxCommentRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxCommentRepo { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepo {
    async fn create_comment(&self, comment: &CommentInsert) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            r#"INSERT INTO blog_comment (post_id, author, text, created_date, approved_comment)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING *"#,
        )
        .bind(comment.post_id)
        .bind(&comment.author)
        .bind(&comment.text)
        .bind(comment.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_comment_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        sqlx::query_as::<_, Comment>("SELECT * FROM blog_comment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_for_post(&self, post_id: i64, approved_only: bool) -> Result<Vec<Comment>, AppError> {
        sqlx::query_as::<_, Comment>(
            r#"SELECT * FROM blog_comment
            WHERE post_id = $1 AND (approved_comment OR NOT $2)
            ORDER BY created_date, id"#,
        )
        .bind(post_id)
        .bind(approved_only)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn approve_comment(&self, id: i64) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>(
            "UPDATE blog_comment SET approved_comment = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| comment_not_found(id))
    }

    async fn delete_comment(&self, id: i64) -> Result<Comment, AppError> {
        sqlx::query_as::<_, Comment>("DELETE FROM blog_comment WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| comment_not_found(id))
    }
}
