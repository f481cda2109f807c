use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    entities::{
        comment::{Comment, CommentForm},
        form::ModelForm,
        post::{Post, PostForm, PostSummary},
    },
    errors::AppError,
    repositories::{
        comment::CommentRepository,
        post::{post_not_found, PostRepository},
    },
};

/// A post with the comments its viewer is allowed to see.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

#[derive(Clone)]
pub struct BlogHandler {
    pub post_repo: Arc<dyn PostRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
}

impl BlogHandler {
    pub fn new(post_repo: Arc<dyn PostRepository>, comment_repo: Arc<dyn CommentRepository>) -> Self {
        BlogHandler { post_repo, comment_repo }
    }

    /// Published posts, newest publication first
    pub async fn list_published(&self) -> Result<Vec<PostSummary>, AppError> {
        self.post_repo.list_published().await
    }

    /// Unpublished posts, newest first
    pub async fn list_drafts(&self) -> Result<Vec<PostSummary>, AppError> {
        self.post_repo.list_drafts().await
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, AppError> {
        self.post_repo
            .get_post_by_id(id)
            .await?
            .ok_or_else(|| post_not_found(id))
    }

    /// Loads a post for its detail page. Unapproved comments are only
    /// included for moderators.
    pub async fn post_detail(&self, id: i64, include_unapproved: bool) -> Result<PostDetail, AppError> {
        let post = self.get_post(id).await?;
        let comments = self
            .comment_repo
            .list_for_post(id, !include_unapproved)
            .await?;

        Ok(PostDetail { post, comments })
    }

    /// Saves a new draft owned by `author_id` and returns it
    pub async fn create_post(&self, author_id: i64, mut form: PostForm) -> Result<Post, AppError> {
        form.normalize();
        form.validate()?;

        let post = self.post_repo.create_post(&form.prepare_for_insert(author_id)).await?;
        tracing::info!(post_id = post.id, "Draft created");
        Ok(post)
    }

    /// Rewrites title, subtitle and text of an existing post
    pub async fn update_post(&self, id: i64, mut form: PostForm) -> Result<Post, AppError> {
        self.get_post(id).await?;

        form.normalize();
        form.validate()?;

        self.post_repo.update_post(id, &form).await
    }

    /// Stamps the publication date, making the post public
    pub async fn publish_post(&self, id: i64) -> Result<Post, AppError> {
        let post = self.post_repo.publish_post(id, Utc::now()).await?;
        tracing::info!(post_id = id, "Post published");
        Ok(post)
    }

    /// Deletes a post along with all of its comments
    pub async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        self.post_repo.delete_post(id).await?;
        tracing::info!(post_id = id, "Post removed");
        Ok(())
    }

    /// Stores a visitor comment awaiting moderation
    pub async fn add_comment(&self, post_id: i64, mut form: CommentForm) -> Result<Comment, AppError> {
        self.get_post(post_id).await?;

        form.normalize();
        form.validate()?;

        self.comment_repo.create_comment(&form.prepare_for_insert(post_id)).await
    }

    pub async fn approve_comment(&self, id: i64) -> Result<Comment, AppError> {
        self.comment_repo.approve_comment(id).await
    }

    /// Deletes a comment and returns it, so the caller knows which post it belonged to
    pub async fn remove_comment(&self, id: i64) -> Result<Comment, AppError> {
        self.comment_repo.delete_comment(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    use crate::repositories::{comment::MockCommentRepository, post::MockPostRepository};

    fn post(id: i64) -> Post {
        Post {
            id,
            author_id: 1,
            title: "Post".into(),
            subtitle: "Sub".into(),
            text: "Body".into(),
            created_date: Utc::now(),
            published_date: None,
        }
    }

    fn comment(id: i64, post_id: i64, approved: bool) -> Comment {
        Comment {
            id,
            post_id,
            author: "Sam".into(),
            text: "Hi".into(),
            created_date: Utc::now(),
            approved_comment: approved,
        }
    }

    fn handler(posts: MockPostRepository, comments: MockCommentRepository) -> BlogHandler {
        BlogHandler::new(Arc::new(posts), Arc::new(comments))
    }

    #[tokio::test]
    async fn invalid_post_is_never_written() {
        let mut posts = MockPostRepository::new();
        posts.expect_create_post().never();

        let form = PostForm { title: "Post 3".into(), subtitle: "".into(), text: "Text 3".into() };
        let err = handler(posts, MockCommentRepository::new())
            .create_post(1, form)
            .await
            .unwrap_err();

        let AppError::ValidationError(fields) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "subtitle");
    }

    #[tokio::test]
    async fn new_post_is_trimmed_and_owned_by_author() {
        let mut posts = MockPostRepository::new();
        posts
            .expect_create_post()
            .withf(|insert| insert.author_id == 4 && insert.title == "Post 3")
            .times(1)
            .returning(|insert| {
                Ok(Post {
                    author_id: insert.author_id,
                    title: insert.title.clone(),
                    ..post(11)
                })
            });

        let form = PostForm { title: " Post 3 ".into(), subtitle: "Subtitle 3".into(), text: "Text 3".into() };
        let created = handler(posts, MockCommentRepository::new())
            .create_post(4, form)
            .await
            .unwrap();

        assert_eq!(created.id, 11);
        assert!(created.published_date.is_none());
    }

    #[tokio::test]
    async fn editing_a_missing_post_is_not_found_before_validation() {
        let mut posts = MockPostRepository::new();
        posts.expect_get_post_by_id().with(eq(9)).returning(|_| Ok(None));
        posts.expect_update_post().never();

        let err = handler(posts, MockCommentRepository::new())
            .update_post(9, PostForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn anonymous_detail_requests_only_approved_comments() {
        let mut posts = MockPostRepository::new();
        posts.expect_get_post_by_id().returning(|id| Ok(Some(post(id))));

        let mut comments = MockCommentRepository::new();
        comments
            .expect_list_for_post()
            .with(eq(3), eq(true))
            .times(1)
            .returning(|post_id, _| Ok(vec![comment(1, post_id, true)]));

        let detail = handler(posts, comments).post_detail(3, false).await.unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.post.id, 3);
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found() {
        let mut posts = MockPostRepository::new();
        posts.expect_get_post_by_id().returning(|_| Ok(None));

        let mut comments = MockCommentRepository::new();
        comments.expect_create_comment().never();

        let form = CommentForm { author: "Sam".into(), text: "Hi".into() };
        let err = handler(posts, comments).add_comment(42, form).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_comment_is_rejected() {
        let mut posts = MockPostRepository::new();
        posts.expect_get_post_by_id().returning(|id| Ok(Some(post(id))));

        let mut comments = MockCommentRepository::new();
        comments.expect_create_comment().never();

        let form = CommentForm { author: "Sam".into(), text: "   ".into() };
        let err = handler(posts, comments).add_comment(1, form).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
