use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{
    entities::{
        comment::{Comment, CommentInsert},
        cv::{CvKind, CvResource},
        form::ModelForm,
        post::{Post, PostForm, PostInsert, PostSummary},
        user::{User, UserInsert},
    },
    errors::AppError,
    repositories::{
        comment::{comment_not_found, CommentRepository},
        cv::{cv_not_found, ensure_column, CvRepository},
        post::{post_not_found, PostRepository},
        user::{duplicate_username, UserRepository},
    },
};

type CvRecord = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct Tables {
    sequences: HashMap<&'static str, i64>,
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    cv: HashMap<CvKind, BTreeMap<i64, CvRecord>>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }

    fn approved_count(&self, post_id: i64) -> i64 {
        self.comments
            .values()
            .filter(|c| c.post_id == post_id && c.approved_comment)
            .count() as i64
    }

    fn summaries<F>(&self, keep: F) -> Vec<PostSummary>
    where
        F: Fn(&Post) -> bool,
    {
        self.posts
            .values()
            .filter(|p| keep(p))
            .map(|p| PostSummary {
                post: p.clone(),
                approved_comments: self.approved_count(p.id),
            })
            .collect()
    }

    fn cv_records<E: CvResource>(&self) -> impl Iterator<Item = E> + '_ {
        self.cv
            .get(&E::KIND)
            .into_iter()
            .flat_map(|table| table.values())
            .filter_map(|record| record.downcast_ref::<E>().cloned())
    }
}

/// Process-local store with the same semantics as the Postgres schema:
/// per-table id sequences, unique usernames and comment cascade on post removal.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read();
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn create_user(&self, user: &UserInsert) -> Result<i64, AppError> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(duplicate_username());
        }

        let id = tables.next_id("users");
        tables.users.insert(
            id,
            User {
                id,
                username: user.username.clone(),
                password_hash: user.password_hash.clone(),
                created_at: user.created_at,
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, post: &PostInsert) -> Result<Post, AppError> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&post.author_id) {
            return Err(AppError::Conflict("Foreign key violation".into()));
        }

        let id = tables.next_id("blog_post");
        let record = Post {
            id,
            author_id: post.author_id,
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            text: post.text.clone(),
            created_date: post.created_date,
            published_date: None,
        };
        tables.posts.insert(id, record.clone());
        Ok(record)
    }

    async fn get_post_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        Ok(self.tables.read().posts.get(&id).cloned())
    }

    async fn update_post(&self, id: i64, form: &PostForm) -> Result<Post, AppError> {
        let mut tables = self.tables.write();
        let post = tables.posts.get_mut(&id).ok_or_else(|| post_not_found(id))?;
        post.title = form.title.clone();
        post.subtitle = form.subtitle.clone();
        post.text = form.text.clone();
        Ok(post.clone())
    }

    async fn publish_post(&self, id: i64, published_at: DateTime<Utc>) -> Result<Post, AppError> {
        let mut tables = self.tables.write();
        let post = tables.posts.get_mut(&id).ok_or_else(|| post_not_found(id))?;
        post.published_date = Some(published_at);
        Ok(post.clone())
    }

    async fn list_published(&self) -> Result<Vec<PostSummary>, AppError> {
        let mut posts = self.tables.read().summaries(Post::is_published);
        posts.sort_by(|a, b| {
            b.post.published_date
                .cmp(&a.post.published_date)
                .then(b.post.id.cmp(&a.post.id))
        });
        Ok(posts)
    }

    async fn list_drafts(&self) -> Result<Vec<PostSummary>, AppError> {
        let mut posts = self.tables.read().summaries(|p| !p.is_published());
        posts.sort_by(|a, b| {
            b.post.created_date
                .cmp(&a.post.created_date)
                .then(b.post.id.cmp(&a.post.id))
        });
        Ok(posts)
    }

    async fn delete_post(&self, id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        if tables.posts.remove(&id).is_none() {
            return Err(post_not_found(id));
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, comment: &CommentInsert) -> Result<Comment, AppError> {
        let mut tables = self.tables.write();
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(AppError::Conflict("Foreign key violation".into()));
        }

        let id = tables.next_id("blog_comment");
        let record = Comment {
            id,
            post_id: comment.post_id,
            author: comment.author.clone(),
            text: comment.text.clone(),
            created_date: comment.created_date,
            approved_comment: false,
        };
        tables.comments.insert(id, record.clone());
        Ok(record)
    }

    async fn get_comment_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        Ok(self.tables.read().comments.get(&id).cloned())
    }

    async fn list_for_post(&self, post_id: i64, approved_only: bool) -> Result<Vec<Comment>, AppError> {
        let tables = self.tables.read();
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id && (c.approved_comment || !approved_only))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_date.cmp(&b.created_date).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn approve_comment(&self, id: i64) -> Result<Comment, AppError> {
        let mut tables = self.tables.write();
        let comment = tables.comments.get_mut(&id).ok_or_else(|| comment_not_found(id))?;
        comment.approved_comment = true;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: i64) -> Result<Comment, AppError> {
        self.tables
            .write()
            .comments
            .remove(&id)
            .ok_or_else(|| comment_not_found(id))
    }
}

#[async_trait]
impl<E: CvResource> CvRepository<E> for MemoryStore {
    async fn list(&self) -> Result<Vec<E>, AppError> {
        Ok(self.tables.read().cv_records::<E>().collect())
    }

    async fn list_where(&self, column: &'static str, value: &str) -> Result<Vec<E>, AppError> {
        ensure_column::<E>(column)?;

        Ok(self
            .tables
            .read()
            .cv_records::<E>()
            .filter(|record| record.to_form().value_of(column).as_deref() == Some(value))
            .collect())
    }

    async fn get(&self, id: i64) -> Result<E, AppError> {
        self.tables
            .read()
            .cv
            .get(&E::KIND)
            .and_then(|table| table.get(&id))
            .and_then(|record| record.downcast_ref::<E>().cloned())
            .ok_or_else(|| cv_not_found::<E>(id))
    }

    async fn create(&self, form: &E::Form) -> Result<E, AppError> {
        let mut tables = self.tables.write();
        let id = tables.next_id(E::KIND.table());
        let record = E::from_form(id, form)?;

        tables
            .cv
            .entry(E::KIND)
            .or_default()
            .insert(id, Arc::new(record.clone()));
        Ok(record)
    }

    async fn update(&self, id: i64, form: &E::Form) -> Result<E, AppError> {
        let mut tables = self.tables.write();
        let table = tables.cv.entry(E::KIND).or_default();
        if !table.contains_key(&id) {
            return Err(cv_not_found::<E>(id));
        }

        let record = E::from_form(id, form)?;
        table.insert(id, Arc::new(record.clone()));
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.tables
            .write()
            .cv
            .get_mut(&E::KIND)
            .and_then(|table| table.remove(&id))
            .map(|_| ())
            .ok_or_else(|| cv_not_found::<E>(id))
    }
}
