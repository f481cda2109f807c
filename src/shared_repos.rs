use std::sync::Arc;

use sqlx::PgPool;

use crate::repositories::{
    comment::CommentRepository,
    cv::CvRepositories,
    memory::MemoryStore,
    post::PostRepository,
    sqlx_repo::{SqlxCommentRepo, SqlxCvRepo, SqlxPostRepo, SqlxUserRepo},
    user::UserRepository,
};

/// Every repository the handlers need, behind trait objects so the
/// storage backend is picked once at startup.
#[derive(Clone)]
pub struct SharedRepositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub cv: CvRepositories,
}

impl SharedRepositories {
    pub fn postgres(pool: PgPool) -> Self {
        SharedRepositories {
            users: Arc::new(SqlxUserRepo::new(pool.clone())),
            posts: Arc::new(SqlxPostRepo::new(pool.clone())),
            comments: Arc::new(SqlxCommentRepo::new(pool.clone())),
            cv: CvRepositories {
                education: Arc::new(SqlxCvRepo::new(pool.clone())),
                skill: Arc::new(SqlxCvRepo::new(pool.clone())),
                experience: Arc::new(SqlxCvRepo::new(pool.clone())),
                interest: Arc::new(SqlxCvRepo::new(pool)),
            },
        }
    }

    /// All tables in one process-local store. Nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        SharedRepositories {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            cv: CvRepositories {
                education: store.clone(),
                skill: store.clone(),
                experience: store.clone(),
                interest: store,
            },
        }
    }
}
