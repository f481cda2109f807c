use std::marker::PhantomData;

use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxPostRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxCommentRepo {
    pub pool: PgPool,
}

/// One repository type serves every CV table; `E` picks the table and row shape.
pub struct SqlxCvRepo<E> {
    pub pool: PgPool,
    _record: PhantomData<fn() -> E>,
}

impl<E> SqlxCvRepo<E> {
    pub fn new(pool: PgPool) -> Self {
        SqlxCvRepo { pool, _record: PhantomData }
    }
}

impl<E> Clone for SqlxCvRepo<E> {
    fn clone(&self) -> Self {
        SqlxCvRepo::new(self.pool.clone())
    }
}
