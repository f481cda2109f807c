use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    entities::{
        cv::CvResource,
        education::Education,
        experience::Experience,
        form::ModelForm,
        interest::Interest,
        skill::Skill,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxCvRepo,
};

/// Storage for one CV record type.
#[async_trait]
pub trait CvRepository<E: CvResource>: Send + Sync {
    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<E>, AppError>;
    /// Records whose `column` equals `value`. The column must be one of the form's fields.
    async fn list_where(&self, column: &'static str, value: &str) -> Result<Vec<E>, AppError>;
    async fn get(&self, id: i64) -> Result<E, AppError>;
    async fn create(&self, form: &E::Form) -> Result<E, AppError>;
    async fn update(&self, id: i64, form: &E::Form) -> Result<E, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// The four CV repositories, handed out by `CvResource::repository`.
#[derive(Clone)]
pub struct CvRepositories {
    pub education: Arc<dyn CvRepository<Education>>,
    pub skill: Arc<dyn CvRepository<Skill>>,
    pub experience: Arc<dyn CvRepository<Experience>>,
    pub interest: Arc<dyn CvRepository<Interest>>,
}

pub(crate) fn cv_not_found<E: CvResource>(id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", E::KIND.heading(), id))
}

pub(crate) fn ensure_column<E: CvResource>(column: &str) -> Result<(), AppError> {
    if <E::Form as ModelForm>::FIELDS.iter().any(|f| f.name == column) {
        Ok(())
    } else {
        Err(AppError::InternalError(format!(
            "{} has no column `{}`",
            E::KIND.table(),
            column
        )))
    }
}

#[async_trait]
impl<E: CvResource> CvRepository<E> for SqlxCvRepo<E> {
    async fn list(&self) -> Result<Vec<E>, AppError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", E::KIND.table());
        sqlx::query_as::<_, E>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_where(&self, column: &'static str, value: &str) -> Result<Vec<E>, AppError> {
        ensure_column::<E>(column)?;

        let sql = format!("SELECT * FROM {} WHERE {} = $1 ORDER BY id", E::KIND.table(), column);
        sqlx::query_as::<_, E>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get(&self, id: i64) -> Result<E, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::KIND.table());
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| cv_not_found::<E>(id))
    }

    async fn create(&self, form: &E::Form) -> Result<E, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (", E::KIND.table()));
        {
            let mut columns = qb.separated(", ");
            for field in <E::Form as ModelForm>::FIELDS {
                columns.push(field.name);
            }
        }
        qb.push(") VALUES (");
        {
            let mut values = qb.separated(", ");
            for value in form.values() {
                values.push_bind(value);
            }
        }
        qb.push(") RETURNING *");

        qb.build_query_as::<E>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: i64, form: &E::Form) -> Result<E, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", E::KIND.table()));
        {
            let mut assignments = qb.separated(", ");
            for (field, value) in <E::Form as ModelForm>::FIELDS.iter().zip(form.values()) {
                assignments.push(format!("{} = ", field.name));
                assignments.push_bind_unseparated(value);
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *");

        qb.build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| cv_not_found::<E>(id))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::KIND.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(cv_not_found::<E>(id));
        }
        Ok(())
    }
}
