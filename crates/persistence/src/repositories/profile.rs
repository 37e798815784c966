//! Profile repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::Profile;
use domain::store::ProfileStore;
use domain::StoreError;

use crate::entities::ProfileEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// Repository for the profiles table.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let timer = QueryTimer::new("find_profile_by_email");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, email, name, avatar_url
            FROM profiles
            WHERE lower(email) = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }
}
