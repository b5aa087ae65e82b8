use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, User};
use crate::db::{with_timeout, RepoError};

/// Persistence for user records. Each call is one independent round trip.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &NewUser) -> Result<Uuid, RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;
    /// Overwrites only `email`, `name` and `updated_at`.
    async fn update(&self, user: &User) -> Result<(), RepoError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<Uuid, RepoError> {
        with_timeout(
            "insert user",
            sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO users (email, password_hash, name, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(user.email.as_str())
            .bind(user.password_hash.as_str())
            .bind(user.name.as_str())
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.db),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        with_timeout(
            "find user by email",
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password_hash, name, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        with_timeout(
            "find user by id",
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password_hash, name, created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn update(&self, user: &User) -> Result<(), RepoError> {
        with_timeout(
            "update user",
            sqlx::query(
                r#"
                UPDATE users
                   SET email = $1, name = $2, updated_at = $3
                 WHERE id = $4
                "#,
            )
            .bind(user.email.as_str())
            .bind(user.name.as_str())
            .bind(user.updated_at)
            .bind(user.id)
            .execute(&self.db),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        with_timeout(
            "delete user",
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.db),
        )
        .await?;
        Ok(())
    }
}
