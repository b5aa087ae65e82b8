use std::{future::Future, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

/// Budget for a single store round trip.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RepoError {
    /// The store rejected a write against a unique index.
    #[error("duplicate key")]
    DuplicateKey,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(STORE_TIMEOUT)
        .connect(database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(db: &PgPool) {
    if let Err(e) = sqlx::migrate!("./migrations").run(db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }
}

/// Runs one store call under [`STORE_TIMEOUT`] and classifies its failure.
pub async fn with_timeout<T, F>(op: &'static str, fut: F) -> Result<T, RepoError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(classify(op, e)),
        Err(_) => Err(RepoError::Other(anyhow::anyhow!(
            "{op} timed out after {}s",
            STORE_TIMEOUT.as_secs()
        ))),
    }
}

fn classify(op: &'static str, err: sqlx::Error) -> RepoError {
    let unique = err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());
    if unique {
        return RepoError::DuplicateKey;
    }
    RepoError::Other(anyhow::Error::new(err).context(op))
}
