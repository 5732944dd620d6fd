/*
 * Responsibility
 * - What the storage layer tells the services above it
 * - Unique violations are given meaning (Conflict); everything else stays opaque
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict;
        }
        RepoError::Db(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_opaque() {
        let err = RepoError::from_sqlx(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepoError::Db(sqlx::Error::PoolTimedOut)));
    }
}
