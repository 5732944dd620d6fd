/*
 * Responsibility
 * - Read/write the users table (login, password_hash, roles)
 * - UserStore: the only storage surface the security service sees
 * - PgUserRepo: SQLx implementation over a shared PgPool
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::identity::{Role, UserId};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub login: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `RepoError::Conflict` when the login is taken.
    async fn create(
        &self,
        login: &str,
        password_hash: &str,
        roles: &[Role],
    ) -> RepoResult<UserRecord>;

    async fn find_by_login(&self, login: &str) -> RepoResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    login: String,
    password_hash: String,
    roles: Vec<String>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        // Labels this build does not know about grant nothing.
        let roles = row
            .roles
            .iter()
            .filter_map(|label| match label.parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    tracing::warn!(user_id = row.id, error = %err, "ignoring stored role");
                    None
                }
            })
            .collect();

        Self {
            id: row.id,
            login: row.login,
            password_hash: row.password_hash,
            roles,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepo {
    async fn create(
        &self,
        login: &str,
        password_hash: &str,
        roles: &[Role],
    ) -> RepoResult<UserRecord> {
        let labels: Vec<&str> = roles.iter().map(Role::as_str).collect();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (login, password_hash, roles)
            VALUES ($1, $2, $3)
            RETURNING id, login, password_hash, roles
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .bind(labels)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.into())
    }

    async fn find_by_login(&self, login: &str) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, password_hash, roles
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, login, password_hash, roles
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }
}
