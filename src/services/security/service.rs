use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::{Principal, PrincipalResolver, RawCredential, Role, RoleChecker, UserId};
use crate::repos::{RepoError, UserStore};
use crate::services::security::password::{self, PasswordError};
use crate::services::security::token::{Token, TokenError, TokenIssuer};

/// Roles every self-registered account starts with.
pub const DEFAULT_ROLES: &[Role] = &[Role::User];

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("login already exists")]
    DuplicateLogin,
    #[error("invalid login or password")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("storage failure")]
    Storage(#[from] RepoError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for SecurityError {
    fn from(e: PasswordError) -> Self {
        SecurityError::Internal(e.to_string())
    }
}

impl From<TokenError> for SecurityError {
    fn from(e: TokenError) -> Self {
        SecurityError::Internal(e.to_string())
    }
}

/// Logins are stored and looked up trimmed.
fn validate_credentials<'a>(login: &'a str, password: &str) -> Result<&'a str, SecurityError> {
    let login = login.trim();
    if login.is_empty() {
        return Err(SecurityError::Validation("login is required"));
    }
    if password.is_empty() {
        return Err(SecurityError::Validation("password is required"));
    }
    Ok(login)
}

/// Verified against when the login is unknown, so that path costs the same
/// argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    password::hash_password("unknown-login-placeholder")
        .inspect_err(|e| tracing::error!(error = %e, "failed to prepare dummy password hash"))
        .ok()
});

async fn hash_blocking(password: &str) -> Result<String, SecurityError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| SecurityError::Internal(e.to_string()))?
        .map_err(SecurityError::from)
}

async fn verify_blocking(password: &str, hash: String) -> Result<bool, SecurityError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| SecurityError::Internal(e.to_string()))?
        .map_err(SecurityError::from)
}

async fn verify_against_dummy(password: &str) -> Result<(), SecurityError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            // The outcome is irrelevant; only the work matters.
            let _ = password::verify_password(&password, hash);
        }
    })
    .await
    .map_err(|e| SecurityError::Internal(e.to_string()))
}

/// Owns credential issuance and principal resolution.
///
/// This is the only component that knows what a token means. The request
/// pipeline reaches it through [`PrincipalResolver`] and [`RoleChecker`].
#[derive(Clone)]
pub struct SecurityService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl SecurityService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    pub async fn register(&self, login: &str, password: &str) -> Result<Token, SecurityError> {
        let login = validate_credentials(login, password)?;

        let hash = hash_blocking(password).await?;
        let user = match self.users.create(login, &hash, DEFAULT_ROLES).await {
            Ok(user) => user,
            Err(RepoError::Conflict) => {
                tracing::info!(login, "registration rejected: login taken");
                return Err(SecurityError::DuplicateLogin);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = user.id, "user registered");
        Ok(self.tokens.issue(user.id)?)
    }

    pub async fn login(&self, login: &str, password: &str) -> Result<Token, SecurityError> {
        let login = validate_credentials(login, password)?;

        let Some(user) = self.users.find_by_login(login).await? else {
            verify_against_dummy(password).await?;
            return Err(SecurityError::InvalidCredentials);
        };
        if !verify_blocking(password, user.password_hash).await? {
            return Err(SecurityError::InvalidCredentials);
        }

        tracing::debug!(user_id = user.id, "login succeeded");
        Ok(self.tokens.issue(user.id)?)
    }

    /// Resolve a token to the principal it was issued for.
    ///
    /// Roles come from storage, not from the token, so a role change applies
    /// to tokens already in circulation.
    pub async fn resolve_principal(&self, token: &str) -> Result<Principal, SecurityError> {
        let user_id = self.tokens.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "token rejected");
            SecurityError::InvalidToken
        })?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(SecurityError::InvalidToken)?;

        Ok(Principal::new(user.id, user.roles))
    }

    pub fn has_any_role(&self, principal: &Principal, roles: &[Role]) -> bool {
        roles.iter().any(|role| principal.has_role(*role))
    }

    /// Make sure an administrator account exists.
    ///
    /// Returns the account id and whether it was created by this call. An
    /// existing account is left untouched.
    pub async fn ensure_admin(
        &self,
        login: &str,
        password: &str,
    ) -> Result<(UserId, bool), SecurityError> {
        let login = validate_credentials(login, password)?;

        if let Some(existing) = self.users.find_by_login(login).await? {
            if !existing.roles.contains(&Role::Admin) {
                tracing::warn!(user_id = existing.id, "bootstrap admin login belongs to a non-admin account");
            }
            return Ok((existing.id, false));
        }

        let hash = hash_blocking(password).await?;
        match self.users.create(login, &hash, &[Role::Admin]).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "admin account created");
                Ok((user.id, true))
            }
            // Another instance won the race.
            Err(RepoError::Conflict) => {
                let user = self
                    .users
                    .find_by_login(login)
                    .await?
                    .ok_or(SecurityError::DuplicateLogin)?;
                Ok((user.id, false))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PrincipalResolver for SecurityService {
    async fn resolve(&self, credential: &RawCredential) -> Result<Principal, SecurityError> {
        self.resolve_principal(credential.as_str()).await
    }
}

impl RoleChecker for SecurityService {
    fn has_any_role(&self, principal: &Principal, roles: &[Role]) -> bool {
        SecurityService::has_any_role(self, principal, roles)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::repos::MemoryUserRepo;

    fn service() -> (SecurityService, Arc<MemoryUserRepo>) {
        let users = Arc::new(MemoryUserRepo::new());
        let tokens = TokenIssuer::new(b"unit-test-secret-unit-test-secret", "payments-test", 600, 0);
        (SecurityService::new(users.clone(), tokens), users)
    }

    #[tokio::test]
    async fn register_then_login_resolve_to_the_same_identity() {
        let (svc, _) = service();

        let registered = svc.register("alice", "s3cret").await.unwrap();
        let logged_in = svc.login("alice", "s3cret").await.unwrap();

        let a = svc.resolve_principal(registered.as_str()).await.unwrap();
        let b = svc.resolve_principal(logged_in.as_str()).await.unwrap();
        assert_eq!(a.id(), b.id());
        assert_eq!(a.roles().iter().copied().collect::<Vec<_>>(), vec![Role::User]);
    }

    #[tokio::test]
    async fn second_registration_with_same_login_is_rejected() {
        let (svc, users) = service();
        svc.register("alice", "one").await.unwrap();

        let err = svc.register("alice", "two").await.unwrap_err();
        assert!(matches!(err, SecurityError::DuplicateLogin));
        assert_eq!(users.user_count(), 1);
    }

    #[tokio::test]
    async fn empty_login_or_password_never_reaches_storage() {
        let (svc, users) = service();

        for (login, password) in [("", "pw"), ("   ", "pw"), ("bob", "")] {
            assert!(matches!(
                svc.register(login, password).await,
                Err(SecurityError::Validation(_))
            ));
            assert!(matches!(
                svc.login(login, password).await,
                Err(SecurityError::Validation(_))
            ));
        }
        assert_eq!(users.round_trips(), 0);
    }

    #[tokio::test]
    async fn unknown_login_and_wrong_password_look_the_same() {
        let (svc, _) = service();
        svc.register("alice", "right").await.unwrap();

        let unknown = svc.login("mallory", "right").await.unwrap_err();
        let wrong = svc.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(unknown, SecurityError::InvalidCredentials));
        assert!(matches!(wrong, SecurityError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn unknown_login_costs_as_much_as_a_wrong_password() {
        let (svc, _) = service();
        svc.register("alice", "right").await.unwrap();
        // Warm up: the first unknown login also prepares the dummy hash.
        let _ = svc.login("mallory", "right").await;

        let started = Instant::now();
        let _ = svc.login("alice", "wrong").await;
        let wrong_password = started.elapsed();

        let started = Instant::now();
        let _ = svc.login("mallory", "right").await;
        let unknown_login = started.elapsed();

        assert!(DUMMY_HASH.is_some());
        assert!(
            unknown_login * 10 >= wrong_password,
            "unknown login took {unknown_login:?}, wrong password {wrong_password:?}"
        );
    }

    #[tokio::test]
    async fn logins_are_trimmed_before_storage() {
        let (svc, users) = service();
        svc.register(" alice ", "pw").await.unwrap();

        assert!(matches!(
            svc.register("alice", "pw").await,
            Err(SecurityError::DuplicateLogin)
        ));
        assert_eq!(users.user_count(), 1);
        assert!(svc.login("alice", "pw").await.is_ok());

        let (admin_id, created) = svc.ensure_admin("  root", "toor").await.unwrap();
        assert!(created);
        assert_eq!(svc.ensure_admin("root", "toor").await.unwrap(), (admin_id, false));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let (svc, _) = service();
        assert!(matches!(
            svc.resolve_principal("garbage").await,
            Err(SecurityError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn token_for_a_missing_user_is_invalid() {
        let (svc, _) = service();
        let orphan = svc.tokens.issue(999).unwrap();
        assert!(matches!(
            svc.resolve_principal(orphan.as_str()).await,
            Err(SecurityError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn role_check_is_a_disjunction() {
        let (svc, _) = service();
        let user = Principal::new(1, [Role::User]);
        let admin = Principal::new(2, [Role::Admin]);

        assert!(svc.has_any_role(&user, &[Role::User]));
        assert!(svc.has_any_role(&user, &[Role::Admin, Role::User]));
        assert!(!svc.has_any_role(&user, &[Role::Admin]));
        // No hierarchy: ADMIN does not imply USER.
        assert!(!svc.has_any_role(&admin, &[Role::User]));
        assert!(!svc.has_any_role(&admin, &[]));
    }

    #[tokio::test]
    async fn ensure_admin_creates_once() {
        let (svc, users) = service();

        let (id, created) = svc.ensure_admin("root", "toor").await.unwrap();
        assert!(created);
        let (again, created_again) = svc.ensure_admin("root", "toor").await.unwrap();
        assert_eq!(id, again);
        assert!(!created_again);
        assert_eq!(users.user_count(), 1);

        let token = svc.login("root", "toor").await.unwrap();
        let principal = svc.resolve_principal(token.as_str()).await.unwrap();
        assert!(principal.has_role(Role::Admin));
        assert!(!principal.has_role(Role::User));
    }
}
