/*
 * Responsibility
 * - Form bodies for POST/PUT /users and the token response
 * - validate(): presence checks only; the security service owns the rest
 */
use serde::{Deserialize, Serialize};

use crate::services::security::Token;

/// `login=...&password=...`. Both fields are optional at the serde level so a
/// missing field becomes a 400 from `validate()` instead of a form rejection.
#[derive(Deserialize)]
pub struct CredentialsForm {
    pub login: Option<String>,
    pub password: Option<String>,
}

impl CredentialsForm {
    pub fn validate(&self) -> Result<(&str, &str), &'static str> {
        let login = self
            .login
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("login is required")?;
        let password = self
            .password
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or("password is required")?;

        Ok((login, password))
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: Token,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(login: Option<&str>, password: Option<&str>) -> CredentialsForm {
        CredentialsForm {
            login: login.map(String::from),
            password: password.map(String::from),
        }
    }

    #[test]
    fn login_is_trimmed_password_is_not() {
        assert_eq!(
            form(Some("  alice "), Some(" pw ")).validate(),
            Ok(("alice", " pw "))
        );
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        assert_eq!(form(None, Some("pw")).validate(), Err("login is required"));
        assert_eq!(form(Some("   "), Some("pw")).validate(), Err("login is required"));
        assert_eq!(form(Some("alice"), None).validate(), Err("password is required"));
        assert_eq!(form(Some("alice"), Some("")).validate(), Err("password is required"));
    }
}
