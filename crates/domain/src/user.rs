//! User references and validated contact data.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use custodian_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Identifier of a user record owned by the user store.
///
/// User ids are integers in the upstream user table; this crate treats them as
/// opaque handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a stored user id.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw id.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| AppError::InvalidArgument(format!("invalid user id '{value}'")))
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::InvalidArgument(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::InvalidArgument(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::InvalidArgument(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::InvalidArgument(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::InvalidArgument(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::InvalidArgument(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{EmailAddress, UserId};

    #[test]
    fn email_is_canonicalized() {
        let email = EmailAddress::new("  Ada@Example.COM ");
        assert_eq!(
            email.map(String::from).ok().as_deref(),
            Some("ada@example.com")
        );
    }

    #[test]
    fn email_requires_single_at_sign() {
        assert!(EmailAddress::new("ada.example.com").is_err());
        assert!(EmailAddress::new("ada@@example.com").is_err());
        assert!(EmailAddress::new("@example.com").is_err());
        assert!(EmailAddress::new("ada@localhost").is_err());
    }

    #[test]
    fn user_id_parses_path_segment() {
        assert_eq!(UserId::from_str("42").ok(), Some(UserId::new(42)));
        assert!(UserId::from_str("forty-two").is_err());
    }

    #[test]
    fn user_id_serializes_as_plain_number() {
        let encoded = serde_json::to_string(&UserId::new(42));
        assert_eq!(encoded.ok().as_deref(), Some("42"));
    }
}
