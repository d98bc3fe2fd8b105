use std::fmt;

use crate::user::errors::EmailError;

/// User entity as persisted by the repository.
///
/// Carries the password hash only, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: String,
    pub password_hash: String,
}

/// User that has not been persisted yet; the repository assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub name: String,
    pub password_hash: String,
}

impl NewUser {
    /// Attach the id assigned by storage.
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
        }
    }
}

/// User identifier assigned by storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. A bare address
/// is required; display-name forms such as `Name <a@a.ru>` are rejected.
/// Stored as given; comparisons are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let options = email_address::Options::default().without_display_text();
        email_address::EmailAddress::parse_with_options(&email, options)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated registration input.
///
/// Holds the plaintext password only until the service has hashed it.
#[derive(Debug)]
pub struct RegistrationRequest {
    pub email: EmailAddress,
    pub name: String,
    pub password: String,
}

/// Validated login input.
#[derive(Debug)]
pub struct LoginRequest {
    pub email: EmailAddress,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_accepts_well_formed() {
        let email = EmailAddress::new("a@a.ru".to_string()).unwrap();
        assert_eq!(email.as_str(), "a@a.ru");
    }

    #[test]
    fn test_email_rejects_malformed() {
        for raw in ["", "not-an-email", "a@", "@a.ru"] {
            assert!(
                EmailAddress::new(raw.to_string()).is_err(),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_email_rejects_display_name() {
        for raw in ["Name <a@a.ru>", "Alice <a@a.ru>", "<a@a.ru>"] {
            assert!(
                EmailAddress::new(raw.to_string()).is_err(),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_email_keeps_case() {
        let email = EmailAddress::new("Alice@Example.com".to_string()).unwrap();
        assert_eq!(email.as_str(), "Alice@Example.com");
        assert_ne!(email, EmailAddress::new("alice@example.com".to_string()).unwrap());
    }

    #[test]
    fn test_new_user_with_id() {
        let new_user = NewUser {
            email: EmailAddress::new("a@a.ru".to_string()).unwrap(),
            name: "Test".to_string(),
            password_hash: "$argon2id$hash".to_string(),
        };

        let user = new_user.with_id(UserId(1));
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.name, "Test");
        assert_eq!(user.password_hash, "$argon2id$hash");
    }
}
