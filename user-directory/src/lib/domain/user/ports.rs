use async_trait::async_trait;

use crate::domain::user::models::LoginRequest;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegistrationRequest;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Port for user directory operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `request` - Validated registration input with plaintext password
    ///
    /// # Returns
    /// Created user, or `None` when the email is already registered
    ///
    /// # Errors
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, request: RegistrationRequest) -> Result<Option<User>, UserError>;

    /// Check login credentials.
    ///
    /// # Returns
    /// `true` only if the user exists and the password matches. An unknown
    /// email and a wrong password are both `false`.
    ///
    /// # Errors
    /// * `Password` - Stored hash is corrupt
    /// * `DatabaseError` - Database operation failed
    async fn validate_user(&self, request: LoginRequest) -> Result<bool, UserError>;

    /// Look up the user behind an authenticated email.
    ///
    /// # Returns
    /// User, or `None` if it no longer exists
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_user_info(&self, email: &str) -> Result<Option<User>, UserError>;
}

/// Persistence operations for users, keyed by unique email.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Persist a new user and assign its id.
    ///
    /// Must be atomic with respect to the email uniqueness check.
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;
}
