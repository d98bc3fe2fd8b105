use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use tokio::sync::OnceCell;

use crate::domain::user::models::LoginRequest;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegistrationRequest;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Domain service implementation for user operations.
///
/// Hashing and verification run on the blocking pool so a slow Argon2 call
/// does not stall other in-flight requests.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
    decoy_hash: OnceCell<String>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `password_hasher` - Hasher configured with the deployment's cost
    pub fn new(repository: Arc<UR>, password_hasher: PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
            decoy_hash: OnceCell::new(),
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let hasher = self.password_hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;
        Ok(hash)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, UserError> {
        let hasher = self.password_hasher.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await??;
        Ok(is_valid)
    }

    /// Hash compared against when the email is unknown, so that path costs
    /// the same as a wrong password.
    async fn decoy_hash(&self) -> Result<String, UserError> {
        self.decoy_hash
            .get_or_try_init(|| self.hash_password(DECOY_PASSWORD.to_string()))
            .await
            .cloned()
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, request: RegistrationRequest) -> Result<Option<User>, UserError> {
        let password_hash = self.hash_password(request.password).await?;

        let new_user = NewUser {
            email: request.email,
            name: request.name,
            password_hash,
        };

        match self.repository.create(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User registered");
                Ok(Some(user))
            }
            Err(UserError::EmailAlreadyExists(_)) => {
                tracing::debug!("Registration rejected: email already registered");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn validate_user(&self, request: LoginRequest) -> Result<bool, UserError> {
        match self.repository.find(request.email.as_str()).await? {
            Some(user) => {
                self.verify_password(request.password, user.password_hash)
                    .await
            }
            None => {
                let decoy_hash = self.decoy_hash().await?;
                self.verify_password(request.password, decoy_hash).await?;
                Ok(false)
            }
        }
    }

    async fn get_user_info(&self, email: &str) -> Result<Option<User>, UserError> {
        self.repository.find(email).await
    }
}
