#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use auth::HashingCost;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth::TokenIssuer;
use mockall::mock;
use user_directory::domain::user::errors::UserError;
use user_directory::domain::user::models::LoginRequest;
use user_directory::domain::user::models::RegistrationRequest;
use user_directory::domain::user::models::User;
use user_directory::domain::user::ports::UserServicePort;
use user_directory::domain::user::service::UserService;
use user_directory::inbound::http::router::create_router;
use user_directory::outbound::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

mock! {
    pub UserService {}

    #[async_trait]
    impl UserServicePort for UserService {
        async fn create_user(&self, request: RegistrationRequest) -> Result<Option<User>, UserError>;
        async fn validate_user(&self, request: LoginRequest) -> Result<bool, UserError>;
        async fn get_user_info(&self, email: &str) -> Result<Option<User>, UserError>;
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: InMemoryUserRepository,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application backed by an in-memory repository
    pub async fn spawn() -> Self {
        let repository = InMemoryUserRepository::new();

        // Cheap cost keeps the suite fast
        let password_hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to create password hasher");

        let user_service = Arc::new(UserService::new(
            Arc::new(repository.clone()),
            password_hasher,
        ));

        Self::spawn_with(user_service, repository).await
    }

    /// Spawn the application in front of a mocked user service
    pub async fn spawn_with_service(user_service: MockUserService) -> Self {
        Self::spawn_with(Arc::new(user_service), InMemoryUserRepository::new()).await
    }

    async fn spawn_with(
        user_service: Arc<dyn UserServicePort>,
        repository: InMemoryUserRepository,
    ) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let token_issuer = Arc::new(TokenIssuer::new(TEST_SECRET).with_expiration_hours(24));

        let router = create_router(user_service, token_issuer);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response
    pub async fn register(&self, email: &str, name: &str, password: &str) -> reqwest::Response {
        self.post("/register")
            .json(&serde_json::json!({
                "email": email,
                "name": name,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
