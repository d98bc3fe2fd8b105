//! Credential utilities for the user directory.
//!
//! - Password hashing (Argon2id)
//! - Access token issuing and verification (HS256 JWT)
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("other", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let token = issuer.issue("a@a.ru").unwrap();
//! let claims = issuer.verify(&token).unwrap();
//! assert_eq!(claims.email, "a@a.ru");
//! ```

pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenClaims;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenIssuer;
