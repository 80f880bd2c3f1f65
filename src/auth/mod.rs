//! Authentication and authorization
//!
//! - [`password`]: Argon2id hashing
//! - [`jwt`]: access/refresh token issuance and validation
//! - [`service`]: account lifecycle and the ordered capability chain
//! - [`extract`]: axum extractors that run the chain per request

pub mod extract;
pub mod jwt;
pub mod password;
pub mod service;

pub use extract::{AdminUser, AuthUser};
pub use jwt::{Claims, JwtConfig, JwtService, TokenPair, TokenType};
pub use service::{ADMIN_CHAIN, AuthResponse, AuthService, Gate, Principal, USER_CHAIN, create_admin};
