/// Authentication and authorization utilities
///
/// This module provides the secure authentication primitives for Norma:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: request authentication context for axum
/// - [`authorization`]: membership and role checks
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with access/refresh token pair
/// - **Constant-time Comparison**: verification uses constant-time operations

pub mod password;
pub mod jwt;
pub mod middleware;
pub mod authorization;
