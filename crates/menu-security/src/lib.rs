//! # Menu Security
//! 
//! Credential hashing and session tokens for the admin surface.

pub mod password;
pub mod session;
pub mod token;

pub use password::{PasswordError, PasswordService};
pub use session::Session;
pub use token::{SessionClaims, TokenError, TokenService};
