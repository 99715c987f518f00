//! # quill-auth
//!
//! Credential verification and session issuance for Quill.
//!
//! ## Modules
//!
//! - `password` - Argon2id hashing with a configurable work factor
//! - `jwt` - signed, time-limited session tokens (HS256)
//! - `session` - the register / login / logout / refetch flow
//!
//! Sessions are stateless: a token is valid until it expires, whatever
//! happens to the cookie that carried it.

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, Identity, IssuedToken, JwtDecoder, JwtEncoder, TokenError};
pub use password::PasswordHasher;
pub use session::{LoginOutcome, RegisterInput, SessionManager};
