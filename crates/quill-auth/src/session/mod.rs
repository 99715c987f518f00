//! The register / login / logout / refetch flow.

pub mod manager;

pub use manager::{LoginOutcome, RegisterInput, SessionManager};
