//! Auth domain - bearer-token verification and the admin gateway
//!
//! Responsibilities:
//! - JWT verification (issuance only for tooling and tests)
//! - Caller identity as established per request
//! - Capability checks in front of privileged store operations

pub mod gateway;
pub mod jwt;
pub mod types;

pub use gateway::{AdminGateway, ContentEditor, HiddenReader};
pub use jwt::{Claims, JwtService};
pub use types::{AuthUser, Caller};
