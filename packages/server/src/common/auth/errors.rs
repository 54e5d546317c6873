use thiserror::Error;

/// Authorization errors for the content console
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Admin access required")]
    AdminRequired,
}
