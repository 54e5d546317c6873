//! Auth domain data types

use serde::Serialize;

use super::jwt::Claims;
use crate::common::AuthError;

/// Authenticated caller information from a verified JWT
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub subject: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            is_admin: claims.is_admin,
        }
    }
}

/// Who is calling, as established by the auth middleware
///
/// A request that presents a token which fails verification is kept distinct
/// from one that presents none, so the gateway can say which it was.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caller {
    #[default]
    Anonymous,
    InvalidToken,
    Authenticated(AuthUser),
}

impl Caller {
    pub fn user(&self) -> Result<&AuthUser, AuthError> {
        match self {
            Caller::Authenticated(user) => Ok(user),
            Caller::InvalidToken => Err(AuthError::InvalidToken),
            Caller::Anonymous => Err(AuthError::AuthenticationRequired),
        }
    }
}
