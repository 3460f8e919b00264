use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.id,
            email: claims.email,
        }
    }
}

/// Decoded caller identity, attached to every request by `attach_identity`.
/// Anonymous when no token was sent or the token failed verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity(Option<CurrentUser>);

impl Identity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(user: CurrentUser) -> Self {
        Self(Some(user))
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.0.as_ref()
    }

    pub fn require(&self) -> Result<&CurrentUser, AppError> {
        self.0.as_ref().ok_or(AppError::NotAuthenticated)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().unwrap_or_default())
    }
}
