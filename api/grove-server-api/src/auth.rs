use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::{AppState, ServiceError};

/// Guards back-office endpoints with the shared admin token.
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if is_admin(&parts.headers, state) {
            Ok(AdminAuth)
        } else {
            Err(ServiceError::Unauthorized("Unauthorized".to_string()))
        }
    }
}

pub fn is_admin(headers: &HeaderMap, state: &AppState) -> bool {
    let Some(expected) = state.admin_token.as_deref() else {
        return true;
    };
    if let Some(header) = headers.get(AUTHORIZATION)
        && let Ok(value) = header.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        return token.trim() == expected;
    }
    false
}
