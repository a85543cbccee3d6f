use actix_web::http::{header, StatusCode};
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use super::jwt::validate_token;
use super::model::{Claims, RoleCategory};
use crate::ErrorResponse;

/// Page the browser is sent to when its role may not open a route.
pub const UNAUTHORIZED_PAGE: &str = "/unauthorized";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid token type")]
    WrongTokenType,
    #[error("Role {role} may not access this resource")]
    Forbidden { role: &'static str },
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden { .. } => StatusCode::FOUND,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::Forbidden { .. } => HttpResponse::Found()
                .insert_header((header::LOCATION, UNAUTHORIZED_PAGE))
                .finish(),
            _ => HttpResponse::Unauthorized()
                .json(ErrorResponse::new("Unauthorized", &self.to_string())),
        }
    }
}

/// Extract token from Authorization header
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Validate token from HttpRequest and return claims
pub fn validate_request_token(req: &HttpRequest, secret: &str) -> Result<Claims, AuthError> {
    let token = extract_token(req).ok_or(AuthError::MissingToken)?;

    let claims = validate_token(secret, &token).map_err(|e| {
        log::warn!("Token validation failed: {:?}", e);
        AuthError::InvalidToken
    })?;

    if claims.token_type != "access" {
        return Err(AuthError::WrongTokenType);
    }

    Ok(claims)
}

/// Claims of a caller allowed into `category`. Public categories accept
/// anonymous callers and yield `None`.
pub fn authorize(
    req: &HttpRequest,
    secret: &str,
    category: RoleCategory,
) -> Result<Option<Claims>, AuthError> {
    if !category.requires_session() {
        return Ok(None);
    }
    let claims = validate_request_token(req, secret)?;
    if !category.allows(Some(claims.role)) {
        log::warn!(
            "User {} with role {} denied access to {:?} resource {}",
            claims.username,
            claims.role.as_str(),
            category,
            req.path()
        );
        return Err(AuthError::Forbidden {
            role: claims.role.as_str(),
        });
    }
    Ok(Some(claims))
}

/// Claims when a token is present, `None` for anonymous callers; a bad
/// token is still an error.
pub fn optional_claims(req: &HttpRequest, secret: &str) -> Result<Option<Claims>, AuthError> {
    if extract_token(req).is_none() {
        return Ok(None);
    }
    validate_request_token(req, secret).map(Some)
}
