//! Unit tests for the authentication module

use actix_web::http::{header, StatusCode};
use actix_web::test::TestRequest;
use actix_web::ResponseError;
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::auth::jwt::{generate_access_token, validate_token};
use crate::auth::middleware::{authorize, extract_token, optional_claims, AuthError, UNAUTHORIZED_PAGE};
use crate::auth::model::{Claims, Role, RoleCategory};

const SECRET: &str = "test-secret";

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[test]
fn test_generate_and_validate_access_token() {
    let token = generate_access_token(SECRET, "staff-1", "msecretaria", Role::Secretary)
        .expect("Failed to generate access token");

    let claims = validate_token(SECRET, &token).expect("Failed to validate token");

    assert_eq!(claims.sub, "staff-1");
    assert_eq!(claims.username, "msecretaria");
    assert_eq!(claims.role, Role::Secretary);
    assert_eq!(claims.token_type, "access");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = generate_access_token(SECRET, "staff-1", "msecretaria", Role::Secretary)
        .expect("Failed to generate access token");
    assert!(validate_token("other-secret", &token).is_err());
    assert!(validate_token(SECRET, "invalid.token.here").is_err());
}

#[test]
fn test_role_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&Role::Auxiliary).unwrap(), "\"AUXILIARY\"");
    let role: Role = serde_json::from_str("\"DIRECTOR\"").unwrap();
    assert_eq!(role, Role::Director);
}

#[test]
fn test_category_rules() {
    assert!(RoleCategory::Public.allows(None));
    assert!(!RoleCategory::Authenticated.allows(None));
    assert!(RoleCategory::Authenticated.allows(Some(Role::Teacher)));
    assert!(RoleCategory::Secretary.allows(Some(Role::Secretary)));
    assert!(!RoleCategory::Secretary.allows(Some(Role::Teacher)));
    assert!(!RoleCategory::Admin.allows(Some(Role::Director)));
}

#[test]
fn test_extract_token_requires_bearer_scheme() {
    let req = TestRequest::default()
        .insert_header((header::AUTHORIZATION, "Basic abc"))
        .to_http_request();
    assert_eq!(extract_token(&req), None);

    let req = TestRequest::default()
        .insert_header(bearer("abc.def"))
        .to_http_request();
    assert_eq!(extract_token(&req).as_deref(), Some("abc.def"));
}

#[test]
fn test_missing_token_is_401_json() {
    let req = TestRequest::default().to_http_request();
    let err = authorize(&req, SECRET, RoleCategory::Secretary).unwrap_err();
    assert!(matches!(err, AuthError::MissingToken));
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_wrong_role_redirects_to_unauthorized_page() {
    let token = generate_access_token(SECRET, "t-1", "profesor", Role::Teacher).unwrap();
    let req = TestRequest::default()
        .insert_header(bearer(&token))
        .to_http_request();

    let err = authorize(&req, SECRET, RoleCategory::Secretary).unwrap_err();
    let response = err.error_response();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        UNAUTHORIZED_PAGE
    );
}

#[test]
fn test_refresh_token_is_not_accepted() {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "s".into(),
        username: "u".into(),
        role: Role::Secretary,
        exp: now + 600,
        iat: now,
        token_type: "refresh".into(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    let req = TestRequest::default()
        .insert_header(bearer(&token))
        .to_http_request();
    assert!(matches!(
        authorize(&req, SECRET, RoleCategory::Secretary),
        Err(AuthError::WrongTokenType)
    ));
}

#[test]
fn test_public_and_optional_access() {
    let req = TestRequest::default().to_http_request();
    assert!(authorize(&req, SECRET, RoleCategory::Public).unwrap().is_none());
    assert!(optional_claims(&req, SECRET).unwrap().is_none());

    let req = TestRequest::default()
        .insert_header(bearer("garbage"))
        .to_http_request();
    assert!(matches!(
        optional_claims(&req, SECRET),
        Err(AuthError::InvalidToken)
    ));
}
