//! Page routes of the back office and the role each one requires.

use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use serde::Deserialize;
use utoipa::IntoParams;

use super::middleware::{authorize, optional_claims};
use super::model::{Role, RoleCategory, RouteAccess, RouteEntry, RoutesResponse};
use crate::{AppState, ErrorResponse};

/// Prefix every page path is served under.
pub const BASENAME: &str = "/school";

use RoleCategory::{Admin, Auxiliary, Authenticated, Director, Public, Secretary, Teacher};

#[rustfmt::skip]
pub const ROUTE_TABLE: &[(&str, RoleCategory)] = &[
    ("/", Public),
    ("/login", Public),
    ("/reset-password", Public),
    ("/forgot-password", Public),
    ("/unauthorized", Public),
    ("/dashboard", Authenticated),
    ("/edit-profile", Authenticated),
    ("/admin/institution", Admin),
    ("/admin/institution/add", Admin),
    ("/admin/institution/edit/:id", Admin),
    ("/admin/institution/:institutionId/headquarters", Admin),
    ("/admin/institution/:institutionId/headquarters/add", Admin),
    ("/admin/institution/:institutionId/headquarters/edit/:id", Admin),
    ("/admin/institution/reports", Admin),
    ("/admin/admin-director/users", Admin),
    ("/admin/admin-director/users/create", Admin),
    ("/admin/admin-director/users/:keycloakId/view", Admin),
    ("/admin/admin-director/users/:keycloakId/edit", Admin),
    ("/director/institution", Director),
    ("/director/headquarters", Director),
    ("/director/headquarters/add", Director),
    ("/director/headquarters/edit/:id", Director),
    ("/director/reports", Director),
    ("/admin/admin-director/director-personal", Director),
    ("/admin/admin-director/director-personal/create", Director),
    ("/admin/admin-director/director-personal/:keycloakId/view", Director),
    ("/admin/admin-director/director-personal/:keycloakId/edit", Director),
    ("/admin-director/user-institution", Director),
    ("/admin-director/user-institution/create", Director),
    ("/admin-director/user-institution/view/:userId", Director),
    ("/admin-director/user-institution/edit/:userId", Director),
    ("/teacher/leave", Teacher),
    ("/teacher/grades", Teacher),
    ("/teacher/notifications", Teacher),
    ("/teacher/my-assignments", Teacher),
    ("/auxiliary/maintenance", Auxiliary),
    ("/auxiliary/attendance", Auxiliary),
    ("/auxiliary/justifications", Auxiliary),
    ("/secretary/forms", Secretary),
    ("/fut", Secretary),
    ("/secretary/students", Secretary),
    ("/secretary/students/add", Secretary),
    ("/secretary/students/edit/:id", Secretary),
    ("/secretary/students/:studentId/enrollments", Secretary),
    ("/secretary/students/bulk-import", Secretary),
    ("/secretary/enrollments", Secretary),
    ("/secretary/enrollments/add", Secretary),
    ("/secretary/enrollments/edit/:id", Secretary),
    ("/secretary/enrollments/analytics", Secretary),
    ("/secretary/academic/dashboard", Secretary),
    ("/secretary/courses", Secretary),
    ("/secretary/periods", Secretary),
    ("/secretary/classrooms", Secretary),
    ("/secretary/teacher-assignments", Secretary),
];

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// `:name` segments match any single non-empty segment.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let expected = segments(pattern);
    let actual = segments(path);
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(&actual)
            .all(|(want, got)| want.starts_with(':') || want == got)
}

/// Category of a page path, with or without the `/school` prefix. Literal
/// routes win over parameterised ones.
pub fn category_for(path: &str) -> Option<RoleCategory> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let path = match path.strip_prefix(BASENAME) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    };
    ROUTE_TABLE
        .iter()
        .filter(|(pattern, _)| pattern_matches(pattern, path))
        .min_by_key(|(pattern, _)| pattern.matches(':').count())
        .map(|(_, category)| *category)
}

/// Pages a caller may open, prefixed with the basename.
pub fn accessible_routes(role: Option<Role>) -> Vec<RouteEntry> {
    ROUTE_TABLE
        .iter()
        .filter(|(_, category)| category.allows(role))
        .map(|(pattern, category)| RouteEntry {
            path: match *pattern {
                "/" => BASENAME.to_string(),
                other => format!("{}{}", BASENAME, other),
            },
            category: *category,
        })
        .collect()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RouteCheckQuery {
    /// Page path, e.g. `/school/fut`
    pub path: String,
}

#[utoipa::path(
    get,
    context_path = "/api",
    path = "/routes",
    tag = "Routes",
    responses(
        (status = 200, description = "Pages the caller may open", body = RoutesResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn get_routes(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let claims = match optional_claims(&req, &data.config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => return e.error_response(),
    };
    let role = claims.map(|c| c.role);
    HttpResponse::Ok().json(RoutesResponse {
        role,
        routes: accessible_routes(role),
    })
}

#[utoipa::path(
    get,
    context_path = "/api",
    path = "/routes/check",
    tag = "Routes",
    params(RouteCheckQuery),
    responses(
        (status = 200, description = "Caller may open the page", body = RouteAccess),
        (status = 302, description = "Role not allowed, redirect to /unauthorized"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Unknown page", body = ErrorResponse)
    )
)]
pub async fn check_route(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<RouteCheckQuery>,
) -> impl Responder {
    let Some(category) = category_for(&query.path) else {
        return HttpResponse::NotFound()
            .json(ErrorResponse::not_found(&format!("Unknown page {}", query.path)));
    };
    match authorize(&req, &data.config.jwt_secret, category) {
        Ok(_) => HttpResponse::Ok().json(RouteAccess {
            path: query.path.clone(),
            category,
            allowed: true,
        }),
        Err(e) => e.error_response(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/routes").route(web::get().to(get_routes)))
        .service(web::resource("/routes/check").route(web::get().to(check_route)));
}
