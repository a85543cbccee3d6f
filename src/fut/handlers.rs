use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::Path;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use log::{error, info, warn};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::display::FutCatalog;
use super::filter::FutFilter;
use super::model::{AttachedDocument, FutRequest, FutRequestDraft, FutStatistics};
use super::multipart_parser::MultipartParser;
use super::registry::RegistryError;
use crate::auth::{authorize, RoleCategory};
use crate::document::logo::is_remote_url;
use crate::document::{ComposeOutcome, ComposeSummary, COMPOSE_FAILED};
use crate::notify::{ActionResponse, ToastCollector};
use crate::pagination::{paginate, Paginated};
use crate::{AppState, ErrorResponse};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FutListQuery {
    /// Substring of the request number
    pub search: Option<String>,
    /// PENDIENTE, APROBADO, RECHAZADO, COMPLETADO or `all`
    pub status: Option<String>,
    /// ALTA, MEDIA, BAJA or `all`
    pub urgency: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// Reload from the service before filtering
    pub refresh: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FutSearchQuery {
    pub term: Option<String>,
}

/// Multipart body of the attachment upload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadAttachmentsRequest {
    #[allow(unused)]
    pub files: Vec<Vec<u8>>,
}

fn bad_gateway(message: &str) -> HttpResponse {
    HttpResponse::BadGateway().json(ErrorResponse::new("BadGateway", message))
}

fn registry_error_response<T: serde::Serialize>(
    err: RegistryError,
    toasts: &ToastCollector,
) -> HttpResponse {
    let body = ActionResponse::<T>::failed(err.to_string(), toasts);
    match err {
        RegistryError::Validation(_) => HttpResponse::BadRequest().json(body),
        RegistryError::NotFound(_) => HttpResponse::NotFound().json(body),
        RegistryError::Remote { .. } => HttpResponse::BadGateway().json(body),
    }
}

/// Loads the list on first use; later calls read the held copy.
async fn ensure_loaded(data: &AppState, force: bool) -> Result<(), RegistryError> {
    if force || !data.fut.is_loaded() {
        data.fut.load().await?;
    }
    Ok(())
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    get,
    path = "/fut",
    params(FutListQuery),
    responses(
        (status = 200, description = "Filtered page of FUT requests", body = Paginated<FutRequest>),
        (status = 400, description = "Unknown status or urgency", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 502, description = "Upstream service failed", body = ErrorResponse)
    )
)]
pub async fn list_fut_requests(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<FutListQuery>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let filter = match FutFilter::parse(
        query.search.as_deref(),
        query.status.as_deref(),
        query.urgency.as_deref(),
    ) {
        Ok(filter) => filter,
        Err(e) => return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string())),
    };
    if let Err(e) = ensure_loaded(&data, query.refresh.unwrap_or(false)).await {
        return bad_gateway(&e.to_string());
    }

    let filtered = data.fut.filtered(&filter);
    info!(
        "Listing FUT requests: {} match {:?}",
        filtered.len(),
        filter
    );
    HttpResponse::Ok().json(paginate(&filtered, query.page, query.per_page))
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    get,
    path = "/fut/search",
    params(FutSearchQuery),
    responses(
        (status = 200, description = "Requests whose number contains the term", body = Vec<FutRequest>),
        (status = 502, description = "Upstream service failed", body = ErrorResponse)
    )
)]
pub async fn search_fut_requests(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<FutSearchQuery>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let term = query.term.as_deref().unwrap_or("");
    if !term.trim().is_empty() {
        if let Err(e) = ensure_loaded(&data, false).await {
            return bad_gateway(&e.to_string());
        }
    }
    match data.fut.search(term).await {
        Ok(requests) => HttpResponse::Ok().json(requests),
        Err(e) => bad_gateway(&e.to_string()),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    get,
    path = "/fut/statistics",
    responses(
        (status = 200, description = "Counts per status", body = FutStatistics),
        (status = 502, description = "Upstream service failed", body = ErrorResponse)
    )
)]
pub async fn fut_statistics(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    if let Err(e) = ensure_loaded(&data, false).await {
        return bad_gateway(&e.to_string());
    }
    HttpResponse::Ok().json(data.fut.statistics())
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    get,
    path = "/fut/catalog",
    responses(
        (status = 200, description = "Request types, urgency levels and statuses with display settings", body = FutCatalog)
    )
)]
pub async fn fut_catalog(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    HttpResponse::Ok().json(FutCatalog::build())
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    post,
    path = "/fut",
    request_body = FutRequestDraft,
    responses(
        (status = 201, description = "Request created", body = ActionResponse<FutRequest>),
        (status = 400, description = "Validation failed", body = ActionResponse<FutRequest>),
        (status = 502, description = "Upstream service failed", body = ActionResponse<FutRequest>)
    )
)]
pub async fn create_fut_request(
    req: HttpRequest,
    data: web::Data<AppState>,
    draft: web::Json<FutRequestDraft>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    match data.fut.create(draft.into_inner(), &toasts).await {
        Ok(created) => HttpResponse::Created().json(ActionResponse::ok(Some(created), &toasts)),
        Err(e) => {
            warn!("FUT request not created: {}", e);
            registry_error_response::<FutRequest>(e, &toasts)
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    get,
    path = "/fut/{id}",
    params(("id" = String, Path, description = "FUT request id")),
    responses(
        (status = 200, description = "Request found", body = FutRequest),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 502, description = "Upstream service failed", body = ErrorResponse)
    )
)]
pub async fn get_fut_request(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    match data.fut.fetch(&id).await {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(RegistryError::NotFound(_)) => HttpResponse::NotFound()
            .json(ErrorResponse::not_found(&format!("Solicitud FUT {} no encontrada", id))),
        Err(e) => bad_gateway(&e.to_string()),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    put,
    path = "/fut/{id}",
    params(("id" = String, Path, description = "FUT request id")),
    request_body = FutRequestDraft,
    responses(
        (status = 200, description = "Request updated", body = ActionResponse<FutRequest>),
        (status = 400, description = "Validation failed", body = ActionResponse<FutRequest>),
        (status = 404, description = "Request not found", body = ActionResponse<FutRequest>),
        (status = 502, description = "Upstream service failed", body = ActionResponse<FutRequest>)
    )
)]
pub async fn update_fut_request(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
    draft: web::Json<FutRequestDraft>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    match data.fut.update(&id, draft.into_inner(), &toasts).await {
        Ok(updated) => HttpResponse::Ok().json(ActionResponse::ok(Some(updated), &toasts)),
        Err(e) => {
            warn!("FUT request {} not updated: {}", id, e);
            registry_error_response::<FutRequest>(e, &toasts)
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    delete,
    path = "/fut/{id}",
    params(("id" = String, Path, description = "FUT request id")),
    responses(
        (status = 200, description = "Request deleted", body = ActionResponse<FutRequest>),
        (status = 404, description = "Request not found", body = ActionResponse<FutRequest>),
        (status = 502, description = "Upstream service failed", body = ActionResponse<FutRequest>)
    )
)]
pub async fn delete_fut_request(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    match data.fut.delete(&id, &toasts).await {
        Ok(()) => HttpResponse::Ok().json(ActionResponse::<FutRequest>::ok(None, &toasts)),
        Err(e) => registry_error_response::<FutRequest>(e, &toasts),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    get,
    path = "/fut/{id}/document",
    params(("id" = String, Path, description = "FUT request id")),
    responses(
        (status = 200, description = "Printable FUT form", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 500, description = "Document could not be generated", body = ComposeSummary)
    )
)]
pub async fn download_fut_document(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let request = match data.fut.fetch(&id).await {
        Ok(request) => request,
        Err(RegistryError::NotFound(_)) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::not_found(&format!("Solicitud FUT {} no encontrada", id)))
        }
        Err(e) => return bad_gateway(&e.to_string()),
    };

    if data.fut.student(&request.student_enrollment_id).await.is_none() {
        warn!("Composing FUT {} without student data", id);
    }
    let students = data.fut.students();
    let institution = match data.fut.origin_institution() {
        Some(institution) => Some(institution),
        None => data.fut.load_origin_institution().await,
    };
    let logo = match institution.as_ref().and_then(|i| i.logo.as_deref()) {
        Some(url) if is_remote_url(url) => data.fut.fetch_logo(url).await,
        _ => None,
    };

    let composer = data.composer;
    let outcome = web::block(move || {
        composer.compose_with_logo(&request, &students, institution.as_ref(), logo.as_deref())
    })
    .await;

    match outcome {
        Ok(ComposeOutcome::Generated(document)) => {
            info!("Serving {} ({} bytes)", document.file_name, document.pdf.len());
            HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(document.file_name)],
                })
                .body(document.pdf)
        }
        Ok(failed @ ComposeOutcome::Failed { .. }) => {
            HttpResponse::InternalServerError().json(failed.summary())
        }
        Err(e) => {
            error!("Document composition task failed: {}", e);
            HttpResponse::InternalServerError().json(ComposeOutcome::failed(COMPOSE_FAILED).summary())
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "FUT Service",
    post,
    path = "/fut/attachments",
    request_body(content = inline(UploadAttachmentsRequest), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Metadata keyed by attachment id", body = std::collections::BTreeMap<String, AttachedDocument>),
        (status = 400, description = "No files, unsupported format or file too large", body = ErrorResponse)
    )
)]
pub async fn upload_attachments(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let now = chrono::Utc::now().timestamp_millis();
    match MultipartParser::parse_attachments(payload, now).await {
        Ok(documents) => HttpResponse::Ok().json(documents),
        Err(e) => {
            warn!("Attachment upload rejected: {}", e);
            e.into()
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/fut")
            .route(web::get().to(list_fut_requests))
            .route(web::post().to(create_fut_request)),
    )
    .service(web::resource("/fut/search").route(web::get().to(search_fut_requests)))
    .service(web::resource("/fut/statistics").route(web::get().to(fut_statistics)))
    .service(web::resource("/fut/catalog").route(web::get().to(fut_catalog)))
    .service(web::resource("/fut/attachments").route(web::post().to(upload_attachments)))
    .service(
        web::resource("/fut/{id}")
            .route(web::get().to(get_fut_request))
            .route(web::put().to(update_fut_request))
            .route(web::delete().to(delete_fut_request)),
    )
    .service(web::resource("/fut/{id}/document").route(web::get().to(download_fut_document)));
}
