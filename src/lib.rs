use actix_cors::Cors;
use actix_files::NamedFile;
use actix_web::http::KeepAlive;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod document;
pub mod fut;
pub mod listing;
pub mod notify;
pub mod pagination;
pub mod remote;
pub mod school;
pub mod state;
pub mod validation;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Every `/api` route. Shared by the server and the integration tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(fut::config)
        .configure(school::config)
        .configure(auth::routes::config);
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::fut::handlers::list_fut_requests,
        crate::fut::handlers::search_fut_requests,
        crate::fut::handlers::fut_statistics,
        crate::fut::handlers::fut_catalog,
        crate::fut::handlers::create_fut_request,
        crate::fut::handlers::get_fut_request,
        crate::fut::handlers::update_fut_request,
        crate::fut::handlers::delete_fut_request,
        crate::fut::handlers::download_fut_document,
        crate::fut::handlers::upload_attachments,
        crate::school::handlers::list_classrooms,
        crate::school::handlers::create_classroom,
        crate::school::handlers::update_classroom,
        crate::school::handlers::delete_classroom,
        crate::school::handlers::list_teacher_assignments,
        crate::school::handlers::create_teacher_assignment,
        crate::school::handlers::update_teacher_assignment,
        crate::school::handlers::delete_teacher_assignment,
        crate::school::handlers::list_students,
        crate::school::handlers::create_student,
        crate::school::handlers::update_student,
        crate::school::handlers::delete_student,
        crate::school::handlers::list_enrollments,
        crate::school::handlers::create_enrollment,
        crate::school::handlers::update_enrollment,
        crate::school::handlers::delete_enrollment,
        crate::auth::routes::get_routes,
        crate::auth::routes::check_route
    ),
    components(
        schemas(
            fut::model::FutRequest,
            fut::model::FutRequestDraft,
            fut::model::AttachedDocument,
            fut::model::FutStatistics,
            fut::model::RequestType,
            fut::model::UrgencyLevel,
            fut::model::FutStatus,
            fut::display::FutCatalog,
            fut::display::BadgeConfig,
            fut::display::Icon,
            fut::handlers::UploadAttachmentsRequest,
            document::ComposeSummary,
            school::model::Student,
            school::model::StudentPayload,
            school::model::Classroom,
            school::model::ClassroomPayload,
            school::model::TeacherAssignment,
            school::model::TeacherAssignmentPayload,
            school::model::Enrollment,
            school::model::EnrollmentPayload,
            school::enrich::ClassroomView,
            school::enrich::AssignmentView,
            school::enrich::EnrollmentView,
            auth::model::Role,
            auth::model::RoleCategory,
            auth::model::RouteEntry,
            auth::model::RoutesResponse,
            auth::model::RouteAccess,
            notify::Notification,
            notify::NotificationKind,
            listing::SortOrder,
            ErrorResponse,
        )
    ),
    tags(
        (name = "FUT Service", description = "FUT request registry and printable form."),
        (name = "School Service", description = "Classrooms, teacher assignments, students and enrollments."),
        (name = "Routes", description = "Role-based page access.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

async fn unauthorized_page(data: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    let path = data.config.static_dir.join("unauthorized.html");
    Ok(NamedFile::open_async(path).await?)
}

/// Loads the registry, the student roster and the origin institution so the
/// first requests are served from memory. Failures only get logged; the
/// registry logs successful loads itself.
pub async fn preload(state: &AppState) {
    if let Err(e) = state.fut.load().await {
        log::error!("Failed to load FUT requests: {}", e);
    }
    if let Err(e) = state.fut.load_students().await {
        log::error!("Failed to load students: {}", e);
    }
    if state.fut.load_origin_institution().await.is_none() {
        log::warn!("No origin institution available, documents will use the default header");
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let bind = (config.bind_address.clone(), config.port);
    let allowed_origins = config.allowed_origins.clone();

    let state = AppState::new(config)?;
    preload(&state).await;
    let app_state = web::Data::new(state);

    let prometheus = PrometheusMetricsBuilder::new("eduassist_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let origins = allowed_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                origin
                    .to_str()
                    .map(|o| origins.iter().any(|allowed| allowed == o))
                    .unwrap_or(false)
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(configure_api))
            .route(
                auth::UNAUTHORIZED_PAGE,
                web::get().to(unauthorized_page),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .backlog(8192)
    .max_connections(25000)
    .keep_alive(KeepAlive::Os)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
