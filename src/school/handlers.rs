//! List and mutation endpoints of the secretary's school screens.
//!
//! Lists load the main collection plus the reference lists it points at,
//! then run enrich, status filter, search, sort and paginate in that order.
//! A reference list that fails to load is treated as empty. Mutations are
//! validated before anything is sent upstream.

use actix_web::web::Path;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use log::{error, info, warn};
use serde::Serialize;

use super::enrich::{
    enrich_assignments, enrich_classrooms, enrich_enrollments, sort_assignments, sort_classrooms,
    sort_enrollments, sort_students, AssignmentView, ClassroomView, EnrollmentView,
};
use super::model::{
    ClassroomPayload, EnrollmentPayload, Student, StudentPayload, TeacherAssignmentPayload,
};
use super::validation::{
    normalize_assignment, normalize_classroom, validate_assignment, validate_classroom,
    validate_enrollment, validate_student,
};
use crate::auth::{authorize, RoleCategory};
use crate::listing::{filter_by_status, search_items, ListQuery};
use crate::notify::{ActionResponse, Notifier, ToastCollector};
use crate::pagination::{paginate, Paginated};
use crate::remote::{CrudService, RemoteError};
use crate::validation::ValidationErrors;
use crate::{AppState, ErrorResponse};

/// Toast texts of one screen.
struct Messages {
    load_failed: &'static str,
    created: &'static str,
    updated: &'static str,
    deleted: &'static str,
    create_failed: &'static str,
    update_failed: &'static str,
    delete_failed: &'static str,
}

const CLASSROOM_MESSAGES: Messages = Messages {
    load_failed: "Error al cargar las aulas",
    created: "Aula creada exitosamente",
    updated: "Aula actualizada exitosamente",
    deleted: "Aula eliminada exitosamente",
    create_failed: "Error al crear el aula",
    update_failed: "Error al actualizar el aula",
    delete_failed: "Error al eliminar el aula",
};

const ASSIGNMENT_MESSAGES: Messages = Messages {
    load_failed: "Error al cargar las asignaciones",
    created: "Asignación creada exitosamente",
    updated: "Asignación actualizada exitosamente",
    deleted: "Asignación eliminada exitosamente",
    create_failed: "Error al crear la asignación",
    update_failed: "Error al actualizar la asignación",
    delete_failed: "Error al eliminar la asignación",
};

const STUDENT_MESSAGES: Messages = Messages {
    load_failed: "Error al cargar los estudiantes",
    created: "Estudiante registrado exitosamente",
    updated: "Estudiante actualizado exitosamente",
    deleted: "Estudiante eliminado exitosamente",
    create_failed: "Error al registrar el estudiante",
    update_failed: "Error al actualizar el estudiante",
    delete_failed: "Error al eliminar el estudiante",
};

const ENROLLMENT_MESSAGES: Messages = Messages {
    load_failed: "Error al cargar las matrículas",
    created: "Matrícula creada exitosamente",
    updated: "Matrícula actualizada exitosamente",
    deleted: "Matrícula eliminada exitosamente",
    create_failed: "Error al crear la matrícula",
    update_failed: "Error al actualizar la matrícula",
    delete_failed: "Error al eliminar la matrícula",
};

async fn load_reference<T, P>(service: &dyn CrudService<T, P>, what: &str) -> Vec<T>
where
    T: Send + 'static,
    P: Send + Sync + 'static,
{
    match service.get_all().await {
        Ok(items) => items,
        Err(e) => {
            warn!("Could not load {}, continuing without it: {}", what, e);
            Vec::new()
        }
    }
}

fn load_failed(err: RemoteError, messages: &Messages) -> HttpResponse {
    error!("{}: {}", messages.load_failed, err);
    HttpResponse::BadGateway().json(ErrorResponse::new(
        "BadGateway",
        &err.user_message(messages.load_failed),
    ))
}

/// Filter, search, sort and paginate an enriched list.
fn list_page<T, F>(items: Vec<T>, query: &ListQuery, sort: F) -> Paginated<T>
where
    T: crate::listing::HasStatus + crate::listing::Searchable + Clone,
    F: FnOnce(&mut [T]),
{
    let filtered = filter_by_status(&items, query.status.as_deref());
    let mut found = search_items(&filtered, query.search.as_deref().unwrap_or(""));
    sort(&mut found);
    paginate(&found, query.page, query.per_page)
}

fn rejected(errors: ValidationErrors, toasts: &ToastCollector) -> HttpResponse {
    let message = errors.joined_message();
    warn!("{}", message);
    toasts.error(&message);
    HttpResponse::BadRequest().json(ActionResponse::<()>::failed(message, toasts))
}

fn remote_failed(err: RemoteError, fallback: &str, toasts: &ToastCollector) -> HttpResponse {
    error!("{}: {}", fallback, err);
    let message = err.user_message(fallback);
    toasts.error(&message);
    let body = ActionResponse::<()>::failed(message, toasts);
    match err {
        RemoteError::NotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadGateway().json(body),
    }
}

async fn create_record<T, P>(
    service: &dyn CrudService<T, P>,
    payload: &P,
    messages: &Messages,
    toasts: &ToastCollector,
) -> HttpResponse
where
    T: Serialize + Send + 'static,
    P: Send + Sync + 'static,
{
    match service.create(payload).await {
        Ok(record) => {
            info!("{}", messages.created);
            toasts.success(messages.created);
            HttpResponse::Created().json(ActionResponse::ok(Some(record), toasts))
        }
        Err(e) => remote_failed(e, messages.create_failed, toasts),
    }
}

async fn update_record<T, P>(
    service: &dyn CrudService<T, P>,
    id: &str,
    payload: &P,
    messages: &Messages,
    toasts: &ToastCollector,
) -> HttpResponse
where
    T: Serialize + Send + 'static,
    P: Send + Sync + 'static,
{
    match service.update(id, payload).await {
        Ok(record) => {
            info!("{} ({})", messages.updated, id);
            toasts.success(messages.updated);
            HttpResponse::Ok().json(ActionResponse::ok(Some(record), toasts))
        }
        Err(e) => remote_failed(e, messages.update_failed, toasts),
    }
}

async fn delete_record<T, P>(
    service: &dyn CrudService<T, P>,
    id: &str,
    messages: &Messages,
    toasts: &ToastCollector,
) -> HttpResponse
where
    T: Send + 'static,
    P: Send + Sync + 'static,
{
    match service.delete(id).await {
        Ok(()) => {
            info!("{} ({})", messages.deleted, id);
            toasts.success(messages.deleted);
            HttpResponse::Ok().json(ActionResponse::<()>::ok(None, toasts))
        }
        Err(e) => remote_failed(e, messages.delete_failed, toasts),
    }
}

// Classrooms

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    get,
    path = "/classrooms",
    params(ListQuery),
    responses(
        (status = 200, description = "Classrooms with period and headquarter names", body = Paginated<ClassroomView>),
        (status = 502, description = "Upstream service failed", body = ErrorResponse)
    )
)]
pub async fn list_classrooms(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let school = &data.school;
    let classrooms = match school.classrooms.get_all().await {
        Ok(classrooms) => classrooms,
        Err(e) => return load_failed(e, &CLASSROOM_MESSAGES),
    };
    let periods = load_reference(school.periods.as_ref(), "periods").await;
    let headquarters = load_reference(school.headquarters.as_ref(), "headquarters").await;

    let views = enrich_classrooms(&classrooms, &periods, &headquarters);
    let order = query.order.unwrap_or_default();
    let page = list_page(views, &query, |rows| {
        sort_classrooms(rows, query.sort.as_deref(), order)
    });
    HttpResponse::Ok().json(page)
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    post,
    path = "/classrooms",
    request_body = ClassroomPayload,
    responses(
        (status = 201, description = "Classroom created", body = ActionResponse<super::model::Classroom>),
        (status = 400, description = "Validation failed", body = ActionResponse<super::model::Classroom>),
        (status = 502, description = "Upstream service failed", body = ActionResponse<super::model::Classroom>)
    )
)]
pub async fn create_classroom(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: web::Json<ClassroomPayload>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    let mut payload = payload.into_inner();
    normalize_classroom(&mut payload);
    if let Err(errors) = validate_classroom(&payload) {
        return rejected(errors, &toasts);
    }
    create_record(data.school.classrooms.as_ref(), &payload, &CLASSROOM_MESSAGES, &toasts).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    put,
    path = "/classrooms/{id}",
    params(("id" = String, Path, description = "Classroom id")),
    request_body = ClassroomPayload,
    responses(
        (status = 200, description = "Classroom updated", body = ActionResponse<super::model::Classroom>),
        (status = 400, description = "Validation failed", body = ActionResponse<super::model::Classroom>),
        (status = 404, description = "Classroom not found", body = ActionResponse<super::model::Classroom>)
    )
)]
pub async fn update_classroom(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
    payload: web::Json<ClassroomPayload>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    let mut payload = payload.into_inner();
    normalize_classroom(&mut payload);
    if let Err(errors) = validate_classroom(&payload) {
        return rejected(errors, &toasts);
    }
    update_record(data.school.classrooms.as_ref(), &id, &payload, &CLASSROOM_MESSAGES, &toasts).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    delete,
    path = "/classrooms/{id}",
    params(("id" = String, Path, description = "Classroom id")),
    responses(
        (status = 200, description = "Classroom deleted"),
        (status = 404, description = "Classroom not found")
    )
)]
pub async fn delete_classroom(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    delete_record(data.school.classrooms.as_ref(), &id, &CLASSROOM_MESSAGES, &toasts).await
}

// Teacher assignments

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    get,
    path = "/teacher-assignments",
    params(ListQuery),
    responses(
        (status = 200, description = "Assignments with teacher, course and classroom names", body = Paginated<AssignmentView>),
        (status = 502, description = "Upstream service failed", body = ErrorResponse)
    )
)]
pub async fn list_teacher_assignments(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let school = &data.school;
    let assignments = match school.assignments.get_all().await {
        Ok(assignments) => assignments,
        Err(e) => return load_failed(e, &ASSIGNMENT_MESSAGES),
    };
    let teachers = load_reference(school.teachers.as_ref(), "teachers").await;
    let courses = load_reference(school.courses.as_ref(), "courses").await;
    let classrooms = load_reference(school.classrooms.as_ref(), "classrooms").await;

    let views = enrich_assignments(&assignments, &teachers, &courses, &classrooms);
    let order = query.order.unwrap_or_default();
    let page = list_page(views, &query, |rows| {
        sort_assignments(rows, query.sort.as_deref(), order)
    });
    HttpResponse::Ok().json(page)
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    post,
    path = "/teacher-assignments",
    request_body = TeacherAssignmentPayload,
    responses(
        (status = 201, description = "Assignment created", body = ActionResponse<super::model::TeacherAssignment>),
        (status = 400, description = "Validation failed", body = ActionResponse<super::model::TeacherAssignment>),
        (status = 502, description = "Upstream service failed", body = ActionResponse<super::model::TeacherAssignment>)
    )
)]
pub async fn create_teacher_assignment(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: web::Json<TeacherAssignmentPayload>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    let mut payload = payload.into_inner();
    normalize_assignment(&mut payload);
    if let Err(errors) = validate_assignment(&payload) {
        return rejected(errors, &toasts);
    }
    create_record(data.school.assignments.as_ref(), &payload, &ASSIGNMENT_MESSAGES, &toasts).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    put,
    path = "/teacher-assignments/{id}",
    params(("id" = String, Path, description = "Assignment id")),
    request_body = TeacherAssignmentPayload,
    responses(
        (status = 200, description = "Assignment updated", body = ActionResponse<super::model::TeacherAssignment>),
        (status = 400, description = "Validation failed", body = ActionResponse<super::model::TeacherAssignment>),
        (status = 404, description = "Assignment not found", body = ActionResponse<super::model::TeacherAssignment>)
    )
)]
pub async fn update_teacher_assignment(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
    payload: web::Json<TeacherAssignmentPayload>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    let mut payload = payload.into_inner();
    normalize_assignment(&mut payload);
    if let Err(errors) = validate_assignment(&payload) {
        return rejected(errors, &toasts);
    }
    update_record(data.school.assignments.as_ref(), &id, &payload, &ASSIGNMENT_MESSAGES, &toasts)
        .await
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    delete,
    path = "/teacher-assignments/{id}",
    params(("id" = String, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Assignment deleted"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn delete_teacher_assignment(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    delete_record(data.school.assignments.as_ref(), &id, &ASSIGNMENT_MESSAGES, &toasts).await
}

// Students

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    get,
    path = "/students",
    params(ListQuery),
    responses(
        (status = 200, description = "Students", body = Paginated<Student>),
        (status = 502, description = "Upstream service failed", body = ErrorResponse)
    )
)]
pub async fn list_students(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let students = match data.school.students.get_all().await {
        Ok(students) => students,
        Err(e) => return load_failed(e, &STUDENT_MESSAGES),
    };
    let order = query.order.unwrap_or_default();
    let page = list_page(students, &query, |rows| {
        sort_students(rows, query.sort.as_deref(), order)
    });
    HttpResponse::Ok().json(page)
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    post,
    path = "/students",
    request_body = StudentPayload,
    responses(
        (status = 201, description = "Student registered", body = ActionResponse<Student>),
        (status = 400, description = "Validation failed", body = ActionResponse<Student>),
        (status = 502, description = "Upstream service failed", body = ActionResponse<Student>)
    )
)]
pub async fn create_student(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: web::Json<StudentPayload>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    let payload = payload.into_inner();
    if let Err(errors) = validate_student(&payload) {
        return rejected(errors, &toasts);
    }
    create_record(data.school.students.as_ref(), &payload, &STUDENT_MESSAGES, &toasts).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    put,
    path = "/students/{id}",
    params(("id" = String, Path, description = "Student id")),
    request_body = StudentPayload,
    responses(
        (status = 200, description = "Student updated", body = ActionResponse<Student>),
        (status = 400, description = "Validation failed", body = ActionResponse<Student>),
        (status = 404, description = "Student not found", body = ActionResponse<Student>)
    )
)]
pub async fn update_student(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
    payload: web::Json<StudentPayload>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    let payload = payload.into_inner();
    if let Err(errors) = validate_student(&payload) {
        return rejected(errors, &toasts);
    }
    update_record(data.school.students.as_ref(), &id, &payload, &STUDENT_MESSAGES, &toasts).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    delete,
    path = "/students/{id}",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    delete_record(data.school.students.as_ref(), &id, &STUDENT_MESSAGES, &toasts).await
}

// Enrollments

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    get,
    path = "/enrollments",
    params(ListQuery),
    responses(
        (status = 200, description = "Enrollments with student and classroom names", body = Paginated<EnrollmentView>),
        (status = 502, description = "Upstream service failed", body = ErrorResponse)
    )
)]
pub async fn list_enrollments(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let school = &data.school;
    let enrollments = match school.enrollments.get_all().await {
        Ok(enrollments) => enrollments,
        Err(e) => return load_failed(e, &ENROLLMENT_MESSAGES),
    };
    let students = load_reference(school.students.as_ref(), "students").await;
    let classrooms = load_reference(school.classrooms.as_ref(), "classrooms").await;

    let views = enrich_enrollments(&enrollments, &students, &classrooms);
    let order = query.order.unwrap_or_default();
    let page = list_page(views, &query, |rows| {
        sort_enrollments(rows, query.sort.as_deref(), order)
    });
    HttpResponse::Ok().json(page)
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    post,
    path = "/enrollments",
    request_body = EnrollmentPayload,
    responses(
        (status = 201, description = "Enrollment created", body = ActionResponse<super::model::Enrollment>),
        (status = 400, description = "Validation failed", body = ActionResponse<super::model::Enrollment>),
        (status = 502, description = "Upstream service failed", body = ActionResponse<super::model::Enrollment>)
    )
)]
pub async fn create_enrollment(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: web::Json<EnrollmentPayload>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    let payload = payload.into_inner();
    if let Err(errors) = validate_enrollment(&payload) {
        return rejected(errors, &toasts);
    }
    create_record(data.school.enrollments.as_ref(), &payload, &ENROLLMENT_MESSAGES, &toasts).await
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    put,
    path = "/enrollments/{id}",
    params(("id" = String, Path, description = "Enrollment id")),
    request_body = EnrollmentPayload,
    responses(
        (status = 200, description = "Enrollment updated", body = ActionResponse<super::model::Enrollment>),
        (status = 400, description = "Validation failed", body = ActionResponse<super::model::Enrollment>),
        (status = 404, description = "Enrollment not found", body = ActionResponse<super::model::Enrollment>)
    )
)]
pub async fn update_enrollment(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
    payload: web::Json<EnrollmentPayload>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    let payload = payload.into_inner();
    if let Err(errors) = validate_enrollment(&payload) {
        return rejected(errors, &toasts);
    }
    update_record(data.school.enrollments.as_ref(), &id, &payload, &ENROLLMENT_MESSAGES, &toasts)
        .await
}

#[utoipa::path(
    context_path = "/api",
    tag = "School Service",
    delete,
    path = "/enrollments/{id}",
    params(("id" = String, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Enrollment deleted"),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn delete_enrollment(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: Path<String>,
) -> impl Responder {
    if let Err(e) = authorize(&req, &data.config.jwt_secret, RoleCategory::Secretary) {
        return e.error_response();
    }
    let toasts = ToastCollector::new();
    delete_record(data.school.enrollments.as_ref(), &id, &ENROLLMENT_MESSAGES, &toasts).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/classrooms")
            .route(web::get().to(list_classrooms))
            .route(web::post().to(create_classroom)),
    )
    .service(
        web::resource("/classrooms/{id}")
            .route(web::put().to(update_classroom))
            .route(web::delete().to(delete_classroom)),
    )
    .service(
        web::resource("/teacher-assignments")
            .route(web::get().to(list_teacher_assignments))
            .route(web::post().to(create_teacher_assignment)),
    )
    .service(
        web::resource("/teacher-assignments/{id}")
            .route(web::put().to(update_teacher_assignment))
            .route(web::delete().to(delete_teacher_assignment)),
    )
    .service(
        web::resource("/students")
            .route(web::get().to(list_students))
            .route(web::post().to(create_student)),
    )
    .service(
        web::resource("/students/{id}")
            .route(web::put().to(update_student))
            .route(web::delete().to(delete_student)),
    )
    .service(
        web::resource("/enrollments")
            .route(web::get().to(list_enrollments))
            .route(web::post().to(create_enrollment)),
    )
    .service(
        web::resource("/enrollments/{id}")
            .route(web::put().to(update_enrollment))
            .route(web::delete().to(delete_enrollment)),
    );
}
