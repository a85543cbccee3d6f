mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use common::{bearer, Fixture};
use eduassist_server::auth::Role;
use eduassist_server::configure_api;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(configure_api)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_classrooms_are_enriched_filtered_and_sorted() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::get()
        .uri("/api/classrooms?status=A&order=desc")
        .insert_header(bearer(Role::Secretary))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["totalItems"], 2);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["id"], "c1");
    assert_eq!(items[1]["id"], "c2");
    assert_eq!(items[0]["headquarterName"], "Sede Central");
    assert!(items[0]["periodName"].as_str().unwrap().contains("2025"));
}

#[actix_web::test]
async fn test_missing_reference_list_does_not_fail_the_screen() {
    let fixture = Fixture::new();
    fixture.periods.set_failing(true);
    fixture.headquarters.set_failing(true);
    let app = app!(fixture.state());

    let req = test::TestRequest::get()
        .uri("/api/classrooms")
        .insert_header(bearer(Role::Secretary))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["totalItems"], 3);
    assert!(body["items"][0]["periodName"].is_null());
}

#[actix_web::test]
async fn test_main_list_failure_is_bad_gateway() {
    let fixture = Fixture::new();
    fixture.classrooms.set_failing(true);
    let app = app!(fixture.state());

    let req = test::TestRequest::get()
        .uri("/api/classrooms")
        .insert_header(bearer(Role::Secretary))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Error al cargar las aulas");
}

#[actix_web::test]
async fn test_invalid_classroom_is_rejected_before_upstream() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::post()
        .uri("/api/classrooms")
        .insert_header(bearer(Role::Secretary))
        .set_json(json!({
            "headquarterId": "hq1",
            "periodId": "p1",
            "grade": 9,
            "section": "AB",
            "shift": "M"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("El grado debe estar entre 1 y 6"));
    assert!(error.contains("una sola letra"));
    assert_eq!(fixture.classrooms.mutations(), 0);
}

#[actix_web::test]
async fn test_classroom_create_normalizes_section() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::post()
        .uri("/api/classrooms")
        .insert_header(bearer(Role::Secretary))
        .set_json(json!({
            "headquarterId": "hq1",
            "periodId": "p1",
            "grade": 2,
            "section": " d ",
            "shift": "t"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["section"], "D");
    assert_eq!(body["data"]["shift"], "T");
    assert_eq!(body["notifications"][0]["message"], "Aula creada exitosamente");
}

#[actix_web::test]
async fn test_assignment_names_and_default_type() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::get()
        .uri("/api/teacher-assignments?search=quispe")
        .insert_header(bearer(Role::Secretary))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["items"][0]["teacherName"], "Carlos Quispe");
    assert_eq!(body["items"][0]["courseName"], "Matemática");
    assert_eq!(body["items"][0]["classroomName"], "3° B");

    let req = test::TestRequest::post()
        .uri("/api/teacher-assignments")
        .insert_header(bearer(Role::Secretary))
        .set_json(json!({
            "teacherId": "t1",
            "courseId": "co1",
            "classroomId": "c2",
            "assignmentDate": "2025-03-10"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["assignmentType"], "REGULAR");
}

#[actix_web::test]
async fn test_student_update_and_missing_record() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());
    let payload = json!({
        "firstName": "Juan Carlos",
        "lastName": "Pérez",
        "documentType": "DNI",
        "documentNumber": "71234567",
        "phone": "987654321"
    });

    let req = test::TestRequest::put()
        .uri("/api/students/s1")
        .insert_header(bearer(Role::Secretary))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["firstName"], "Juan Carlos");
    assert_eq!(
        body["notifications"][0]["message"],
        "Estudiante actualizado exitosamente"
    );

    let req = test::TestRequest::put()
        .uri("/api/students/missing")
        .insert_header(bearer(Role::Secretary))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_student_with_bad_dni_is_rejected() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::post()
        .uri("/api/students")
        .insert_header(bearer(Role::Secretary))
        .set_json(json!({
            "firstName": "Ana",
            "lastName": "López",
            "documentType": "DNI",
            "documentNumber": "123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(fixture.students.mutations(), 0);
}

#[actix_web::test]
async fn test_enrollment_list_and_delete() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::get()
        .uri("/api/enrollments?search=juan")
        .insert_header(bearer(Role::Secretary))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["items"][0]["studentName"], "Juan Pérez");

    let req = test::TestRequest::delete()
        .uri("/api/enrollments/e1")
        .insert_header(bearer(Role::Secretary))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(fixture.enrollments.records().is_empty());
}

#[actix_web::test]
async fn test_enrollment_year_must_have_four_digits() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::post()
        .uri("/api/enrollments")
        .insert_header(bearer(Role::Secretary))
        .set_json(json!({
            "studentId": "s2",
            "classroomId": "c2",
            "academicYear": "25",
            "enrollmentDate": "2025-03-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("El año académico debe tener 4 dígitos"));
}

#[actix_web::test]
async fn test_school_screens_reject_other_roles() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::get()
        .uri("/api/students")
        .insert_header(bearer(Role::Auxiliary))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
}
