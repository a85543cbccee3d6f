use lazy_static::lazy_static;
use regex::Regex;

use super::model::{
    ClassroomPayload, EnrollmentPayload, StudentPayload, TeacherAssignmentPayload,
    DEFAULT_ASSIGNMENT_TYPE,
};
use crate::validation::{
    validate_date, validate_dni, validate_dni_optional, validate_email_optional,
    validate_pattern, validate_phone_optional, validate_required, ValidationError,
    ValidationErrors,
};

lazy_static! {
    static ref SECTION_PATTERN: Regex = Regex::new(r"^[A-Za-z]$").expect("section pattern is valid");
    static ref YEAR_PATTERN: Regex = Regex::new(r"^\d{4}$").expect("year pattern is valid");
}

pub const MIN_GRADE: u8 = 1;
pub const MAX_GRADE: u8 = 6;

/// Upper-cases the section letter and trims the text fields.
pub fn normalize_classroom(payload: &mut ClassroomPayload) {
    payload.section = payload.section.trim().to_uppercase();
    payload.shift = payload.shift.trim().to_uppercase();
}

pub fn validate_classroom(payload: &ClassroomPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    validate_required(&payload.headquarter_id, "headquarterId", "La sede", &mut errors);
    validate_required(&payload.period_id, "periodId", "El periodo", &mut errors);
    match payload.grade {
        None => errors.add(ValidationError::empty_field("grade", "El grado")),
        Some(grade) if !(MIN_GRADE..=MAX_GRADE).contains(&grade) => errors.add(ValidationError::new(
            "grade",
            format!("El grado debe estar entre {} y {}", MIN_GRADE, MAX_GRADE),
        )),
        Some(_) => {}
    }
    validate_required(&payload.section, "section", "La sección", &mut errors);
    validate_pattern(
        &payload.section,
        &SECTION_PATTERN,
        "section",
        "La sección debe ser una sola letra",
        &mut errors,
    );
    validate_required(&payload.shift, "shift", "El turno", &mut errors);
    errors.into_result()
}

pub fn normalize_assignment(payload: &mut TeacherAssignmentPayload) {
    if payload
        .assignment_type
        .as_deref()
        .map_or(true, |t| t.trim().is_empty())
    {
        payload.assignment_type = Some(DEFAULT_ASSIGNMENT_TYPE.to_string());
    }
}

pub fn validate_assignment(payload: &TeacherAssignmentPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    validate_required(&payload.teacher_id, "teacherId", "El docente", &mut errors);
    validate_required(&payload.course_id, "courseId", "El curso", &mut errors);
    validate_required(&payload.classroom_id, "classroomId", "El aula", &mut errors);
    validate_date(
        &payload.assignment_date,
        "assignmentDate",
        "La fecha de asignación",
        &mut errors,
    );
    errors.into_result()
}

pub fn validate_student(payload: &StudentPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    validate_required(&payload.first_name, "firstName", "Los nombres", &mut errors);
    validate_required(&payload.last_name, "lastName", "Los apellidos", &mut errors);
    validate_required(&payload.document_type, "documentType", "El tipo de documento", &mut errors);
    if payload.document_type.trim().eq_ignore_ascii_case("DNI") {
        validate_dni(&payload.document_number, "documentNumber", "El número de documento", &mut errors);
    } else {
        validate_required(
            &payload.document_number,
            "documentNumber",
            "El número de documento",
            &mut errors,
        );
    }
    validate_phone_optional(&payload.phone, "phone", &mut errors);
    validate_email_optional(&payload.email, "email", &mut errors);
    validate_dni_optional(&payload.guardian_document_number, "guardianDocumentNumber", &mut errors);
    validate_phone_optional(&payload.guardian_phone, "guardianPhone", &mut errors);
    validate_email_optional(&payload.guardian_email, "guardianEmail", &mut errors);
    errors.into_result()
}

pub fn validate_enrollment(payload: &EnrollmentPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    validate_required(&payload.student_id, "studentId", "El estudiante", &mut errors);
    validate_required(&payload.classroom_id, "classroomId", "El aula", &mut errors);
    validate_required(&payload.academic_year, "academicYear", "El año académico", &mut errors);
    validate_pattern(
        &payload.academic_year,
        &YEAR_PATTERN,
        "academicYear",
        "El año académico debe tener 4 dígitos",
        &mut errors,
    );
    validate_date(
        &payload.enrollment_date,
        "enrollmentDate",
        "La fecha de matrícula",
        &mut errors,
    );
    errors.into_result()
}
