use crate::fut::model::FutRequest;
use crate::school::model::Student;

use super::format::{format_relationship, or_placeholder};

/// Guardian block of the generated form. Each field takes the first
/// non-blank value from the request, then the student's guardian record,
/// then the student's own record. The name skips the guardian record and
/// falls back to the student's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianInfo {
    pub name: String,
    pub document: String,
    pub relationship: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub district: String,
    pub province: String,
}

fn first_present<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

impl GuardianInfo {
    pub fn resolve(request: &FutRequest, student: Option<&Student>) -> Self {
        let from_student = |pick: fn(&Student) -> Option<&str>| student.and_then(pick);
        let student_name = student.and_then(Student::full_name);

        Self {
            name: or_placeholder(first_present([
                request.requested_by.as_deref(),
                student_name.as_deref(),
            ])),
            document: or_placeholder(first_present([
                request.guardian_dni.as_deref(),
                from_student(|s| s.guardian_document_number.as_deref()),
            ])),
            relationship: format_relationship(from_student(|s| s.guardian_relationship.as_deref())),
            phone: or_placeholder(first_present([
                request.contact_phone.as_deref(),
                from_student(|s| s.guardian_phone.as_deref()),
                from_student(|s| s.phone.as_deref()),
            ])),
            email: or_placeholder(first_present([
                request.contact_email.as_deref(),
                from_student(|s| s.guardian_email.as_deref()),
                from_student(|s| s.email.as_deref()),
            ])),
            address: or_placeholder(first_present([
                request.guardian_address.as_deref(),
                from_student(|s| s.guardian_address.as_deref()),
                from_student(|s| s.address.as_deref()),
            ])),
            district: or_placeholder(first_present([
                request.guardian_district.as_deref(),
                from_student(|s| s.guardian_district.as_deref()),
                from_student(|s| s.district.as_deref()),
            ])),
            province: or_placeholder(first_present([
                request.guardian_province.as_deref(),
                from_student(|s| s.guardian_province.as_deref()),
                from_student(|s| s.province.as_deref()),
            ])),
        }
    }
}
