//! Records served by the platform's REST API and the payloads sent back.
//!
//! Field names follow the API's camelCase JSON. Almost everything is
//! optional because the API omits unset fields.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Accepts `"2025"`, `2025` or null.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub birth_date: Option<String>,
    /// `MALE` or `FEMALE`
    pub gender: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub student_code: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_last_name: Option<String>,
    pub guardian_document_type: Option<String>,
    pub guardian_document_number: Option<String>,
    pub guardian_phone: Option<String>,
    pub guardian_email: Option<String>,
    pub guardian_relationship: Option<String>,
    pub guardian_address: Option<String>,
    pub guardian_district: Option<String>,
    pub guardian_province: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

impl Student {
    /// "First Last", or `None` when both parts are blank.
    pub fn full_name(&self) -> Option<String> {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

pub(crate) fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentPayload {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub document_type: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub document_number: String,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub department: Option<String>,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub email: String,
    pub guardian_name: Option<String>,
    pub guardian_last_name: Option<String>,
    pub guardian_document_type: Option<String>,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub guardian_document_number: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub guardian_phone: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub guardian_email: String,
    pub guardian_relationship: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Institution {
    pub id: Option<String>,
    pub name: Option<String>,
    pub code_institution: Option<String>,
    pub modular_code: Option<String>,
    pub address: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    /// Data URI or absolute URL
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Headquarter {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    #[serde(alias = "name")]
    pub headquarters_name: Option<String>,
    pub institution_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodType {
    Bimestre,
    Trimestre,
    Semestre,
    Anual,
}

impl PeriodType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "BIMESTER" | "BIMESTRE" => Some(PeriodType::Bimestre),
            "TRIMESTER" | "TRIMESTRE" => Some(PeriodType::Trimestre),
            "SEMESTER" | "SEMESTRE" => Some(PeriodType::Semestre),
            "ANNUAL" | "ANUAL" => Some(PeriodType::Anual),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodType::Bimestre => "Bimestre",
            PeriodType::Trimestre => "Trimestre",
            PeriodType::Semestre => "Semestre",
            PeriodType::Anual => "Anual",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Period {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub period: Option<String>,
    pub period_type: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub academic_year: Option<String>,
    pub level: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    pub course_name: Option<String>,
    pub course_code: Option<String>,
    pub level: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Classroom {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    pub headquarter_id: Option<String>,
    pub period_id: Option<String>,
    pub grade: Option<u8>,
    pub section: Option<String>,
    /// `M`, `T` or `N`
    pub shift: Option<String>,
    pub classroom_name: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

impl Classroom {
    /// `classroomName`, or "3° B" built from grade and section.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.classroom_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return Some(name.to_string());
        }
        match (self.grade, self.section.as_deref()) {
            (Some(grade), Some(section)) => Some(format!("{}° {}", grade, section)),
            (Some(grade), None) => Some(format!("{}°", grade)),
            _ => None,
        }
    }
}

pub fn shift_label(code: Option<&str>) -> &'static str {
    match code.map(|c| c.trim().to_uppercase()).as_deref() {
        Some("M") | Some("MORNING") | Some("MAÑANA") => "Mañana",
        Some("T") | Some("AFTERNOON") | Some("TARDE") => "Tarde",
        Some("N") | Some("NIGHT") | Some("NOCHE") => "Noche",
        _ => "Sin turno",
    }
}

pub fn status_label(code: Option<&str>) -> &'static str {
    match code.map(|c| c.trim().to_uppercase()).as_deref() {
        Some("A") | Some("ACTIVE") => "Activo",
        Some("I") | Some("INACTIVE") => "Inactivo",
        _ => "Desconocido",
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassroomPayload {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub headquarter_id: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub period_id: String,
    pub grade: Option<u8>,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub section: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub shift: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StaffMember {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    #[serde(alias = "firstname")]
    pub first_name: Option<String>,
    #[serde(alias = "lastname")]
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

impl StaffMember {
    pub fn full_name(&self) -> Option<String> {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherAssignment {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    pub teacher_id: Option<String>,
    pub course_id: Option<String>,
    pub classroom_id: Option<String>,
    pub assignment_date: Option<String>,
    pub assignment_type: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

pub const DEFAULT_ASSIGNMENT_TYPE: &str = "REGULAR";

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherAssignmentPayload {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub teacher_id: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub course_id: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub classroom_id: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub assignment_date: String,
    pub assignment_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Enrollment {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    pub student_id: Option<String>,
    pub classroom_id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub academic_year: Option<String>,
    pub enrollment_date: Option<String>,
    pub enrollment_type: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrollmentPayload {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub student_id: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub classroom_id: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub academic_year: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub enrollment_date: String,
    pub enrollment_type: Option<String>,
    pub status: Option<String>,
}
