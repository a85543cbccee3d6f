use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! code_enum {
    ($name:ident { $($variant:ident => $code:literal, $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let code = s.trim().to_uppercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == code)
                    .ok_or_else(|| UnknownCode {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
}

code_enum!(RequestType {
    Certificado => "CERTIFICADO", "Certificado",
    Constancia => "CONSTANCIA", "Constancia",
    Traslado => "TRASLADO", "Traslado",
    Rectificacion => "RECTIFICACION", "Rectificación",
    Otros => "OTROS", "Otros",
});

code_enum!(UrgencyLevel {
    Alta => "ALTA", "Alta",
    Media => "MEDIA", "Media",
    Baja => "BAJA", "Baja",
});

code_enum!(FutStatus {
    Pendiente => "PENDIENTE", "Pendiente",
    Aprobado => "APROBADO", "Aprobado",
    Rechazado => "RECHAZADO", "Rechazado",
    Completado => "COMPLETADO", "Completado",
});

impl UrgencyLevel {
    /// Expected turnaround printed on the generated form.
    pub fn turnaround(self) -> &'static str {
        match self {
            UrgencyLevel::Alta => "Requiere atención inmediata",
            UrgencyLevel::Media => "Atención en 3-5 días",
            UrgencyLevel::Baja => "Atención en 5-10 días",
        }
    }
}

/// Metadata of a file the requester attached. Only the description is kept;
/// the bytes never leave the browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachedDocument {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub size: u64,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub mime_type: String,
    pub last_modified: Option<i64>,
}

/// A FUT (Formulario Único de Trámite) request as stored by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FutRequest {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub student_enrollment_id: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub request_number: String,
    pub request_type: Option<RequestType>,
    pub request_subject: Option<String>,
    pub request_description: Option<String>,
    pub requested_by: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub guardian_dni: Option<String>,
    pub guardian_address: Option<String>,
    pub guardian_district: Option<String>,
    pub guardian_province: Option<String>,
    pub urgency_level: Option<UrgencyLevel>,
    pub estimated_delivery_date: Option<String>,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub attached_documents: BTreeMap<String, AttachedDocument>,
    pub admin_notes: Option<String>,
    pub status: Option<FutStatus>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Body sent to the API when creating or updating a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FutRequestDraft {
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub student_enrollment_id: String,
    /// Left empty on create to have one generated
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub request_number: String,
    pub request_type: Option<RequestType>,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub request_subject: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub request_description: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub requested_by: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub contact_phone: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub contact_email: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub guardian_dni: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub guardian_address: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub guardian_district: String,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub guardian_province: String,
    pub urgency_level: Option<UrgencyLevel>,
    pub estimated_delivery_date: Option<String>,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub attached_documents: BTreeMap<String, AttachedDocument>,
    #[serde(deserialize_with = "crate::remote::null_as_default")]
    pub admin_notes: String,
    pub status: Option<FutStatus>,
}

impl FutRequestDraft {
    /// New requests start pending with low urgency unless told otherwise.
    pub fn apply_defaults(&mut self) {
        if self.status.is_none() {
            self.status = Some(FutStatus::Pendiente);
        }
        if self.urgency_level.is_none() {
            self.urgency_level = Some(UrgencyLevel::Baja);
        }
        if self
            .estimated_delivery_date
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            self.estimated_delivery_date = None;
        }
    }

    /// Prefills an edit form from a stored request.
    pub fn from_request(request: &FutRequest) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            student_enrollment_id: request.student_enrollment_id.clone(),
            request_number: request.request_number.clone(),
            request_type: request.request_type,
            request_subject: text(&request.request_subject),
            request_description: text(&request.request_description),
            requested_by: text(&request.requested_by),
            contact_phone: text(&request.contact_phone),
            contact_email: text(&request.contact_email),
            guardian_dni: text(&request.guardian_dni),
            guardian_address: text(&request.guardian_address),
            guardian_district: text(&request.guardian_district),
            guardian_province: text(&request.guardian_province),
            urgency_level: request.urgency_level.or(Some(UrgencyLevel::Baja)),
            estimated_delivery_date: request.estimated_delivery_date.clone(),
            attached_documents: request.attached_documents.clone(),
            admin_notes: text(&request.admin_notes),
            status: request.status.or(Some(FutStatus::Pendiente)),
        }
    }
}

impl FutRequest {
    /// Builds the stored form of a draft, as the API does on create.
    pub fn from_draft(id: impl Into<String>, draft: &FutRequestDraft, created_at: Option<String>) -> Self {
        let opt = |value: &str| {
            if value.trim().is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };
        Self {
            id: id.into(),
            student_enrollment_id: draft.student_enrollment_id.clone(),
            request_number: draft.request_number.clone(),
            request_type: draft.request_type,
            request_subject: opt(&draft.request_subject),
            request_description: opt(&draft.request_description),
            requested_by: opt(&draft.requested_by),
            contact_phone: opt(&draft.contact_phone),
            contact_email: opt(&draft.contact_email),
            guardian_dni: opt(&draft.guardian_dni),
            guardian_address: opt(&draft.guardian_address),
            guardian_district: opt(&draft.guardian_district),
            guardian_province: opt(&draft.guardian_province),
            urgency_level: draft.urgency_level,
            estimated_delivery_date: draft.estimated_delivery_date.clone(),
            attached_documents: draft.attached_documents.clone(),
            admin_notes: opt(&draft.admin_notes),
            status: draft.status,
            created_at: created_at.clone(),
            updated_at: created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FutStatistics {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub completed: usize,
}

impl FutStatistics {
    pub fn from_requests(requests: &[FutRequest]) -> Self {
        let count = |status: FutStatus| {
            requests
                .iter()
                .filter(|r| r.status == Some(status))
                .count()
        };
        Self {
            total: requests.len(),
            pending: count(FutStatus::Pendiente),
            approved: count(FutStatus::Aprobado),
            rejected: count(FutStatus::Rechazado),
            completed: count(FutStatus::Completado),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_through_json() {
        let json = serde_json::to_string(&RequestType::Rectificacion).unwrap();
        assert_eq!(json, "\"RECTIFICACION\"");
        let status: FutStatus = serde_json::from_str("\"COMPLETADO\"").unwrap();
        assert_eq!(status, FutStatus::Completado);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("alta".parse::<UrgencyLevel>(), Ok(UrgencyLevel::Alta));
        let err = "URGENTE".parse::<UrgencyLevel>().unwrap_err();
        assert_eq!(err.value, "URGENTE");
    }

    #[test]
    fn test_explicit_nulls_read_as_defaults() {
        let request: FutRequest = serde_json::from_str(
            r#"{
                "id": "f1",
                "studentEnrollmentId": "s1",
                "requestNumber": null,
                "requestSubject": "Constancia de estudios",
                "requestType": null,
                "attachedDocuments": null,
                "status": null,
                "createdAt": "2025-03-14T09:30:00"
            }"#,
        )
        .unwrap();
        assert_eq!(request.request_number, "");
        assert!(request.attached_documents.is_empty());
        assert_eq!(request.status, None);

        let draft: FutRequestDraft = serde_json::from_str(
            r#"{"studentEnrollmentId": "s1", "requestSubject": null, "contactPhone": null, "attachedDocuments": null}"#,
        )
        .unwrap();
        assert_eq!(draft.request_subject, "");
        assert_eq!(draft.contact_phone, "");
    }

    #[test]
    fn test_request_deserializes_sparse_record() {
        let request: FutRequest = serde_json::from_str(
            r#"{
                "id": "f1",
                "requestNumber": "4567JP",
                "status": "PENDIENTE",
                "attachedDocuments": {
                    "1700000000000_abc": {"name": "dni.pdf", "size": 2048, "type": "application/pdf"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(request.request_type, None);
        assert_eq!(request.attached_documents.len(), 1);
        let doc = request.attached_documents.values().next().unwrap();
        assert_eq!(doc.mime_type, "application/pdf");
    }

    #[test]
    fn test_draft_defaults() {
        let mut draft = FutRequestDraft {
            estimated_delivery_date: Some("".into()),
            ..Default::default()
        };
        draft.apply_defaults();
        assert_eq!(draft.status, Some(FutStatus::Pendiente));
        assert_eq!(draft.urgency_level, Some(UrgencyLevel::Baja));
        assert_eq!(draft.estimated_delivery_date, None);
    }

    #[test]
    fn test_statistics_count_each_status() {
        let with_status = |status| FutRequest {
            status: Some(status),
            ..Default::default()
        };
        let requests = vec![
            with_status(FutStatus::Pendiente),
            with_status(FutStatus::Pendiente),
            with_status(FutStatus::Aprobado),
            with_status(FutStatus::Completado),
            FutRequest::default(),
        ];
        let stats = FutStatistics::from_requests(&requests);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.rejected, 0);
        assert_eq!(stats.completed, 1);
    }
}
