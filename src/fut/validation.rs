use super::model::FutRequestDraft;
use crate::validation::{
    validate_date_optional, validate_dni_optional, validate_email, validate_phone,
    validate_required, validate_required_option, ValidationErrors,
};

/// Checks a draft before it is sent to the API. Expects the request number
/// to be assigned already.
pub fn validate_draft(draft: &FutRequestDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    validate_required(
        &draft.student_enrollment_id,
        "studentEnrollmentId",
        "El estudiante",
        &mut errors,
    );
    validate_required(&draft.request_number, "requestNumber", "El número de solicitud", &mut errors);
    validate_required_option(
        draft.request_type.as_ref(),
        "requestType",
        "El tipo de solicitud",
        &mut errors,
    );
    validate_required(&draft.request_subject, "requestSubject", "El asunto", &mut errors);
    validate_required(
        &draft.request_description,
        "requestDescription",
        "La descripción",
        &mut errors,
    );
    validate_required(&draft.requested_by, "requestedBy", "El solicitante", &mut errors);
    validate_phone(&draft.contact_phone, "contactPhone", "El teléfono de contacto", &mut errors);
    validate_email(&draft.contact_email, "contactEmail", "El correo de contacto", &mut errors);
    validate_dni_optional(&draft.guardian_dni, "guardianDni", &mut errors);
    validate_required_option(
        draft.urgency_level.as_ref(),
        "urgencyLevel",
        "El nivel de urgencia",
        &mut errors,
    );
    if let Some(date) = draft.estimated_delivery_date.as_deref() {
        validate_date_optional(date, "estimatedDeliveryDate", &mut errors);
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fut::model::{RequestType, UrgencyLevel};

    fn valid_draft() -> FutRequestDraft {
        FutRequestDraft {
            student_enrollment_id: "s1".into(),
            request_number: "4567JP".into(),
            request_type: Some(RequestType::Constancia),
            request_subject: "Constancia de estudios".into(),
            request_description: "Solicito constancia para trámite de beca.".into(),
            requested_by: "María Pérez".into(),
            contact_phone: "987654321".into(),
            contact_email: "maria@correo.com".into(),
            urgency_level: Some(UrgencyLevel::Media),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(validate_draft(&valid_draft()).is_ok());
    }

    #[test]
    fn test_all_failures_are_reported() {
        let errors = validate_draft(&FutRequestDraft::default()).unwrap_err();
        for field in [
            "studentEnrollmentId",
            "requestNumber",
            "requestType",
            "requestSubject",
            "requestDescription",
            "requestedBy",
            "contactPhone",
            "contactEmail",
            "urgencyLevel",
        ] {
            assert!(errors.has_field(field), "expected error for {}", field);
        }
        assert!(errors.joined_message().starts_with("Errores de validación: "));
    }

    #[test]
    fn test_optional_fields_checked_when_present() {
        let mut draft = valid_draft();
        draft.guardian_dni = "1234".into();
        draft.estimated_delivery_date = Some("mañana".into());
        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("guardianDni"));
        assert!(errors.has_field("estimatedDeliveryDate"));
    }
}
