//! Badge and icon configuration for statuses, urgency levels and request
//! types. Unknown values get a neutral fallback instead of an error.

use serde::Serialize;
use utoipa::ToSchema;

use super::model::{FutStatus, RequestType, UrgencyLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Icon {
    #[serde(rename = "clock")]
    Clock,
    #[serde(rename = "check-circle")]
    CheckCircle,
    #[serde(rename = "x-circle")]
    XCircle,
    #[serde(rename = "check-square")]
    CheckSquare,
    #[serde(rename = "alert-triangle")]
    AlertTriangle,
    #[serde(rename = "alert-circle")]
    AlertCircle,
    #[serde(rename = "award")]
    Award,
    #[serde(rename = "file-text")]
    FileText,
    #[serde(rename = "arrow-right-circle")]
    ArrowRightCircle,
    #[serde(rename = "edit-3")]
    Edit3,
    #[serde(rename = "more-horizontal")]
    MoreHorizontal,
    #[serde(rename = "help-circle")]
    HelpCircle,
    #[serde(rename = "file")]
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BadgeConfig {
    pub code: String,
    pub label: String,
    pub css_class: &'static str,
    pub icon: Icon,
}

pub fn status_badge(status: Option<FutStatus>) -> BadgeConfig {
    let (css_class, icon) = match status {
        Some(FutStatus::Pendiente) => ("bg-warning text-dark", Icon::Clock),
        Some(FutStatus::Aprobado) => ("bg-success", Icon::CheckCircle),
        Some(FutStatus::Rechazado) => ("bg-danger", Icon::XCircle),
        Some(FutStatus::Completado) => ("bg-info", Icon::CheckSquare),
        None => return BadgeConfig::unknown(),
    };
    BadgeConfig::known(status.map(FutStatus::as_str), status.map(FutStatus::label), css_class, icon)
}

pub fn urgency_badge(urgency: Option<UrgencyLevel>) -> BadgeConfig {
    let (css_class, icon) = match urgency {
        Some(UrgencyLevel::Alta) => ("bg-danger", Icon::AlertTriangle),
        Some(UrgencyLevel::Media) => ("bg-warning text-dark", Icon::AlertCircle),
        Some(UrgencyLevel::Baja) => ("bg-success", Icon::CheckCircle),
        None => return BadgeConfig::unknown(),
    };
    BadgeConfig::known(
        urgency.map(UrgencyLevel::as_str),
        urgency.map(UrgencyLevel::label),
        css_class,
        icon,
    )
}

pub fn request_type_badge(request_type: Option<RequestType>) -> BadgeConfig {
    let (css_class, icon) = match request_type {
        Some(RequestType::Certificado) => ("text-primary", Icon::Award),
        Some(RequestType::Constancia) => ("text-info", Icon::FileText),
        Some(RequestType::Traslado) => ("text-warning", Icon::ArrowRightCircle),
        Some(RequestType::Rectificacion) => ("text-success", Icon::Edit3),
        Some(RequestType::Otros) => ("text-secondary", Icon::MoreHorizontal),
        None => {
            return BadgeConfig {
                css_class: "text-muted",
                icon: Icon::File,
                ..BadgeConfig::unknown()
            }
        }
    };
    BadgeConfig::known(
        request_type.map(RequestType::as_str),
        request_type.map(RequestType::label),
        css_class,
        icon,
    )
}

impl BadgeConfig {
    fn known(code: Option<&str>, label: Option<&str>, css_class: &'static str, icon: Icon) -> Self {
        Self {
            code: code.unwrap_or_default().to_string(),
            label: label.unwrap_or_default().to_string(),
            css_class,
            icon,
        }
    }

    pub fn unknown() -> Self {
        Self {
            code: String::new(),
            label: "Sin definir".to_string(),
            css_class: "bg-secondary",
            icon: Icon::HelpCircle,
        }
    }
}

/// Everything the FUT form needs to render its selects and badges.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FutCatalog {
    pub request_types: Vec<BadgeConfig>,
    pub urgency_levels: Vec<BadgeConfig>,
    pub statuses: Vec<BadgeConfig>,
}

impl FutCatalog {
    pub fn build() -> Self {
        Self {
            request_types: RequestType::ALL
                .iter()
                .map(|t| request_type_badge(Some(*t)))
                .collect(),
            urgency_levels: UrgencyLevel::ALL
                .iter()
                .map(|u| urgency_badge(Some(*u)))
                .collect(),
            statuses: FutStatus::ALL.iter().map(|s| status_badge(Some(*s))).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_badges() {
        let pending = status_badge(Some(FutStatus::Pendiente));
        assert_eq!(pending.css_class, "bg-warning text-dark");
        assert_eq!(pending.icon, Icon::Clock);
        assert_eq!(pending.label, "Pendiente");
        assert_eq!(status_badge(None).icon, Icon::HelpCircle);
    }

    #[test]
    fn test_request_type_fallback_is_muted_file() {
        let fallback = request_type_badge(None);
        assert_eq!(fallback.css_class, "text-muted");
        assert_eq!(fallback.icon, Icon::File);
    }

    #[test]
    fn test_catalog_lists_every_code() {
        let catalog = FutCatalog::build();
        assert_eq!(catalog.request_types.len(), 5);
        assert_eq!(catalog.urgency_levels.len(), 3);
        assert_eq!(catalog.statuses.len(), 4);

        let json = serde_json::to_value(&catalog.request_types[3]).unwrap();
        assert_eq!(json["icon"], "edit-3");
        assert_eq!(json["cssClass"], "text-success");
    }
}
