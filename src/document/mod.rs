//! Printable FUT form generation.
//!
//! [`composer::FutComposer`] lays a request out on a [`canvas::Canvas`] and
//! [`pdf::render`] serializes it. Composition never fails loudly: every
//! error is folded into [`ComposeOutcome::Failed`].

pub mod canvas;
pub mod composer;
pub mod format;
pub mod guardian;
pub mod logo;
pub mod metrics;
pub mod pdf;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub use composer::FutComposer;

/// Message shown when a document cannot be produced.
pub const COMPOSE_FAILED: &str = "Error al generar el PDF";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("PDF serialization failed: {0}")]
    Pdf(String),
    #[error("document has no pages")]
    EmptyDocument,
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub file_name: String,
    pub pdf: Vec<u8>,
    pub page_count: usize,
}

#[derive(Debug, Clone)]
pub enum ComposeOutcome {
    Generated(GeneratedDocument),
    Failed { error: String },
}

/// JSON shape of an outcome, without the PDF bytes.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposeSummary {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComposeOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        ComposeOutcome::Failed {
            error: error.into(),
        }
    }

    pub fn summary(&self) -> ComposeSummary {
        match self {
            ComposeOutcome::Generated(doc) => ComposeSummary {
                success: true,
                file_name: Some(doc.file_name.clone()),
                error: None,
            },
            ComposeOutcome::Failed { error } => ComposeSummary {
                success: false,
                file_name: None,
                error: Some(error.clone()),
            },
        }
    }
}
