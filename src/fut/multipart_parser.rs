use std::collections::BTreeMap;
use std::path::Path;

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures::StreamExt;
use sanitize_filename::sanitize;
use uuid::Uuid;

use super::model::AttachedDocument;
use crate::ErrorResponse;

/// Upload limit per attached file.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["pdf", "doc", "docx", "jpg", "jpeg", "png", "txt"];

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("El archivo {name} supera el máximo de 10MB")]
    FileTooLarge { name: String },
    #[error("Formato no permitido para {name}. Formatos permitidos: PDF, DOC, DOCX, JPG, JPEG, PNG, TXT")]
    UnsupportedType { name: String },
    #[error("No se recibieron archivos")]
    NoFiles,
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
            _ => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string())),
        }
    }
}

/// Key under which an attachment is stored: `<epoch millis>_<9 random chars>`.
pub fn attachment_key(now_millis: i64) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}_{}", now_millis, &random[..9])
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

pub fn is_allowed_file(name: &str) -> bool {
    extension_of(name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// MIME type sent by the client, or the one guessed from the file name.
pub fn resolve_mime(name: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => mime.to_string(),
        _ => mime_guess::from_path(name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

pub struct MultipartParser;

impl MultipartParser {
    /// Reads every `file`/`files` field and describes it. File bytes are
    /// counted and dropped; only the metadata is returned.
    pub async fn parse_attachments(
        mut multipart: Multipart,
        now_millis: i64,
    ) -> Result<BTreeMap<String, AttachedDocument>, MultipartParseError> {
        let mut documents = BTreeMap::new();

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let content_disposition = field.content_disposition().ok_or_else(|| {
                MultipartParseError::FieldError("Content disposition not found".to_string())
            })?;
            let field_name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?;
            if !field_name.starts_with("file") {
                continue;
            }

            let name = match content_disposition.get_filename() {
                Some(filename) => sanitize(filename),
                None => format!("archivo_{}", documents.len() + 1),
            };
            if !is_allowed_file(&name) {
                return Err(MultipartParseError::UnsupportedType { name });
            }
            let declared = field.content_type().map(|mime| mime.essence_str().to_string());

            let mut size: u64 = 0;
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                size += chunk.len() as u64;
                if size > MAX_ATTACHMENT_BYTES {
                    return Err(MultipartParseError::FileTooLarge { name });
                }
            }

            let mime_type = resolve_mime(&name, declared.as_deref());
            log::info!("Received attachment {} ({} bytes, {})", name, size, mime_type);
            documents.insert(
                attachment_key(now_millis),
                AttachedDocument {
                    name,
                    size,
                    mime_type,
                    last_modified: Some(now_millis),
                },
            );
        }

        if documents.is_empty() {
            return Err(MultipartParseError::NoFiles);
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shape() {
        let key = attachment_key(1_741_944_605_000);
        let (millis, random) = key.split_once('_').unwrap();
        assert_eq!(millis, "1741944605000");
        assert_eq!(random.len(), 9);
        assert_ne!(attachment_key(1), attachment_key(1));
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed_file("dni.PDF"));
        assert!(is_allowed_file("foto.jpeg"));
        assert!(!is_allowed_file("script.exe"));
        assert!(!is_allowed_file("sin_extension"));
    }

    #[test]
    fn test_mime_falls_back_to_guess() {
        assert_eq!(resolve_mime("acta.pdf", None), "application/pdf");
        assert_eq!(
            resolve_mime("acta.pdf", Some("application/octet-stream")),
            "application/pdf"
        );
        assert_eq!(resolve_mime("nota.txt", Some("text/plain")), "text/plain");
    }

    #[test]
    fn test_errors_map_to_bad_request() {
        let response: HttpResponse = MultipartParseError::NoFiles.into();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let response: HttpResponse = MultipartParseError::IoError("reset".into()).into();
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
