//! In-memory view of the FUT requests held by the API.
//!
//! The registry keeps the last list it fetched, the student roster used for
//! number generation and the origin institution shown on generated
//! documents. Every successful mutation reloads the whole list so the held
//! copy mirrors the service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use parking_lot::RwLock;
use thiserror::Error;

use super::filter::FutFilter;
use super::model::{FutRequest, FutRequestDraft, FutStatistics};
use super::number::{ensure_unique, request_number_for};
use super::validation::validate_draft;
use crate::notify::Notifier;
use crate::remote::{CrudService, InstitutionSource, RemoteError};
use crate::school::model::{Institution, Student, StudentPayload};
use crate::validation::ValidationErrors;

pub type FutService = dyn CrudService<FutRequest, FutRequestDraft>;
pub type StudentService = dyn CrudService<Student, StudentPayload>;

const LOAD_FAILED: &str = "Error al cargar las solicitudes FUT";
const CREATE_FAILED: &str = "Error inesperado al crear la solicitud";
const UPDATE_FAILED: &str = "Error inesperado al actualizar la solicitud";
const DELETE_FAILED: &str = "Error inesperado al eliminar la solicitud";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{}", .0.joined_message())]
    Validation(ValidationErrors),
    #[error("Solicitud FUT no encontrada: {0}")]
    NotFound(String),
    #[error("{message}")]
    Remote {
        message: String,
        #[source]
        source: RemoteError,
    },
}

impl RegistryError {
    fn remote(source: RemoteError, fallback: &str) -> Self {
        match source {
            RemoteError::NotFound(what) => RegistryError::NotFound(what),
            other => RegistryError::Remote {
                message: other.user_message(fallback),
                source: other,
            },
        }
    }
}

pub struct FutRegistry {
    service: Arc<FutService>,
    students: Arc<StudentService>,
    institutions: Arc<dyn InstitutionSource>,
    requests: RwLock<Vec<FutRequest>>,
    loaded: AtomicBool,
    roster: RwLock<Vec<Student>>,
    origin_institution: RwLock<Option<Institution>>,
}

impl FutRegistry {
    pub fn new(
        service: Arc<FutService>,
        students: Arc<StudentService>,
        institutions: Arc<dyn InstitutionSource>,
    ) -> Self {
        Self {
            service,
            students,
            institutions,
            requests: RwLock::new(Vec::new()),
            loaded: AtomicBool::new(false),
            roster: RwLock::new(Vec::new()),
            origin_institution: RwLock::new(None),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Replaces the held list with the service's current one.
    pub async fn load(&self) -> Result<Vec<FutRequest>, RegistryError> {
        match self.service.get_all().await {
            Ok(requests) => {
                log::info!("Loaded {} FUT requests", requests.len());
                *self.requests.write() = requests.clone();
                self.loaded.store(true, Ordering::Release);
                Ok(requests)
            }
            Err(e) => {
                log::error!("Failed to load FUT requests: {}", e);
                Err(RegistryError::remote(e, LOAD_FAILED))
            }
        }
    }

    pub fn list(&self) -> Vec<FutRequest> {
        self.requests.read().clone()
    }

    pub fn find(&self, id: &str) -> Option<FutRequest> {
        self.requests.read().iter().find(|r| r.id == id).cloned()
    }

    /// Held copy first, then the service.
    pub async fn fetch(&self, id: &str) -> Result<FutRequest, RegistryError> {
        if let Some(request) = self.find(id) {
            return Ok(request);
        }
        self.service
            .get_by_id(id)
            .await
            .map_err(|e| RegistryError::remote(e, LOAD_FAILED))
    }

    /// A blank term reloads from the service and returns everything.
    pub async fn search(&self, term: &str) -> Result<Vec<FutRequest>, RegistryError> {
        if term.trim().is_empty() {
            return self.load().await;
        }
        Ok(self.filtered(&FutFilter::by_request_number(term)))
    }

    pub fn filtered(&self, filter: &FutFilter) -> Vec<FutRequest> {
        filter.apply(&self.requests.read())
    }

    pub fn statistics(&self) -> FutStatistics {
        FutStatistics::from_requests(&self.requests.read())
    }

    pub async fn create(
        &self,
        draft: FutRequestDraft,
        notifier: &dyn Notifier,
    ) -> Result<FutRequest, RegistryError> {
        self.create_at(draft, notifier, Local::now().naive_local()).await
    }

    pub async fn create_at(
        &self,
        mut draft: FutRequestDraft,
        notifier: &dyn Notifier,
        now: NaiveDateTime,
    ) -> Result<FutRequest, RegistryError> {
        draft.apply_defaults();
        if draft.request_number.trim().is_empty() {
            draft.request_number = self.next_request_number(&draft.student_enrollment_id, now).await;
        }

        if let Err(errors) = validate_draft(&draft) {
            notifier.error(&errors.joined_message());
            return Err(RegistryError::Validation(errors));
        }

        match self.service.create(&draft).await {
            Ok(created) => {
                log::info!("Created FUT request {}", created.request_number);
                notifier.success("Solicitud FUT creada exitosamente");
                self.reload_after_mutation().await;
                Ok(created)
            }
            Err(e) => {
                log::error!("Failed to create FUT request: {}", e);
                let err = RegistryError::remote(e, CREATE_FAILED);
                notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Updates never change the request number.
    pub async fn update(
        &self,
        id: &str,
        mut draft: FutRequestDraft,
        notifier: &dyn Notifier,
    ) -> Result<FutRequest, RegistryError> {
        let existing = match self.fetch(id).await {
            Ok(existing) => existing,
            Err(err) => {
                notifier.error(&err.to_string());
                return Err(err);
            }
        };
        draft.request_number = existing.request_number;
        draft.apply_defaults();

        if let Err(errors) = validate_draft(&draft) {
            notifier.error(&errors.joined_message());
            return Err(RegistryError::Validation(errors));
        }

        match self.service.update(id, &draft).await {
            Ok(updated) => {
                log::info!("Updated FUT request {}", id);
                notifier.success("Solicitud FUT actualizada exitosamente");
                self.reload_after_mutation().await;
                Ok(updated)
            }
            Err(e) => {
                log::error!("Failed to update FUT request {}: {}", id, e);
                let err = RegistryError::remote(e, UPDATE_FAILED);
                notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    pub async fn delete(&self, id: &str, notifier: &dyn Notifier) -> Result<(), RegistryError> {
        match self.service.delete(id).await {
            Ok(()) => {
                log::info!("Deleted FUT request {}", id);
                notifier.success("Solicitud FUT eliminada exitosamente");
                self.reload_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to delete FUT request {}: {}", id, e);
                let err = RegistryError::remote(e, DELETE_FAILED);
                notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    async fn reload_after_mutation(&self) {
        if let Err(e) = self.load().await {
            log::warn!("FUT list reload after mutation failed: {}", e);
        }
    }

    async fn next_request_number(&self, student_id: &str, now: NaiveDateTime) -> String {
        let student = self.student(student_id).await;
        let candidate = request_number_for(student.as_ref(), now);
        let requests = self.requests.read();
        ensure_unique(candidate, requests.iter().map(|r| r.request_number.as_str()))
    }

    /// Held roster entry for `id`. A student missing from the roster
    /// triggers one roster reload before giving up.
    pub async fn student(&self, id: &str) -> Option<Student> {
        if let Some(student) = self.find_student(id) {
            return Some(student);
        }
        if let Err(e) = self.load_students().await {
            log::warn!("Student {} not in roster and reload failed: {}", id, e);
            return None;
        }
        self.find_student(id)
    }

    fn find_student(&self, id: &str) -> Option<Student> {
        self.roster.read().iter().find(|s| s.id == id).cloned()
    }

    pub async fn load_students(&self) -> Result<Vec<Student>, RegistryError> {
        match self.students.get_all().await {
            Ok(students) => {
                log::info!("Loaded {} students", students.len());
                *self.roster.write() = students.clone();
                Ok(students)
            }
            Err(e) => {
                log::error!("Failed to load students: {}", e);
                Err(RegistryError::remote(e, "Error al cargar los estudiantes"))
            }
        }
    }

    pub fn students(&self) -> Vec<Student> {
        self.roster.read().clone()
    }

    /// Failures are logged and leave the previous value in place; the
    /// document composer falls back to the default institution header.
    pub async fn load_origin_institution(&self) -> Option<Institution> {
        match self.institutions.personal_institution().await {
            Ok(Some(institution)) => {
                *self.origin_institution.write() = Some(institution.clone());
                Some(institution)
            }
            Ok(None) => {
                log::warn!("No origin institution returned for the current staff member");
                self.origin_institution()
            }
            Err(e) => {
                log::error!("Failed to load origin institution: {}", e);
                self.origin_institution()
            }
        }
    }

    pub fn origin_institution(&self) -> Option<Institution> {
        self.origin_institution.read().clone()
    }

    pub async fn fetch_logo(&self, url: &str) -> Option<Vec<u8>> {
        match self.institutions.fetch_logo(url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("Could not fetch institution logo from {}: {}", url, e);
                None
            }
        }
    }
}
