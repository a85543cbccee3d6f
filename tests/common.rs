//! Shared fixtures for the integration tests: memory-backed upstream
//! services, a seeded application state and token helpers.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use parking_lot::Mutex;

use eduassist_server::auth::{generate_access_token, Role};
use eduassist_server::config::AppConfig;
use eduassist_server::fut::model::{
    FutRequest, FutRequestDraft, FutStatus, RequestType, UrgencyLevel,
};
use eduassist_server::fut::FutRegistry;
use eduassist_server::remote::{CrudService, InstitutionSource, RemoteError};
use eduassist_server::school::model::{
    Classroom, ClassroomPayload, Course, Enrollment, EnrollmentPayload, Headquarter, Institution,
    Period, StaffMember, Student, StudentPayload, TeacherAssignment, TeacherAssignmentPayload,
};
use eduassist_server::state::SchoolServices;
use eduassist_server::AppState;

pub const TEST_SECRET: &str = "test-secret";

pub trait Record {
    fn record_id(&self) -> &str;
}

macro_rules! record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn record_id(&self) -> &str {
                &self.id
            }
        })*
    };
}

record!(
    FutRequest,
    Student,
    Classroom,
    Period,
    Headquarter,
    Course,
    StaffMember,
    TeacherAssignment,
    Enrollment
);

type Builder<T, P> = Box<dyn Fn(&str, &P) -> T + Send + Sync>;

/// In-memory stand-in for one upstream REST resource.
pub struct MemoryService<T, P> {
    records: Mutex<Vec<T>>,
    build: Builder<T, P>,
    failing: AtomicBool,
    mutations: AtomicUsize,
    next_id: AtomicUsize,
}

impl<T, P> MemoryService<T, P>
where
    T: Record + Clone,
{
    pub fn new(records: Vec<T>, build: impl Fn(&str, &P) -> T + Send + Sync + 'static) -> Self {
        Self {
            next_id: AtomicUsize::new(records.len() + 1),
            records: Mutex::new(records),
            build: Box::new(build),
            failing: AtomicBool::new(false),
            mutations: AtomicUsize::new(0),
        }
    }

    /// A reference list that is never written to.
    pub fn read_only(records: Vec<T>) -> Self {
        Self::new(records, |_, _| panic!("read-only resource"))
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Create, update and delete calls that reached the service.
    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<T> {
        self.records.lock().clone()
    }

    /// Adds a record upstream without going through the API.
    pub fn insert(&self, record: T) {
        self.records.lock().push(record);
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<T, P> CrudService<T, P> for MemoryService<T, P>
where
    T: Record + Clone + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    async fn get_all(&self) -> Result<Vec<T>, RemoteError> {
        self.check()?;
        Ok(self.records.lock().clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<T, RemoteError> {
        self.check()?;
        self.records
            .lock()
            .iter()
            .find(|r| r.record_id() == id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))
    }

    async fn create(&self, payload: &P) -> Result<T, RemoteError> {
        self.check()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let record = (self.build)(&id, payload);
        self.records.lock().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, payload: &P) -> Result<T, RemoteError> {
        self.check()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock();
        let slot = records
            .iter_mut()
            .find(|r| r.record_id() == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        *slot = (self.build)(id, payload);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.check()?;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        if records.len() == before {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

pub struct StaticInstitution(pub Option<Institution>);

#[async_trait]
impl InstitutionSource for StaticInstitution {
    async fn personal_institution(&self) -> Result<Option<Institution>, RemoteError> {
        Ok(self.0.clone())
    }

    async fn fetch_logo(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        Err(RemoteError::NotFound(url.to_string()))
    }
}

pub fn student(id: &str, first: &str, last: &str, guardian_dni: &str) -> Student {
    Student {
        id: id.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        document_type: Some("DNI".to_string()),
        document_number: Some("71234567".to_string()),
        guardian_name: Some("Rosa".to_string()),
        guardian_last_name: Some(last.to_string()),
        guardian_document_number: Some(guardian_dni.to_string()),
        guardian_phone: Some("987654321".to_string()),
        status: Some("ACTIVE".to_string()),
        ..Default::default()
    }
}

pub fn fut_request(
    id: &str,
    number: &str,
    status: FutStatus,
    urgency: UrgencyLevel,
) -> FutRequest {
    FutRequest {
        id: id.to_string(),
        student_enrollment_id: "s1".to_string(),
        request_number: number.to_string(),
        request_type: Some(RequestType::Constancia),
        request_subject: Some("Constancia de estudios".to_string()),
        request_description: Some("Solicito constancia de estudios para trámite de beca.".to_string()),
        requested_by: Some("Rosa Pérez".to_string()),
        contact_phone: Some("987654321".to_string()),
        contact_email: Some("rosa@correo.com".to_string()),
        urgency_level: Some(urgency),
        status: Some(status),
        created_at: Some("2025-03-14T09:30:00".to_string()),
        ..Default::default()
    }
}

pub fn valid_draft(student_id: &str) -> FutRequestDraft {
    FutRequestDraft {
        student_enrollment_id: student_id.to_string(),
        request_type: Some(RequestType::Certificado),
        request_subject: "Certificado de estudios".to_string(),
        request_description: "Solicito el certificado de estudios del año 2024.".to_string(),
        requested_by: "Rosa Pérez".to_string(),
        contact_phone: "987654321".to_string(),
        contact_email: "rosa@correo.com".to_string(),
        ..Default::default()
    }
}

fn classroom(id: &str, grade: u8, section: &str, status: &str) -> Classroom {
    Classroom {
        id: id.to_string(),
        headquarter_id: Some("hq1".to_string()),
        period_id: Some("p1".to_string()),
        grade: Some(grade),
        section: Some(section.to_string()),
        shift: Some("M".to_string()),
        status: Some(status.to_string()),
        ..Default::default()
    }
}

/// Every upstream service, seeded with a small school.
pub struct Fixture {
    pub fut: Arc<MemoryService<FutRequest, FutRequestDraft>>,
    pub students: Arc<MemoryService<Student, StudentPayload>>,
    pub classrooms: Arc<MemoryService<Classroom, ClassroomPayload>>,
    pub periods: Arc<MemoryService<Period, serde_json::Value>>,
    pub headquarters: Arc<MemoryService<Headquarter, serde_json::Value>>,
    pub courses: Arc<MemoryService<Course, serde_json::Value>>,
    pub teachers: Arc<MemoryService<StaffMember, serde_json::Value>>,
    pub assignments: Arc<MemoryService<TeacherAssignment, TeacherAssignmentPayload>>,
    pub enrollments: Arc<MemoryService<Enrollment, EnrollmentPayload>>,
    pub institution: Option<Institution>,
}

impl Fixture {
    pub fn new() -> Self {
        let fut = vec![
            fut_request("f1", "4567JP", FutStatus::Pendiente, UrgencyLevel::Alta),
            fut_request("f2", "1234AL", FutStatus::Aprobado, UrgencyLevel::Baja),
            fut_request("f3", "4567JP-2", FutStatus::Pendiente, UrgencyLevel::Media),
        ];
        let students = vec![
            student("s1", "Juan", "Pérez", "45678912"),
            student("s2", "Ana", "López", "12345678"),
        ];

        Self {
            fut: Arc::new(MemoryService::new(fut, |id, draft: &FutRequestDraft| {
                FutRequest::from_draft(id, draft, Some("2025-03-14T09:30:00".to_string()))
            })),
            students: Arc::new(MemoryService::new(students, |id, p: &StudentPayload| Student {
                id: id.to_string(),
                first_name: Some(p.first_name.clone()),
                last_name: Some(p.last_name.clone()),
                document_type: Some(p.document_type.clone()),
                document_number: Some(p.document_number.clone()),
                status: p.status.clone(),
                ..Default::default()
            })),
            classrooms: Arc::new(MemoryService::new(
                vec![
                    classroom("c1", 3, "B", "A"),
                    classroom("c2", 1, "A", "A"),
                    classroom("c3", 5, "C", "I"),
                ],
                |id, p: &ClassroomPayload| Classroom {
                    id: id.to_string(),
                    headquarter_id: Some(p.headquarter_id.clone()),
                    period_id: Some(p.period_id.clone()),
                    grade: p.grade,
                    section: Some(p.section.clone()),
                    shift: Some(p.shift.clone()),
                    status: p.status.clone(),
                    ..Default::default()
                },
            )),
            periods: Arc::new(MemoryService::read_only(vec![Period {
                id: "p1".to_string(),
                period: Some("1".to_string()),
                period_type: Some("BIMESTER".to_string()),
                academic_year: Some("2025".to_string()),
                ..Default::default()
            }])),
            headquarters: Arc::new(MemoryService::read_only(vec![Headquarter {
                id: "hq1".to_string(),
                headquarters_name: Some("Sede Central".to_string()),
                ..Default::default()
            }])),
            courses: Arc::new(MemoryService::read_only(vec![Course {
                id: "co1".to_string(),
                course_name: Some("Matemática".to_string()),
                ..Default::default()
            }])),
            teachers: Arc::new(MemoryService::read_only(vec![StaffMember {
                id: "t1".to_string(),
                first_name: Some("Carlos".to_string()),
                last_name: Some("Quispe".to_string()),
                ..Default::default()
            }])),
            assignments: Arc::new(MemoryService::new(
                vec![TeacherAssignment {
                    id: "a1".to_string(),
                    teacher_id: Some("t1".to_string()),
                    course_id: Some("co1".to_string()),
                    classroom_id: Some("c1".to_string()),
                    assignment_date: Some("2025-03-01".to_string()),
                    status: Some("A".to_string()),
                    ..Default::default()
                }],
                |id, p: &TeacherAssignmentPayload| TeacherAssignment {
                    id: id.to_string(),
                    teacher_id: Some(p.teacher_id.clone()),
                    course_id: Some(p.course_id.clone()),
                    classroom_id: Some(p.classroom_id.clone()),
                    assignment_date: Some(p.assignment_date.clone()),
                    assignment_type: p.assignment_type.clone(),
                    status: p.status.clone(),
                    ..Default::default()
                },
            )),
            enrollments: Arc::new(MemoryService::new(
                vec![Enrollment {
                    id: "e1".to_string(),
                    student_id: Some("s1".to_string()),
                    classroom_id: Some("c1".to_string()),
                    academic_year: Some("2025".to_string()),
                    enrollment_date: Some("2025-03-01".to_string()),
                    status: Some("ACTIVE".to_string()),
                    ..Default::default()
                }],
                |id, p: &EnrollmentPayload| Enrollment {
                    id: id.to_string(),
                    student_id: Some(p.student_id.clone()),
                    classroom_id: Some(p.classroom_id.clone()),
                    academic_year: Some(p.academic_year.clone()),
                    enrollment_date: Some(p.enrollment_date.clone()),
                    status: p.status.clone(),
                    ..Default::default()
                },
            )),
            institution: Some(Institution {
                name: Some("I.E. San Martín de Porres".to_string()),
                modular_code: Some("0456789".to_string()),
                address: Some("Av. Los Próceres 123".to_string()),
                ..Default::default()
            }),
        }
    }

    pub fn state(&self) -> web::Data<AppState> {
        let registry = FutRegistry::new(
            self.fut.clone(),
            self.students.clone(),
            Arc::new(StaticInstitution(self.institution.clone())),
        );
        let school = SchoolServices {
            classrooms: self.classrooms.clone(),
            periods: self.periods.clone(),
            headquarters: self.headquarters.clone(),
            courses: self.courses.clone(),
            teachers: self.teachers.clone(),
            assignments: self.assignments.clone(),
            students: self.students.clone(),
            enrollments: self.enrollments.clone(),
        };
        let config = AppConfig::for_remote("http://upstream.test", TEST_SECRET);
        web::Data::new(AppState::from_parts(config, registry, school))
    }
}

pub fn token_for(role: Role) -> String {
    generate_access_token(TEST_SECRET, "staff-1", "usuario", role)
        .expect("Failed to generate access token")
}

pub fn bearer(role: Role) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", token_for(role)),
    )
}
