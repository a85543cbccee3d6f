//! Shared application state handed to every handler.

use std::sync::Arc;

use serde_json::Value;

use crate::config::AppConfig;
use crate::document::FutComposer;
use crate::fut::{FutRegistry, FutService, StudentService};
use crate::remote::{CrudService, RemoteError, RestClient};
use crate::school::model::{
    Classroom, ClassroomPayload, Course, Enrollment, EnrollmentPayload, Headquarter, Period,
    StaffMember, TeacherAssignment, TeacherAssignmentPayload,
};

/// Upstream resource paths, relative to `REMOTE_API_BASE_URL`.
pub mod resources {
    pub const FUT_REQUESTS: &str = "fut-requests";
    pub const STUDENTS: &str = "students";
    pub const CLASSROOMS: &str = "classrooms";
    pub const PERIODS: &str = "periods";
    pub const HEADQUARTERS: &str = "headquarters";
    pub const COURSES: &str = "courses";
    pub const TEACHERS: &str = "teachers";
    pub const TEACHER_ASSIGNMENTS: &str = "teacher-assignments";
    pub const ENROLLMENTS: &str = "enrollments";
}

/// A reference list this service only reads.
pub type ReferenceService<T> = dyn CrudService<T, Value>;

/// Remote services behind the school list screens.
#[derive(Clone)]
pub struct SchoolServices {
    pub classrooms: Arc<dyn CrudService<Classroom, ClassroomPayload>>,
    pub periods: Arc<ReferenceService<Period>>,
    pub headquarters: Arc<ReferenceService<Headquarter>>,
    pub courses: Arc<ReferenceService<Course>>,
    pub teachers: Arc<ReferenceService<StaffMember>>,
    pub assignments: Arc<dyn CrudService<TeacherAssignment, TeacherAssignmentPayload>>,
    pub students: Arc<StudentService>,
    pub enrollments: Arc<dyn CrudService<Enrollment, EnrollmentPayload>>,
}

impl SchoolServices {
    pub fn from_client(client: &RestClient, students: Arc<StudentService>) -> Self {
        Self {
            classrooms: Arc::new(client.resource::<Classroom>(resources::CLASSROOMS)),
            periods: Arc::new(client.resource::<Period>(resources::PERIODS)),
            headquarters: Arc::new(client.resource::<Headquarter>(resources::HEADQUARTERS)),
            courses: Arc::new(client.resource::<Course>(resources::COURSES)),
            teachers: Arc::new(client.resource::<StaffMember>(resources::TEACHERS)),
            assignments: Arc::new(
                client.resource::<TeacherAssignment>(resources::TEACHER_ASSIGNMENTS),
            ),
            students,
            enrollments: Arc::new(client.resource::<Enrollment>(resources::ENROLLMENTS)),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub fut: FutRegistry,
    pub composer: FutComposer,
    pub school: SchoolServices,
}

impl AppState {
    /// Wires every service to the upstream REST API.
    pub fn new(config: AppConfig) -> Result<Self, RemoteError> {
        let client = RestClient::new(config.remote_api_base_url.clone())?;
        let fut_service: Arc<FutService> =
            Arc::new(client.resource::<crate::fut::model::FutRequest>(resources::FUT_REQUESTS));
        let students: Arc<StudentService> =
            Arc::new(client.resource::<crate::school::model::Student>(resources::STUDENTS));

        let school = SchoolServices::from_client(&client, students.clone());
        let registry = FutRegistry::new(fut_service, students, Arc::new(client));
        Ok(Self::from_parts(config, registry, school))
    }

    pub fn from_parts(config: AppConfig, fut: FutRegistry, school: SchoolServices) -> Self {
        Self {
            config,
            fut,
            composer: FutComposer::new(),
            school,
        }
    }
}
