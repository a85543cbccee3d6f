//! Joins raw records with the reference lists they point at, producing the
//! rows the list screens display.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::model::{
    shift_label, status_label, Classroom, Course, Enrollment, Headquarter, Period, PeriodType,
    StaffMember, Student, TeacherAssignment,
};
use crate::listing::{compare_text, HasStatus, Searchable, SortOrder};

pub const UNKNOWN_HEADQUARTER: &str = "Sede Desconocida";

/// "1 Bimestre - 2025 (PRIMARIA)"
pub fn period_display_name(period: &Period) -> String {
    let type_label = period
        .period_type
        .as_deref()
        .map(|code| match PeriodType::from_code(code) {
            Some(kind) => kind.label().to_string(),
            None => code.to_string(),
        })
        .unwrap_or_default();
    format!(
        "{} {} - {} ({})",
        period.period.as_deref().unwrap_or(""),
        type_label,
        period.academic_year.as_deref().unwrap_or(""),
        period.level.as_deref().unwrap_or("")
    )
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomView {
    #[serde(flatten)]
    pub classroom: Classroom,
    pub period_name: Option<String>,
    pub headquarter_name: Option<String>,
}

impl Searchable for ClassroomView {
    fn search_fields(&self) -> Vec<&str> {
        [
            self.classroom.section.as_deref(),
            self.headquarter_name.as_deref(),
            self.period_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl HasStatus for ClassroomView {
    fn status(&self) -> Option<&str> {
        self.classroom.status.as_deref()
    }
}

pub fn enrich_classrooms(
    classrooms: &[Classroom],
    periods: &[Period],
    headquarters: &[Headquarter],
) -> Vec<ClassroomView> {
    let periods: HashMap<&str, &Period> = periods.iter().map(|p| (p.id.as_str(), p)).collect();
    let headquarters: HashMap<&str, &Headquarter> =
        headquarters.iter().map(|h| (h.id.as_str(), h)).collect();

    classrooms
        .iter()
        .map(|classroom| {
            let period_name = classroom
                .period_id
                .as_deref()
                .and_then(|id| periods.get(id))
                .map(|p| period_display_name(p));
            let headquarter_name = classroom.headquarter_id.as_deref().map(|id| {
                headquarters
                    .get(id)
                    .and_then(|h| h.headquarters_name.clone())
                    .unwrap_or_else(|| UNKNOWN_HEADQUARTER.to_string())
            });
            ClassroomView {
                classroom: classroom.clone(),
                period_name,
                headquarter_name,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassroomSort {
    GradeSection,
    Period,
    Headquarter,
    Shift,
    Status,
    CreatedAt,
}

impl ClassroomSort {
    pub fn parse(key: Option<&str>) -> Self {
        match key.unwrap_or("") {
            "period" | "periodName" => ClassroomSort::Period,
            "headquarter" | "headquarterName" => ClassroomSort::Headquarter,
            "shift" => ClassroomSort::Shift,
            "status" => ClassroomSort::Status,
            "createdAt" => ClassroomSort::CreatedAt,
            _ => ClassroomSort::GradeSection,
        }
    }

    pub fn compare(self, a: &ClassroomView, b: &ClassroomView) -> Ordering {
        match self {
            ClassroomSort::GradeSection => a
                .classroom
                .grade
                .cmp(&b.classroom.grade)
                .then_with(|| compare_text(a.classroom.section.as_deref(), b.classroom.section.as_deref())),
            ClassroomSort::Period => compare_text(a.period_name.as_deref(), b.period_name.as_deref()),
            ClassroomSort::Headquarter => {
                compare_text(a.headquarter_name.as_deref(), b.headquarter_name.as_deref())
            }
            ClassroomSort::Shift => shift_label(a.classroom.shift.as_deref())
                .cmp(shift_label(b.classroom.shift.as_deref())),
            ClassroomSort::Status => status_label(a.classroom.status.as_deref())
                .cmp(status_label(b.classroom.status.as_deref())),
            ClassroomSort::CreatedAt => a.classroom.created_at.cmp(&b.classroom.created_at),
        }
    }
}

pub fn sort_classrooms(views: &mut [ClassroomView], key: Option<&str>, order: SortOrder) {
    let sort = ClassroomSort::parse(key);
    views.sort_by(|a, b| order.apply(sort.compare(a, b)));
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: TeacherAssignment,
    pub teacher_name: String,
    pub course_name: String,
    pub classroom_name: String,
}

impl Searchable for AssignmentView {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.teacher_name.as_str(),
            self.course_name.as_str(),
            self.classroom_name.as_str(),
        ]
    }
}

impl HasStatus for AssignmentView {
    fn status(&self) -> Option<&str> {
        self.assignment.status.as_deref()
    }
}

/// Names fall back to the raw ids when the referenced record is missing.
pub fn enrich_assignments(
    assignments: &[TeacherAssignment],
    teachers: &[StaffMember],
    courses: &[Course],
    classrooms: &[Classroom],
) -> Vec<AssignmentView> {
    assignments
        .iter()
        .map(|assignment| {
            let teacher_id = assignment.teacher_id.clone().unwrap_or_default();
            let course_id = assignment.course_id.clone().unwrap_or_default();
            let classroom_id = assignment.classroom_id.clone().unwrap_or_default();

            let teacher_name = teachers
                .iter()
                .find(|t| t.id == teacher_id)
                .and_then(StaffMember::full_name)
                .unwrap_or_else(|| teacher_id.clone());
            let course_name = courses
                .iter()
                .find(|c| c.id == course_id)
                .and_then(|c| c.course_name.clone())
                .unwrap_or_else(|| course_id.clone());
            let classroom_name = classrooms
                .iter()
                .find(|c| c.id == classroom_id)
                .and_then(Classroom::display_name)
                .unwrap_or_else(|| classroom_id.clone());

            AssignmentView {
                assignment: assignment.clone(),
                teacher_name,
                course_name,
                classroom_name,
            }
        })
        .collect()
}

pub fn sort_assignments(views: &mut [AssignmentView], key: Option<&str>, order: SortOrder) {
    views.sort_by(|a, b| {
        let ordering = match key.unwrap_or("") {
            "course" | "courseName" => compare_text(Some(&a.course_name), Some(&b.course_name)),
            "classroom" | "classroomName" => {
                compare_text(Some(&a.classroom_name), Some(&b.classroom_name))
            }
            "assignmentDate" => a.assignment.assignment_date.cmp(&b.assignment.assignment_date),
            "status" => status_label(a.assignment.status.as_deref())
                .cmp(status_label(b.assignment.status.as_deref())),
            _ => compare_text(Some(&a.teacher_name), Some(&b.teacher_name)),
        };
        order.apply(ordering)
    });
}

impl Searchable for Student {
    fn search_fields(&self) -> Vec<&str> {
        [
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.document_number.as_deref(),
            self.student_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl HasStatus for Student {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

pub fn sort_students(students: &mut [Student], key: Option<&str>, order: SortOrder) {
    students.sort_by(|a, b| {
        let ordering = match key.unwrap_or("") {
            "document" | "documentNumber" => {
                compare_text(a.document_number.as_deref(), b.document_number.as_deref())
            }
            "status" => status_label(a.status.as_deref()).cmp(status_label(b.status.as_deref())),
            "createdAt" => a.created_at.cmp(&b.created_at),
            _ => compare_text(a.last_name.as_deref(), b.last_name.as_deref())
                .then_with(|| compare_text(a.first_name.as_deref(), b.first_name.as_deref())),
        };
        order.apply(ordering)
    });
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub student_name: String,
    pub classroom_name: String,
}

impl Searchable for EnrollmentView {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.student_name.as_str(), self.classroom_name.as_str()];
        if let Some(year) = self.enrollment.academic_year.as_deref() {
            fields.push(year);
        }
        fields
    }
}

impl HasStatus for EnrollmentView {
    fn status(&self) -> Option<&str> {
        self.enrollment.status.as_deref()
    }
}

pub fn enrich_enrollments(
    enrollments: &[Enrollment],
    students: &[Student],
    classrooms: &[Classroom],
) -> Vec<EnrollmentView> {
    enrollments
        .iter()
        .map(|enrollment| {
            let student_id = enrollment.student_id.clone().unwrap_or_default();
            let classroom_id = enrollment.classroom_id.clone().unwrap_or_default();
            let student_name = students
                .iter()
                .find(|s| s.id == student_id)
                .and_then(Student::full_name)
                .unwrap_or_else(|| student_id.clone());
            let classroom_name = classrooms
                .iter()
                .find(|c| c.id == classroom_id)
                .and_then(Classroom::display_name)
                .unwrap_or_else(|| classroom_id.clone());
            EnrollmentView {
                enrollment: enrollment.clone(),
                student_name,
                classroom_name,
            }
        })
        .collect()
}

pub fn sort_enrollments(views: &mut [EnrollmentView], key: Option<&str>, order: SortOrder) {
    views.sort_by(|a, b| {
        let ordering = match key.unwrap_or("") {
            "classroom" | "classroomName" => {
                compare_text(Some(&a.classroom_name), Some(&b.classroom_name))
            }
            "academicYear" => a.enrollment.academic_year.cmp(&b.enrollment.academic_year),
            "enrollmentDate" => a.enrollment.enrollment_date.cmp(&b.enrollment.enrollment_date),
            "status" => status_label(a.enrollment.status.as_deref())
                .cmp(status_label(b.enrollment.status.as_deref())),
            _ => compare_text(Some(&a.student_name), Some(&b.student_name)),
        };
        order.apply(ordering)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::search_items;

    fn period() -> Period {
        Period {
            id: "p1".into(),
            period: Some("2".into()),
            period_type: Some("BIMESTER".into()),
            academic_year: Some("2025".into()),
            level: Some("PRIMARIA".into()),
            status: Some("A".into()),
        }
    }

    #[test]
    fn test_period_display_name() {
        assert_eq!(period_display_name(&period()), "2 Bimestre - 2025 (PRIMARIA)");
    }

    #[test]
    fn test_unknown_headquarter_label() {
        let classroom = Classroom {
            id: "c1".into(),
            headquarter_id: Some("missing".into()),
            period_id: Some("p1".into()),
            ..Default::default()
        };
        let views = enrich_classrooms(&[classroom], &[period()], &[]);
        assert_eq!(views[0].headquarter_name.as_deref(), Some(UNKNOWN_HEADQUARTER));
        assert_eq!(views[0].period_name.as_deref(), Some("2 Bimestre - 2025 (PRIMARIA)"));
    }

    #[test]
    fn test_classrooms_sort_by_grade_then_section() {
        let rooms = vec![
            Classroom { id: "1".into(), grade: Some(2), section: Some("B".into()), ..Default::default() },
            Classroom { id: "2".into(), grade: Some(1), section: Some("C".into()), ..Default::default() },
            Classroom { id: "3".into(), grade: Some(2), section: Some("A".into()), ..Default::default() },
        ];
        let mut views = enrich_classrooms(&rooms, &[], &[]);
        sort_classrooms(&mut views, None, SortOrder::Asc);
        let ids: Vec<&str> = views.iter().map(|v| v.classroom.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);

        sort_classrooms(&mut views, Some("gradeSection"), SortOrder::Desc);
        assert_eq!(views[0].classroom.id, "1");
    }

    #[test]
    fn test_assignment_names_fall_back_to_ids() {
        let assignment = TeacherAssignment {
            id: "a1".into(),
            teacher_id: Some("t9".into()),
            course_id: Some("math".into()),
            classroom_id: Some("c1".into()),
            ..Default::default()
        };
        let courses = vec![Course {
            id: "math".into(),
            course_name: Some("Matemática".into()),
            ..Default::default()
        }];
        let views = enrich_assignments(&[assignment], &[], &courses, &[]);
        assert_eq!(views[0].teacher_name, "t9");
        assert_eq!(views[0].course_name, "Matemática");
        assert_eq!(views[0].classroom_name, "c1");

        assert_eq!(search_items(&views, "matem").len(), 1);
        assert!(search_items(&views, "historia").is_empty());
    }

    #[test]
    fn test_enrollment_view_uses_student_name() {
        let enrollment = Enrollment {
            id: "e1".into(),
            student_id: Some("s1".into()),
            classroom_id: Some("c1".into()),
            academic_year: Some("2025".into()),
            ..Default::default()
        };
        let students = vec![Student {
            id: "s1".into(),
            first_name: Some("Ana".into()),
            last_name: Some("Flores".into()),
            ..Default::default()
        }];
        let views = enrich_enrollments(&[enrollment], &students, &[]);
        assert_eq!(views[0].student_name, "Ana Flores");
        assert_eq!(search_items(&views, "2025").len(), 1);
    }
}
