//! Request-number generation.
//!
//! A request number is the first four characters of the guardian's document
//! number followed by the upper-cased initials of the student's first and
//! last name: guardian `45678912`, student `Juan Pérez` gives `4567JP`.

use chrono::NaiveDateTime;

use crate::school::model::Student;

pub const FALLBACK_PREFIX: &str = "FUT-";

fn initial(name: Option<&str>) -> String {
    name.and_then(|n| n.trim().chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// `None` when the student has no guardian document on file.
pub fn derive_request_number(student: &Student) -> Option<String> {
    let document = student.guardian_document_number.as_deref()?.trim();
    if document.is_empty() {
        return None;
    }
    let prefix: String = document.chars().take(4).collect();
    Some(format!(
        "{}{}{}",
        prefix,
        initial(student.first_name.as_deref()),
        initial(student.last_name.as_deref())
    ))
}

/// `FUT-20250314093005`, used when no guardian document is known.
pub fn fallback_request_number(now: NaiveDateTime) -> String {
    format!("{}{}", FALLBACK_PREFIX, now.format("%Y%m%d%H%M%S"))
}

pub fn request_number_for(student: Option<&Student>, now: NaiveDateTime) -> String {
    student
        .and_then(derive_request_number)
        .unwrap_or_else(|| fallback_request_number(now))
}

/// Appends `-2`, `-3`, ... until `candidate` collides with none of `taken`.
pub fn ensure_unique<'a>(candidate: String, taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = taken.into_iter().collect();
    if !taken.contains(&candidate.as_str()) {
        return candidate;
    }
    let mut suffix = 2;
    loop {
        let numbered = format!("{}-{}", candidate, suffix);
        if !taken.contains(&numbered.as_str()) {
            return numbered;
        }
        suffix += 1;
    }
}
