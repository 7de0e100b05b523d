//! Turns constraint violations reported by the store into field-attributed
//! 409 responses. Validation cannot see a duplicate inserted by a concurrent
//! request, so these run after a failed write.

use tracing::info;

use super::error::{ApiError, ErrorEnvelope, NON_FIELD_ERRORS, VALIDATION_FAILED};
use crate::store::{StoreError, constraint};

fn conflict(field: &str, message: &str) -> ApiError {
    ApiError::Conflict(ErrorEnvelope::new(VALIDATION_FAILED).with(field, message))
}

pub fn department_create(err: StoreError) -> ApiError {
    match err {
        StoreError::UniqueViolation { .. } => {
            info!(error = %err, "Duplicate department name");
            conflict("name", "A department with this name already exists.")
        }
        other => ApiError::Store(other),
    }
}

/// Names the field whose unique key fired. Keys declared in the schema are
/// matched exactly; anything else falls back to looking for the column name
/// in the key name, or in the raw message when the store gave no key.
fn employee_field(constraint: Option<&str>, message: &str) -> Option<&'static str> {
    match constraint {
        Some(constraint::EMPLOYEE_ID) => return Some("employee_id"),
        Some(constraint::EMPLOYEE_EMAIL) => return Some("email"),
        _ => {}
    }
    let haystack = constraint.unwrap_or(message).to_lowercase();
    if haystack.contains("employee_id") {
        Some("employee_id")
    } else if haystack.contains("email") {
        Some("email")
    } else {
        None
    }
}

pub fn employee_create(err: StoreError) -> ApiError {
    match err {
        StoreError::UniqueViolation {
            ref constraint,
            ref message,
        } => {
            info!(error = %err, "Duplicate employee");
            match employee_field(constraint.as_deref(), message) {
                Some("employee_id") => conflict(
                    "employee_id",
                    "An employee with this employee ID already exists.",
                ),
                Some(_) => conflict("email", "An employee with this email already exists."),
                None => conflict(
                    NON_FIELD_ERRORS,
                    "An employee with this information already exists.",
                ),
            }
        }
        // department removed after validation looked it up
        StoreError::ForeignKeyViolation { .. } => {
            conflict("department", "Department does not exist.")
        }
        other => ApiError::Store(other),
    }
}

pub fn attendance_create(err: StoreError) -> ApiError {
    match err {
        StoreError::UniqueViolation { .. } => {
            info!(error = %err, "Duplicate attendance");
            conflict(
                NON_FIELD_ERRORS,
                "Attendance for this employee on this date already exists.",
            )
        }
        // employee removed between lookup and insert
        StoreError::ForeignKeyViolation { .. } => ApiError::not_found(),
        other => ApiError::Store(other),
    }
}

pub fn department_delete_blocked() -> ApiError {
    ApiError::Conflict(ErrorEnvelope::new("Cannot delete department").with(
        NON_FIELD_ERRORS,
        "Cannot delete department because it has associated employees.",
    ))
}

/// An employee added after the pre-check trips the foreign key instead.
pub fn department_delete(err: StoreError) -> ApiError {
    match err {
        StoreError::ForeignKeyViolation { .. } => department_delete_blocked(),
        other => ApiError::Store(other),
    }
}
