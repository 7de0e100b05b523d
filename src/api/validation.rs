//! Field rules applied to request bodies before anything touches the store.
//!
//! Every rule returns the normalized value or the message to report under
//! that field. The per-entity functions run all rules and gather every
//! failing field into one [`FieldErrors`].

use chrono::NaiveDate;
use serde_json::Value;

use super::attendance::AttendancePayload;
use super::department::DepartmentPayload;
use super::employee::EmployeePayload;
use super::error::{ApiError, FieldErrors};
use crate::model::{attendance::AttendanceStatus, employee::NewEmployee};
use crate::store::HrStore;

pub const REQUIRED: &str = "This field is required.";
const MAX_LENGTH: usize = 255;
const EMAIL_MAX_LENGTH: usize = 254;
const NOT_A_STRING: &str = "Not a valid string.";

fn too_long(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

/// Reads a text field from the raw body. Numbers are taken as their
/// decimal text; any other non-string is rejected under the field.
pub fn text(value: Option<&Value>) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(NOT_A_STRING.to_string()),
    }
}

fn required_text(value: Option<&str>, empty: &str, max: usize) -> Result<String, String> {
    let value = value.ok_or_else(|| REQUIRED.to_string())?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty.to_string());
    }
    if trimmed.chars().count() > max {
        return Err(too_long(max));
    }
    Ok(trimmed.to_string())
}

pub fn department_name(value: Option<&str>) -> Result<String, String> {
    required_text(value, "Department name cannot be empty.", MAX_LENGTH)
}

pub fn full_name(value: Option<&str>) -> Result<String, String> {
    required_text(value, "Full name cannot be empty.", MAX_LENGTH)
}

pub fn employee_code(value: Option<&str>) -> Result<String, String> {
    required_text(value, "Employee ID cannot be empty.", MAX_LENGTH)
}

/// Stored trimmed and lowercased, so uniqueness is case-insensitive.
pub fn email(value: Option<&str>) -> Result<String, String> {
    let email = required_text(value, "Email cannot be empty.", EMAIL_MAX_LENGTH)?.to_lowercase();
    if !validator::validate_email(email.as_str()) || !has_routable_domain(&email) {
        return Err("Enter a valid email address.".to_string());
    }
    Ok(email)
}

/// The domain needs a dot, `localhost` excepted.
fn has_routable_domain(email: &str) -> bool {
    email.rsplit_once('@').is_some_and(|(_, domain)| {
        domain == "localhost"
            || domain
                .split('.')
                .filter(|label| !label.is_empty())
                .count()
                >= 2
    })
}

/// Accepts the department id as a JSON number or a numeric string.
pub fn department_ref(value: Option<&Value>) -> Result<u64, String> {
    match value {
        None | Some(Value::Null) => Err("Department is required.".to_string()),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| "Department does not exist.".to_string()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| "Department does not exist.".to_string()),
        Some(_) => Err("Incorrect type. Expected pk value.".to_string()),
    }
}

/// Exact match only: `present` or `Present ` are rejected.
pub fn attendance_status(value: Option<&str>) -> Result<AttendanceStatus, String> {
    let value = value.ok_or_else(|| REQUIRED.to_string())?;
    value
        .parse()
        .map_err(|_| "Status must be either 'PRESENT' or 'ABSENT'.".to_string())
}

pub fn attendance_date(value: Option<&str>) -> Result<NaiveDate, String> {
    let value = value.ok_or_else(|| REQUIRED.to_string())?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.".to_string()
    })
}

pub fn validate_department(payload: &DepartmentPayload) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = text(payload.name.as_ref()).and_then(|v| department_name(v.as_deref()));
    match errors.check("name", name) {
        Some(name) => Ok(name),
        None => Err(errors),
    }
}

/// Checks every field, then confirms the department exists.
pub async fn validate_employee(
    store: &dyn HrStore,
    payload: &EmployeePayload,
) -> Result<NewEmployee, ApiError> {
    let mut errors = FieldErrors::new();
    let employee_id = errors.check(
        "employee_id",
        text(payload.employee_id.as_ref()).and_then(|v| employee_code(v.as_deref())),
    );
    let full_name = errors.check(
        "full_name",
        text(payload.full_name.as_ref()).and_then(|v| full_name(v.as_deref())),
    );
    let email = errors.check(
        "email",
        text(payload.email.as_ref()).and_then(|v| email(v.as_deref())),
    );

    let mut department_id = errors.check("department", department_ref(payload.department.as_ref()));
    if let Some(id) = department_id {
        if store.get_department(id).await?.is_none() {
            errors.add("department", "Department does not exist.");
            department_id = None;
        }
    }

    match (employee_id, full_name, email, department_id) {
        (Some(employee_id), Some(full_name), Some(email), Some(department_id))
            if errors.is_empty() =>
        {
            Ok(NewEmployee {
                employee_id,
                full_name,
                email,
                department_id,
            })
        }
        _ => Err(errors.into()),
    }
}

pub fn validate_attendance(
    payload: &AttendancePayload,
) -> Result<(NaiveDate, AttendanceStatus), FieldErrors> {
    let mut errors = FieldErrors::new();
    let date = errors.check(
        "date",
        text(payload.date.as_ref()).and_then(|v| attendance_date(v.as_deref())),
    );
    let status = errors.check(
        "status",
        text(payload.status.as_ref()).and_then(|v| attendance_status(v.as_deref())),
    );
    match (date, status) {
        (Some(date), Some(status)) => Ok((date, status)),
        _ => Err(errors),
    }
}
