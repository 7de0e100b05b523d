use actix_web::{HttpRequest, HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use super::conflict;
use super::error::{ApiError, ErrorEnvelope};
use super::pagination::{PageParams, paginate};
use super::validation::validate_attendance;
use crate::model::{attendance::Attendance, employee::Employee};
use crate::store::{DateRange, HrStore};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AttendancePayload {
    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub date: Option<Value>,
    #[schema(example = "PRESENT", value_type = String)]
    pub status: Option<Value>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateFilter {
    /// Earliest date to include (YYYY-MM-DD); ignored if unparsable
    pub start_date: Option<String>,
    /// Latest date to include (YYYY-MM-DD); ignored if unparsable
    pub end_date: Option<String>,
}

fn lenient_date(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()
}

impl DateFilter {
    pub fn range(&self) -> DateRange {
        DateRange {
            start: lenient_date(self.start_date.as_deref()),
            end: lenient_date(self.end_date.as_deref()),
        }
    }
}

async fn employee_by_code(store: &dyn HrStore, employee_id: &str) -> Result<Employee, ApiError> {
    store
        .find_employee(employee_id)
        .await?
        .ok_or_else(ApiError::not_found)
}

/// Record attendance for an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees/{employee_id}/attendance",
    params(("employee_id", Path, description = "Business employee ID, e.g. EMP-001")),
    request_body = AttendancePayload,
    responses(
        (status = 201, description = "Attendance recorded", body = Attendance),
        (status = 404, description = "Employee not found", body = ErrorEnvelope),
        (status = 409, description = "Already recorded for that date", body = ErrorEnvelope, example = json!({
            "message": "Validation failed",
            "errors": { "non_field_errors": ["Attendance for this employee on this date already exists."] }
        })),
        (status = 422, description = "Invalid fields", body = ErrorEnvelope, example = json!({
            "message": "Validation failed",
            "errors": { "status": ["Status must be either 'PRESENT' or 'ABSENT'."] }
        }))
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    store: web::Data<dyn HrStore>,
    path: web::Path<String>,
    payload: web::Json<AttendancePayload>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let (date, status) = validate_attendance(&payload)?;
    let employee = employee_by_code(store.get_ref(), &employee_id).await?;

    let attendance = store
        .insert_attendance(&employee, date, status)
        .await
        .map_err(conflict::attendance_create)?;

    info!(
        attendance_id = attendance.id,
        employee_id = %employee.employee_id,
        %date,
        %status,
        "Attendance recorded"
    );
    Ok(HttpResponse::Created().json(attendance))
}

/// List attendance for an employee
///
/// Newest first. Unparsable date bounds are ignored rather than rejected.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/attendance",
    params(
        ("employee_id", Path, description = "Business employee ID, e.g. EMP-001"),
        DateFilter,
        PageParams
    ),
    responses(
        (status = 200, description = "Paginated attendance list", body = Object, example = json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 10,
                "employee": 1,
                "employee_name": "John Doe",
                "employee_email": "john.doe@company.com",
                "employee_id": "EMP-001",
                "date": "2024-01-05",
                "status": "PRESENT",
                "created_at": "2024-01-05T09:00:00Z"
            }]
        })),
        (status = 404, description = "Employee not found or invalid page", body = ErrorEnvelope)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    req: HttpRequest,
    store: web::Data<dyn HrStore>,
    path: web::Path<String>,
    filter: web::Query<DateFilter>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let request = query.resolve()?;
    let employee = employee_by_code(store.get_ref(), &employee_id).await?;

    let range = filter.range();
    debug!(employee_id = %employee_id, ?range, "Listing attendance");
    let page = store.list_attendance(&employee, range, request).await?;
    Ok(HttpResponse::Ok().json(paginate(&req, request, page)?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}/attendance/{id}",
    params(
        ("employee_id", Path, description = "Business employee ID, e.g. EMP-001"),
        ("id", Path, description = "Attendance record ID")
    ),
    responses(
        (status = 204, description = "Attendance deleted"),
        (status = 404, description = "Employee or record not found", body = ErrorEnvelope)
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    store: web::Data<dyn HrStore>,
    path: web::Path<(String, u64)>,
) -> Result<HttpResponse, ApiError> {
    let (employee_id, id) = path.into_inner();
    let employee = employee_by_code(store.get_ref(), &employee_id).await?;

    if !store.delete_attendance(&employee, id).await? {
        return Err(ApiError::not_found());
    }

    info!(attendance_id = id, employee_id = %employee_id, "Attendance deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(start: Option<&str>, end: Option<&str>) -> DateFilter {
        DateFilter {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn unparsable_bounds_are_dropped() {
        let range = filter(Some("not-a-date"), Some("2024-01-05")).range();
        assert_eq!(range.start, None);
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 1, 5));

        let range = filter(Some(""), Some("2024-02-30")).range();
        assert_eq!(range, DateRange::default());
    }
}
