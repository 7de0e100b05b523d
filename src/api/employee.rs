use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use super::conflict;
use super::error::{ApiError, ErrorEnvelope};
use super::pagination::{PageParams, paginate};
use super::validation::validate_employee;
use crate::model::employee::Employee;
use crate::store::HrStore;

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct EmployeePayload {
    #[schema(example = "EMP-001", value_type = String)]
    pub employee_id: Option<Value>,
    #[schema(example = "John Doe", value_type = String)]
    pub full_name: Option<Value>,
    #[schema(example = "john.doe@company.com", format = "email", value_type = String)]
    pub email: Option<Value>,
    /// Department id
    #[schema(example = 1, value_type = u64)]
    pub department: Option<Value>,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 409, description = "Duplicate employee ID or email", body = ErrorEnvelope, example = json!({
            "message": "Validation failed",
            "errors": { "email": ["An employee with this email already exists."] }
        })),
        (status = 422, description = "Invalid fields", body = ErrorEnvelope, example = json!({
            "message": "Validation failed",
            "errors": {
                "department": ["Department does not exist."],
                "full_name": ["Full name cannot be empty."]
            }
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    store: web::Data<dyn HrStore>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, ApiError> {
    let new_employee = validate_employee(store.get_ref(), &payload).await?;

    let employee = store
        .insert_employee(&new_employee)
        .await
        .map_err(conflict::employee_create)?;

    info!(
        id = employee.id,
        employee_id = %employee.employee_id,
        department_id = employee.department,
        "Employee created"
    );
    Ok(HttpResponse::Created().json(employee))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated employee list", body = Object, example = json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 1,
                "employee_id": "EMP-001",
                "full_name": "John Doe",
                "email": "john.doe@company.com",
                "department": 1,
                "department_name": "Engineering",
                "created_at": "2024-01-01T09:00:00Z",
                "updated_at": "2024-01-01T09:00:00Z"
            }]
        })),
        (status = 404, description = "Invalid page", body = ErrorEnvelope)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    req: HttpRequest,
    store: web::Data<dyn HrStore>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let request = query.resolve()?;
    let page = store.list_employees(request).await?;
    Ok(HttpResponse::Ok().json(paginate(&req, request, page)?))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id", Path, description = "Employee row ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = ErrorEnvelope)
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match store.get_employee(id).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(ApiError::not_found()),
    }
}
