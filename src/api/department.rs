use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use super::conflict;
use super::error::{ApiError, ErrorEnvelope};
use super::pagination::{PageParams, paginate};
use super::validation::validate_department;
use crate::model::department::Department;
use crate::store::HrStore;

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct DepartmentPayload {
    #[schema(example = "Engineering", value_type = String)]
    pub name: Option<Value>,
}

/// Create Department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = DepartmentPayload,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 409, description = "Duplicate name", body = ErrorEnvelope, example = json!({
            "message": "Validation failed",
            "errors": { "name": ["A department with this name already exists."] }
        })),
        (status = 422, description = "Invalid name", body = ErrorEnvelope, example = json!({
            "message": "Validation failed",
            "errors": { "name": ["Department name cannot be empty."] }
        }))
    ),
    tag = "Department"
)]
pub async fn create_department(
    store: web::Data<dyn HrStore>,
    payload: web::Json<DepartmentPayload>,
) -> Result<HttpResponse, ApiError> {
    let name = validate_department(&payload)?;

    let department = store
        .insert_department(&name)
        .await
        .map_err(conflict::department_create)?;

    info!(department_id = department.id, name = %department.name, "Department created");
    Ok(HttpResponse::Created().json(department))
}

#[utoipa::path(
    get,
    path = "/api/v1/departments",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated department list", body = Object, example = json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 1,
                "name": "Engineering",
                "created_at": "2024-01-01T09:00:00Z",
                "updated_at": "2024-01-01T09:00:00Z"
            }]
        })),
        (status = 404, description = "Invalid page", body = ErrorEnvelope)
    ),
    tag = "Department"
)]
pub async fn list_departments(
    req: HttpRequest,
    store: web::Data<dyn HrStore>,
    query: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let request = query.resolve()?;
    let page = store.list_departments(request).await?;
    Ok(HttpResponse::Ok().json(paginate(&req, request, page)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    params(("id", Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department found", body = Department),
        (status = 404, description = "Department not found", body = ErrorEnvelope)
    ),
    tag = "Department"
)]
pub async fn get_department(
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match store.get_department(id).await? {
        Some(department) => Ok(HttpResponse::Ok().json(department)),
        None => Err(ApiError::not_found()),
    }
}

/// Delete Department
///
/// Refused while any employee still belongs to the department.
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}",
    params(("id", Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found", body = ErrorEnvelope),
        (status = 409, description = "Department has employees", body = ErrorEnvelope, example = json!({
            "message": "Cannot delete department",
            "errors": { "non_field_errors": ["Cannot delete department because it has associated employees."] }
        }))
    ),
    tag = "Department"
)]
pub async fn delete_department(
    store: web::Data<dyn HrStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    if store.get_department(id).await?.is_none() {
        return Err(ApiError::not_found());
    }
    if store.department_has_employees(id).await? {
        info!(department_id = id, "Refusing to delete department with employees");
        return Err(conflict::department_delete_blocked());
    }

    let deleted = store
        .delete_department(id)
        .await
        .map_err(conflict::department_delete)?;
    if !deleted {
        return Err(ApiError::not_found());
    }

    info!(department_id = id, "Department deleted");
    Ok(HttpResponse::NoContent().finish())
}
