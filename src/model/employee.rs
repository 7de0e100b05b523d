use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "EMP-001",
        "full_name": "John Doe",
        "email": "john.doe@company.com",
        "department": 1,
        "department_name": "Engineering",
        "created_at": "2024-01-01T09:00:00Z",
        "updated_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    /// Business identifier, unique across employees
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,

    /// Id of the owning department
    #[schema(example = 1)]
    pub department: u64,

    #[schema(example = "Engineering")]
    pub department_name: String,

    #[schema(example = "2024-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2024-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

/// Normalized employee fields, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department_id: u64,
}
