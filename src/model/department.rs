use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Engineering",
        "created_at": "2024-01-01T09:00:00Z",
        "updated_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Department {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Engineering")]
    pub name: String,

    #[schema(example = "2024-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2024-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}
