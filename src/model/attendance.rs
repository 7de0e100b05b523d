use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl TryFrom<String> for AttendanceStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 10,
        "employee": 1,
        "employee_name": "John Doe",
        "employee_email": "john.doe@company.com",
        "employee_id": "EMP-001",
        "date": "2024-01-05",
        "status": "PRESENT",
        "created_at": "2024-01-05T09:00:00Z"
    })
)]
pub struct Attendance {
    #[schema(example = 10)]
    pub id: u64,

    /// Row id of the owning employee
    #[schema(example = 1)]
    pub employee: u64,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "john.doe@company.com")]
    pub employee_email: String,

    /// Business identifier of the owning employee
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,

    #[schema(example = "2024-01-05T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
