use crate::api::attendance::AttendancePayload;
use crate::api::department::DepartmentPayload;
use crate::api::employee::EmployeePayload;
use crate::api::error::ErrorEnvelope;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::department::Department;
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM System API",
        version = "1.0.0",
        description = r#"
## Human Resource Management (HRM) System

Departments, the employees that belong to them, and each employee's daily attendance.

### 🔹 Key Features
- **Department Management**
  - Create, list, view and delete departments (only while no employee belongs to them)
- **Employee Management**
  - Create, list and view employee profiles
- **Attendance Management**
  - Record PRESENT/ABSENT per employee per day, filter by date range, delete records

### 📦 Response Format
- Lists are paginated: `{count, next, previous, results}`; `page` and `page_size` (max 100)
- Every 4xx response carries `{message, errors: {field: [messages]}}`
- Duplicates are reported as **409**, invalid fields as **422**

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::department::create_department,
        crate::api::department::list_departments,
        crate::api::department::get_department,
        crate::api::department::delete_department,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,

        crate::api::attendance::create_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::delete_attendance
    ),
    components(
        schemas(
            Department,
            DepartmentPayload,
            Employee,
            EmployeePayload,
            Attendance,
            AttendancePayload,
            AttendanceStatus,
            ErrorEnvelope
        )
    ),
    tags(
        (name = "Department", description = "Department management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
