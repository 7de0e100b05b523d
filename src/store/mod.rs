use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;

use crate::model::{
    attendance::{Attendance, AttendanceStatus},
    department::Department,
    employee::{Employee, NewEmployee},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Key names declared in `sql/schema.sql`.
pub mod constraint {
    pub const DEPARTMENT_NAME: &str = "uq_departments_name";
    pub const EMPLOYEE_ID: &str = "uq_employees_employee_id";
    pub const EMPLOYEE_EMAIL: &str = "uq_employees_email";
    pub const ATTENDANCE_EMPLOYEE_DATE: &str = "uq_attendance_employee_date";
    pub const EMPLOYEE_DEPARTMENT_FK: &str = "fk_employees_department";
    pub const ATTENDANCE_EMPLOYEE_FK: &str = "fk_attendance_employee";
}

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "unique constraint violated: {}", message)]
    UniqueViolation {
        /// Name of the unique key that fired, when the store reports one
        constraint: Option<String>,
        message: String,
    },
    #[display(fmt = "foreign key constraint violated: {}", message)]
    ForeignKeyViolation {
        constraint: Option<String>,
        message: String,
    },
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Total rows matching the query, across all pages
    pub count: u64,
    pub items: Vec<T>,
}

/// Inclusive bounds on attendance dates. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Persistence for departments, employees and their attendance.
///
/// Implementations must enforce the uniqueness and foreign-key rules
/// atomically and report violations as [`StoreError::UniqueViolation`] or
/// [`StoreError::ForeignKeyViolation`]; the handlers rely on that to turn
/// concurrent duplicate creates into conflicts.
#[async_trait]
pub trait HrStore: Send + Sync {
    async fn insert_department(&self, name: &str) -> Result<Department, StoreError>;

    async fn list_departments(&self, page: PageRequest) -> Result<Page<Department>, StoreError>;

    async fn get_department(&self, id: u64) -> Result<Option<Department>, StoreError>;

    async fn department_has_employees(&self, id: u64) -> Result<bool, StoreError>;

    /// Returns `false` if no such department exists. Fails with a foreign-key
    /// violation while employees still reference it.
    async fn delete_department(&self, id: u64) -> Result<bool, StoreError>;

    async fn insert_employee(&self, employee: &NewEmployee) -> Result<Employee, StoreError>;

    async fn list_employees(&self, page: PageRequest) -> Result<Page<Employee>, StoreError>;

    async fn get_employee(&self, id: u64) -> Result<Option<Employee>, StoreError>;

    /// Looks an employee up by business identifier.
    async fn find_employee(&self, employee_id: &str) -> Result<Option<Employee>, StoreError>;

    /// Removes the employee and, by cascade, its attendance. Not exposed over HTTP.
    async fn delete_employee(&self, id: u64) -> Result<bool, StoreError>;

    async fn insert_attendance(
        &self,
        employee: &Employee,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<Attendance, StoreError>;

    /// Ordered by date descending, then employee.
    async fn list_attendance(
        &self,
        employee: &Employee,
        range: DateRange,
        page: PageRequest,
    ) -> Result<Page<Attendance>, StoreError>;

    async fn delete_attendance(&self, employee: &Employee, id: u64) -> Result<bool, StoreError>;
}
