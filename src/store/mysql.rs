use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use sqlx::error::ErrorKind;
use tracing::debug;

use super::{DateRange, HrStore, Page, PageRequest, StoreError};
use crate::model::{
    attendance::{Attendance, AttendanceStatus},
    department::Department,
    employee::{Employee, NewEmployee},
};
use crate::utils::db_utils::{Conditions, SqlValue, bind_query_as, bind_scalar};

const SELECT_DEPARTMENT: &str = r#"
    SELECT id, name, created_at, updated_at
    FROM departments
"#;

const SELECT_EMPLOYEE: &str = r#"
    SELECT
        e.id,
        e.employee_id,
        e.full_name,
        e.email,
        e.department_id AS department,
        d.name AS department_name,
        e.created_at,
        e.updated_at
    FROM employees e
    JOIN departments d ON d.id = e.department_id
"#;

const SELECT_ATTENDANCE: &str = r#"
    SELECT
        a.id,
        a.employee_id AS employee,
        e.full_name AS employee_name,
        e.email AS employee_email,
        e.employee_id AS employee_id,
        a.date,
        a.status,
        a.created_at
    FROM attendance a
    JOIN employees e ON e.id = a.employee_id
"#;

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn attendance_by_id(&self, id: u64) -> Result<Attendance, StoreError> {
        let sql = format!("{SELECT_ATTENDANCE} WHERE a.id = ?");
        let row = sqlx::query_as::<_, Attendance>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let message = db_err.message().to_string();
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    let constraint = db_err
                        .constraint()
                        .map(str::to_string)
                        .or_else(|| duplicate_key_name(&message));
                    return StoreError::UniqueViolation { constraint, message };
                }
                ErrorKind::ForeignKeyViolation => {
                    let constraint = db_err
                        .constraint()
                        .map(str::to_string)
                        .or_else(|| foreign_key_name(&message));
                    return StoreError::ForeignKeyViolation { constraint, message };
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Extracts the key name from a MySQL duplicate-entry report:
/// `Duplicate entry 'x' for key 'employees.uq_employees_email'`.
/// Servers before 8.0 omit the table prefix.
fn duplicate_key_name(message: &str) -> Option<String> {
    let (_, key) = message.rsplit_once("for key '")?;
    let key = key.strip_suffix('\'').unwrap_or(key);
    let key = key.rsplit('.').next().unwrap_or(key);
    (!key.is_empty()).then(|| key.to_string())
}

/// Extracts the constraint name from a MySQL foreign-key failure:
/// `... a foreign key constraint fails (`hrm`.`employees`, CONSTRAINT `fk_employees_department` ...)`.
fn foreign_key_name(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("CONSTRAINT `")?;
    let (name, _) = rest.split_once('`')?;
    (!name.is_empty()).then(|| name.to_string())
}

#[async_trait]
impl HrStore for MySqlStore {
    async fn insert_department(&self, name: &str) -> Result<Department, StoreError> {
        let result = sqlx::query("INSERT INTO departments (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let sql = format!("{SELECT_DEPARTMENT} WHERE id = ?");
        let department = sqlx::query_as::<_, Department>(&sql)
            .bind(result.last_insert_id())
            .fetch_one(&self.pool)
            .await?;
        Ok(department)
    }

    async fn list_departments(&self, page: PageRequest) -> Result<Page<Department>, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM departments")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!("{SELECT_DEPARTMENT} ORDER BY id LIMIT ? OFFSET ?");
        debug!(sql = %sql, page = page.page, page_size = page.page_size, "Fetching departments");
        let items = sqlx::query_as::<_, Department>(&sql)
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            count: count as u64,
            items,
        })
    }

    async fn get_department(&self, id: u64) -> Result<Option<Department>, StoreError> {
        let sql = format!("{SELECT_DEPARTMENT} WHERE id = ?");
        let department = sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(department)
    }

    async fn department_has_employees(&self, id: u64) -> Result<bool, StoreError> {
        // EXISTS comes back as BIGINT on MySQL
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE department_id = ? LIMIT 1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists != 0)
    }

    async fn delete_department(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_employee(&self, employee: &NewEmployee) -> Result<Employee, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employees (employee_id, full_name, email, department_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&employee.employee_id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(employee.department_id)
        .execute(&self.pool)
        .await?;

        let sql = format!("{SELECT_EMPLOYEE} WHERE e.id = ?");
        let created = sqlx::query_as::<_, Employee>(&sql)
            .bind(result.last_insert_id())
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn list_employees(&self, page: PageRequest) -> Result<Page<Employee>, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!("{SELECT_EMPLOYEE} ORDER BY e.id LIMIT ? OFFSET ?");
        debug!(sql = %sql, page = page.page, page_size = page.page_size, "Fetching employees");
        let items = sqlx::query_as::<_, Employee>(&sql)
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            count: count as u64,
            items,
        })
    }

    async fn get_employee(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        let sql = format!("{SELECT_EMPLOYEE} WHERE e.id = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_employee(&self, employee_id: &str) -> Result<Option<Employee>, StoreError> {
        let sql = format!("{SELECT_EMPLOYEE} WHERE e.employee_id = ?");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn delete_employee(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_attendance(
        &self,
        employee: &Employee,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<Attendance, StoreError> {
        let result =
            sqlx::query("INSERT INTO attendance (employee_id, date, status) VALUES (?, ?, ?)")
                .bind(employee.id)
                .bind(date)
                .bind(status.to_string())
                .execute(&self.pool)
                .await?;

        self.attendance_by_id(result.last_insert_id()).await
    }

    async fn list_attendance(
        &self,
        employee: &Employee,
        range: DateRange,
        page: PageRequest,
    ) -> Result<Page<Attendance>, StoreError> {
        let mut conditions = Conditions::new();
        conditions.push("a.employee_id = ?", SqlValue::U64(employee.id));
        if let Some(start) = range.start {
            conditions.push("a.date >= ?", SqlValue::Date(start));
        }
        if let Some(end) = range.end {
            conditions.push("a.date <= ?", SqlValue::Date(end));
        }
        let where_clause = conditions.where_clause();

        let count_sql = format!("SELECT COUNT(*) FROM attendance a {where_clause}");
        debug!(sql = %count_sql, bindings = ?conditions.values(), "Counting attendance");
        let count = bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql), conditions.values())
            .fetch_one(&self.pool)
            .await?;

        let data_sql = format!(
            "{SELECT_ATTENDANCE} {where_clause} ORDER BY a.date DESC, a.employee_id ASC LIMIT ? OFFSET ?"
        );
        debug!(sql = %data_sql, bindings = ?conditions.values(), page = page.page, "Fetching attendance");
        let items = bind_query_as(sqlx::query_as::<_, Attendance>(&data_sql), conditions.values())
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            count: count as u64,
            items,
        })
    }

    async fn delete_attendance(&self, employee: &Employee, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ? AND employee_id = ?")
            .bind(id)
            .bind(employee.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
