use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{DateRange, HrStore, Page, PageRequest, StoreError, constraint};
use crate::model::{
    attendance::{Attendance, AttendanceStatus},
    department::Department,
    employee::{Employee, NewEmployee},
};

/// Store held in process memory. Every operation takes the one lock, so the
/// uniqueness checks are atomic with the insert the same way the database
/// enforces them.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    departments: Vec<Department>,
    employees: Vec<EmployeeRow>,
    attendance: Vec<AttendanceRow>,
}

struct EmployeeRow {
    id: u64,
    fields: NewEmployee,
    created_at: chrono::DateTime<Utc>,
}

struct AttendanceRow {
    id: u64,
    employee: u64,
    date: NaiveDate,
    status: AttendanceStatus,
    created_at: chrono::DateTime<Utc>,
}

fn unique(name: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: Some(name.to_string()),
        message: format!("Duplicate entry for key '{name}'"),
    }
}

fn foreign_key(name: &str) -> StoreError {
    StoreError::ForeignKeyViolation {
        constraint: Some(name.to_string()),
        message: format!("a foreign key constraint fails (CONSTRAINT `{name}`)"),
    }
}

fn paginate<T: Clone>(rows: Vec<T>, page: PageRequest) -> Page<T> {
    let count = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.page_size as usize)
        .collect();
    Page { count, items }
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn employee(&self, row: &EmployeeRow) -> Employee {
        let department_name = self
            .departments
            .iter()
            .find(|d| d.id == row.fields.department_id)
            .map(|d| d.name.clone())
            .unwrap_or_default();
        Employee {
            id: row.id,
            employee_id: row.fields.employee_id.clone(),
            full_name: row.fields.full_name.clone(),
            email: row.fields.email.clone(),
            department: row.fields.department_id,
            department_name,
            created_at: row.created_at,
            updated_at: row.created_at,
        }
    }

    fn attendance(&self, row: &AttendanceRow) -> Attendance {
        let owner = self.employees.iter().find(|e| e.id == row.employee);
        Attendance {
            id: row.id,
            employee: row.employee,
            employee_name: owner.map(|e| e.fields.full_name.clone()).unwrap_or_default(),
            employee_email: owner.map(|e| e.fields.email.clone()).unwrap_or_default(),
            employee_id: owner.map(|e| e.fields.employee_id.clone()).unwrap_or_default(),
            date: row.date,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn attendance_rows(&self) -> usize {
        self.lock().attendance.len()
    }
}

#[async_trait]
impl HrStore for MemoryStore {
    async fn insert_department(&self, name: &str) -> Result<Department, StoreError> {
        let mut state = self.lock();
        if state.departments.iter().any(|d| d.name == name) {
            return Err(unique(constraint::DEPARTMENT_NAME));
        }
        let now = Utc::now();
        let department = Department {
            id: state.next_id(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.departments.push(department.clone());
        Ok(department)
    }

    async fn list_departments(&self, page: PageRequest) -> Result<Page<Department>, StoreError> {
        Ok(paginate(self.lock().departments.clone(), page))
    }

    async fn get_department(&self, id: u64) -> Result<Option<Department>, StoreError> {
        Ok(self.lock().departments.iter().find(|d| d.id == id).cloned())
    }

    async fn department_has_employees(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .employees
            .iter()
            .any(|e| e.fields.department_id == id))
    }

    async fn delete_department(&self, id: u64) -> Result<bool, StoreError> {
        let mut state = self.lock();
        if state.employees.iter().any(|e| e.fields.department_id == id) {
            return Err(foreign_key(constraint::EMPLOYEE_DEPARTMENT_FK));
        }
        let before = state.departments.len();
        state.departments.retain(|d| d.id != id);
        Ok(state.departments.len() < before)
    }

    async fn insert_employee(&self, employee: &NewEmployee) -> Result<Employee, StoreError> {
        let mut state = self.lock();
        if !state.departments.iter().any(|d| d.id == employee.department_id) {
            return Err(foreign_key(constraint::EMPLOYEE_DEPARTMENT_FK));
        }
        if state
            .employees
            .iter()
            .any(|e| e.fields.employee_id == employee.employee_id)
        {
            return Err(unique(constraint::EMPLOYEE_ID));
        }
        if state.employees.iter().any(|e| e.fields.email == employee.email) {
            return Err(unique(constraint::EMPLOYEE_EMAIL));
        }
        let row = EmployeeRow {
            id: state.next_id(),
            fields: employee.clone(),
            created_at: Utc::now(),
        };
        let created = state.employee(&row);
        state.employees.push(row);
        Ok(created)
    }

    async fn list_employees(&self, page: PageRequest) -> Result<Page<Employee>, StoreError> {
        let state = self.lock();
        let rows = state.employees.iter().map(|e| state.employee(e)).collect();
        Ok(paginate(rows, page))
    }

    async fn get_employee(&self, id: u64) -> Result<Option<Employee>, StoreError> {
        let state = self.lock();
        Ok(state
            .employees
            .iter()
            .find(|e| e.id == id)
            .map(|e| state.employee(e)))
    }

    async fn find_employee(&self, employee_id: &str) -> Result<Option<Employee>, StoreError> {
        let state = self.lock();
        Ok(state
            .employees
            .iter()
            .find(|e| e.fields.employee_id == employee_id)
            .map(|e| state.employee(e)))
    }

    async fn delete_employee(&self, id: u64) -> Result<bool, StoreError> {
        let mut state = self.lock();
        let before = state.employees.len();
        state.employees.retain(|e| e.id != id);
        state.attendance.retain(|a| a.employee != id);
        Ok(state.employees.len() < before)
    }

    async fn insert_attendance(
        &self,
        employee: &Employee,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<Attendance, StoreError> {
        let mut state = self.lock();
        if !state.employees.iter().any(|e| e.id == employee.id) {
            return Err(foreign_key(constraint::ATTENDANCE_EMPLOYEE_FK));
        }
        if state
            .attendance
            .iter()
            .any(|a| a.employee == employee.id && a.date == date)
        {
            return Err(unique(constraint::ATTENDANCE_EMPLOYEE_DATE));
        }
        let row = AttendanceRow {
            id: state.next_id(),
            employee: employee.id,
            date,
            status,
            created_at: Utc::now(),
        };
        let created = state.attendance(&row);
        state.attendance.push(row);
        Ok(created)
    }

    async fn list_attendance(
        &self,
        employee: &Employee,
        range: DateRange,
        page: PageRequest,
    ) -> Result<Page<Attendance>, StoreError> {
        let state = self.lock();
        let mut rows: Vec<Attendance> = state
            .attendance
            .iter()
            .filter(|a| a.employee == employee.id && range.contains(a.date))
            .map(|a| state.attendance(a))
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.employee.cmp(&b.employee)));
        Ok(paginate(rows, page))
    }

    async fn delete_attendance(&self, employee: &Employee, id: u64) -> Result<bool, StoreError> {
        let mut state = self.lock();
        let before = state.attendance.len();
        state
            .attendance
            .retain(|a| !(a.id == id && a.employee == employee.id));
        Ok(state.attendance.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: PageRequest = PageRequest {
        page: 1,
        page_size: 100,
    };

    async fn seed(store: &MemoryStore) -> Employee {
        let department = store.insert_department("Engineering").await.unwrap();
        store
            .insert_employee(&NewEmployee {
                employee_id: "E-1".into(),
                full_name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                department_id: department.id,
            })
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn deleting_employee_cascades_to_attendance() {
        let store = MemoryStore::new();
        let employee = seed(&store).await;
        for day in 1..=3 {
            let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
            store
                .insert_attendance(&employee, date, AttendanceStatus::Present)
                .await
                .unwrap();
        }
        assert_eq!(store.attendance_rows(), 3);

        assert!(store.delete_employee(employee.id).await.unwrap());

        assert_eq!(store.attendance_rows(), 0);
        let listed = store
            .list_attendance(&employee, DateRange::default(), ALL)
            .await
            .unwrap();
        assert_eq!(listed.count, 0);
        assert!(store.find_employee("E-1").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn department_delete_is_restricted_by_employees() {
        let store = MemoryStore::new();
        let employee = seed(&store).await;

        let err = store.delete_department(employee.department).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
        assert!(store.get_department(employee.department).await.unwrap().is_some());
    }
}
