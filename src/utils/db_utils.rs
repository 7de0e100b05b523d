use chrono::NaiveDate;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::{QueryAs, QueryScalar};

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    U64(u64),
    Date(NaiveDate),
}

/// ===============================
/// WHERE clause container
/// ===============================
#[derive(Debug, Default)]
pub struct Conditions {
    clauses: Vec<&'static str>,
    values: Vec<SqlValue>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause with exactly one `?` placeholder
    pub fn push(&mut self, clause: &'static str, value: SqlValue) -> &mut Self {
        self.clauses.push(clause);
        self.values.push(value);
        self
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }
}

pub fn bind_query_as<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    values: &[SqlValue],
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::U64(v) => query.bind(*v),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

pub fn bind_scalar<'q, O>(
    mut query: QueryScalar<'q, MySql, O, MySqlArguments>,
    values: &[SqlValue],
) -> QueryScalar<'q, MySql, O, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::U64(v) => query.bind(*v),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_conditions_render_nothing() {
        assert_eq!(Conditions::new().where_clause(), "");
    }

    #[test]
    fn clauses_are_joined_with_and_in_order() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let mut conditions = Conditions::new();
        conditions
            .push("a.employee_id = ?", SqlValue::U64(7))
            .push("a.date >= ?", SqlValue::Date(start));

        assert_eq!(
            conditions.where_clause(),
            "WHERE a.employee_id = ? AND a.date >= ?"
        );
        assert_eq!(
            conditions.values(),
            &[SqlValue::U64(7), SqlValue::Date(start)]
        );
    }
}
