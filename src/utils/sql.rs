use chrono::NaiveDate;
use sqlx::MySqlPool;

/// Bindable value for a dynamically assembled UPDATE.
#[derive(Debug)]
pub enum SqlValue {
    Str(String),
    I64(i64),
    Date(NaiveDate),
}

/// Builds `UPDATE <table> SET col = ?, ... WHERE id = ?` from whichever
/// columns a partial-update payload actually provided.
#[derive(Debug)]
pub struct UpdateBuilder {
    table: &'static str,
    sets: Vec<(&'static str, SqlValue)>,
}

impl UpdateBuilder {
    pub fn new(table: &'static str) -> Self {
        UpdateBuilder {
            table,
            sets: Vec::new(),
        }
    }

    pub fn set(mut self, column: &'static str, value: SqlValue) -> Self {
        self.sets.push((column, value));
        self
    }

    pub fn set_opt(self, column: &'static str, value: Option<SqlValue>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    fn sql(&self) -> String {
        let set_clause = self
            .sets
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");

        format!("UPDATE {} SET {} WHERE id = ?", self.table, set_clause)
    }

    pub async fn execute_by_id(self, pool: &MySqlPool, id: u64) -> Result<u64, sqlx::Error> {
        let sql = self.sql();
        let mut query = sqlx::query(&sql);

        for (_, value) in self.sets {
            query = match value {
                SqlValue::Str(v) => query.bind(v),
                SqlValue::I64(v) => query.bind(v),
                SqlValue::Date(v) => query.bind(v),
            };
        }

        let result = query.bind(id).execute(pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_update_for_provided_columns_only() {
        let builder = UpdateBuilder::new("vacation_requests")
            .set(
                "start_date",
                SqlValue::Date(NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()),
            )
            .set_opt("reason", Some(SqlValue::Str("Family trip".into())))
            .set_opt("emergency_contact", None)
            .set("business_days", SqlValue::I64(10));

        assert_eq!(
            builder.sql(),
            "UPDATE vacation_requests SET start_date = ?, reason = ?, business_days = ? WHERE id = ?"
        );
    }

}
