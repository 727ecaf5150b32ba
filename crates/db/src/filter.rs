//! Parameterized listing queries.
//!
//! Builds `SELECT ... WHERE ... ORDER BY ...` text from validated
//! [`FilterCriteria`]. User input only ever travels as bind values; the query
//! text is assembled from the static column names in a [`FilterTarget`] and
//! `$n` placeholders.

use ink_core::filter::{contains_pattern, EnumFilter, FilterCriteria};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

/// The table-specific half of a listing query.
#[derive(Debug, Clone, Copy)]
pub struct FilterTarget {
    pub table: &'static str,
    pub columns: &'static str,
    /// Two text columns matched with `OR` against the search term.
    pub search_columns: [&'static str; 2],
    /// Column compared for equality against the enumerated value.
    pub enum_column: &'static str,
    pub order_by: &'static str,
}

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Bool(bool),
}

/// Query text plus its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl FilterQuery {
    /// Build the listing query for `target`.
    ///
    /// Predicates are independent: a search term, an enumerated value and
    /// an optional `is_active` flag each add one condition when present.
    pub fn build<E: EnumFilter>(
        target: &FilterTarget,
        criteria: &FilterCriteria<E>,
        active: Option<bool>,
    ) -> Self {
        let mut conditions: Vec<String> = Vec::new();
        let mut binds: Vec<BindValue> = Vec::new();

        if let Some(term) = criteria.search() {
            binds.push(BindValue::Text(contains_pattern(term)));
            let idx = binds.len();
            let [first, second] = target.search_columns;
            conditions.push(format!(
                "({first} ILIKE ${idx} ESCAPE '\\' OR {second} ILIKE ${idx} ESCAPE '\\')"
            ));
        }

        if let Some(value) = criteria.value() {
            binds.push(BindValue::Text(value.filter_value().to_string()));
            conditions.push(format!("{} = ${}", target.enum_column, binds.len()));
        }

        if let Some(active) = active {
            binds.push(BindValue::Bool(active));
            conditions.push(format!("is_active = ${}", binds.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM {}{where_clause} ORDER BY {}",
            target.columns, target.table, target.order_by
        );

        Self { sql, binds }
    }

    /// Run the query and map every row eagerly, preserving order.
    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(&self.sql);
        for value in &self.binds {
            q = match value {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
            };
        }
        q.fetch_all(pool).await
    }
}
