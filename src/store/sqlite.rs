//! Implements a SQLite backed record store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value as SqlValue};
use serde_json::{Number, Value};

use crate::{
    Error,
    model::{RawExpense, RawIncome, RawLedgerEntry, RawTransaction},
    store::{LedgerQuery, RecordStore},
};

/// Reads incomes, expenses and khata entries from the tables created by
/// [crate::initialize_db].
///
/// Queries run on tokio's blocking thread pool.
#[derive(Debug, Clone)]
pub struct SQLiteRecordStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteRecordStore {
    /// Create a new store from the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    async fn with_connection<T, F>(&self, read: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);

        tokio::task::spawn_blocking(move || {
            let connection = connection
                .lock()
                .map_err(|_| Error::Upstream("the database lock was poisoned".to_owned()))?;

            read(&connection)
        })
        .await
        .map_err(|error| Error::Upstream(format!("the database task failed: {error}")))?
    }
}

impl RecordStore for SQLiteRecordStore {
    async fn fetch_transactions(&self, owner_id: &str) -> Result<Vec<RawTransaction>, Error> {
        let owner_id = owner_id.to_owned();

        self.with_connection(move |connection| read_transactions(connection, &owner_id))
            .await
    }

    async fn fetch_ledger_entries(
        &self,
        owner_id: &str,
        query: Option<&LedgerQuery>,
    ) -> Result<Vec<RawLedgerEntry>, Error> {
        let owner_id = owner_id.to_owned();
        let query = query.cloned().unwrap_or_default();

        self.with_connection(move |connection| read_ledger(connection, &owner_id, &query))
            .await
    }
}

fn read_transactions(connection: &Connection, owner_id: &str) -> Result<Vec<RawTransaction>, Error> {
    let incomes = connection
        .prepare(
            "SELECT id, amount, source, title, date, notes FROM income
            WHERE owner_id = ?1 ORDER BY id",
        )?
        .query_map([owner_id], map_income_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let expenses = connection
        .prepare(
            "SELECT id, amount, category, title, date, notes FROM expense
            WHERE owner_id = ?1 ORDER BY id",
        )?
        .query_map([owner_id], map_expense_row)?
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        "read {} incomes and {} expenses for {owner_id}",
        incomes.len(),
        expenses.len()
    );

    Ok(incomes
        .into_iter()
        .map(RawTransaction::from)
        .chain(expenses.into_iter().map(RawTransaction::from))
        .collect())
}

fn read_ledger(
    connection: &Connection,
    owner_id: &str,
    query: &LedgerQuery,
) -> Result<Vec<RawLedgerEntry>, Error> {
    let mut where_clause_parts = vec!["owner_id = ?1".to_owned()];
    let mut query_parameters = vec![SqlValue::Text(owner_id.to_owned())];

    if let Some(person) = &query.person {
        query_parameters.push(SqlValue::Text(person.clone()));
        where_clause_parts.push(format!("person = ?{}", query_parameters.len()));
    }

    if let Some(method) = query.payment_method {
        query_parameters.push(SqlValue::Text(method.as_tag().to_owned()));
        where_clause_parts.push(format!("payment_method = ?{}", query_parameters.len()));
    }

    if let Some(date_range) = query.date_range {
        where_clause_parts.push(format!(
            "substr(date, 1, 10) BETWEEN ?{} AND ?{}",
            query_parameters.len() + 1,
            query_parameters.len() + 2,
        ));
        query_parameters.push(SqlValue::Text(date_range.start.to_string()));
        query_parameters.push(SqlValue::Text(date_range.end.to_string()));
    }

    let query_string = format!(
        "SELECT id, type, person, amount, payment_method, date, notes FROM khata
        WHERE {} ORDER BY substr(date, 1, 10) ASC, id ASC",
        where_clause_parts.join(" AND ")
    );

    connection
        .prepare(&query_string)?
        .query_map(params_from_iter(query_parameters.iter()), map_ledger_row)?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

fn map_income_row(row: &Row) -> Result<RawIncome, rusqlite::Error> {
    Ok(RawIncome {
        id: Some(row.get::<_, i64>(0)?.to_string()),
        amount: amount_to_json(row.get(1)?),
        source: row.get(2)?,
        title: row.get(3)?,
        date: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn map_expense_row(row: &Row) -> Result<RawExpense, rusqlite::Error> {
    Ok(RawExpense {
        id: Some(row.get::<_, i64>(0)?.to_string()),
        amount: amount_to_json(row.get(1)?),
        category: row.get(2)?,
        title: row.get(3)?,
        date: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn map_ledger_row(row: &Row) -> Result<RawLedgerEntry, rusqlite::Error> {
    Ok(RawLedgerEntry {
        id: Some(row.get::<_, i64>(0)?.to_string()),
        direction: row.get(1)?,
        person: row.get(2)?,
        amount: amount_to_json(row.get(3)?),
        payment_method: row.get(4)?,
        date: row.get(5)?,
        notes: row.get(6)?,
    })
}

fn amount_to_json(value: SqlValue) -> Option<Value> {
    match value {
        SqlValue::Null => None,
        SqlValue::Integer(amount) => Some(Value::from(amount)),
        SqlValue::Real(amount) => Some(
            Number::from_f64(amount).map_or_else(|| Value::String(amount.to_string()), Value::Number),
        ),
        SqlValue::Text(text) => Some(Value::String(text)),
        SqlValue::Blob(bytes) => Some(Value::String(format!("<{} byte blob>", bytes.len()))),
    }
}
