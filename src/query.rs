//! Record queries against the CRM store
//!
//! [`QueryRequest`] carries the five query arguments the host understands.
//! [`ClmClient::query`] issues one through the bridge and collapses the host
//! envelope into a [`QueryOutcome`]. A query never fails its caller: host
//! errors become [`QueryOutcome::Failed`], which reads as "no rows" through
//! [`QueryOutcome::into_rows`] and [`QueryOutcome::first`].
//!
//! The filter text is passed to the host verbatim. Callers are responsible
//! for well-formed predicates; nothing is escaped here.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::bridge::bridge;
use crate::client::ClmClient;
use crate::error::{ClmError, Result};
use crate::host::ClmHost;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub collection: String,
    pub fields: Vec<String>,
    /// Predicate expression, e.g. `WHERE Id = '001'`
    pub filter: String,
    /// Sort clauses, e.g. `Name, ASC`
    pub sort: Vec<String>,
    pub limit: Option<u32>,
}

impl QueryRequest {
    /// Start a query; `collection` and `filter` must be non-empty
    pub fn new(collection: impl Into<String>, filter: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        let filter = filter.into();
        if collection.trim().is_empty() {
            return Err(ClmError::missing_input("query collection"));
        }
        if filter.trim().is_empty() {
            return Err(ClmError::missing_input("query filter"));
        }
        Ok(Self {
            collection,
            fields: Vec::new(),
            filter,
            sort: Vec::new(),
            limit: None,
        })
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn sort(mut self, clause: impl Into<String>) -> Self {
        self.sort.push(clause.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Limit as the host expects it: a decimal string, empty for "no limit"
    pub fn limit_clause(&self) -> String {
        self.limit.map(|l| l.to_string()).unwrap_or_default()
    }
}

/// One CRM row. Every value is coerced to a string; JSON null stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Option<String>>);

impl Record {
    /// Build a record from a JSON object. Returns `None` for anything else.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self(
            object
                .iter()
                .map(|(k, v)| (k.clone(), coerce(v)))
                .collect(),
        ))
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.as_deref())
    }

    /// Field value, failing when the host left it out or null
    pub fn require(&self, field: &str) -> Result<&str> {
        self.get(field).ok_or_else(|| ClmError::HostCall {
            message: format!("record has no value for {field}"),
        })
    }

    /// Field value as an owned string, empty when absent
    pub fn text(&self, field: &str) -> String {
        self.get(field).unwrap_or_default().to_string()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}

fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// What a query produced.
///
/// `Empty` and `Failed` are kept apart so the difference stays visible in
/// logs and tests, even though every caller in this crate treats them alike.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<Record>),
    Empty,
    Failed(ClmError),
}

impl QueryOutcome {
    pub(crate) fn from_response(collection: &str, response: Result<Value>) -> Self {
        let response = match response {
            Ok(response) => response,
            Err(err) => return QueryOutcome::Failed(err),
        };

        let Some(rows) = response.get(collection).and_then(Value::as_array) else {
            return QueryOutcome::Failed(ClmError::HostCall {
                message: format!("response carried no {collection} rows"),
            });
        };

        let records: Vec<Record> = rows
            .iter()
            .filter_map(|row| {
                let record = Record::from_value(row);
                if record.is_none() {
                    tracing::warn!(collection, "skipping non-object row: {}", row);
                }
                record
            })
            .collect();

        if records.is_empty() {
            QueryOutcome::Empty
        } else {
            QueryOutcome::Rows(records)
        }
    }

    pub fn rows(&self) -> &[Record] {
        match self {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Empty | QueryOutcome::Failed(_) => &[],
        }
    }

    pub fn into_rows(self) -> Vec<Record> {
        match self {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Empty | QueryOutcome::Failed(_) => Vec::new(),
        }
    }

    /// Row 0, or [`ClmError::NotFound`] naming `what` when there is none
    pub fn first(self, what: &str) -> Result<Record> {
        self.into_rows()
            .into_iter()
            .next()
            .ok_or_else(|| ClmError::not_found(what))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }
}

impl<H: ClmHost> ClmClient<H> {
    /// Run a record query through the host. Never errors; see [`QueryOutcome`].
    pub async fn query(&self, request: QueryRequest) -> QueryOutcome {
        tracing::debug!(
            collection = %request.collection,
            filter = %request.filter,
            "issuing record query"
        );

        let response = bridge("queryRecord", |cb| self.host().query_record(&request, cb)).await;
        let outcome = QueryOutcome::from_response(&request.collection, response);

        let collection = &request.collection;
        match &outcome {
            QueryOutcome::Rows(rows) => {
                tracing::debug!(%collection, rows = rows.len(), "query returned rows")
            }
            QueryOutcome::Empty => tracing::debug!(%collection, "query returned no rows"),
            QueryOutcome::Failed(err) => {
                tracing::warn!(%collection, "query failed, treating as empty: {}", err)
            }
        }

        outcome
    }
}
