//! Query results
//!
//! [`QueryResult`] is what a caller gets back for one query: the column
//! names, the decoded rows and the stats counters. It is assembled once from
//! the raw reply and never changes afterwards.
//!
//! # Reply shapes
//!
//! ```text
//! [stats]                     mutation without RETURN: no columns, no rows
//! [header, rows, stats]       tabular output (header and rows may be empty)
//! ```

pub mod decoder;
pub mod scalar;
pub mod stats;
pub mod value;

pub use decoder::{Column, ResultDecoder, Table};
pub use scalar::ScalarDecoder;
pub use stats::{Counter, CounterValue, QueryStats};
pub use value::{Property, Value};

use crate::errors::{GraphError, GraphResult};
use crate::metadata::{MetadataCache, SchemaSource};
use crate::protocol::RawValue;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    columns: Option<Vec<String>>,
    resultset: Option<Vec<Vec<Value>>>,
    stats: Option<QueryStats>,
}

impl QueryResult {
    /// Decode a complete query reply.
    ///
    /// Property keys are resolved through `cache`, filling it from `source`
    /// when needed. Any decode failure fails the whole result.
    pub fn from_reply(
        reply: &RawValue,
        cache: &MetadataCache,
        source: &dyn SchemaSource,
    ) -> GraphResult<Self> {
        let sections = reply
            .as_array()
            .ok_or_else(|| GraphError::malformed("reply is not an array"))?;

        let table = ResultDecoder::new(cache, source).decode(reply)?;

        // Without tabular output the stats are the only element
        let stats_offset = if sections.len() == 1 { 0 } else { 2 };
        let stats = stats::parse_stats_section(sections.get(stats_offset))?;

        let (columns, resultset) = match table {
            Some(table) => (Some(table.column_names()), Some(table.rows)),
            None => (None, None),
        };

        Ok(QueryResult {
            columns,
            resultset,
            stats,
        })
    }

    /// Column names in RETURN order; `None` for queries without tabular output
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    /// Decoded rows, row-major
    pub fn resultset(&self) -> Option<&[Vec<Value>]> {
        self.resultset.as_deref()
    }

    pub fn stats(&self) -> Option<&QueryStats> {
        self.stats.as_ref()
    }

    /// Shorthand for an integer counter, e.g. `result.stat("nodes_created")`
    pub fn stat(&self, key: &str) -> Option<i64> {
        self.stats.as_ref().and_then(|s| s.count(key))
    }

    pub fn row_count(&self) -> usize {
        self.resultset.as_ref().map_or(0, Vec::len)
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.as_ref()?.iter().position(|c| c == name)
    }

    /// Cell at `row` in the column called `column`
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.resultset.as_ref()?.get(row)?.get(index)
    }

    pub fn to_json(&self) -> GraphResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
