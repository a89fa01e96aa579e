//! Graph session
//!
//! Thin glue between a request/response [`Transport`] and the decoding core.
//! A [`Graph`] owns one transport, one configuration and one
//! [`MetadataCache`]; requests are issued sequentially on that transport.
//!
//! # Requests
//!
//! ```text
//! query(q)            GRAPH.QUERY <graph> <q> [--compact]
//! explain(q)          GRAPH.EXPLAIN <graph> <q>
//! delete()            GRAPH.DELETE <graph>
//! call_procedure(p)   GRAPH.QUERY <graph> "CALL <p>()"
//! ```
//!
//! The graph is also the cache's [`SchemaSource`]: an empty dictionary is
//! filled with the matching `db.*` procedure call on the same transport.

pub mod query_kind;

pub use query_kind::QueryKind;

use crate::config::GraphConfig;
use crate::errors::{GraphError, GraphResult};
use crate::metadata::{Dictionary, MetadataCache, SchemaSource};
use crate::protocol::{RawValue, COMPACT_FLAG, DELETE_COMMAND, EXPLAIN_COMMAND, QUERY_COMMAND};
use crate::result::QueryResult;
use std::sync::Arc;
use validator::Validate;

/// Request/response client underneath a graph session
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Send `command` with `args` and return the already-parsed reply
    fn execute(&self, command: &str, args: &[String]) -> GraphResult<RawValue>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, command: &str, args: &[String]) -> GraphResult<RawValue> {
        (**self).execute(command, args)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, command: &str, args: &[String]) -> GraphResult<RawValue> {
        (**self).execute(command, args)
    }
}

pub struct Graph<T: Transport> {
    transport: T,
    config: GraphConfig,
    cache: MetadataCache,
}

impl<T: Transport> Graph<T> {
    pub fn new(transport: T, config: GraphConfig) -> GraphResult<Self> {
        config
            .validate()
            .map_err(crate::config::ConfigError::from)?;
        Ok(Graph {
            transport,
            config,
            cache: MetadataCache::new(),
        })
    }

    /// Session on `graph_name` with default settings
    pub fn open(transport: T, graph_name: &str) -> GraphResult<Self> {
        Self::new(transport, GraphConfig::new(graph_name)?)
    }

    pub fn name(&self) -> &str {
        &self.config.graph_name
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Run a query and decode its reply.
    ///
    /// Queries that may change the schema empty the dictionary cache once
    /// the reply has been decoded.
    pub fn query(&self, query: &str) -> GraphResult<QueryResult> {
        let mut args = vec![self.config.graph_name.clone(), query.to_string()];
        if self.config.compact {
            args.push(COMPACT_FLAG.to_string());
        }

        log::debug!("{} on {}: {}", QUERY_COMMAND, self.config.graph_name, query);
        let reply = self.transport.execute(QUERY_COMMAND, &args)?;
        let result = QueryResult::from_reply(&reply, &self.cache, self);

        if self.config.refresh_schema_on_write && QueryKind::classify(query).is_mutating() {
            self.cache.invalidate();
        }

        result
    }

    /// Execution plan of `query`, one operation per line
    pub fn explain(&self, query: &str) -> GraphResult<Vec<String>> {
        let args = [self.config.graph_name.clone(), query.to_string()];
        let reply = self.transport.execute(EXPLAIN_COMMAND, &args)?;

        match reply {
            RawValue::Text(plan) => Ok(plan.lines().map(str::to_string).collect()),
            RawValue::Array(lines) => lines
                .iter()
                .map(|line| {
                    line.to_text()
                        .ok_or_else(|| GraphError::malformed("plan line is not text"))
                })
                .collect(),
            other => Err(GraphError::malformed(format!(
                "unexpected explain reply: {:?}",
                other
            ))),
        }
    }

    /// Drop the graph on the engine
    pub fn delete(&self) -> GraphResult<()> {
        self.transport
            .execute(DELETE_COMMAND, &[self.config.graph_name.clone()])?;
        self.cache.invalidate();
        Ok(())
    }

    /// Call a procedure returning a single column and flatten its rows
    pub fn call_procedure(&self, procedure: &str) -> GraphResult<Vec<String>> {
        let args = [
            self.config.graph_name.clone(),
            format!("CALL {}()", procedure),
        ];
        let reply = self.transport.execute(QUERY_COMMAND, &args)?;
        let rows = reply.element(1, "procedure reply")?;

        let mut names = Vec::new();
        flatten_text(rows, &mut names)?;
        Ok(names)
    }

    pub fn labels(&self) -> GraphResult<Arc<Vec<String>>> {
        self.cache.labels(self)
    }

    pub fn property_keys(&self) -> GraphResult<Arc<Vec<String>>> {
        self.cache.property_keys(self)
    }

    pub fn relationship_types(&self) -> GraphResult<Arc<Vec<String>>> {
        self.cache.relationship_types(self)
    }
}

impl<T: Transport> SchemaSource for Graph<T> {
    fn fetch_dictionary(&self, dictionary: Dictionary) -> GraphResult<Vec<String>> {
        self.call_procedure(dictionary.procedure())
    }
}

fn flatten_text(value: &RawValue, out: &mut Vec<String>) -> GraphResult<()> {
    match value {
        RawValue::Array(items) => {
            for item in items {
                flatten_text(item, out)?;
            }
            Ok(())
        }
        scalar => {
            let text = scalar
                .to_text()
                .ok_or_else(|| GraphError::malformed("procedure row holds no name"))?;
            out.push(text);
            Ok(())
        }
    }
}
