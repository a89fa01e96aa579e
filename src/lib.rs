//! Graphwire - client-side decoding of compact graph query replies
//!
//! This crate turns the nested, positionally encoded replies of a graph query
//! engine into column-labelled rows of typed values:
//! - Schema dictionary cache (labels, property keys, relationship types)
//! - Scalar, node and edge decoding
//! - Stats section parsing
//! - A thin graph session over any request/response transport
//!
//! ```no_run
//! use graphwire::{Graph, GraphResult, RawValue, Transport};
//!
//! struct Conn;
//!
//! impl Transport for Conn {
//!     fn execute(&self, command: &str, args: &[String]) -> GraphResult<RawValue> {
//!         unimplemented!("send {} {:?} over the wire", command, args)
//!     }
//! }
//!
//! # fn main() -> GraphResult<()> {
//! let graph = Graph::open(Conn, "motogp")?;
//! let result = graph.query("MATCH (r:Rider) RETURN r.name")?;
//! for row in result.resultset().unwrap_or_default() {
//!     println!("{:?}", row);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod graph;
pub mod metadata;
pub mod protocol;
pub mod result;

pub use config::{ConfigError, GraphConfig};
pub use errors::{GraphError, GraphResult};
pub use graph::{Graph, QueryKind, Transport};
pub use metadata::{Dictionary, DictionaryState, MetadataCache, SchemaSource, StaticSchema};
pub use protocol::{ColumnKind, RawValue, TypeTag};
pub use result::{Counter, CounterValue, Property, QueryResult, QueryStats, Value};
