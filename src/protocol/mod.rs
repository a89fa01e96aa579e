//! Compact Result Protocol
//!
//! Wire-level vocabulary of the compact reply format. A query reply is a
//! nested array:
//!
//! ```text
//! [
//!   [[column-kind, name], ...],                 header
//!   [[cell, cell, ...], ...],                   rows
//!   ["Nodes created: 1", ...],                  stats
//! ]
//! ```
//!
//! Mutating queries without a RETURN clause may send only the stats array.
//!
//! ## Cells
//! ```text
//! SCALAR column:    [type-tag, raw-value]
//! NODE column:      [id, [label-index, ...], [property, ...]]
//! RELATION column:  [id, type-index, src-id, dst-id, [property, ...]]
//! property:         [property-key-index, type-tag, raw-value]
//! ```

pub mod raw_value;

pub use raw_value::RawValue;

/// Command used for queries and procedure calls
pub const QUERY_COMMAND: &str = "GRAPH.QUERY";
/// Command returning the execution plan of a query
pub const EXPLAIN_COMMAND: &str = "GRAPH.EXPLAIN";
/// Command dropping a graph and all its keys
pub const DELETE_COMMAND: &str = "GRAPH.DELETE";
/// Trailing query argument asking the engine for the compact reply form
pub const COMPACT_FLAG: &str = "--compact";

/// Offset of the property list inside a node tuple
pub const NODE_PROPERTIES_OFFSET: usize = 2;
/// Offset of the property list inside an edge tuple
pub const EDGE_PROPERTIES_OFFSET: usize = 4;

/// Value type code preceding every raw scalar on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Unknown,
    Null,
    String,
    Integer,
    Boolean,
    Double,
    Array,
    Edge,
    Node,
    /// Reserved by the engine, never decoded
    Path,
}

impl TypeTag {
    /// Map a wire code to its tag, `None` for codes outside the protocol
    pub fn from_code(code: i64) -> Option<Self> {
        let tag = match code {
            0 => TypeTag::Unknown,
            1 => TypeTag::Null,
            2 => TypeTag::String,
            3 => TypeTag::Integer,
            4 => TypeTag::Boolean,
            5 => TypeTag::Double,
            6 => TypeTag::Array,
            7 => TypeTag::Edge,
            8 => TypeTag::Node,
            9 => TypeTag::Path,
            _ => return None,
        };
        Some(tag)
    }

    pub fn code(self) -> i64 {
        match self {
            TypeTag::Unknown => 0,
            TypeTag::Null => 1,
            TypeTag::String => 2,
            TypeTag::Integer => 3,
            TypeTag::Boolean => 4,
            TypeTag::Double => 5,
            TypeTag::Array => 6,
            TypeTag::Edge => 7,
            TypeTag::Node => 8,
            TypeTag::Path => 9,
        }
    }
}

/// Kind code of a header entry, deciding how every cell of the column is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Unknown,
    /// Cells are `[type-tag, raw-value]` pairs
    Scalar,
    /// Cells are bare node tuples
    Node,
    /// Cells are bare edge tuples
    Relation,
}

impl ColumnKind {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ColumnKind::Unknown),
            1 => Some(ColumnKind::Scalar),
            2 => Some(ColumnKind::Node),
            3 => Some(ColumnKind::Relation),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            ColumnKind::Unknown => 0,
            ColumnKind::Scalar => 1,
            ColumnKind::Node => 2,
            ColumnKind::Relation => 3,
        }
    }
}
