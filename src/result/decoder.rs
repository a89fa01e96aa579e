//! Result set decoding
//!
//! Walks the header and row sections of a compact reply. The header fixes
//! how every cell of a column is read, so a row is decoded position by
//! position against it:
//!
//! ```text
//! header:  [[1, "a.name"], [2, "b"], [3, "e"]]
//! row:     [[2, "src1"], [0, [0], [...]], [1, 0, 0, 1, [...]]]
//!           ^ scalar pair  ^ node tuple     ^ edge tuple
//! ```
//!
//! All cells of one decode share the decoder's single schema refresh.

use crate::errors::{GraphError, GraphResult};
use crate::metadata::{MetadataCache, SchemaSource};
use crate::protocol::{ColumnKind, RawValue};
use crate::result::scalar::ScalarDecoder;
use crate::result::value::Value;

/// One RETURN-clause entry as described by the reply header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub kind: ColumnKind,
    pub name: String,
}

/// Header and rows of a reply that carried tabular output
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

pub struct ResultDecoder<'a> {
    cache: &'a MetadataCache,
    source: &'a dyn SchemaSource,
}

impl<'a> ResultDecoder<'a> {
    pub fn new(cache: &'a MetadataCache, source: &'a dyn SchemaSource) -> Self {
        ResultDecoder { cache, source }
    }

    /// Decode header and rows. `None` when the reply has at most one
    /// top-level element, i.e. the query produced no tabular output.
    pub fn decode(&self, reply: &RawValue) -> GraphResult<Option<Table>> {
        let sections = reply
            .as_array()
            .ok_or_else(|| GraphError::malformed("reply is not an array"))?;

        if sections.len() <= 1 {
            return Ok(None);
        }

        let columns = parse_header(&sections[0])?;
        let raw_rows = sections[1]
            .as_array()
            .ok_or_else(|| GraphError::malformed("row section is not an array"))?;

        let mut scalars = ScalarDecoder::new(self.cache, self.source);
        let mut rows = Vec::with_capacity(raw_rows.len());
        for (row_index, raw_row) in raw_rows.iter().enumerate() {
            rows.push(decode_row(&mut scalars, &columns, raw_row, row_index)?);
        }

        log::debug!(
            "Decoded {} rows x {} columns",
            rows.len(),
            columns.len()
        );

        Ok(Some(Table { columns, rows }))
    }
}

/// Parse the `[[column-kind, name], ...]` header section
pub fn parse_header(section: &RawValue) -> GraphResult<Vec<Column>> {
    let entries = section
        .as_array()
        .ok_or_else(|| GraphError::malformed("header is not an array"))?;

    entries
        .iter()
        .map(|entry| -> GraphResult<Column> {
            let code = entry
                .element(0, "header entry")?
                .as_integer()
                .ok_or_else(|| GraphError::malformed("column kind is not an integer"))?;
            let kind = ColumnKind::from_code(code)
                .ok_or_else(|| GraphError::malformed(format!("unknown column kind {}", code)))?;
            let name = entry
                .element(1, "header entry")?
                .to_text()
                .ok_or_else(|| GraphError::malformed("column name is not text"))?;
            Ok(Column { kind, name })
        })
        .collect()
}

fn decode_row(
    scalars: &mut ScalarDecoder<'_>,
    columns: &[Column],
    raw_row: &RawValue,
    row_index: usize,
) -> GraphResult<Vec<Value>> {
    let cells = raw_row
        .as_array()
        .ok_or_else(|| GraphError::malformed(format!("row {} is not an array", row_index)))?;

    if cells.len() != columns.len() {
        return Err(GraphError::malformed(format!(
            "row {} has {} cells, header has {} columns",
            row_index,
            cells.len(),
            columns.len()
        )));
    }

    columns
        .iter()
        .zip(cells)
        .map(|(column, cell)| match column.kind {
            ColumnKind::Scalar => scalars.decode_tagged(cell),
            ColumnKind::Node => scalars.decode_node(cell),
            ColumnKind::Relation => scalars.decode_edge(cell),
            ColumnKind::Unknown => Err(GraphError::malformed(format!(
                "column `{}` has unknown kind",
                column.name
            ))),
        })
        .collect()
}
