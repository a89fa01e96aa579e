//! Scalar decoding
//!
//! Turns one `(type-tag, raw-value)` pair into a [`Value`]. Arrays recurse
//! through the same dispatch; nodes and edges go through property
//! resolution, which reads property-key names from the [`MetadataCache`].
//!
//! A decoder carries the [`RefreshBudget`] of the decode call it belongs to,
//! so all property lookups of one reply share a single reactive refresh.

use crate::errors::{GraphError, GraphResult};
use crate::metadata::{Dictionary, MetadataCache, RefreshBudget, SchemaSource};
use crate::protocol::{RawValue, TypeTag, EDGE_PROPERTIES_OFFSET, NODE_PROPERTIES_OFFSET};
use crate::result::value::{Property, Value};

/// Read a wire type code
pub fn parse_tag(raw: &RawValue) -> GraphResult<TypeTag> {
    let code = raw
        .as_integer()
        .ok_or_else(|| GraphError::malformed(format!("type tag is not an integer: {:?}", raw)))?;
    TypeTag::from_code(code)
        .ok_or_else(|| GraphError::malformed(format!("unknown type tag code {}", code)))
}

/// Read a non-negative wire index
pub(crate) fn parse_index(raw: &RawValue, what: &str) -> GraphResult<usize> {
    raw.as_integer()
        .and_then(|i| usize::try_from(i).ok())
        .ok_or_else(|| GraphError::malformed(format!("{} is not a valid index: {:?}", what, raw)))
}

pub struct ScalarDecoder<'a> {
    cache: &'a MetadataCache,
    source: &'a dyn SchemaSource,
    budget: RefreshBudget,
}

impl<'a> ScalarDecoder<'a> {
    pub fn new(cache: &'a MetadataCache, source: &'a dyn SchemaSource) -> Self {
        ScalarDecoder {
            cache,
            source,
            budget: RefreshBudget::single(),
        }
    }

    pub fn decode_scalar(&mut self, tag: TypeTag, raw: &RawValue) -> GraphResult<Value> {
        match tag {
            TypeTag::Null => Ok(Value::Null),
            TypeTag::String => raw
                .to_text()
                .map(Value::String)
                .ok_or_else(|| GraphError::malformed(format!("string value expected, got {:?}", raw))),
            TypeTag::Integer => raw
                .as_integer()
                .map(Value::Integer)
                .ok_or_else(|| GraphError::malformed(format!("integer value expected, got {:?}", raw))),
            // No tri-state: anything but the exact text "true" is false
            TypeTag::Boolean => Ok(Value::Boolean(raw.to_text().as_deref() == Some("true"))),
            TypeTag::Double => raw
                .as_double()
                .map(Value::Double)
                .ok_or_else(|| GraphError::malformed(format!("double value expected, got {:?}", raw))),
            TypeTag::Array => {
                let items = raw
                    .as_array()
                    .ok_or_else(|| GraphError::malformed("array value is not an array"))?;
                let decoded = items
                    .iter()
                    .map(|item| self.decode_tagged(item))
                    .collect::<GraphResult<Vec<_>>>()?;
                Ok(Value::Array(decoded))
            }
            TypeTag::Node => self.decode_node(raw),
            TypeTag::Edge => self.decode_edge(raw),
            TypeTag::Unknown | TypeTag::Path => Err(GraphError::unsupported(tag)),
        }
    }

    /// Decode a `[type-tag, raw-value]` pair
    pub fn decode_tagged(&mut self, pair: &RawValue) -> GraphResult<Value> {
        let tag = parse_tag(pair.element(0, "tagged value")?)?;
        let raw = pair.element(1, "tagged value")?;
        self.decode_scalar(tag, raw)
    }

    /// Decode a node tuple to its sorted property list
    pub fn decode_node(&mut self, raw: &RawValue) -> GraphResult<Value> {
        let props = raw.element(NODE_PROPERTIES_OFFSET, "node")?;
        Ok(Value::Node(self.decode_properties(props)?))
    }

    /// Decode an edge tuple to its sorted property list
    pub fn decode_edge(&mut self, raw: &RawValue) -> GraphResult<Value> {
        let props = raw.element(EDGE_PROPERTIES_OFFSET, "edge")?;
        Ok(Value::Edge(self.decode_properties(props)?))
    }

    fn decode_properties(&mut self, list: &RawValue) -> GraphResult<Vec<Property>> {
        let entries = list
            .as_array()
            .ok_or_else(|| GraphError::malformed("property list is not an array"))?;

        let mut indexed = Vec::with_capacity(entries.len());
        for entry in entries {
            let index = parse_index(entry.element(0, "property")?, "property key")?;
            indexed.push((index, entry));
        }
        indexed.sort_by_key(|(index, _)| *index);

        let mut properties = Vec::with_capacity(indexed.len());
        for (index, entry) in indexed {
            let key = self.cache.resolve(
                Dictionary::PropertyKeys,
                index,
                self.source,
                &mut self.budget,
            )?;
            let tag = parse_tag(entry.element(1, "property")?)?;
            let value = self.decode_scalar(tag, entry.element(2, "property")?)?;
            properties.push(Property { key, value });
        }
        Ok(properties)
    }
}
