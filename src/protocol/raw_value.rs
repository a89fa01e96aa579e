//! Raw reply tree handed over by the transport.
//!
//! The transport has already split the reply into nested arrays, strings and
//! numbers; nothing here knows about sockets or framing. Booleans never
//! appear natively: the engine sends them as text, so JSON booleans are
//! folded into `Text` when a reply is read from JSON.

use crate::errors::{GraphError, GraphResult};
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Nil,
    Integer(i64),
    Double(f64),
    Text(String),
    Array(Vec<RawValue>),
}

impl RawValue {
    pub fn as_array(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Integer view of the value; text holding a base-10 integer also qualifies
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawValue::Integer(i) => Some(*i),
            RawValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            RawValue::Double(d) => Some(*d),
            RawValue::Integer(i) => Some(*i as f64),
            RawValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Textual rendering of a scalar; arrays and nil have none
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Integer(i) => Some(i.to_string()),
            RawValue::Double(d) => Some(d.to_string()),
            RawValue::Nil | RawValue::Array(_) => None,
        }
    }

    /// Element `index` of an array value, or a MalformedReply naming `what`
    pub fn element(&self, index: usize, what: &str) -> GraphResult<&RawValue> {
        let items = self
            .as_array()
            .ok_or_else(|| GraphError::malformed(format!("{} is not an array", what)))?;
        items.get(index).ok_or_else(|| {
            GraphError::malformed(format!(
                "{} has {} elements, expected at least {}",
                what,
                items.len(),
                index + 1
            ))
        })
    }

    /// Read a reply written as JSON (fixtures, the decode tool)
    pub fn from_json_str(input: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Double(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(items: Vec<RawValue>) -> Self {
        RawValue::Array(items)
    }
}

impl TryFrom<serde_json::Value> for RawValue {
    type Error = GraphError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(RawValue::deserialize(value)?)
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("null, a number, a string or an array")
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Nil)
    }

    fn visit_none<E: de::Error>(self) -> Result<RawValue, E> {
        Ok(RawValue::Nil)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawValue, E> {
        Ok(RawValue::Text(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
        Ok(RawValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
        match i64::try_from(v) {
            Ok(i) => Ok(RawValue::Integer(i)),
            Err(_) => Ok(RawValue::Double(v as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawValue, E> {
        Ok(RawValue::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
        Ok(RawValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawValue, E> {
        Ok(RawValue::Text(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(RawValue::Array(items))
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RawValueVisitor)
    }
}
