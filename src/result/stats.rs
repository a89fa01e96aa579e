//! Stats section parsing
//!
//! The last element of a query reply is a list of human-readable summary
//! lines such as `"Nodes created: 6"` or
//! `"Query internal execution time: 0.5 milliseconds"`. Known labels are
//! matched by prefix (case-sensitive) and turned into typed counters.
//! Lines with labels this client does not know are skipped so the engine can
//! add new summary fields without breaking older clients.

use crate::errors::{GraphError, GraphResult};
use crate::protocol::RawValue;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Counter reported in the stats section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    LabelsAdded,
    NodesCreated,
    NodesDeleted,
    RelationshipsDeleted,
    PropertiesSet,
    RelationshipsCreated,
    InternalExecutionTime,
}

impl Counter {
    pub const ALL: [Counter; 7] = [
        Counter::LabelsAdded,
        Counter::NodesCreated,
        Counter::NodesDeleted,
        Counter::RelationshipsDeleted,
        Counter::PropertiesSet,
        Counter::RelationshipsCreated,
        Counter::InternalExecutionTime,
    ];

    /// Line prefix identifying the counter
    pub fn label(self) -> &'static str {
        match self {
            Counter::LabelsAdded => "Labels added",
            Counter::NodesCreated => "Nodes created",
            Counter::NodesDeleted => "Nodes deleted",
            Counter::RelationshipsDeleted => "Relationships deleted",
            Counter::PropertiesSet => "Properties set",
            Counter::RelationshipsCreated => "Relationships created",
            Counter::InternalExecutionTime => "Query internal execution time",
        }
    }

    /// Key of the counter in the stats map
    pub fn key(self) -> &'static str {
        match self {
            Counter::LabelsAdded => "labels_added",
            Counter::NodesCreated => "nodes_created",
            Counter::NodesDeleted => "nodes_deleted",
            Counter::RelationshipsDeleted => "relationships_deleted",
            Counter::PropertiesSet => "properties_set",
            Counter::RelationshipsCreated => "relationships_created",
            Counter::InternalExecutionTime => "internal_execution_time",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Counter::ALL.into_iter().find(|c| c.key() == key)
    }

    fn is_floating(self) -> bool {
        matches!(self, Counter::InternalExecutionTime)
    }

    /// Counter whose label starts the label part of a summary line
    fn match_label(label: &str) -> Option<Self> {
        Counter::ALL
            .into_iter()
            .find(|c| label.starts_with(c.label()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterValue {
    Integer(i64),
    Double(f64),
}

impl CounterValue {
    pub fn as_i64(self) -> Option<i64> {
        match self {
            CounterValue::Integer(i) => Some(i),
            CounterValue::Double(_) => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            CounterValue::Integer(i) => i as f64,
            CounterValue::Double(d) => d,
        }
    }
}

impl Serialize for CounterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CounterValue::Integer(i) => serializer.serialize_i64(*i),
            CounterValue::Double(d) => serializer.serialize_f64(*d),
        }
    }
}

/// Counters parsed from one reply's stats section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStats {
    counters: BTreeMap<Counter, CounterValue>,
}

impl QueryStats {
    pub fn get(&self, counter: Counter) -> Option<CounterValue> {
        self.counters.get(&counter).copied()
    }

    /// Integer counter by map key, e.g. `"nodes_created"`
    pub fn count(&self, key: &str) -> Option<i64> {
        Counter::from_key(key)
            .and_then(|c| self.get(c))
            .and_then(CounterValue::as_i64)
    }

    /// Reported execution time in milliseconds
    pub fn internal_execution_time(&self) -> Option<f64> {
        self.get(Counter::InternalExecutionTime)
            .map(CounterValue::as_f64)
    }

    pub fn insert(&mut self, counter: Counter, value: CounterValue) {
        self.counters.insert(counter, value);
    }

    pub fn remove(&mut self, counter: Counter) -> Option<CounterValue> {
        self.counters.remove(&counter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Counter, CounterValue)> + '_ {
        self.counters.iter().map(|(c, v)| (*c, *v))
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

impl FromIterator<(Counter, CounterValue)> for QueryStats {
    fn from_iter<I: IntoIterator<Item = (Counter, CounterValue)>>(iter: I) -> Self {
        QueryStats {
            counters: iter.into_iter().collect(),
        }
    }
}

impl Serialize for QueryStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counters.len()))?;
        for (counter, value) in &self.counters {
            map.serialize_entry(counter.key(), value)?;
        }
        map.end()
    }
}

/// Parse one summary line. `Ok(None)` for lines with an unknown label.
pub fn parse_stats_line(line: &str) -> GraphResult<Option<(Counter, CounterValue)>> {
    // "<label>: <number>[ <unit>]"
    let (label, value) = match line.split_once(':') {
        Some((label, value)) => (label, Some(value)),
        None => (line, None),
    };

    let Some(counter) = Counter::match_label(label) else {
        log::trace!("Ignoring unrecognized stats line: {}", line);
        return Ok(None);
    };

    let number = value
        .and_then(|value| value.split_whitespace().next())
        .ok_or_else(|| GraphError::malformed(format!("stats line without a value: {:?}", line)))?;

    let value = if counter.is_floating() {
        number.parse().map(CounterValue::Double).ok()
    } else {
        number.parse().map(CounterValue::Integer).ok()
    };

    value
        .map(|v| Some((counter, v)))
        .ok_or_else(|| GraphError::malformed(format!("stats line with a non-numeric value: {:?}", line)))
}

/// Parse all lines of a stats section
pub fn parse_stats(lines: &[RawValue]) -> GraphResult<QueryStats> {
    let mut stats = QueryStats::default();
    for line in lines {
        let RawValue::Text(text) = line else {
            return Err(GraphError::malformed(format!(
                "stats line is not text: {:?}",
                line
            )));
        };
        if let Some((counter, value)) = parse_stats_line(text)? {
            stats.insert(counter, value);
        }
    }
    Ok(stats)
}

/// Parse the stats section of a reply if there is one
pub fn parse_stats_section(section: Option<&RawValue>) -> GraphResult<Option<QueryStats>> {
    match section {
        None | Some(RawValue::Nil) => Ok(None),
        Some(RawValue::Array(lines)) => parse_stats(lines).map(Some),
        Some(other) => Err(GraphError::malformed(format!(
            "stats section is not an array: {:?}",
            other
        ))),
    }
}
