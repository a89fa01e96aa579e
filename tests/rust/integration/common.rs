//! Shared fixtures: an in-memory engine standing in for the transport

use graphwire::{GraphError, GraphResult, RawValue, Transport};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted engine: answers `db.*` procedure calls from its current
/// dictionaries and every other query from a queue of canned replies.
#[derive(Default)]
pub struct FakeEngine {
    pub labels: Mutex<Vec<String>>,
    pub property_keys: Mutex<Vec<String>>,
    pub relationship_types: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<GraphResult<RawValue>>>,
    procedure_calls: AtomicUsize,
    commands: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeEngine {
    pub fn with_property_keys(keys: &[&str]) -> Self {
        let engine = FakeEngine::default();
        engine.set_property_keys(keys);
        engine
    }

    pub fn set_property_keys(&self, keys: &[&str]) {
        *self.property_keys.lock().unwrap() = keys.iter().map(|s| s.to_string()).collect();
    }

    pub fn push_reply(&self, reply: serde_json::Value) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(RawValue::try_from(reply).unwrap()));
    }

    pub fn push_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(GraphError::transport(message)));
    }

    pub fn procedure_calls(&self) -> usize {
        self.procedure_calls.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<(String, Vec<String>)> {
        self.commands.lock().unwrap().clone()
    }

    fn dictionary_reply(column: &str, entries: &[String]) -> RawValue {
        let rows = entries
            .iter()
            .map(|e| RawValue::Array(vec![RawValue::from(e.as_str())]))
            .collect();
        RawValue::Array(vec![
            RawValue::Array(vec![RawValue::from(column)]),
            RawValue::Array(rows),
            RawValue::Array(vec![RawValue::from(
                "Query internal execution time: 0.05 milliseconds",
            )]),
        ])
    }
}

impl Transport for FakeEngine {
    fn execute(&self, command: &str, args: &[String]) -> GraphResult<RawValue> {
        self.commands
            .lock()
            .unwrap()
            .push((command.to_string(), args.to_vec()));

        let query = args.get(1).map(String::as_str).unwrap_or_default();
        let dictionary = match query {
            "CALL db.labels()" => Some(("label", &self.labels)),
            "CALL db.propertyKeys()" => Some(("propertyKey", &self.property_keys)),
            "CALL db.relationshipTypes()" => Some(("relationshipType", &self.relationship_types)),
            _ => None,
        };

        if let Some((column, entries)) = dictionary {
            self.procedure_calls.fetch_add(1, Ordering::SeqCst);
            return Ok(Self::dictionary_reply(column, &entries.lock().unwrap()));
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GraphError::transport("no reply scripted")))
    }
}
