//! End-to-end decoding through a graph session
//!
//! Replies mirror what the engine sends for the quickstart graph:
//! riders, teams and `rides` relationships.

use super::common::FakeEngine;
use graphwire::{Graph, GraphError, Property, Value};
use serde_json::json;
use std::sync::Arc;

fn graph(engine: &Arc<FakeEngine>) -> Graph<Arc<FakeEngine>> {
    Graph::open(Arc::clone(engine), "motogp").unwrap()
}

#[test]
fn test_aggregate_count() {
    let engine = Arc::new(FakeEngine::default());
    engine.push_reply(json!([
        [[1, "count(r)"]],
        [[[3, 1]]],
        ["Query internal execution time: 0.5 ms"]
    ]));

    let result = graph(&engine)
        .query("MATCH (r:Rider)-[:rides]->(t:Team {name:'Ducati'}) RETURN count(r)")
        .unwrap();

    assert_eq!(result.columns().unwrap(), ["count(r)"]);
    assert_eq!(result.resultset().unwrap(), [vec![Value::Integer(1)]]);
    let stats = result.stats().unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats.internal_execution_time(), Some(0.5));
    assert_eq!(engine.procedure_calls(), 0);
}

#[test]
fn test_node_column_resolves_property_names() {
    let engine = Arc::new(FakeEngine::with_property_keys(&["label", "name"]));
    engine.push_reply(json!([
        [[2, "r"]],
        [[[0, [0], [[1, 2, "Rossi"], [0, 2, "Rider"]]]]],
        ["Query internal execution time: 0.3 ms"]
    ]));

    let result = graph(&engine).query("MATCH (r:Rider) RETURN r").unwrap();

    assert_eq!(
        result.get(0, "r"),
        Some(&Value::Node(vec![
            Property::new("label", "Rider"),
            Property::new("name", "Rossi"),
        ]))
    );
    assert_eq!(engine.procedure_calls(), 1);
}

#[test]
fn test_relations_with_predicate() {
    let engine = Arc::new(FakeEngine::default());
    engine.push_reply(json!([
        [[1, "r.name"], [1, "t.name"]],
        [
            [[2, "Andrea Dovizioso"], [2, "Ducati"]],
            [[2, "Dani Pedrosa"], [2, "Honda"]],
            [[2, "Valentino Rossi"], [2, "Yamaha"]]
        ],
        ["Query internal execution time: 0.9 ms"]
    ]));

    let result = graph(&engine)
        .query("MATCH (r:Rider)-[:rides]->(t:Team) RETURN r.name, t.name ORDER BY r.name")
        .unwrap();

    assert_eq!(result.columns().unwrap(), ["r.name", "t.name"]);
    let names: Vec<(&str, &str)> = result
        .resultset()
        .unwrap()
        .iter()
        .map(|row| (row[0].as_str().unwrap(), row[1].as_str().unwrap()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Andrea Dovizioso", "Ducati"),
            ("Dani Pedrosa", "Honda"),
            ("Valentino Rossi", "Yamaha"),
        ]
    );
}

#[test]
fn test_traverse_edges() {
    let engine = Arc::new(FakeEngine::with_property_keys(&["name", "color", "weight"]));
    engine.push_reply(json!([
        [[1, "a.name"], [2, "b"], [3, "e"]],
        [[
            [2, "src1"],
            [1, [0], [[0, 2, "dest1"], [1, 2, "magenta"]]],
            [0, 0, 0, 1, [[2, 5, "7.8"]]]
        ]],
        ["Query internal execution time: 1.1 ms"]
    ]));

    let result = graph(&engine)
        .query("MATCH (a)-[e:edge]->(b:node) RETURN a.name, b, e")
        .unwrap();

    assert_eq!(result.columns().unwrap(), ["a.name", "b", "e"]);
    assert_eq!(
        result.to_json().unwrap()["resultset"],
        json!([["src1", [{"name": "dest1"}, {"color": "magenta"}], [{"weight": 7.8}]]])
    );
}

#[test]
fn test_create_without_return() {
    let engine = Arc::new(FakeEngine::default());
    engine.push_reply(json!([[
        "Labels added: 2",
        "Nodes created: 6",
        "Properties set: 6",
        "Relationships created: 3",
        "Query internal execution time: 2.2 milliseconds"
    ]]));

    let result = graph(&engine)
        .query(
            "CREATE (:Rider {name:'Valentino Rossi'})-[:rides]->(:Team {name:'Yamaha'}),\
             (:Rider {name:'Dani Pedrosa'})-[:rides]->(:Team {name:'Honda'}),\
             (:Rider {name:'Andrea Dovizioso'})-[:rides]->(:Team {name:'Ducati'})",
        )
        .unwrap();

    assert_eq!(result.columns(), None);
    assert_eq!(result.resultset(), None);
    assert_eq!(result.stat("labels_added"), Some(2));
    assert_eq!(result.stat("nodes_created"), Some(6));
    assert_eq!(result.stat("properties_set"), Some(6));
    assert_eq!(result.stat("relationships_created"), Some(3));
}

#[test]
fn test_delete_with_empty_result_sections() {
    let engine = Arc::new(FakeEngine::default());
    engine.push_reply(json!([[], [], ["Nodes deleted: 1", "Query internal execution time: 0.2 ms"]]));

    let result = graph(&engine)
        .query("MATCH (t:node) WHERE t.name = 'src' DELETE t")
        .unwrap();

    assert_eq!(result.row_count(), 0);
    assert_eq!(result.stat("nodes_deleted"), Some(1));
}

#[test]
fn test_bare_return_mapping() {
    let engine = Arc::new(FakeEngine::default());
    engine.push_reply(json!([
        [[1, "a"]],
        [[[3, 1]], [[5, "1.5"]], [[1, null]], [[2, "strval"]], [[4, "true"]], [[4, "false"]]],
        ["Query internal execution time: 0.1 ms"]
    ]));

    let result = graph(&engine)
        .query("UNWIND [1, 1.5, null, 'strval', true, false] AS a RETURN a")
        .unwrap();

    assert_eq!(
        result.to_json().unwrap()["resultset"],
        json!([[1], [1.5], [null], ["strval"], [true], [false]])
    );
}

#[test]
fn test_malformed_reply_yields_no_partial_result() {
    let engine = Arc::new(FakeEngine::default());
    engine.push_reply(json!([
        [[1, "a"], [1, "b"]],
        [[[3, 1], [3, 2]], [[3, 3]]],
        []
    ]));

    let err = graph(&engine).query("MATCH (n) RETURN n.a, n.b").unwrap_err();
    assert!(matches!(err, GraphError::MalformedReply { .. }));
}

#[test]
fn test_transport_failure_is_surfaced() {
    let engine = Arc::new(FakeEngine::default());
    engine.push_error("ERR Invalid graph operation on empty key");

    let err = graph(&engine).query("MATCH (n) RETURN n").unwrap_err();
    assert_eq!(err.error_code(), "Graph.TransportError");
}

#[test]
fn test_query_command_arguments() {
    let engine = Arc::new(FakeEngine::default());
    engine.push_reply(json!([["Nodes created: 1"]]));

    graph(&engine).query("CREATE (:A)").unwrap();

    let commands = engine.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].0, "GRAPH.QUERY");
    assert_eq!(commands[0].1, vec!["motogp", "CREATE (:A)", "--compact"]);
}
