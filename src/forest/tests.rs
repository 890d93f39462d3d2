//! Wire-shape tests for forest nodes

use serde_json::json;

use super::{assemble, Node, NodeId, NodeRecord};

#[test]
fn node_id_serializes_as_integer() {
    let json = serde_json::to_string(&NodeId::new(42)).unwrap();
    assert_eq!(json, "42");
}

#[test]
fn node_id_deserializes_from_integer() {
    let id: NodeId = serde_json::from_str("7").unwrap();
    assert_eq!(id, NodeId::new(7));
}

#[test]
fn leaf_node_has_empty_children_and_no_parent_id() {
    let node = Node::from_record(NodeRecord::child(3, "leaf", 1));
    let value = serde_json::to_value(&node).unwrap();

    assert_eq!(value, json!({"id": 3, "label": "leaf", "children": []}));
    assert!(value.get("parent_id").is_none());
}

#[test]
fn assembled_forest_serializes_recursively() {
    let forest = assemble(vec![
        NodeRecord::root(1, "root"),
        NodeRecord::child(2, "child", 1),
        NodeRecord::child(3, "grandchild", 2),
    ]);
    let value = serde_json::to_value(&forest).unwrap();

    assert_eq!(
        value,
        json!([
            {
                "id": 1,
                "label": "root",
                "children": [
                    {
                        "id": 2,
                        "label": "child",
                        "children": [
                            {"id": 3, "label": "grandchild", "children": []}
                        ]
                    }
                ]
            }
        ])
    );
}

#[test]
fn node_deserializes_without_parent_id() {
    let node: Node = serde_json::from_value(json!({
        "id": 1,
        "label": "root",
        "children": [{"id": 2, "label": "kid", "children": []}]
    }))
    .unwrap();

    assert_eq!(node.parent_id, None);
    assert_eq!(node.subtree_len(), 2);
    assert_eq!(node.find(NodeId::new(2)).map(|n| n.label.as_str()), Some("kid"));
    assert!(node.find(NodeId::new(9)).is_none());
}

#[test]
fn unicode_labels_survive_serialization() {
    let node = Node::from_record(NodeRecord::root(1, "日本語 🌲 Ünïcödé"));
    let json = serde_json::to_string(&node).unwrap();
    let back: Node = serde_json::from_str(&json).unwrap();
    assert_eq!(back.label, "日本語 🌲 Ünïcödé");
}
