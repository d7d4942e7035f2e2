//! End-to-end scenarios across codec, layered storage and diff

use cac_diff::{DiffOptions, diff};
use cac_patch::{Patch, ServerExtensions, merge_tree};
use cac_storage::{MultiStorage, MultiStorageConfig, ServerStorage, Storage, StorageOptions};
use cac_test_utils::{TestLayer, renderer, tree};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn demo() -> StorageOptions {
    StorageOptions::new().with_workspace("demo")
}

fn layered(layers: &[TestLayer]) -> MultiStorage<ServerStorage> {
    let config = MultiStorageConfig {
        dir_path: layers.iter().map(|l| l.root().to_path_buf()).collect(),
    };
    MultiStorage::new(&config, &renderer(layers[0].root(), &[])).unwrap()
}

/// A tree is projected onto files and read back unchanged.
#[test]
fn scenario_a_write_then_read_round_trips() {
    let layers = TestLayer::many(1);
    let storage = layered(&layers);
    let data = tree(json!({
        "name": "demo",
        "clients": {"idA": {"client_name": "Demo Portal"}}
    }));

    storage
        .write(&Patch::<ServerExtensions>::new(data.clone()), &demo())
        .unwrap();

    let layer = &layers[0];
    layer.assert_file_contains("workspaces/demo/server.yaml", "name: demo");
    assert_eq!(
        layer.read("workspaces/demo/clients/Demo_Portal.yaml"),
        "id: idA\nclient_name: Demo Portal\n"
    );

    let mut merged = tree(json!({}));
    merge_tree(&mut merged, &storage.read(&demo()).unwrap().data);
    assert_eq!(Value::Object(merged), Value::Object(data));
}

/// The top layer overrides lower layers and receives writes.
#[test]
fn scenario_b_top_layer_overrides_base() {
    let layers = TestLayer::many(2);
    layers[1].write("workspaces/demo/server.yaml", "name: base\n");
    let storage = layered(&layers);

    assert_eq!(
        Value::Object(storage.read(&demo()).unwrap().data),
        json!({"name": "base"})
    );

    storage
        .write(&Patch::new(tree(json!({"name": "override"}))), &demo())
        .unwrap();

    assert_eq!(
        Value::Object(storage.read(&demo()).unwrap().data),
        json!({"name": "override"})
    );
    assert_eq!(layers[1].read("workspaces/demo/server.yaml"), "name: base\n");
}

/// Keys the source does not manage are left out of the comparison.
#[test]
fn scenario_c_diff_prunes_to_source() {
    let source = tree(json!({"a": 1, "b": 2}));
    let target = tree(json!({"a": 1, "b": 3, "c": 9}));
    let opts = DiffOptions {
        present_at_source: true,
        ..DiffOptions::default()
    };

    assert_eq!(diff(&source, &target, &opts).unwrap(), "b:\n- 2\n+ 3\n");
}

#[test]
fn stored_configuration_diffs_clean_against_its_origin() {
    let layers = TestLayer::many(1);
    let storage = layered(&layers);
    let data = tree(json!({
        "id": "demo",
        "name": "demo",
        "ttl": 3600.0,
        "scripts": {"s1": {"name": "Check", "body": "function check() {\n  return true;\n}\n"}},
        "policies": {"p1": {"policy_name": "Allow", "language": "rego", "definition": "package acp\n\ndefault allow = true\n"}},
        "servers_bindings": {"other": true}
    }));

    storage.write(&Patch::new(data.clone()), &demo()).unwrap();
    let stored = storage.read(&demo()).unwrap().data;

    assert_eq!(diff(&data, &stored, &DiffOptions::default()).unwrap(), "");
}
