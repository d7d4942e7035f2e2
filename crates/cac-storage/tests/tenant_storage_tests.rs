use cac_patch::{Patch, Secret, ServerExtensions, TenantExtensions};
use cac_storage::{DirStorage, Error, Storage, StorageOptions, TenantStorage};
use cac_test_utils::{TestLayer, renderer, tree};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn storage(layer: &TestLayer) -> TenantStorage {
    TenantStorage::open(layer.root().to_path_buf(), renderer(layer.root(), &[]))
}

fn sample() -> Value {
    json!({
        "name": "tenant",
        "pools": {"p1": {"name": "Users"}},
        "mfa_methods": {"m1": {"mechanism": "sms", "enabled": true}},
        "themes": {"t1": {"name": "Dark"}},
        "servers": {
            "admin": {"name": "Admin", "clients": {"c1": {"client_name": "Console"}}},
            "demo": {"name": "Demo"}
        }
    })
}

#[test]
fn writes_tenant_sections_and_workspaces() {
    let layer = TestLayer::new();
    storage(&layer)
        .write(&Patch::new(tree(sample())), &StorageOptions::new())
        .unwrap();

    assert_eq!(
        layer.files(),
        vec![
            "mfa_methods/sms.yaml",
            "pools/Users.yaml",
            "tenant.yaml",
            "themes/Dark.yaml",
            "workspaces/admin/clients/Console.yaml",
            "workspaces/admin/server.yaml",
            "workspaces/demo/server.yaml",
        ]
    );
    assert!(!layer.read("tenant.yaml").contains("servers"));
}

#[test]
fn round_trips_a_tenant() {
    let layer = TestLayer::new();
    let storage = storage(&layer);
    storage
        .write(&Patch::new(tree(sample())), &StorageOptions::new())
        .unwrap();

    let patch = storage.read(&StorageOptions::new()).unwrap();
    assert_eq!(Value::Object(patch.data), sample());
}

#[test]
fn servers_are_keyed_by_their_stored_id() {
    let layer = TestLayer::new();
    layer.write("workspaces/renamed-dir/server.yaml", "id: real-id\ntenant_id: t\nname: x\n");

    let patch = storage(&layer).read(&StorageOptions::new()).unwrap();
    assert_eq!(
        Value::Object(patch.data),
        json!({"servers": {"real-id": {"name": "x"}}})
    );
}

#[test]
fn server_secrets_travel_in_tenant_extensions() {
    let layer = TestLayer::new();
    let mut ext = TenantExtensions::default();
    ext.servers.insert(
        "demo".into(),
        ServerExtensions {
            secrets: [(
                "api".to_string(),
                Secret {
                    id: "api".into(),
                    value: "s3cr3t".into(),
                    created_at: None,
                },
            )]
            .into(),
        },
    );

    let opts = StorageOptions::new().with_secrets(true);
    let storage = storage(&layer);
    storage
        .write(&Patch::with_ext(tree(json!({"servers": {"demo": {"name": "Demo"}}})), ext.clone()), &opts)
        .unwrap();

    layer.assert_file_exists("workspaces/demo/secrets/api.yaml");
    assert_eq!(storage.read(&opts).unwrap().ext, ext);
}

#[test]
fn servers_in_root_document_are_rejected() {
    let layer = TestLayer::new();
    layer.write("tenant.yaml", "name: t\nservers: {}\n");

    let err = storage(&layer).read(&StorageOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn filters_select_tenant_sections() {
    let layer = TestLayer::new();
    let storage = storage(&layer);
    storage
        .write(&Patch::new(tree(sample())), &StorageOptions::new())
        .unwrap();

    let patch = storage
        .read(&StorageOptions::new().with_filters(["pools"]))
        .unwrap();
    assert_eq!(Value::Object(patch.data), json!({"pools": {"p1": {"name": "Users"}}}));
}
