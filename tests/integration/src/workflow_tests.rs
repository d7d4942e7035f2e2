//! Pull, edit, diff and push through a configuration file

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use cac_core::{Application, Configuration, Source, SourceOptions};
use cac_diff::DiffOptions;
use cac_patch::{Patch, ServerExtensions};
use cac_storage::ServerStorage;
use cac_test_utils::{TestLayer, renderer, tree};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Remote {
    state: Rc<RefCell<Patch<ServerExtensions>>>,
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remote")
    }
}

impl Source<ServerExtensions> for Remote {
    fn read(&self, opts: &SourceOptions) -> cac_core::Result<Patch<ServerExtensions>> {
        Ok(self.state.borrow().filtered(&opts.filters))
    }

    fn write(&self, patch: &Patch<ServerExtensions>, _opts: &SourceOptions) -> cac_core::Result<()> {
        *self.state.borrow_mut() = patch.clone();
        Ok(())
    }
}

fn application(config_dir: &TestLayer, remote: &Remote) -> Application<ServerStorage> {
    let local = config_dir.path("local");
    let shared = config_dir.path("shared");
    config_dir.write(
        "cac.yaml",
        &format!(
            "storage:\n  dir_path:\n    - {}\n    - {}\nlogging:\n  level: debug\n",
            local.display(),
            shared.display()
        ),
    );

    let remote = remote.clone();
    Application::load(
        &config_dir.path("cac.yaml"),
        "",
        renderer(config_dir.root(), &[("TEAM", "platform")]),
    )
    .unwrap()
    .with_connector(
        move |_: &str, _: &Configuration| -> cac_core::Result<Box<dyn Source<ServerExtensions>>> {
            Ok(Box::new(remote.clone()))
        },
    )
}

#[test]
fn pull_edit_diff_push() {
    let dir = TestLayer::new();
    let remote = Remote::default();
    *remote.state.borrow_mut() = Patch::new(tree(json!({
        "name": "demo",
        "clients": {"c1": {"client_name": "Portal", "redirect_uris": ["https://a", "https://b"]}}
    })));
    let app = application(&dir, &remote);
    let opts = SourceOptions::new().with_workspace("demo");

    app.pull(&opts).unwrap();
    dir.assert_file_exists("local/workspaces/demo/clients/Portal.yaml");
    assert_eq!(
        app.diff("local", "remote", &opts, &DiffOptions::default())
            .unwrap(),
        ""
    );

    // Shared defaults plus a local edit using a template
    dir.write("shared/workspaces/demo/server.yaml", "description: shared defaults\n");
    dir.write(
        "local/workspaces/demo/server.yaml",
        "id: demo\nname: demo\nowner: '{{ env \"TEAM\" }}'\n",
    );

    assert_eq!(
        app.diff("remote", "local", &opts, &DiffOptions::default())
            .unwrap(),
        "description:\n+ \"shared defaults\"\nowner:\n+ \"platform\"\n"
    );

    app.push(&opts, None).unwrap();
    assert_eq!(
        Value::Object(remote.state.borrow().data.clone()),
        json!({
            "name": "demo",
            "description": "shared defaults",
            "owner": "platform",
            "clients": {"c1": {"client_name": "Portal", "redirect_uris": ["https://a", "https://b"]}}
        })
    );
    assert_eq!(
        app.diff("local", "remote", &opts, &DiffOptions::default())
            .unwrap(),
        ""
    );
}
