//! Static descriptions of how a configuration tree maps onto files

use cac_patch::Tree;
use serde_json::Value;

/// How a section's value is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// One document: `<file>.yaml`
    Single,
    /// One document per entry: `<file>/<name>.yaml`
    Map,
    /// A map of `id -> true`, stored as `{bindings: [ids]}` in `<file>.yaml`
    Set,
}

/// Source of the file name for a map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayName {
    /// The entry's string field, falling back to the id when missing or empty
    Field(&'static str),
    /// The map key
    Id,
}

impl DisplayName {
    pub fn label<'a>(&self, id: &'a str, entry: &'a Value) -> &'a str {
        match self {
            DisplayName::Field(field) => entry
                .get(*field)
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .unwrap_or(id),
            DisplayName::Id => id,
        }
    }
}

/// A string field written to a sibling file and included back on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LargeText {
    pub field: &'static str,
    pub extension: &'static str,
    /// Only externalize when this `(field, value)` pair matches the entry
    pub when: Option<(&'static str, &'static str)>,
}

impl LargeText {
    pub fn applies(&self, fields: &Tree) -> bool {
        match self.when {
            None => true,
            Some((field, expected)) => fields.get(field).and_then(Value::as_str) == Some(expected),
        }
    }
}

const SET_FIELDS: &[&str] = &["bindings"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// Key in the configuration tree
    pub key: &'static str,
    /// File or directory name, relative to the layout root
    pub file: &'static str,
    pub cardinality: Cardinality,
    pub display_name: DisplayName,
    pub large_text: Option<LargeText>,
    /// Allowed fields of the document (or of each entry); `None` accepts any
    pub fields: Option<&'static [&'static str]>,
}

impl SectionSpec {
    pub const fn single(key: &'static str, file: &'static str) -> Self {
        Self {
            key,
            file,
            cardinality: Cardinality::Single,
            display_name: DisplayName::Id,
            large_text: None,
            fields: None,
        }
    }

    pub const fn map(key: &'static str, display_name: DisplayName) -> Self {
        Self {
            key,
            file: key,
            cardinality: Cardinality::Map,
            display_name,
            large_text: None,
            fields: None,
        }
    }

    pub const fn set(key: &'static str) -> Self {
        Self {
            key,
            file: key,
            cardinality: Cardinality::Set,
            display_name: DisplayName::Id,
            large_text: None,
            fields: Some(SET_FIELDS),
        }
    }

    pub const fn with_large_text(mut self, large_text: LargeText) -> Self {
        self.large_text = Some(large_text);
        self
    }

    pub const fn with_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.fields = Some(fields);
        self
    }

    /// The first field of `fields` outside the allow-list, if any.
    pub fn unknown_field<'a>(&self, fields: &'a Tree) -> Option<&'a str> {
        let allowed = self.fields?;
        fields
            .keys()
            .map(String::as_str)
            .find(|key| !allowed.contains(key))
    }
}

/// The full file layout of one storage level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Root document holding every key no section owns
    pub root: &'static str,
    pub sections: &'static [SectionSpec],
    /// Keys stored outside this layout; rejected in the root document
    pub reserved: &'static [&'static str],
}

impl Layout {
    pub fn section(&self, key: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|section| section.key == key)
    }

    /// Whether `key` is stored somewhere other than the root document.
    pub fn owns(&self, key: &str) -> bool {
        self.section(key).is_some() || self.reserved.contains(&key)
    }
}

/// Layout of `<root>/workspaces/<id>/`.
pub static SERVER_LAYOUT: Layout = Layout {
    root: "server",
    sections: &[
        SectionSpec::map("clients", DisplayName::Field("client_name")),
        SectionSpec::map("idps", DisplayName::Field("name")),
        SectionSpec::single("claims", "claims"),
        SectionSpec::map("custom_apps", DisplayName::Field("name")),
        SectionSpec::map("gateways", DisplayName::Field("name")),
        SectionSpec::single("policy_execution_points", "policy_execution_points"),
        SectionSpec::map("pools", DisplayName::Field("name")),
        SectionSpec::single("scopes_without_service", "scopes"),
        SectionSpec::single("script_execution_points", "script_execution_points"),
        SectionSpec::single("server_consent", "consent"),
        SectionSpec::set("servers_bindings"),
        SectionSpec::map("services", DisplayName::Field("name")),
        SectionSpec::single("theme_binding", "theme_binding").with_fields(&["theme_id"]),
        SectionSpec::map("webhooks", DisplayName::Id),
        SectionSpec::single("ciba_authentication_service", "ciba"),
        SectionSpec::map("scripts", DisplayName::Field("name")).with_large_text(LargeText {
            field: "body",
            extension: "js",
            when: None,
        }),
        SectionSpec::map("policies", DisplayName::Field("policy_name")).with_large_text(
            LargeText {
                field: "definition",
                extension: "rego",
                when: Some(("language", "rego")),
            },
        ),
    ],
    reserved: &[],
};

/// Layout of the tenant root; servers live under `workspaces/`.
pub static TENANT_LAYOUT: Layout = Layout {
    root: "tenant",
    sections: &[
        SectionSpec::map("pools", DisplayName::Field("name")),
        SectionSpec::map("schemas", DisplayName::Field("name")),
        SectionSpec::map("mfa_methods", DisplayName::Field("mechanism")),
        SectionSpec::map("themes", DisplayName::Field("name")),
    ],
    reserved: &["servers"],
};
