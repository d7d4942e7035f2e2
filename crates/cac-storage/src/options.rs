//! Options shared by every read and write

/// How a written patch is applied by the receiving side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Merge-patch application
    #[default]
    Patch,
    /// Full replacement
    Import,
}

impl std::str::FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "patch" | "update" => Ok(Self::Patch),
            "import" => Ok(Self::Import),
            other => Err(format!("unknown write mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageOptions {
    /// Workspace (server) selector; required by server-level storages
    pub workspace: Option<String>,
    /// Include secrets
    pub secrets: bool,
    /// Section allow-list, empty for everything
    pub filters: Vec<String>,
    pub mode: WriteMode,
}

impl StorageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn with_secrets(mut self, secrets: bool) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn with_filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = filters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// The workspace, failing when none was given.
    pub fn require_workspace(&self) -> crate::Result<&str> {
        self.workspace
            .as_deref()
            .filter(|workspace| !workspace.is_empty())
            .ok_or(crate::Error::MissingWorkspace)
    }
}
