//! Pull, push and diff over the configured sources

use std::path::Path;

use cac_diff::DiffOptions;
use cac_storage::{DirStorage, DryStorage, MultiStorage};
use cac_template::Renderer;

use crate::config::{Configuration, DEFAULT_PROFILE, RootConfiguration};
use crate::error::{Error, Result};
use crate::source::{Connector, MergedSource, Source, SourceOptions, SourceSpec, SourceType};
use crate::validator::Validator;

/// The wiring of one invocation: the active profile, the local storage type
/// `S` (server or tenant), and the optional remote and validator.
pub struct Application<S: DirStorage> {
    root: RootConfiguration,
    profile: String,
    config: Configuration,
    renderer: Renderer,
    connector: Option<Box<dyn Connector<S::Ext>>>,
    validator: Option<Box<dyn Validator<S::Ext>>>,
}

impl<S: DirStorage + 'static> Application<S> {
    pub fn new(root: RootConfiguration, profile: &str, renderer: Renderer) -> Result<Self> {
        let profile = if profile.is_empty() {
            DEFAULT_PROFILE
        } else {
            profile
        };
        let config = root.for_profile(profile)?.clone();

        tracing::info!(profile, "Initiated application");
        Ok(Self {
            root,
            profile: profile.to_string(),
            config,
            renderer,
            connector: None,
            validator: None,
        })
    }

    /// Load the configuration file and select `profile`.
    pub fn load(path: &Path, profile: &str, renderer: Renderer) -> Result<Self> {
        Self::new(RootConfiguration::load(path)?, profile, renderer)
    }

    pub fn with_connector(mut self, connector: impl Connector<S::Ext> + 'static) -> Self {
        self.connector = Some(Box::new(connector));
        self
    }

    pub fn with_validator(mut self, validator: impl Validator<S::Ext> + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The local layered storage of the active profile.
    pub fn storage(&self) -> Result<MultiStorage<S>> {
        self.local(self.config())
    }

    /// Open the source described by `spec` (`[profile@]local|remote|merged`).
    pub fn pick_source(&self, spec: &str) -> Result<Box<dyn Source<S::Ext>>> {
        let spec: SourceSpec = spec.parse()?;
        let profile = spec.profile.as_deref().unwrap_or(&self.profile);
        let config = self.root.for_profile(profile)?;

        tracing::debug!(profile, source = %spec.kind, "Picking source");

        let source: Box<dyn Source<S::Ext>> = match spec.kind {
            SourceType::Local => Box::new(self.local(config)?),
            SourceType::Remote => self.remote(profile, config)?,
            SourceType::Merged => Box::new(MergedSource::with_remote(
                self.local(config)?,
                self.remote(profile, config)?,
            )?),
        };
        Ok(source)
    }

    /// Copy the remote configuration into the local storage.
    pub fn pull(&self, opts: &SourceOptions) -> Result<()> {
        let remote = self.remote(&self.profile, self.config())?;
        let storage = self.storage()?;

        tracing::info!(workspace = ?opts.workspace, remote = %remote, "Pulling configuration");
        let patch = remote.read(opts)?;
        Source::write(&storage, &patch, opts)?;

        tracing::info!(storage = %storage, "Pulled configuration");
        Ok(())
    }

    /// Validate the local configuration and send it to the remote, or to
    /// `dry_run` (`-`, a file or a directory) instead.
    pub fn push(&self, opts: &SourceOptions, dry_run: Option<&str>) -> Result<()> {
        let patch = Source::read(&self.storage()?, opts)?;

        match &self.validator {
            Some(validator) => validator.validate(&patch)?,
            None => tracing::debug!("No validator configured, skipping validation"),
        }

        if let Some(out) = dry_run {
            tracing::info!(out, "Dry run enabled, writing configuration instead of pushing");
            let dry = DryStorage::<S>::new(out, &self.renderer)?;
            return Source::write(&dry, &patch, opts);
        }

        let remote = self.remote(&self.profile, self.config())?;
        remote.write(&patch, opts)?;

        tracing::info!(remote = %remote, mode = ?opts.mode, "Pushed configuration");
        Ok(())
    }

    /// Compare two sources, each given as `[profile@]kind`.
    pub fn diff(
        &self,
        source: &str,
        target: &str,
        opts: &SourceOptions,
        diff: &DiffOptions,
    ) -> Result<String> {
        let source = self.pick_source(source)?;
        let target = self.pick_source(target)?;

        tracing::info!(source = %source, target = %target, "Comparing configuration");
        let (old, new) = (source.read(opts)?, target.read(opts)?);

        Ok(cac_diff::diff(&old.data, &new.data, diff)?)
    }

    fn local(&self, config: &Configuration) -> Result<MultiStorage<S>> {
        Ok(MultiStorage::new(&config.storage, &self.renderer)?)
    }

    fn remote(&self, profile: &str, config: &Configuration) -> Result<Box<dyn Source<S::Ext>>> {
        match &self.connector {
            Some(connector) => connector.connect(profile, config),
            None => Err(Error::NoRemote {
                profile: profile.to_string(),
            }),
        }
    }
}
