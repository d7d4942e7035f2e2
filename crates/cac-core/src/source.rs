//! Where configuration is read from and written to
//!
//! A [`Source`] is any side of a pull, push or diff: the local layered
//! storage, a remote service, or both merged. Every [`Storage`] is a source;
//! remote clients live outside this workspace and plug in through
//! [`Connector`].

use std::fmt;
use std::str::FromStr;

use cac_patch::{Extensions, Patch};
use cac_storage::{DirStorage, MultiStorage, Storage, StorageOptions};

use crate::config::Configuration;
use crate::error::{Error, Result};

pub type SourceOptions = StorageOptions;

pub trait Source<E: Extensions>: fmt::Display {
    fn read(&self, opts: &SourceOptions) -> Result<Patch<E>>;

    fn write(&self, patch: &Patch<E>, opts: &SourceOptions) -> Result<()>;
}

impl<S: Storage> Source<S::Ext> for S {
    fn read(&self, opts: &SourceOptions) -> Result<Patch<S::Ext>> {
        Ok(Storage::read(self, opts)?)
    }

    fn write(&self, patch: &Patch<S::Ext>, opts: &SourceOptions) -> Result<()> {
        Ok(Storage::write(self, patch, opts)?)
    }
}

/// Opens the remote source of a profile.
pub trait Connector<E: Extensions> {
    fn connect(&self, profile: &str, config: &Configuration) -> Result<Box<dyn Source<E>>>;
}

impl<E, F> Connector<E> for F
where
    E: Extensions,
    F: Fn(&str, &Configuration) -> Result<Box<dyn Source<E>>>,
{
    fn connect(&self, profile: &str, config: &Configuration) -> Result<Box<dyn Source<E>>> {
        self(profile, config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Local,
    Remote,
    /// Local layers on top of the remote
    Merged,
}

impl FromStr for SourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "merged" => Ok(Self::Merged),
            other => Err(Error::UnknownSource {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Merged => "merged",
        })
    }
}

/// A source selector of the form `[profile@]kind`, e.g. `staging@remote`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// `None` selects the active profile
    pub profile: Option<String>,
    pub kind: SourceType,
}

impl FromStr for SourceSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (profile, kind) = match s.split_once('@') {
            Some((profile, kind)) => (Some(profile.to_string()), kind),
            None => (None, s),
        };

        Ok(Self {
            profile: profile.filter(|p| !p.is_empty()),
            kind: kind.parse()?,
        })
    }
}

/// Several sources folded like [`MultiStorage`] layers: index 0 has the
/// highest precedence and receives writes.
pub struct MergedSource<E> {
    layers: Vec<Box<dyn Source<E>>>,
}

impl<E: Extensions> MergedSource<E> {
    pub fn new(layers: Vec<Box<dyn Source<E>>>) -> Result<Self> {
        if layers.is_empty() {
            return Err(cac_storage::Error::NoLayers.into());
        }
        Ok(Self { layers })
    }

    /// The local layers with `remote` appended as the lowest-precedence
    /// layer.
    pub fn with_remote<S>(local: MultiStorage<S>, remote: Box<dyn Source<E>>) -> Result<Self>
    where
        S: DirStorage<Ext = E> + 'static,
    {
        let mut layers: Vec<Box<dyn Source<E>>> = local
            .into_layers()
            .into_iter()
            .map(|layer| Box::new(layer) as Box<dyn Source<E>>)
            .collect();
        layers.push(remote);

        Self::new(layers)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<E: Extensions> Source<E> for MergedSource<E> {
    fn read(&self, opts: &SourceOptions) -> Result<Patch<E>> {
        let mut merged = Patch::default();

        for (index, layer) in self.layers.iter().enumerate().rev() {
            let patch = layer.read(opts)?;
            tracing::debug!(layer = index, source = %layer, sections = patch.data.len(), "merging source");
            merged.merge(patch);
        }

        Ok(merged.filtered(&opts.filters))
    }

    fn write(&self, patch: &Patch<E>, opts: &SourceOptions) -> Result<()> {
        match self.layers.first() {
            Some(layer) => layer.write(patch, opts),
            None => Err(cac_storage::Error::NoLayers.into()),
        }
    }
}

impl<E> fmt::Display for MergedSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "merged: [")?;
        for (index, layer) in self.layers.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{layer}")?;
        }
        write!(f, "]")
    }
}
