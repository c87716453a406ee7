//! The schema source boundary.
//!
//! Catalog building only ever reads a local file. Turning a version
//! reference (a branch, release, tag or commit name) into that file is the
//! job of a [`SchemaSource`]. [`LocalCache`] serves snapshots that were
//! already retrieved into a directory tree; fetching them is out of scope.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use log::debug;
use thiserror::Error;

use crate::config::SourceConfig;

/// Errors raised while resolving a version reference.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid version reference `{0}`")]
    InvalidReference(String),

    #[error("version `{version}` is not available under {}", .root.display())]
    UnknownVersion { version: String, root: PathBuf },

    #[error("snapshot {} has no schema document `{document}`", .snapshot.display())]
    MissingDocument { document: String, snapshot: PathBuf },

    #[error("cannot read snapshot directory: {0}")]
    Io(#[from] io::Error),
}

/// Resolves version references to local schema documents.
pub trait SchemaSource {
    /// Returns the path of the schema document for `version`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the version or its document is not
    /// available.
    fn resolve(&self, version: &str) -> Result<PathBuf, SourceError>;
}

/// Snapshots laid out as `<root>/<version>/<document>`.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
    document: String,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>, document: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            document: document.into(),
        }
    }

    /// Creates a cache from configuration, if a cache directory is set.
    pub fn from_config(config: &SourceConfig) -> Option<Self> {
        config
            .cache_dir()
            .map(|root| Self::new(root, config.document()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Version references with a snapshot directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be listed.
    pub fn versions(&self) -> Result<Vec<String>, SourceError> {
        let mut versions = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect::<Vec<_>>();
        versions.sort();
        Ok(versions)
    }
}

impl SchemaSource for LocalCache {
    fn resolve(&self, version: &str) -> Result<PathBuf, SourceError> {
        // A reference names exactly one directory below the root.
        let mut components = Path::new(version).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(SourceError::InvalidReference(version.to_string()));
        }

        let snapshot = self.root.join(version);
        if !snapshot.is_dir() {
            return Err(SourceError::UnknownVersion {
                version: version.to_string(),
                root: self.root.clone(),
            });
        }

        let document = snapshot.join(&self.document);
        if !document.is_file() {
            return Err(SourceError::MissingDocument {
                document: self.document.clone(),
                snapshot,
            });
        }

        debug!(version, path:? = document; "Resolved schema snapshot");
        Ok(document)
    }
}
