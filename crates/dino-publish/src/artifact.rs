//! Materialized output files.

use std::path::{Path, PathBuf};

/// One output file: a name relative to the staging root plus its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    name: String,
    contents: Vec<u8>,
    content_type: String,
}

impl Artifact {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
            content_type: content_type.into(),
        }
    }

    /// File name, also used as the object key when uploading.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// MIME type sent along with the upload.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Ordered output of one materialization pass.
///
/// Artifacts are written under `root` before the set is handed to a
/// publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    root: PathBuf,
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            artifacts: Vec::new(),
        }
    }

    /// Staging directory the artifacts were written to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Append an artifact.
    pub fn push(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    /// Insert an artifact before all others.
    pub fn prepend(&mut self, artifact: Artifact) {
        self.artifacts.insert(0, artifact);
    }

    /// Absolute path of `artifact` under the staging root.
    #[must_use]
    pub fn path_of(&self, artifact: &Artifact) -> PathBuf {
        self.root.join(&artifact.name)
    }

    /// Find an artifact by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    /// Artifact names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(Artifact::name).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.artifacts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl<'a> IntoIterator for &'a ArtifactSet {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}

/// Content type for a generated artifact, by extension.
#[must_use]
pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("html") => "text/html; charset=utf-8",
        Some("xml") => "application/rss+xml; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
