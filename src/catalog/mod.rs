use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const BUILTIN_MODULES: &str = include_str!("builtin/modules.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoKind {
    EmbeddedStream,
    File,
}

/// Exactly one playable reference per module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoRef {
    EmbeddedStream { url: String },
    File { url: String },
}

impl VideoRef {
    pub fn kind(&self) -> VideoKind {
        match self {
            Self::EmbeddedStream { .. } => VideoKind::EmbeddedStream,
            Self::File { .. } => VideoKind::File,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::EmbeddedStream { url } | Self::File { url } => url.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Document,
    Spreadsheet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    pub video: VideoRef,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog contains no modules")]
    Empty,

    #[error("duplicate module id: {id}")]
    DuplicateId { id: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse module list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable, ordered, non-empty list of course modules with unique ids.
///
/// Order is significant: it defines next/previous adjacency and the progress
/// percentage reported by [`crate::navigation::NavigationState`].
#[derive(Debug, Clone)]
pub struct ModuleCatalog {
    modules: Vec<Module>,
}

impl ModuleCatalog {
    pub fn new(modules: Vec<Module>) -> Result<Self, CatalogError> {
        if modules.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = BTreeSet::new();
        for module in &modules {
            if !seen.insert(module.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: module.id.clone(),
                });
            }
        }

        Ok(Self { modules })
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let modules: Vec<Module> = serde_json::from_str(raw)?;
        Self::new(modules)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_MODULES)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn get(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    pub fn first(&self) -> &Module {
        // Non-empty is checked in `new`.
        &self.modules[0]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.modules.iter().position(|module| module.id == id)
    }
}

/// Loads the catalog override at `path` when configured, falling back to the
/// built-in modules if the override is unusable.
pub fn load(path: Option<&Path>) -> Result<ModuleCatalog, CatalogError> {
    if let Some(path) = path {
        match ModuleCatalog::from_file(path) {
            Ok(catalog) => {
                debug!(
                    "Loaded {} modules from {}",
                    catalog.len(),
                    path.display()
                );
                return Ok(catalog);
            }
            Err(err) => warn!("Ignoring catalog override: {err}"),
        }
    }

    ModuleCatalog::builtin()
}
