//! Finding override documents and putting them in application order.

use crate::document::DocumentFormat;
use crate::{EngineResult, OverrideError};
use srd_types::plugin_prefix;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which plugin, if any, a document belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Applied after every plugin-scoped document.
    Global,
    /// Applied at the plugin's position in the load order.
    Plugin(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Plugin(plugin) => f.write_str(plugin),
        }
    }
}

/// A discovered document that has not been read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub path: PathBuf,
    /// File name, used for logging and ledger attribution.
    pub name: String,
    pub format: DocumentFormat,
    pub scope: Scope,
}

impl DocumentHandle {
    /// Classifies `path`. Returns `None` unless the extension is a supported
    /// format and the file stem ends with `suffix`.
    pub fn from_path(path: &Path, suffix: &str) -> Option<Self> {
        let format = DocumentFormat::from_path(path)?;
        let name = path.file_name()?.to_str()?;
        let stem = path.file_stem()?.to_str()?;
        if !stem.ends_with(suffix) {
            return None;
        }

        let scope = match plugin_prefix(stem) {
            Some(plugin) => Scope::Plugin(plugin.to_string()),
            None => Scope::Global,
        };
        Some(Self {
            path: path.to_path_buf(),
            name: name.to_string(),
            format,
            scope,
        })
    }
}

/// Where documents come from.
pub trait DocumentSource {
    /// Lists candidate documents, in no particular order.
    fn list_documents(&self) -> EngineResult<Vec<DocumentHandle>>;

    /// Reads a document's raw bytes.
    fn read(&self, handle: &DocumentHandle) -> std::io::Result<Vec<u8>>;
}

/// Documents stored directly in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    suffix: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, suffix: &str) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirectorySource {
    fn list_documents(&self) -> EngineResult<Vec<DocumentHandle>> {
        let discovery = |source| OverrideError::Discovery {
            path: self.root.clone(),
            source,
        };

        let mut handles = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(discovery)? {
            let path = entry.map_err(discovery)?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(handle) = DocumentHandle::from_path(&path, &self.suffix) {
                handles.push(handle);
            }
        }
        debug!("Found {} documents in {:?}", handles.len(), self.root);
        Ok(handles)
    }

    fn read(&self, handle: &DocumentHandle) -> std::io::Result<Vec<u8>> {
        std::fs::read(&handle.path)
    }
}

/// Orders documents for application: plugin-scoped documents grouped by
/// their plugin's position in `load_order`, then global documents. Each
/// group is sorted by file name.
///
/// A scoped document belongs to the longest loaded plugin name its file name
/// starts with (case-insensitive), and its scope is rewritten to that name.
/// Scoped documents matching no loaded plugin are dropped.
pub fn order_documents(mut handles: Vec<DocumentHandle>, load_order: &[String]) -> Vec<DocumentHandle> {
    handles.sort_by(|a, b| a.name.cmp(&b.name));

    let mut scoped = Vec::new();
    let mut global = Vec::new();
    for mut handle in handles {
        if handle.scope == Scope::Global {
            global.push(handle);
            continue;
        }
        match owning_plugin(&handle.name, load_order) {
            Some((position, plugin)) => {
                handle.scope = Scope::Plugin(plugin.clone());
                scoped.push((position, handle));
            }
            None => debug!("Skipping {}: {} is not loaded", handle.name, handle.scope),
        }
    }

    // stable: keeps file name order within a plugin
    scoped.sort_by_key(|(position, _)| *position);
    scoped
        .into_iter()
        .map(|(_, handle)| handle)
        .chain(global)
        .collect()
}

/// Load order position and name of the longest plugin `name` starts with.
fn owning_plugin<'a>(name: &str, load_order: &'a [String]) -> Option<(usize, &'a String)> {
    let name = name.to_ascii_lowercase();
    load_order
        .iter()
        .enumerate()
        .filter(|(_, plugin)| !plugin.is_empty() && name.starts_with(&plugin.to_ascii_lowercase()))
        .max_by_key(|(_, plugin)| plugin.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(name: &str) -> DocumentHandle {
        DocumentHandle::from_path(Path::new(name), "_SRD").unwrap()
    }

    #[test]
    fn classifies_scope_from_stem() {
        assert_eq!(handle("A_SRD.json").scope, Scope::Global);
        assert_eq!(handle("PluginY.esp_SRD.json").scope, Scope::Plugin("PluginY.esp".into()));
        assert_eq!(handle("Dawnguard.ESM_weapons_SRD.yaml").scope, Scope::Plugin("Dawnguard.ESM".into()));
    }

    #[test]
    fn requires_suffix_and_known_extension() {
        assert!(DocumentHandle::from_path(Path::new("A.json"), "_SRD").is_none());
        assert!(DocumentHandle::from_path(Path::new("A_SRD.txt"), "_SRD").is_none());
        assert!(DocumentHandle::from_path(Path::new("A_SRD_old.json"), "_SRD").is_none());
        assert_eq!(handle("A_SRD.jsonc").format, DocumentFormat::Json);
        assert_eq!(handle("A_SRD.yml").format, DocumentFormat::Yaml);
    }

    #[test]
    fn scoped_first_in_load_order_then_global() {
        let handles = vec![
            handle("Z_SRD.json"),
            handle("B.esp_SRD.json"),
            handle("A_SRD.json"),
            handle("A.esm_x_SRD.json"),
            handle("A.esm_SRD.json"),
            handle("Missing.esp_SRD.json"),
        ];
        let load_order = vec!["a.esm".to_string(), "B.esp".to_string()];
        let names: Vec<_> = order_documents(handles, &load_order)
            .into_iter()
            .map(|handle| handle.name)
            .collect();
        assert_eq!(
            names,
            vec!["A.esm_SRD.json", "A.esm_x_SRD.json", "B.esp_SRD.json", "A_SRD.json", "Z_SRD.json"]
        );
    }

    #[test]
    fn owner_is_matched_against_load_order() {
        let handles = vec![handle("Sounds.Esperanto.esp_SRD.json")];
        assert_eq!(handles[0].scope, Scope::Plugin("Sounds.Esp".into()));

        let load_order = vec!["Sounds.Esperanto.esp".to_string()];
        let ordered = order_documents(handles, &load_order);
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].scope, Scope::Plugin("Sounds.Esperanto.esp".into()));
    }

    #[test]
    fn longest_loaded_plugin_prefix_wins() {
        let handles = vec![handle("Sounds.esp2.esp_SRD.json"), handle("sounds.ESP_SRD.json")];
        let load_order = vec!["Sounds.esp2.esp".to_string(), "Sounds.esp".to_string()];
        let scopes: Vec<_> = order_documents(handles, &load_order)
            .into_iter()
            .map(|handle| (handle.name, handle.scope))
            .collect();
        assert_eq!(
            scopes,
            vec![
                ("Sounds.esp2.esp_SRD.json".to_string(), Scope::Plugin("Sounds.esp2.esp".into())),
                ("sounds.ESP_SRD.json".to_string(), Scope::Plugin("Sounds.esp".into())),
            ]
        );
    }
}
