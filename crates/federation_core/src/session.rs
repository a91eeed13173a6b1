use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};

use crate::{basename, dirname, NormalizedFederationOptions, ReplacementMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposedModule {
    pub public_name: String,
    /// Absolute, forward-slash path of the exposed source module.
    pub source_path: String,
    /// Name of the build input that gives this module its own chunk.
    pub generated_entry_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedModule {
    pub name: String,
    /// Specifier handed to the resolver.
    pub specifier: String,
    pub version: Option<String>,
    pub required_version: Option<String>,
    pub resolved_module_id: Option<String>,
    /// Every module id reachable from `resolved_module_id`, itself included.
    pub dependency_ids: IndexSet<String>,
    /// Names of the other shared modules reachable from this one.
    pub dependency_set: IndexSet<String>,
    pub emitted_file_name: Option<String>,
    pub emitted_file_dir: Option<String>,
    pub emitted_file_path: Option<String>,
}

impl SharedModule {
    pub fn new(name: impl Into<String>, specifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specifier: specifier.into(),
            ..Default::default()
        }
    }

    pub fn set_emitted_path(&mut self, path: &str) {
        self.emitted_file_name = Some(basename(path).to_string());
        self.emitted_file_dir = Some(dirname(path).to_string());
        self.emitted_file_path = Some(path.to_string());
    }
}

/// State threaded through every phase of one federation build.
#[derive(Debug, Default)]
pub struct BuildSession {
    pub filename: String,
    pub root: PathBuf,
    pub exposes: IndexMap<String, ExposedModule>,
    /// Shared modules in declaration order, then in load order once computed.
    pub shared: IndexMap<String, SharedModule>,
    /// Ids the bundler must treat as external.
    pub externals: Vec<String>,
    pub load_order: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    /// Bundle keys of the chunks emitted for exposed modules.
    pub exposed_chunks: IndexSet<String>,
    /// Code chunk file name to its stylesheet.
    pub module_css: IndexMap<String, String>,
    pub remote_entry: Option<String>,
    /// Expose source path to the specifier of its chunk, seen from the remote entry.
    pub expose_replacements: ReplacementMap,
}

impl BuildSession {
    pub fn new(filename: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn from_options(options: &NormalizedFederationOptions) -> Self {
        Self::new(options.filename.clone(), options.root.clone())
    }

    /// Shared name keyed by the emitted file name recorded for it.
    pub fn shared_by_file_name(&self) -> IndexMap<&str, &str> {
        self.shared
            .values()
            .filter_map(|module| {
                module
                    .emitted_file_name
                    .as_deref()
                    .map(|file_name| (file_name, module.name.as_str()))
            })
            .collect()
    }
}
