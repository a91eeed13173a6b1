use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;

mod chunk_classifier;
pub use chunk_classifier::*;

#[derive(Debug, Clone, Default)]
pub struct ModuleInfo {
    pub id: String,
    /// Statically imported module ids, in source order.
    pub imported_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreserveEntrySignatures {
    Strict,
    AllowExtension,
    ExportsOnly,
    False,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedChunk {
    pub id: String,
    pub file_name: String,
    pub preserve_signature: PreserveEntrySignatures,
}

/// The slice of the bundler's input options the federation touches.
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    pub input: IndexMap<String, String>,
    pub external: Vec<String>,
    pub preserve_entry_signatures: Option<PreserveEntrySignatures>,
}

#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub manual_chunks: Option<ManualChunks>,
}

#[derive(Clone)]
pub enum ManualChunks {
    /// Chunk name to the module ids forced into it.
    Object(IndexMap<String, Vec<String>>),
    Function(Arc<dyn ChunkClassifier>),
}

impl Debug for ManualChunks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object(groups) => f.debug_tuple("Object").field(groups).finish(),
            Self::Function(_) => f.debug_tuple("Function").field(&"...").finish(),
        }
    }
}

/// What the federation needs from the bundler while it resolves and links modules.
#[async_trait]
pub trait PluginContext: Send + Sync {
    /// Resolves a specifier to a module id, `None` when nothing matches.
    async fn resolve(&self, specifier: &str, importer: Option<&str>) -> anyhow::Result<Option<String>>;

    fn module_info(&self, id: &str) -> Option<ModuleInfo>;

    fn emit_chunk(&mut self, chunk: EmittedChunk);
}
