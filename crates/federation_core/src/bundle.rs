use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Emitted files keyed by their output-root-relative path.
pub type OutputBundle = IndexMap<String, Output>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Output {
    Chunk(OutputChunk),
    Asset(OutputAsset),
}

impl Output {
    pub fn file_name(&self) -> &str {
        match self {
            Output::Chunk(chunk) => &chunk.file_name,
            Output::Asset(asset) => &asset.file_name,
        }
    }

    pub fn set_file_name(&mut self, file_name: String) {
        match self {
            Output::Chunk(chunk) => chunk.file_name = file_name,
            Output::Asset(asset) => asset.file_name = file_name,
        }
    }

    pub fn as_chunk(&self) -> Option<&OutputChunk> {
        match self {
            Output::Chunk(chunk) => Some(chunk),
            Output::Asset(_) => None,
        }
    }

    pub fn as_chunk_mut(&mut self) -> Option<&mut OutputChunk> {
        match self {
            Output::Chunk(chunk) => Some(chunk),
            Output::Asset(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputChunk {
    pub file_name: String,
    /// Logical name, i.e. the input name for entry chunks.
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub is_entry: bool,
    #[serde(default)]
    pub facade_module_id: Option<String>,
    /// File names of statically imported chunks.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Ids of the modules rendered into this chunk.
    #[serde(default)]
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputAsset {
    pub file_name: String,
    #[serde(default)]
    pub source: String,
}

/// Builds a bundle keyed by each output's own file name.
pub fn bundle_from_outputs(outputs: impl IntoIterator<Item = Output>) -> OutputBundle {
    outputs
        .into_iter()
        .map(|output| (output.file_name().to_string(), output))
        .collect()
}
