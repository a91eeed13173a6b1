use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::FederationError;

fn default_filename() -> String {
    "remoteEntry.js".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederationOptions {
    /// Public file name of the emitted remote entry.
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default)]
    pub exposes: IndexMap<String, ExposeItem>,
    #[serde(default)]
    pub shared: SharedConfig,
    /// Directory exposed paths are resolved against. Defaults to the working directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl Default for FederationOptions {
    fn default() -> Self {
        Self {
            filename: default_filename(),
            exposes: Default::default(),
            shared: Default::default(),
            root: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExposeItem {
    Path(String),
    Detailed(ExposeDetail),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExposeDetail {
    pub import: ImportPaths,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImportPaths {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SharedConfig {
    List(Vec<SharedListItem>),
    Map(IndexMap<String, SharedItemOptions>),
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::List(vec![])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SharedListItem {
    Name(String),
    Named {
        name: String,
        #[serde(flatten)]
        options: SharedItemOptions,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedItemOptions {
    /// Specifier handed to the resolver instead of the shared name.
    #[serde(default)]
    pub package_path: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub required_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedExpose {
    /// Path as written in the options, relative to `root` unless absolute.
    pub import: String,
    /// Name of the build input generated for this expose.
    pub input_name: String,
}

#[derive(Debug, Clone)]
pub struct NormalizedFederationOptions {
    pub filename: String,
    pub root: PathBuf,
    pub exposes: IndexMap<String, NormalizedExpose>,
    pub shared: IndexMap<String, SharedItemOptions>,
}

impl FederationOptions {
    pub fn from_json_str(raw: &str) -> Result<Self, FederationError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn normalize(self) -> Result<NormalizedFederationOptions, FederationError> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };

        let exposes = self
            .exposes
            .into_iter()
            .map(|(name, item)| {
                let (import, explicit_name) = match item {
                    ExposeItem::Path(import) => (Some(import), None),
                    ExposeItem::Detailed(ExposeDetail { import, name }) => match import {
                        ImportPaths::One(import) => (Some(import), name),
                        ImportPaths::Many(imports) => (imports.into_iter().next(), name),
                    },
                };
                let import = import
                    .filter(|import| !import.trim().is_empty())
                    .ok_or_else(|| FederationError::MalformedExpose {
                        name: name.clone(),
                        reason: "`import` must name a module".to_string(),
                    })?;
                let input_name = explicit_name.unwrap_or_else(|| remove_non_letter(&name));
                if input_name.is_empty() {
                    return Err(FederationError::MalformedExpose {
                        name,
                        reason: "can not derive an input name, set `name` explicitly".to_string(),
                    });
                }
                Ok((name, NormalizedExpose { import, input_name }))
            })
            .collect::<Result<IndexMap<_, _>, FederationError>>()?;

        let shared = match self.shared {
            SharedConfig::List(items) => items
                .into_iter()
                .map(|item| match item {
                    SharedListItem::Name(name) => (name, SharedItemOptions::default()),
                    SharedListItem::Named { name, options } => (name, options),
                })
                .collect(),
            SharedConfig::Map(map) => map,
        };

        Ok(NormalizedFederationOptions {
            filename: self.filename,
            root,
            exposes,
            shared,
        })
    }
}

fn remove_non_letter(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}
