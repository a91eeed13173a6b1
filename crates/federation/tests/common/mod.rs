use std::path::Path;

use async_trait::async_trait;
use federation::{
    bundle_from_outputs, federation, EmittedChunk, FederationOptions, FederationOutput,
    InputOptions, ModuleInfo, Output, OutputBundle, OutputChunk, OutputOptions, PluginContext,
};
use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::Deserialize;

/// In-memory stand-in for the bundler: a resolver table and a module graph.
#[derive(Debug, Default)]
pub struct TestContext {
    pub resolved: HashMap<String, String>,
    pub modules: HashMap<String, Vec<String>>,
    pub emitted: Vec<EmittedChunk>,
}

impl TestContext {
    pub fn with_resolved<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            resolved: pairs
                .into_iter()
                .map(|(specifier, id)| (specifier.to_string(), id.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn import(&mut self, importer: &str, imported: &[&str]) -> &mut Self {
        self.modules.insert(
            importer.to_string(),
            imported.iter().map(|id| id.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl PluginContext for TestContext {
    async fn resolve(&self, specifier: &str, _importer: Option<&str>) -> anyhow::Result<Option<String>> {
        Ok(self.resolved.get(specifier).cloned())
    }

    fn module_info(&self, id: &str) -> Option<ModuleInfo> {
        self.modules.get(id).map(|imported_ids| ModuleInfo {
            id: id.to_string(),
            imported_ids: imported_ids.clone(),
        })
    }

    fn emit_chunk(&mut self, chunk: EmittedChunk) {
        self.emitted.push(chunk);
    }
}

pub fn chunk(file_name: &str, name: &str, code: &str) -> OutputChunk {
    OutputChunk {
        file_name: file_name.to_string(),
        name: name.to_string(),
        code: code.to_string(),
        ..Default::default()
    }
}

pub fn entry(file_name: &str, name: &str, facade: &str, code: &str) -> OutputChunk {
    OutputChunk {
        is_entry: true,
        facade_module_id: Some(facade.to_string()),
        modules: vec![facade.to_string()],
        ..chunk(file_name, name, code)
    }
}

pub fn code_of<'a>(bundle: &'a OutputBundle, file_name: &str) -> &'a str {
    bundle
        .get(file_name)
        .and_then(Output::as_chunk)
        .map(|chunk| chunk.code.as_str())
        .unwrap_or_else(|| panic!("{} is not a chunk of {:?}", file_name, bundle.keys()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Expectation {
    #[serde(default)]
    contains: Vec<String>,
    #[serde(default)]
    not_contains: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    options: FederationOptions,
    #[serde(default)]
    resolve: IndexMap<String, String>,
    #[serde(default)]
    modules: IndexMap<String, Vec<String>>,
    #[serde(default)]
    bundle: Vec<Output>,
    /// File name to the snippets its final code must or must not contain.
    #[serde(default)]
    expected: IndexMap<String, Expectation>,
    /// Files that must be gone from the final bundle.
    #[serde(default)]
    absent: Vec<String>,
    #[serde(default)]
    emitted: Option<Vec<String>>,
    #[serde(default)]
    load_order: Option<Vec<String>>,
}

pub async fn test_fixture(path: &Path) -> FederationOutput {
    let raw = std::fs::read_to_string(path).unwrap();
    let fixture: Fixture = serde_json::from_str(&raw)
        .unwrap_or_else(|err| panic!("invalid fixture {}: {}", path.display(), err));

    let mut ctx = TestContext {
        resolved: fixture.resolve.into_iter().collect(),
        modules: fixture.modules.into_iter().collect(),
        ..Default::default()
    };
    let mut compiler = federation(fixture.options).unwrap();
    compiler
        .build(&mut ctx, &mut InputOptions::default(), &mut OutputOptions::default())
        .await
        .unwrap();

    let mut bundle = bundle_from_outputs(fixture.bundle);
    let output = compiler.generate(&mut bundle);

    if let Some(emitted) = &fixture.emitted {
        assert_eq!(
            &ctx.emitted
                .iter()
                .map(|chunk| chunk.file_name.clone())
                .collect::<Vec<_>>(),
            emitted,
            "emitted chunks of {}",
            path.display()
        );
    }
    if let Some(load_order) = &fixture.load_order {
        assert_eq!(&output.load_order, load_order, "load order of {}", path.display());
    }
    for file_name in &fixture.absent {
        assert!(
            !bundle.contains_key(file_name),
            "{} should be gone from {}",
            file_name,
            path.display()
        );
    }
    for (file_name, expectation) in &fixture.expected {
        let code = code_of(&bundle, file_name);
        for snippet in &expectation.contains {
            assert!(
                code.contains(snippet.as_str()),
                "{} in {} should contain {:?}, got:\n{}",
                file_name,
                path.display(),
                snippet,
                code
            );
        }
        for snippet in &expectation.not_contains {
            assert!(
                !code.contains(snippet.as_str()),
                "{} in {} should not contain {:?}, got:\n{}",
                file_name,
                path.display(),
                snippet,
                code
            );
        }
    }
    output
}
