mod common;

use std::{fs, path::PathBuf, process::Command, sync::Arc};

use federation::{
    bundle_from_outputs, federation, log::enable_tracing_by_env, FederationError,
    FederationOptions, InputOptions, ManualChunks, Output, OutputBundle, OutputChunk,
    OutputOptions,
};
use tempfile::TempDir;
use testing_macros::fixture;

use crate::common::{chunk, code_of, entry, test_fixture, TestContext};

#[fixture("tests/fixtures/*/fixture.json")]
fn federation_fixture(path: PathBuf) {
    enable_tracing_by_env();
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(test_fixture(&path));
}

fn options(raw: &str) -> FederationOptions {
    FederationOptions::from_json_str(raw).unwrap()
}

#[test]
fn shared_chain_loads_leaves_first() {
    enable_tracing_by_env();
    let mut ctx = TestContext::with_resolved([
        ("a", "/nm/a/index.js"),
        ("b", "/nm/b/index.js"),
        ("c", "/nm/c/index.js"),
    ]);
    ctx.import("/nm/a/index.js", &["/nm/b/index.js"])
        .import("/nm/b/index.js", &["/nm/b/util.js"])
        .import("/nm/b/util.js", &["/nm/c/index.js"])
        .import("/nm/c/index.js", &[]);

    let mut compiler = federation(options(r#"{ "root": "/app", "shared": ["a", "b", "c"] }"#)).unwrap();
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(compiler.build(&mut ctx, &mut InputOptions::default(), &mut OutputOptions::default()))
        .unwrap();

    let output = compiler.generate(&mut Default::default());
    assert_eq!(output.load_order, ["c", "b", "a"]);
    assert!(output.cycles.is_empty());
    assert!(!output.is_remote());
}

#[test]
fn unresolvable_shared_fails_the_build() {
    let mut ctx = TestContext::with_resolved([("react", "/nm/react/index.js")]);
    let mut compiler =
        federation(options(r#"{ "root": "/app", "shared": ["react", "missing-lib"] }"#)).unwrap();
    let err = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(compiler.build(&mut ctx, &mut InputOptions::default(), &mut OutputOptions::default()))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FederationError>(),
        Some(FederationError::UnresolvedShared { name, specifier }) if name == "missing-lib" && specifier == "missing-lib"
    ));
}

#[test]
fn no_exposes_emit_no_remote_entry() {
    let mut ctx = TestContext::with_resolved([("react", "/nm/react/index.js")]);
    let mut input = InputOptions::default();
    let mut compiler = federation(options(r#"{ "root": "/app", "shared": ["react"] }"#)).unwrap();
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(compiler.build(&mut ctx, &mut input, &mut OutputOptions::default()))
        .unwrap();

    assert!(ctx.emitted.is_empty());
    assert_eq!(input.external, ["__rf_shareScope__${react}"]);
}

#[test]
fn remote_entry_exports_get_and_init() {
    let compiler = federation(options(
        r#"{ "root": "/app", "filename": "remote.js", "exposes": { "./Button": "./src/Button.js" } }"#,
    ))
    .unwrap();
    let source = compiler.plugin().load("__remoteEntryHelper__").unwrap();

    assert!(source.contains("export const get = (module) => {"));
    assert!(source.contains("return moduleMap[module]();"));
    assert!(source.contains("export const init = (shareScope) => {"));
    assert!(source.contains("globalThis.__rf_var__shared = shareScope;"));
    // `get` never depends on `init`: every loader is a plain dynamic import.
    assert!(source.contains("const __federation_import = (id) => import(id);"));
    assert!(source.contains("metaUrl.lastIndexOf(\"remote.js\")"));
}

#[test]
fn chunking_function_is_biased_towards_shared_modules() {
    let mut ctx = TestContext::with_resolved([("react", "/nm/react/index.js")]);
    ctx.import("/nm/react/index.js", &["/nm/react/cjs/react.js"])
        .import("/nm/react/cjs/react.js", &[]);
    let mut output = OutputOptions {
        manual_chunks: Some(ManualChunks::Function(Arc::new(|id: &str| {
            id.contains("node_modules").then(|| "vendor".to_string())
        }))),
    };
    let mut compiler = federation(options(r#"{ "root": "/app", "shared": ["react"] }"#)).unwrap();
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(compiler.build(&mut ctx, &mut InputOptions::default(), &mut output))
        .unwrap();

    let Some(ManualChunks::Function(classifier)) = &output.manual_chunks else {
        panic!("manualChunks should stay a function");
    };
    assert_eq!(classifier.classify("/nm/react/cjs/react.js").as_deref(), Some("react"));
    assert_eq!(
        classifier.classify("/app/node_modules/lodash/index.js").as_deref(),
        Some("vendor")
    );
    assert_eq!(classifier.classify("/app/src/main.js"), None);
}

fn remote_bundle() -> Vec<Output> {
    vec![
        Output::Chunk(entry(
            "remoteEntry.js",
            "remoteEntry",
            "__remoteEntryHelper__",
            "const moduleMap = {\n  \"./Button\": () => {\n    dynamicLoadingCss(\"__v__css__/app/src/Button.js\");\n    return __federation_import(\"/app/src/Button.js\");\n  },\n};\nexport { moduleMap };\n",
        )),
        Output::Chunk(OutputChunk {
            imports: vec!["assets/react-2b.js".to_string()],
            ..entry(
                "assets/Button-1a.js",
                "Button",
                "/app/src/Button.js",
                "import { useState } from './react-2b.js';\nexport const Button = () => useState(0);\n",
            )
        }),
        Output::Chunk(OutputChunk {
            is_entry: true,
            imports: vec!["assets/react-2b.js".to_string()],
            ..chunk("assets/__rf_input__react-9f.js", "__rf_input__react", "export * from './react-2b.js';\n")
        }),
        Output::Chunk(chunk("assets/react-2b.js", "react", "export const useState = (v) => v;\n")),
    ]
}

#[test]
fn generate_twice_equals_generate_once() {
    let mut ctx = TestContext::with_resolved([("react", "/nm/react/index.js")]);
    ctx.import("/nm/react/index.js", &[]);
    let mut compiler = federation(options(
        r#"{ "root": "/app", "exposes": { "./Button": "./src/Button.js" }, "shared": ["react"] }"#,
    ))
    .unwrap();
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(compiler.build(&mut ctx, &mut InputOptions::default(), &mut OutputOptions::default()))
        .unwrap();

    let mut bundle = bundle_from_outputs(remote_bundle());
    let output = compiler.generate(&mut bundle);
    let once = bundle.clone();
    compiler.generate(&mut bundle);
    assert_eq!(bundle, once);

    assert_eq!(output.remote_entry.as_deref(), Some("remoteEntry.js"));
    assert_eq!(
        output.renamed.get("assets/react-2b.js").map(String::as_str),
        Some("assets/__rf_input__react-9f.js")
    );
    assert!(!bundle.contains_key("assets/react-2b.js"));

    let button = code_of(&bundle, "assets/Button-1a.js");
    assert!(button.contains("const useState = (await __rf_fn__import(\"react\"))[\"useState\"];"));
    assert!(button.contains("{\"react\":\"./__rf_input__react-9f.js\"}"));
    assert!(!button.contains("import { useState }"));

    let remote_entry = code_of(&bundle, "remoteEntry.js");
    assert!(remote_entry.contains("__federation_import(\"./assets/Button-1a.js\")"));
    assert!(!remote_entry.contains("__v__css__"));
}

#[test]
fn shim_falls_back_to_bundled_copy_without_init() {
    let mut ctx = TestContext::with_resolved([("react", "/nm/react/index.js")]);
    let mut compiler = federation(options(
        r#"{ "root": "/app", "exposes": { "./Button": "./src/Button.js" }, "shared": ["react"] }"#,
    ))
    .unwrap();
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(compiler.build(&mut ctx, &mut InputOptions::default(), &mut OutputOptions::default()))
        .unwrap();
    let mut bundle = bundle_from_outputs(remote_bundle());
    compiler.generate(&mut bundle);

    let button = code_of(&bundle, "assets/Button-1a.js");
    // Without a shared scope the loader imports its own copy, every time.
    assert!(button.contains("const entry = shared ? shared[name] : undefined;"));
    assert!(button.contains("return import(__rf_var__moduleMap[name]);"));
    assert!(button.contains("entry.lib = await entry.get();"));
}

/// Builds a remote around the real entry helper, exposing one component
/// that reads `useState` from the shared `react`.
fn runnable_remote() -> OutputBundle {
    let mut ctx = TestContext::with_resolved([("react", "/nm/react/index.js")]);
    ctx.import("/nm/react/index.js", &[]);
    let mut compiler = federation(options(
        r#"{ "root": "/app", "exposes": { "./Button": "./src/Button.js" }, "shared": ["react"] }"#,
    ))
    .unwrap();
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(compiler.build(&mut ctx, &mut InputOptions::default(), &mut OutputOptions::default()))
        .unwrap();

    let helper = compiler.plugin().load("__remoteEntryHelper__").unwrap();
    let mut bundle = bundle_from_outputs([
        Output::Chunk(entry("remoteEntry.js", "remoteEntry", "__remoteEntryHelper__", &helper)),
        Output::Chunk(OutputChunk {
            imports: vec!["assets/react-2b.js".to_string()],
            ..entry(
                "assets/Button-1a.js",
                "Button",
                "/app/src/Button.js",
                "import { useState } from './react-2b.js';\nexport const Button = () => useState('x');\n",
            )
        }),
        Output::Chunk(OutputChunk {
            is_entry: true,
            imports: vec!["assets/react-2b.js".to_string()],
            ..chunk("assets/__rf_input__react-9f.js", "__rf_input__react", "export * from './react-2b.js';\n")
        }),
        Output::Chunk(chunk(
            "assets/react-2b.js",
            "react",
            "export const useState = (v) => 'bundled:' + v;\n",
        )),
    ]);
    compiler.generate(&mut bundle);
    bundle
}

/// Writes the bundle next to `driver` and prints what node logs, or `None`
/// when node is not installed.
fn run_with_node(bundle: &OutputBundle, driver: &str) -> Option<String> {
    if Command::new("node").arg("--version").output().is_err() {
        eprintln!("node is not installed, skip running the generated code");
        return None;
    }
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), r#"{ "type": "module" }"#).unwrap();
    for output in bundle.values() {
        let path = dir.path().join(output.file_name());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        match output {
            Output::Chunk(chunk) => fs::write(&path, &chunk.code).unwrap(),
            Output::Asset(asset) => fs::write(&path, &asset.source).unwrap(),
        }
    }
    fs::write(dir.path().join("driver.js"), driver).unwrap();

    let run = Command::new("node").arg("driver.js").current_dir(dir.path()).output().unwrap();
    assert!(
        run.status.success(),
        "node failed:\n{}",
        String::from_utf8_lossy(&run.stderr)
    );
    Some(String::from_utf8(run.stdout).unwrap().trim().to_string())
}

#[test]
fn get_twice_without_init_uses_bundled_copy() {
    let bundle = runnable_remote();
    let driver = r#"import { get } from './remoteEntry.js';
const first = await get('./Button');
const second = await get('./Button');
console.log(JSON.stringify([first.Button(), second.Button()]));
"#;
    let Some(stdout) = run_with_node(&bundle, driver) else {
        return;
    };
    assert_eq!(stdout, r#"["bundled:x","bundled:x"]"#);
}

#[test]
fn get_twice_after_init_calls_shared_factory_once() {
    let bundle = runnable_remote();
    let driver = r#"import { get, init } from './remoteEntry.js';
let calls = 0;
init({ react: { get: async () => { calls += 1; return { useState: (v) => 'host:' + v }; } } });
const first = await get('./Button');
const second = await get('./Button');
console.log(JSON.stringify([first.Button(), second.Button(), calls]));
"#;
    let Some(stdout) = run_with_node(&bundle, driver) else {
        return;
    };
    assert_eq!(stdout, r#"["host:x","host:x",1]"#);
}
