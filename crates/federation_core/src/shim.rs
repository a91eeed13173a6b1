//! Runtime shim injector: exposed chunks load shared modules through the
//! shared scope handed to `init`, falling back to the bundled copy.

use indexmap::IndexMap;
use swc_core::ecma::visit::VisitWith;
use tracing::instrument;

use crate::{
    js_string, parse_module, BuildSession, FederationError, ImportBinding, Output, OutputBundle,
    SharedImportScanner, SourcePatcher, FN_IMPORT, VAR_GLOBAL, VAR_MODULE_MAP, VAR_SHARED,
};

fn loader_source(module_map: &IndexMap<String, String>) -> String {
    let entries = module_map
        .iter()
        .map(|(name, src)| format!("{}:{}", js_string(name), js_string(src)))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"
const {VAR_MODULE_MAP} = {{{entries}}};
async function {FN_IMPORT}(name) {{
  const {VAR_GLOBAL} = globalThis;
  const shared = {VAR_GLOBAL}.{VAR_SHARED};
  const entry = shared ? shared[name] : undefined;
  if (entry) {{
    if (!entry.lib) {{
      entry.lib = await entry.get();
    }}
    return entry.lib;
  }}
  return import({VAR_MODULE_MAP}[name]);
}}"#
    )
}

fn binding_source(name: &str, binding: &ImportBinding) -> String {
    let name = js_string(name);
    match binding {
        ImportBinding::Named { imported, local } => {
            format!("\nconst {local} = (await {FN_IMPORT}({name}))[{}];", js_string(imported))
        }
        ImportBinding::Default { local } => {
            format!("\nconst {local} = (await {FN_IMPORT}({name}))[\"default\"];")
        }
        ImportBinding::Namespace { local } => format!("\nconst {local} = await {FN_IMPORT}({name});"),
    }
}

/// Returns the shimmed code, or `None` when the chunk imports no shared module.
pub fn shim_chunk(
    code: &str,
    file_name: &str,
    shared_by_file_name: &IndexMap<&str, &str>,
) -> Result<Option<String>, FederationError> {
    let parsed = parse_module(code, file_name)?;
    let mut scanner = SharedImportScanner::new(shared_by_file_name);
    parsed.module.visit_with(&mut scanner);
    let Some(insert_at) = scanner.last_import_end.map(|pos| parsed.offset(pos)) else {
        return Ok(None);
    };
    if scanner.imports.is_empty() {
        return Ok(None);
    }

    let mut patcher = SourcePatcher::new(code);
    let mut module_map = IndexMap::new();
    let mut bindings = String::new();
    for import in &scanner.imports {
        let (start, end) = parsed.range(import.span);
        patcher.remove(start, end);
        module_map
            .entry(import.name.clone())
            .or_insert_with(|| import.src.clone());
        if import.bindings.is_empty() {
            bindings.push_str(&format!("\nawait {FN_IMPORT}({});", js_string(&import.name)));
        }
        for binding in &import.bindings {
            bindings.push_str(&binding_source(&import.name, binding));
        }
    }
    patcher.append_right(insert_at, loader_source(&module_map));
    patcher.append_right(insert_at, bindings);
    patcher.finish().map(Some)
}

#[instrument(skip_all)]
pub fn inject_runtime_shims(session: &BuildSession, bundle: &mut OutputBundle) {
    let shared_by_file_name = session.shared_by_file_name();
    if shared_by_file_name.is_empty() {
        return;
    }
    for key in &session.exposed_chunks {
        let Some(chunk) = bundle.get_mut(key).and_then(Output::as_chunk_mut) else {
            continue;
        };
        match shim_chunk(&chunk.code, key, &shared_by_file_name) {
            Ok(Some(code)) => {
                tracing::debug!("injected shared loader into {}", key);
                chunk.code = code;
            }
            Ok(None) => tracing::trace!("{} imports no shared module", key),
            Err(err) => tracing::error!("skip shim injection for {}: {}", key, err),
        }
    }
}
