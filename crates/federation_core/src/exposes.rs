//! Expose registry: records the exposed modules, synthesizes the
//! remote-entry helper and adds the build inputs that give every exposed
//! module its own chunk.

use std::fmt::Write;

use indexmap::IndexMap;
use tracing::instrument;

use crate::{
    expose_marker, js_string, normalize_path, BuildSession, EmittedChunk, ExposedModule, InputOptions,
    NormalizedExpose, PluginContext, PreserveEntrySignatures, DYNAMIC_LOADING_CSS,
    DYNAMIC_LOADING_CSS_PREFIX, IMPORT_ALIAS, REMOTE_ENTRY_HELPER_ID, VAR_SHARED,
};

pub fn register(session: &mut BuildSession, exposes: &IndexMap<String, NormalizedExpose>) {
    for (public_name, expose) in exposes {
        let source_path = normalize_path(&session.root.join(&expose.import));
        tracing::debug!("expose {} -> {}", public_name, source_path);
        session.externals.push(expose_marker(public_name));
        session.exposes.insert(
            public_name.clone(),
            ExposedModule {
                public_name: public_name.clone(),
                source_path,
                generated_entry_id: expose.input_name.clone(),
            },
        );
    }
}

/// Input-phase hook: one input per exposed module, plus the externals
/// collected while registering.
pub fn add_expose_inputs(session: &BuildSession, options: &mut InputOptions) {
    options.preserve_entry_signatures = Some(PreserveEntrySignatures::Strict);
    for expose in session.exposes.values() {
        options
            .input
            .insert(expose.generated_entry_id.clone(), expose.source_path.clone());
    }
    for external in &session.externals {
        if !options.external.contains(external) {
            options.external.push(external.clone());
        }
    }
}

pub fn generate_entry_helper_source(session: &BuildSession) -> String {
    let mut module_map = String::new();
    for expose in session.exposes.values() {
        let source_path = js_string(&expose.source_path);
        let css_placeholder = js_string(&format!("{DYNAMIC_LOADING_CSS_PREFIX}{}", expose.source_path));
        // Writing into a String can not fail.
        let _ = write!(
            module_map,
            "\n  {}: () => {{\n    {DYNAMIC_LOADING_CSS}({css_placeholder});\n    return {IMPORT_ALIAS}({source_path});\n  }},",
            js_string(&expose.public_name),
        );
    }
    let filename = js_string(&session.filename);

    format!(
        r#"const {IMPORT_ALIAS} = (id) => import(id);
const moduleMap = {{{module_map}
}};
export const {DYNAMIC_LOADING_CSS} = (cssFilePath) => {{
  const metaUrl = import.meta.url;
  if (typeof metaUrl == 'undefined') {{
    console.warn('The remote style takes effect only when the build target supports import.meta (es2020 or higher).');
    return;
  }}
  const curUrl = metaUrl.substring(0, metaUrl.lastIndexOf({filename}));
  const element = document.head.appendChild(document.createElement('link'));
  element.href = curUrl + cssFilePath;
  element.rel = 'stylesheet';
}};
export const get = (module) => {{
  if (!moduleMap[module]) {{
    return Promise.reject(new Error('Can not find remote module ' + module));
  }}
  return moduleMap[module]();
}};
export const init = (shareScope) => {{
  globalThis.{VAR_SHARED} = shareScope;
}};
"#
    )
}

/// Registers the remote entry as an extra build entry. Nothing is emitted
/// when no module is exposed.
#[instrument(skip_all)]
pub fn emit_entry_helper(session: &BuildSession, ctx: &mut dyn PluginContext) {
    if session.exposes.is_empty() {
        tracing::debug!("no exposed modules, skip emitting {}", session.filename);
        return;
    }
    ctx.emit_chunk(EmittedChunk {
        id: REMOTE_ENTRY_HELPER_ID.to_string(),
        file_name: session.filename.clone(),
        preserve_signature: PreserveEntrySignatures::Strict,
    });
}
