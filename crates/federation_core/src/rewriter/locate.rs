use indexmap::IndexMap;
use tracing::instrument;

use crate::{
    is_css, is_same_file_path, logical_name, relative_specifier, BuildSession, Output,
    OutputBundle, OutputChunk, SHARED_INPUT_PREFIX,
};

/// Pairs every code chunk with the stylesheet sharing its logical name.
///
/// When no chunk pairs exactly, every stylesheet is associated with every
/// chunk and the last stylesheet wins.
pub fn collect_module_css(bundle: &OutputBundle) -> IndexMap<String, String> {
    let (styles, chunks): (Vec<_>, Vec<_>) = bundle
        .values()
        .map(Output::file_name)
        .partition(|file_name| is_css(file_name));
    let chunks = chunks
        .into_iter()
        .filter(|file_name| bundle.get(*file_name).and_then(Output::as_chunk).is_some())
        .collect::<Vec<_>>();

    let mut module_css = IndexMap::new();
    for style in &styles {
        for chunk in &chunks {
            if logical_name(chunk) == logical_name(style) {
                module_css.insert(chunk.to_string(), style.to_string());
            }
        }
    }
    if module_css.is_empty() {
        for style in &styles {
            for chunk in &chunks {
                module_css.insert(chunk.to_string(), style.to_string());
            }
        }
    }
    module_css
}

/// Finds the chunk that holds a shared module's code. A placeholder entry
/// whose module got bundled elsewhere points at it through its imports.
fn shared_file_of<'a>(bundle: &'a OutputBundle, chunk: &'a OutputChunk, name: &str) -> Option<&'a str> {
    if !chunk.modules.is_empty() {
        return Some(chunk.file_name.as_str());
    }
    match chunk.imports.as_slice() {
        [] => None,
        [single] => Some(single.as_str()),
        imports => imports
            .iter()
            .find(|import| {
                bundle
                    .get(import.as_str())
                    .and_then(Output::as_chunk)
                    .map_or(false, |imported| imported.name == name)
            })
            .map(String::as_str),
    }
}

#[instrument(skip_all)]
pub fn locate(session: &mut BuildSession, bundle: &OutputBundle) {
    session.module_css = collect_module_css(bundle);
    tracing::trace!("module css {:?}", session.module_css);

    session.remote_entry = bundle
        .values()
        .filter_map(Output::as_chunk)
        .find(|chunk| chunk.is_entry && chunk.file_name == session.filename)
        .map(|chunk| chunk.file_name.clone());
    let remote_entry = session
        .remote_entry
        .clone()
        .unwrap_or_else(|| session.filename.clone());

    for (key, output) in bundle {
        let Some(chunk) = output.as_chunk() else {
            continue;
        };
        if !chunk.is_entry {
            continue;
        }

        if let Some(facade) = &chunk.facade_module_id {
            for expose in session.exposes.values() {
                if is_same_file_path(facade, &expose.source_path) {
                    tracing::debug!("expose {} emitted as {}", expose.public_name, key);
                    session.expose_replacements.insert(
                        expose.source_path.clone(),
                        relative_specifier(&remote_entry, &chunk.file_name),
                    );
                    session.exposed_chunks.insert(key.clone());
                }
            }
        }

        let Some(name) = chunk.name.strip_prefix(SHARED_INPUT_PREFIX) else {
            continue;
        };
        let Some(module) = session.shared.get_mut(name) else {
            continue;
        };
        match shared_file_of(bundle, chunk, name) {
            Some(file) => {
                tracing::debug!("shared {} emitted as {}", name, file);
                module.set_emitted_path(file);
            }
            None => tracing::warn!("can not find the chunk of shared module {}", name),
        }
    }
}
