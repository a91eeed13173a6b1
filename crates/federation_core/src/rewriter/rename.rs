use tracing::instrument;

use crate::{
    basename, join_file, share_scope_token, shared_input_name, BuildSession, Output,
    OutputBundle, ReplacementMap, SHARED_INPUT_PREFIX,
};

/// Moves every located shared chunk to its canonical `__rf_input__` slot and
/// records the resulting renames, plus the share-scope token of each module.
#[instrument(skip_all)]
pub fn rename_shared_chunks(session: &mut BuildSession, bundle: &mut OutputBundle) -> ReplacementMap {
    let mut replacements = ReplacementMap::new();

    for module in session.shared.values_mut() {
        let Some(path) = module.emitted_file_path.clone() else {
            tracing::trace!("shared {} has no emitted chunk", module.name);
            continue;
        };

        if !basename(&path).starts_with(SHARED_INPUT_PREFIX) {
            let placeholder = shared_input_name(&module.name);
            let file_name = bundle
                .values()
                .filter_map(Output::as_chunk)
                .filter(|chunk| chunk.name == placeholder)
                .map(|chunk| basename(&chunk.file_name))
                .find(|file_name| file_name.starts_with(SHARED_INPUT_PREFIX))
                .map(str::to_string)
                .unwrap_or_else(|| format!("{placeholder}.js"));
            let canonical = join_file(module.emitted_file_dir.as_deref().unwrap_or("."), &file_name);

            if bundle.shift_remove(&canonical).is_some() {
                tracing::trace!("drop stale chunk {}", canonical);
            }
            if let Some((index, _, mut output)) = bundle.shift_remove_full(&path) {
                output.set_file_name(canonical.clone());
                bundle.shift_insert(index.min(bundle.len()), canonical.clone(), output);
                tracing::debug!("rename shared {}: {} -> {}", module.name, path, canonical);
                replacements.insert(path.clone(), canonical.clone());
                module.set_emitted_path(&canonical);
            } else {
                tracing::warn!("chunk {} of shared {} is gone", path, module.name);
            }
        }

        if let Some(file_name) = &module.emitted_file_name {
            replacements.insert(share_scope_token(&module.name), format!("./{file_name}"));
        }
    }

    replacements
}
