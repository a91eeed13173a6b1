//! Output graph rewriter: finds the real chunk of every exposed and shared
//! entry, moves shared chunks to their canonical names and propagates the
//! renames through the whole bundle.

mod locate;
pub use locate::*;
mod rename;
pub use rename::*;

use tracing::instrument;

use crate::{basename, BuildSession, OutputBundle, ReplacementMap};

/// Runs locate, rename and propagate in that order and returns every
/// rename applied to the bundle.
#[instrument(skip_all)]
pub fn rewrite_output_graph(session: &mut BuildSession, bundle: &mut OutputBundle) -> ReplacementMap {
    locate(session, bundle);
    let replacements = rename_shared_chunks(session, bundle);
    propagate(session, bundle, &replacements);
    replacements
}

/// Rewrites import lists by exact match and chunk code by exact-boundary
/// substitution. Expose paths are only rewritten inside the remote entry.
#[instrument(skip_all)]
pub fn propagate(session: &BuildSession, bundle: &mut OutputBundle, replacements: &ReplacementMap) {
    for (key, output) in bundle.iter_mut() {
        let Some(chunk) = output.as_chunk_mut() else {
            continue;
        };

        let mut local = replacements.clone();
        for import in chunk.imports.iter_mut() {
            if let Some(renamed) = replacements.get(import) {
                // Sibling chunks reference each other by file name.
                local.insert(basename(import), basename(renamed));
                *import = renamed.to_string();
            }
        }
        if !local.is_empty() {
            let code = local.apply(&chunk.code);
            if code != chunk.code {
                tracing::trace!("rewrote references in {}", key);
                chunk.code = code;
            }
        }

        if session.remote_entry.as_deref() == Some(key.as_str()) {
            chunk.code = session.expose_replacements.apply(&chunk.code);
        }
    }
}
