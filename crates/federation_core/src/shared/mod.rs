//! Shared module resolver: resolves declared shared names, finds which of
//! them depend on each other, orders them for loading and biases chunking
//! so a shared module's dependencies land in its chunk.

use anyhow::Context;
use hashbrown::HashMap;
use indexmap::{IndexMap, IndexSet};
use tracing::instrument;

mod chunk_bias;
pub use chunk_bias::*;
mod load_order;
pub use load_order::*;

use crate::{
    share_scope_token, shared_input_name, BuildSession, FederationError, InputOptions,
    ManualChunks, OutputOptions, PluginContext, SharedItemOptions, SharedModule,
};

pub fn register(session: &mut BuildSession, shared: &IndexMap<String, SharedItemOptions>) {
    for (name, options) in shared {
        let specifier = options.package_path.clone().unwrap_or_else(|| name.clone());
        session.shared.insert(
            name.clone(),
            SharedModule {
                version: options.version.clone(),
                required_version: options.required_version.clone(),
                ..SharedModule::new(name.clone(), specifier)
            },
        );
    }
}

/// Input-phase hook: a shared module is bundled, never external, and gets
/// a placeholder input so the bundler materializes a chunk for it.
pub fn add_shared_inputs(session: &BuildSession, options: &mut InputOptions) {
    if session.shared.is_empty() {
        return;
    }
    options
        .external
        .retain(|external| !session.shared.contains_key(external));
    for (name, module) in &session.shared {
        options
            .input
            .insert(shared_input_name(name), module.specifier.clone());
        let token = share_scope_token(name);
        if !options.external.contains(&token) {
            options.external.push(token);
        }
    }
}

/// Resolves every shared module. Any failure aborts the build.
#[instrument(skip_all)]
pub async fn resolve(session: &mut BuildSession, ctx: &dyn PluginContext) -> anyhow::Result<()> {
    for module in session.shared.values_mut() {
        let resolved = ctx
            .resolve(&module.specifier, None)
            .await
            .with_context(|| format!("fail to resolve shared module `{}`", module.name))?;
        let id = resolved.ok_or_else(|| FederationError::UnresolvedShared {
            name: module.name.clone(),
            specifier: module.specifier.clone(),
        })?;
        tracing::debug!(
            "shared {} resolved to {} (version {:?}, required {:?})",
            module.name,
            id,
            module.version,
            module.required_version
        );
        module.resolved_module_id = Some(id);
    }
    Ok(())
}

/// Walks each shared module's import graph and records the module ids it
/// reaches and the other shared modules among them. Must run after
/// [`resolve`] finished for every module.
#[instrument(skip_all)]
pub fn build_dependency_graph(session: &mut BuildSession, ctx: &dyn PluginContext) {
    let shared_by_id = session
        .shared
        .values()
        .filter_map(|module| {
            module
                .resolved_module_id
                .clone()
                .map(|id| (id, module.name.clone()))
        })
        .collect::<HashMap<_, _>>();

    for module in session.shared.values_mut() {
        let Some(entry_id) = module.resolved_module_id.clone() else {
            continue;
        };
        let mut visited: IndexSet<String> = IndexSet::new();
        let mut used_shared: IndexSet<String> = IndexSet::new();
        let mut stack = vec![entry_id.clone()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            if id != entry_id {
                if let Some(name) = shared_by_id.get(&id) {
                    if name != &module.name {
                        used_shared.insert(name.clone());
                    }
                }
            }
            if let Some(info) = ctx.module_info(&id) {
                info.imported_ids
                    .into_iter()
                    .rev()
                    .filter(|dep| !visited.contains(dep))
                    .for_each(|dep| stack.push(dep));
            }
        }
        tracing::trace!("shared {} depends on {:?}", module.name, used_shared);
        module.dependency_ids = visited;
        module.dependency_set = used_shared;
    }
}

/// Wraps a function-valued `manualChunks` so modules a shared module
/// depends on are grouped with it. Other forms are left untouched.
pub fn bias_chunking(session: &BuildSession, options: &mut OutputOptions) {
    let Some(ManualChunks::Function(inner)) = &options.manual_chunks else {
        return;
    };
    let bias = SharedChunkBias::new(
        session
            .shared
            .values()
            .map(|module| (module.name.clone(), module.dependency_ids.iter().cloned().collect())),
        inner.clone(),
    );
    options.manual_chunks = Some(ManualChunks::Function(std::sync::Arc::new(bias)));
}
