use tracing::instrument;

use crate::{
    exposes, inject_runtime_shims, rewrite_css_side_loads, rewrite_output_graph, shared,
    BuildSession, FederationError, FederationOptions, InputOptions, NormalizedFederationOptions,
    OutputBundle, OutputOptions, PluginContext, ReplacementMap, REMOTE_ENTRY_HELPER_ID,
};

/// Bundler hooks of the federation, in the order the bundler calls them:
/// [`options`](Self::options), [`build_start`](Self::build_start),
/// [`output_options`](Self::output_options) and
/// [`generate_bundle`](Self::generate_bundle).
#[derive(Debug)]
pub struct FederationPlugin {
    session: BuildSession,
}

impl FederationPlugin {
    pub fn new(options: NormalizedFederationOptions) -> Self {
        let mut session = BuildSession::from_options(&options);
        exposes::register(&mut session, &options.exposes);
        shared::register(&mut session, &options.shared);
        tracing::debug!(
            "federation with {} exposes and {} shared modules",
            session.exposes.len(),
            session.shared.len()
        );
        Self { session }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, FederationError> {
        Ok(Self::new(FederationOptions::from_json_str(raw)?.normalize()?))
    }

    pub fn name(&self) -> &'static str {
        "federation"
    }

    pub fn session(&self) -> &BuildSession {
        &self.session
    }

    pub fn options(&self, options: &mut InputOptions) {
        shared::add_shared_inputs(&self.session, options);
        if !self.session.exposes.is_empty() {
            exposes::add_expose_inputs(&self.session, options);
        }
    }

    pub fn resolve_id(&self, id: &str) -> Option<String> {
        (id == REMOTE_ENTRY_HELPER_ID).then(|| id.to_string())
    }

    pub fn load(&self, id: &str) -> Option<String> {
        (id == REMOTE_ENTRY_HELPER_ID).then(|| exposes::generate_entry_helper_source(&self.session))
    }

    #[instrument(skip_all)]
    pub async fn build_start(&mut self, ctx: &mut dyn PluginContext) -> anyhow::Result<()> {
        exposes::emit_entry_helper(&self.session, ctx);
        shared::resolve(&mut self.session, &*ctx).await
    }

    /// Needs every shared module resolved, see [`build_start`](Self::build_start).
    #[instrument(skip_all)]
    pub fn output_options(
        &mut self,
        ctx: &dyn PluginContext,
        options: &mut OutputOptions,
    ) -> shared::LoadOrder {
        shared::build_dependency_graph(&mut self.session, ctx);
        let load_order = shared::compute_load_priority(&mut self.session);
        shared::bias_chunking(&self.session, options);
        load_order
    }

    /// Rewrites the finished bundle in place and returns the renames applied.
    #[instrument(skip_all)]
    pub fn generate_bundle(&mut self, bundle: &mut OutputBundle) -> ReplacementMap {
        let replacements = rewrite_output_graph(&mut self.session, bundle);
        inject_runtime_shims(&self.session, bundle);
        rewrite_css_side_loads(&self.session, bundle);
        replacements
    }
}
