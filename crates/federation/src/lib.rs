use federation_core::shared::LoadOrder;
pub use federation_core::*;
use indexmap::{IndexMap, IndexSet};

pub struct Federation {
    plugin: FederationPlugin,
    load_order: LoadOrder,
}

impl Federation {
    /// Input phase: registers the extra inputs, emits the remote entry,
    /// resolves shared modules and wires the chunking bias.
    pub async fn build(
        &mut self,
        ctx: &mut dyn PluginContext,
        input: &mut InputOptions,
        output: &mut OutputOptions,
    ) -> anyhow::Result<()> {
        self.plugin.options(input);
        self.plugin.build_start(ctx).await?;
        self.load_order = self.plugin.output_options(&*ctx, output);

        tracing::trace!("session {:#?}", self.plugin.session());
        Ok(())
    }

    /// Output phase over the bundle the bundler emitted.
    pub fn generate(&mut self, bundle: &mut OutputBundle) -> FederationOutput {
        let replacements = self.plugin.generate_bundle(bundle);
        let session = self.plugin.session();

        tracing::trace!("session {:#?}", session);
        FederationOutput {
            load_order: self.load_order.order.clone(),
            cycles: self.load_order.cycles.clone(),
            exposed_chunks: session.exposed_chunks.clone(),
            renamed: replacements
                .iter()
                // Share-scope tokens are not files.
                .filter(|(old, _)| !old.starts_with("__rf_shareScope__"))
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .collect(),
            remote_entry: session.remote_entry.clone(),
        }
    }

    pub fn plugin(&self) -> &FederationPlugin {
        &self.plugin
    }
}

pub fn federation(options: FederationOptions) -> anyhow::Result<Federation> {
    Ok(Federation {
        plugin: FederationPlugin::new(options.normalize()?),
        load_order: LoadOrder::default(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FederationOutput {
    pub load_order: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    /// Bundle keys of the chunks exposed modules were emitted as.
    pub exposed_chunks: IndexSet<String>,
    /// Shared chunk file renames, old to new.
    pub renamed: IndexMap<String, String>,
    pub remote_entry: Option<String>,
}

impl FederationOutput {
    pub fn is_remote(&self) -> bool {
        self.remote_entry.is_some()
    }
}
