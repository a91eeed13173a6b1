use std::sync::Arc;

use hashbrown::HashSet;

use crate::ChunkClassifier;

/// Puts a module into the chunk of the first shared module, in load order,
/// that reaches it. Everything else goes to the user's classifier.
pub struct SharedChunkBias {
    groups: Vec<(String, HashSet<String>)>,
    inner: Arc<dyn ChunkClassifier>,
}

impl SharedChunkBias {
    pub fn new(
        groups: impl IntoIterator<Item = (String, HashSet<String>)>,
        inner: Arc<dyn ChunkClassifier>,
    ) -> Self {
        Self {
            groups: groups.into_iter().collect(),
            inner,
        }
    }
}

impl ChunkClassifier for SharedChunkBias {
    fn classify(&self, module_id: &str) -> Option<String> {
        self.groups
            .iter()
            .find(|(_, ids)| ids.contains(module_id))
            .map(|(name, _)| name.clone())
            .or_else(|| self.inner.classify(module_id))
    }
}
