/// Callable contract of a function-valued `manualChunks` option.
pub trait ChunkClassifier: Send + Sync {
    fn classify(&self, module_id: &str) -> Option<String>;
}

impl<F> ChunkClassifier for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn classify(&self, module_id: &str) -> Option<String> {
        self(module_id)
    }
}
