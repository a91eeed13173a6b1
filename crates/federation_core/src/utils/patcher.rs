use crate::FederationError;

#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    content: String,
}

/// Span edits recorded against the original text and applied in one pass,
/// so earlier edits never shift the offsets of later ones.
#[derive(Debug)]
pub struct SourcePatcher<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> SourcePatcher<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: vec![],
        }
    }

    pub fn overwrite(&mut self, start: usize, end: usize, content: impl Into<String>) {
        self.edits.push(Edit {
            start,
            end,
            content: content.into(),
        });
    }

    pub fn remove(&mut self, start: usize, end: usize) {
        self.overwrite(start, end, String::new());
    }

    /// Inserts after `at`; insertions at the same offset keep their call order.
    pub fn append_right(&mut self, at: usize, content: impl Into<String>) {
        self.overwrite(at, at, content);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn finish(mut self) -> Result<String, FederationError> {
        self.edits.sort_by_key(|edit| (edit.start, edit.end));
        let mut output = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for edit in &self.edits {
            if edit.start < cursor || self.source.get(edit.start..edit.end).is_none() {
                return Err(FederationError::OverlappingEdit {
                    start: edit.start,
                    end: edit.end,
                });
            }
            output.push_str(&self.source[cursor..edit.start]);
            output.push_str(&edit.content);
            cursor = edit.end;
        }
        output.push_str(&self.source[cursor..]);
        Ok(output)
    }
}
