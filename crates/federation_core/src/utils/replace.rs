use indexmap::IndexMap;

/// Characters that continue a path segment or identifier. A key whose edge
/// is one of these only matches where the neighbouring character is not.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-' | '.')
}

/// Ordered `old -> new` substitutions applied with exact boundaries.
///
/// All keys are matched in a single left-to-right scan, longest key first,
/// and replaced text is never rescanned. Values must not contain a key at a
/// boundary, which holds for the canonical names the rewriter produces, so
/// applying a map twice gives the same text as applying it once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMap {
    pairs: IndexMap<String, String>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a substitution. Empty keys and identity pairs are ignored.
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        let old = old.into();
        let new = new.into();
        if old.is_empty() || old == new {
            return;
        }
        self.pairs.insert(old, new);
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.pairs.get(old).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(old, new)| (old.as_str(), new.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn apply(&self, code: &str) -> String {
        if self.pairs.is_empty() {
            return code.to_string();
        }
        let mut keys = self.iter().collect::<Vec<_>>();
        keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut output = String::with_capacity(code.len());
        let mut copied = 0;
        let mut index = 0;
        while index < code.len() {
            if let Some((old, new)) = keys.iter().find(|(old, _)| matches_at(code, index, old)) {
                output.push_str(&code[copied..index]);
                output.push_str(new);
                index += old.len();
                copied = index;
                continue;
            }
            index += code[index..].chars().next().map_or(1, char::len_utf8);
        }
        output.push_str(&code[copied..]);
        output
    }
}

fn matches_at(code: &str, at: usize, key: &str) -> bool {
    if !code[at..].starts_with(key) {
        return false;
    }
    let clean_before = !key.starts_with(is_name_char) || !code[..at].ends_with(is_name_char);
    let clean_after =
        !key.ends_with(is_name_char) || !code[at + key.len()..].starts_with(is_name_char);
    clean_before && clean_after
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        iter.into_iter().for_each(|(old, new)| map.insert(old, new));
        map
    }
}
