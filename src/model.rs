use std::collections::{BTreeMap, HashMap};

/// A parsed `KEY=VALUE` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// Line the statement started on.
    pub line: u32,
}

/// Parsed entries in the order their keys first appeared.
///
/// Assigning a key again replaces the earlier value but keeps its position.
/// The map is only filled by the parser; it is read-only to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    entries: Vec<Entry>,
    by_key: HashMap<String, usize>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.by_key
            .get(key)
            .map(|idx| self.entries[*idx].value.as_str())
    }

    pub fn get_entry(&self, key: &str) -> Option<&Entry> {
        self.by_key.get(key).map(|idx| &self.entries[*idx])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub(crate) fn insert(&mut self, entry: Entry) {
        if let Some(existing_idx) = self.by_key.get(&entry.key).copied() {
            self.entries[existing_idx] = entry;
        } else {
            self.by_key.insert(entry.key.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }
}

impl IntoIterator for EnvMap {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a EnvMap {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<EnvMap> for BTreeMap<String, String> {
    fn from(map: EnvMap) -> Self {
        map.into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect()
    }
}

impl From<EnvMap> for HashMap<String, String> {
    fn from(map: EnvMap) -> Self {
        map.into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect()
    }
}

/// Parser behavior switches.
///
/// The default accepts everything the classic dotenv grammar tolerates:
/// an `=value` line yields the empty key, and text after a closing quote
/// is left to the next statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    strict_keys: bool,
    reject_trailing_content: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with every strict check enabled.
    pub fn strict() -> Self {
        Self::new().strict_keys(true).reject_trailing_content(true)
    }

    /// Reject statements whose key is empty, such as `=value`.
    pub fn strict_keys(mut self, strict_keys: bool) -> Self {
        self.strict_keys = strict_keys;
        self
    }

    /// Reject anything but whitespace or a `#` comment after a closing quote.
    pub fn reject_trailing_content(mut self, reject_trailing_content: bool) -> Self {
        self.reject_trailing_content = reject_trailing_content;
        self
    }

    pub fn is_strict_keys(&self) -> bool {
        self.strict_keys
    }

    pub fn is_reject_trailing_content(&self) -> bool {
        self.reject_trailing_content
    }
}
