use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Percent-encoding set for routing-header values: resource names stay
/// readable (`/` and `:` literal), everything else reserved is escaped.
const ROUTING_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/')
    .remove(b':');

pub(crate) fn encode_routing_value(raw: &str) -> String {
    utf8_percent_encode(raw, ROUTING_VALUE).to_string()
}

/// One call-metadata pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(key: String, value: String) -> Self {
        Self { key, value }
    }

    /// Keys follow the binary transport's grammar so one list serves both
    /// wires; values must be printable ASCII without CR/LF.
    pub fn is_valid(&self) -> bool {
        let key_ok = !self.key.is_empty()
            && self
                .key
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'-' | b'_' | b'.'));
        let value_ok = self.value.bytes().all(|b| (0x20..0x7f).contains(&b));
        key_ok && value_ok
    }
}

/// Ordered call metadata.
///
/// The list is append-only: the pipeline extends it as the request descends
/// (caller entries, interceptor additions, routing pairs) and never reorders
/// or removes what was already there.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallMetadata(Vec<MetadataEntry>);

impl CallMetadata {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one pair. Panics if the entry is not a valid header pair;
    /// this is fail-fast for caller bugs, mirrored after header handling
    /// elsewhere in the stack.
    ///
    /// # Panics
    /// Panics when the key is not a lowercase ASCII token or the value
    /// contains non-printable characters.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let entry = MetadataEntry::new(key.into(), value.into());
        assert!(
            entry.is_valid(),
            "invalid metadata entry (key={:?}, value={:?})",
            entry.key,
            entry.value
        );
        self.0.push(entry);
    }

    pub(crate) fn extend_from(&mut self, other: &CallMetadata) {
        self.0.extend(other.0.iter().cloned());
    }

    /// First value recorded under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CallMetadata {
    type Item = &'a MetadataEntry;
    type IntoIter = std::slice::Iter<'a, MetadataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, String)> for CallMetadata {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut metadata = CallMetadata::new();
        for (key, value) in iter {
            metadata.push(key, value);
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut md = CallMetadata::new();
        md.push("x-goog-request-params", "parent=projects/p");
        md.push("x-goog-api-client", "aiplatform-rust/0.1.0");
        md.push("x-goog-request-params", "name=projects/q");

        let keys: Vec<_> = md.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "x-goog-request-params",
                "x-goog-api-client",
                "x-goog-request-params"
            ]
        );
        assert_eq!(md.get("x-goog-request-params"), Some("parent=projects/p"));
    }

    #[test]
    fn rejects_uppercase_keys() {
        let entry = MetadataEntry::new("X-Goog-Api-Client".into(), "v1".into());
        assert!(!entry.is_valid());
    }

    #[test]
    fn rejects_control_characters_in_values() {
        let entry = MetadataEntry::new("name".into(), "a\r\nb".into());
        assert!(!entry.is_valid());
    }

    #[test]
    fn routing_values_keep_resource_names_readable() {
        assert_eq!(
            encode_routing_value("projects/p/locations/l/models/m"),
            "projects/p/locations/l/models/m"
        );
        assert_eq!(encode_routing_value("a b&c"), "a%20b%26c");
    }
}
