//! Mapping from package name to the caller's opaque payload.

use std::collections::HashMap;

/// One payload per package name. A name with no payload is an external
/// dependency: it may appear in the graph but is never emitted.
///
/// The registry performs no validation against the graph; the two are
/// populated side by side by the caller and only read during emission.
#[derive(Debug, Clone)]
pub struct PackageRegistry<P> {
    entries: HashMap<String, P>,
}

impl<P> Default for PackageRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PackageRegistry<P> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Associate a payload with a name, overwriting any previous payload.
    /// Graph edges for the name are unaffected.
    pub fn set(&mut self, name: &str, payload: P) {
        self.entries.insert(name.to_string(), payload);
    }

    /// Look up the payload for a name. Absence is not an error.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&P> {
        self.entries.get(name)
    }

    /// Whether a payload is registered for the name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
