//! Hero id to display name lookup.

use std::borrow::Cow;
use std::collections::HashMap;

/// Immutable hero catalog loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroCatalog {
    names: HashMap<u32, String>,
}

impl HeroCatalog {
    /// Build a catalog, skipping entries with a blank name.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        let names = entries
            .into_iter()
            .map(|(id, name)| (id, name.into()))
            .filter(|(_, name)| !name.is_empty())
            .collect();
        Self { names }
    }

    /// Display name for `hero_id`, or a `Hero #<id>` placeholder.
    #[must_use]
    pub fn name(&self, hero_id: u32) -> Cow<'_, str> {
        match self.names.get(&hero_id) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("Hero #{hero_id}")),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
