//! Loaded variants keyed by name.

/// A registered fragment and the sequence of the last appearance applied to it.
#[derive(Debug)]
pub struct Slot<F> {
    pub fragment: F,
    pub applied_sequence: u64,
}

/// Variant name to loaded fragment, in arrival order.
///
/// Entries are only ever added; a name can be registered once.
#[derive(Debug)]
pub struct ModelRegistry<F> {
    entries: Vec<(String, Slot<F>)>,
}

impl<F> Default for ModelRegistry<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F> ModelRegistry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fragment` under `name`.
    ///
    /// Returns the fragment back if the name is already taken.
    pub fn insert(&mut self, name: impl Into<String>, fragment: F) -> Result<&mut Slot<F>, F> {
        let name = name.into();
        if self.contains(&name) {
            return Err(fragment);
        }
        let index = self.entries.len();
        self.entries.push((
            name,
            Slot {
                fragment,
                applied_sequence: 0,
            },
        ));
        Ok(&mut self.entries[index].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn get(&self, name: &str) -> Option<&F> {
        self.slot(name).map(|slot| &slot.fragment)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut F> {
        self.slot_mut(name).map(|slot| &mut slot.fragment)
    }

    pub fn slot(&self, name: &str) -> Option<&Slot<F>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, slot)| slot)
    }

    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Slot<F>> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, slot)| slot)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &F)> {
        self.entries
            .iter()
            .map(|(key, slot)| (key.as_str(), &slot.fragment))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut F)> {
        self.entries
            .iter_mut()
            .map(|(key, slot)| (key.as_str(), &mut slot.fragment))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_arrival_order() {
        let mut registry = ModelRegistry::new();
        assert!(registry.insert("porsche", 2).is_ok());
        assert!(registry.insert("mclaren", 1).is_ok());
        assert_eq!(registry.names().collect::<Vec<_>>(), ["porsche", "mclaren"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn refuses_duplicate_names() {
        let mut registry = ModelRegistry::new();
        assert!(registry.insert("mclaren", 1).is_ok());
        assert_eq!(registry.insert("mclaren", 7).err(), Some(7));
        assert_eq!(registry.get("mclaren"), Some(&1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookups_miss_unknown_names() {
        let mut registry: ModelRegistry<u8> = ModelRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("mercedes").is_none());
        assert!(registry.get_mut("mercedes").is_none());
        assert!(!registry.contains("mercedes"));
    }
}
