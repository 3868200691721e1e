//! Column-index-to-function registry driving marshal and unmarshal

use std::collections::BTreeMap;

use crate::model::CellValue;

/// Reads one field out of a record as a cell value.
pub type Extractor<T> = Box<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Writes one cell value into a record field.
///
/// Returns whether the value was applied; a coercion that cannot
/// produce the field's type returns `false` and leaves the field
/// untouched. Injectors that cannot fail return `true` unconditionally.
pub type Injector<T> = Box<dyn Fn(&mut T, &CellValue) -> bool + Send + Sync>;

pub(crate) struct Slot<F> {
    /// Field name, carried for reporting only; lookup is by index.
    pub name: String,
    pub func: F,
}

/// Per-column-index mapping table for a record type `T`.
///
/// The extractor and injector maps are independent: a mapping may define
/// either, both, or be marshal-only / unmarshal-only. Both maps are
/// ordered by column index, so iteration during marshal and unmarshal is
/// ascending by construction regardless of registration order.
///
/// Registration takes `&mut self`; once built, a registry is read-only
/// and safe to share across threads for concurrent marshal/unmarshal.
pub struct Registry<T> {
    extractors: BTreeMap<usize, Slot<Extractor<T>>>,
    injectors: BTreeMap<usize, Slot<Injector<T>>>,
}

impl<T> std::fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("extractors", &self.extractors.keys().collect::<Vec<_>>())
            .field("injectors", &self.injectors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            extractors: BTreeMap::new(),
            injectors: BTreeMap::new(),
        }
    }

    /// Register an extractor for a column index, overwriting any prior
    /// extractor at that index.
    pub fn register_extractor<F>(&mut self, index: usize, field: impl Into<String>, f: F)
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        self.extractors.insert(
            index,
            Slot {
                name: field.into(),
                func: Box::new(f),
            },
        );
    }

    /// Register an injector for a column index, overwriting any prior
    /// injector at that index.
    pub fn register_injector<F>(&mut self, index: usize, field: impl Into<String>, f: F)
    where
        F: Fn(&mut T, &CellValue) -> bool + Send + Sync + 'static,
    {
        self.injectors.insert(
            index,
            Slot {
                name: field.into(),
                func: Box::new(f),
            },
        );
    }

    /// Number of registered extractors
    pub fn extractor_count(&self) -> usize {
        self.extractors.len()
    }

    /// Number of registered injectors
    pub fn injector_count(&self) -> usize {
        self.injectors.len()
    }

    /// Field name recorded for a column index, if any
    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.extractors
            .get(&index)
            .map(|s| s.name.as_str())
            .or_else(|| self.injectors.get(&index).map(|s| s.name.as_str()))
    }

    /// Width of a marshaled row: one slot per column index up to the
    /// highest registered extractor, or 0 when none are registered.
    pub fn row_width(&self) -> usize {
        self.extractors
            .keys()
            .next_back()
            .map(|max| max + 1)
            .unwrap_or(0)
    }

    pub(crate) fn extractors(&self) -> impl Iterator<Item = (usize, &Slot<Extractor<T>>)> {
        self.extractors.iter().map(|(idx, slot)| (*idx, slot))
    }

    pub(crate) fn injectors(&self) -> impl Iterator<Item = (usize, &Slot<Injector<T>>)> {
        self.injectors.iter().map(|(idx, slot)| (*idx, slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_maps_are_independent() {
        let mut registry: Registry<Sample> = Registry::new();
        registry.register_extractor(3, "name", |r: &Sample| r.name.clone().into());
        assert_eq!(registry.extractor_count(), 1);
        assert_eq!(registry.injector_count(), 0);
    }

    #[test]
    fn test_duplicate_registration_overwrites() {
        let mut registry: Registry<Sample> = Registry::new();
        registry.register_extractor(0, "first", |_: &Sample| crate::CellValue::Int(1));
        registry.register_extractor(0, "second", |_: &Sample| crate::CellValue::Int(2));
        assert_eq!(registry.extractor_count(), 1);
        assert_eq!(registry.field_name(0), Some("second"));
    }

    #[test]
    fn test_iteration_is_ascending() {
        let mut registry: Registry<Sample> = Registry::new();
        registry.register_extractor(5, "e", |_: &Sample| crate::CellValue::Null);
        registry.register_extractor(1, "b", |_: &Sample| crate::CellValue::Null);
        registry.register_extractor(3, "d", |_: &Sample| crate::CellValue::Null);
        let indices: Vec<usize> = registry.extractors().map(|(idx, _)| idx).collect();
        assert_eq!(indices, vec![1, 3, 5]);
        assert_eq!(registry.row_width(), 6);
    }

    #[test]
    fn test_empty_registry_width() {
        let registry: Registry<Sample> = Registry::new();
        assert_eq!(registry.row_width(), 0);
    }
}
