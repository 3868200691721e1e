//! Typed records to rows of untyped cells

use crate::directive::{resolve, DirectivePolicy, SheetRecord};
use crate::error::MapError;
use crate::model::{CellValue, Row};
use crate::registry::Registry;

/// Converts typed records into rows using a prebuilt registry.
pub struct Marshaler<T> {
    registry: Registry<T>,
}

impl<T> Marshaler<T> {
    /// Create a marshaler over a registry
    pub fn new(registry: Registry<T>) -> Self {
        Self { registry }
    }

    /// Access the underlying registry
    pub fn registry(&self) -> &Registry<T> {
        &self.registry
    }

    /// Convert each record into a row. Infallible: extractors cannot
    /// fail.
    ///
    /// Rows are sparse: slot *i* holds the output of the extractor
    /// registered at column index *i*, unregistered slots hold `Null`,
    /// and the row length is the highest registered index plus one.
    /// Extractors run in ascending index order, so structurally
    /// identical registries produce identical row layouts regardless of
    /// registration order.
    pub fn marshal(&self, records: &[T]) -> Vec<Row> {
        let width = self.registry.row_width();
        records
            .iter()
            .map(|record| {
                let mut row = vec![CellValue::Null; width];
                for (index, slot) in self.registry.extractors() {
                    row[index] = (slot.func)(record);
                }
                row
            })
            .collect()
    }
}

/// Declarative entry point: build a registry from `T`'s directives,
/// then marshal.
///
/// Directive resolution is strict here: a directive whose index segment
/// is not a valid integer fails the whole call with
/// [`MapError::InvalidIndex`]. Malformed directive shapes are still
/// skipped, and the corresponding fields are omitted from the output.
pub fn marshal<T: SheetRecord + 'static>(records: &[T]) -> Result<Vec<Row>, MapError> {
    let registry = resolve::<T>(DirectivePolicy::Strict)?;
    Ok(Marshaler::new(registry).marshal(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Measurement {
        label: String,
        count: i32,
    }

    #[test]
    fn test_marshal_with_explicit_registry() {
        let mut registry: Registry<Measurement> = Registry::new();
        registry.register_extractor(0, "label", |r: &Measurement| r.label.clone().into());
        registry.register_extractor(1, "count", |r: &Measurement| i64::from(r.count).into());

        let data = vec![
            Measurement {
                label: "value1".to_string(),
                count: 1,
            },
            Measurement {
                label: "value2".to_string(),
                count: 2,
            },
        ];

        let rows = Marshaler::new(registry).marshal(&data);
        assert_eq!(
            rows,
            vec![
                vec![CellValue::from("value1"), CellValue::Int(1)],
                vec![CellValue::from("value2"), CellValue::Int(2)],
            ]
        );
    }

    #[test]
    fn test_registration_order_does_not_matter() {
        let build = |reversed: bool| {
            let mut registry: Registry<Measurement> = Registry::new();
            let mut add: Vec<(usize, fn(&Measurement) -> CellValue)> = vec![
                (0, |r| r.label.clone().into()),
                (1, |r| i64::from(r.count).into()),
            ];
            if reversed {
                add.reverse();
            }
            for (index, f) in add {
                registry.register_extractor(index, format!("col{}", index), f);
            }
            registry
        };

        let data = vec![Measurement {
            label: "x".to_string(),
            count: 9,
        }];
        let forward = Marshaler::new(build(false)).marshal(&data);
        let backward = Marshaler::new(build(true)).marshal(&data);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_index_gaps_emit_null_slots() {
        let mut registry: Registry<Measurement> = Registry::new();
        registry.register_extractor(0, "label", |r: &Measurement| r.label.clone().into());
        registry.register_extractor(3, "count", |r: &Measurement| i64::from(r.count).into());

        let data = vec![Measurement {
            label: "gap".to_string(),
            count: 5,
        }];
        let rows = Marshaler::new(registry).marshal(&data);
        assert_eq!(
            rows[0],
            vec![
                CellValue::from("gap"),
                CellValue::Null,
                CellValue::Null,
                CellValue::Int(5),
            ]
        );
    }

    #[test]
    fn test_empty_registry_emits_empty_rows() {
        let registry: Registry<Measurement> = Registry::new();
        let data = vec![Measurement::default()];
        let rows = Marshaler::new(registry).marshal(&data);
        assert_eq!(rows, vec![Vec::new()]);
    }

    #[test]
    fn test_declarative_marshal() {
        #[derive(Debug, Default, PartialEq)]
        struct Entry {
            name: String,
            age: i32,
        }

        crate::sheet_columns! {
            Entry {
                name => "name,0",
                age => "age,1",
            }
        }

        let data = vec![
            Entry {
                name: "value1".to_string(),
                age: 1,
            },
            Entry {
                name: "value2".to_string(),
                age: 2,
            },
        ];
        let rows = marshal(&data).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::from("value1"), CellValue::Int(1)],
                vec![CellValue::from("value2"), CellValue::Int(2)],
            ]
        );
    }

    #[test]
    fn test_declarative_marshal_bad_index_is_fatal() {
        #[derive(Debug, Default, PartialEq)]
        struct Broken {
            name: String,
        }

        crate::sheet_columns! {
            Broken {
                name => "name,zero",
            }
        }

        let data = vec![Broken::default()];
        assert!(marshal(&data).is_err());
    }
}
