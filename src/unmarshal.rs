//! Rows of untyped cells to typed records

use serde::Serialize;

use crate::directive::{resolve, DirectivePolicy, SheetRecord};
use crate::model::Row;
use crate::registry::Registry;

/// Why an injection was skipped for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The cell value could not be coerced to the field's type
    Coercion,
    /// The row was shorter than the injector's column index
    MissingColumn,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Coercion => write!(f, "coercion failed"),
            SkipReason::MissingColumn => write!(f, "column missing from row"),
        }
    }
}

/// One field left at its default value during unmarshal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipNotice {
    /// Row position in the input batch (0-based)
    pub row: usize,
    /// Column index of the skipped injector
    pub column: usize,
    /// Field name recorded at registration
    pub field: String,
    pub reason: SkipReason,
}

/// Collected skipped-field notices for one unmarshal call.
///
/// The plain unmarshal path is silent; this is the opt-in diagnostic
/// channel for callers who want to observe which cells degraded to
/// default values.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub skipped: Vec<SkipNotice>,
}

impl Report {
    /// True when every registered injector applied cleanly
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Converts rows into typed records using a prebuilt registry.
pub struct Unmarshaler<T> {
    registry: Registry<T>,
}

impl<T: Default> Unmarshaler<T> {
    /// Create an unmarshaler over a registry
    pub fn new(registry: Registry<T>) -> Self {
        Self { registry }
    }

    /// Access the underlying registry
    pub fn registry(&self) -> &Registry<T> {
        &self.registry
    }

    /// Convert each row into a record. Infallible: every problem
    /// degrades to leaving the affected field at its default value.
    ///
    /// Each record starts from `T::default()`. Injectors run in
    /// ascending column-index order; injectors whose index falls beyond
    /// the row's length are skipped, as are cells the coercion layer
    /// rejects.
    pub fn unmarshal(&self, rows: &[Row]) -> Vec<T> {
        rows.iter().map(|row| self.unmarshal_row(row, None)).collect()
    }

    /// Like [`unmarshal`](Self::unmarshal), additionally collecting a
    /// notice for every skipped injection.
    pub fn unmarshal_with_report(&self, rows: &[Row]) -> (Vec<T>, Report) {
        let mut report = Report::default();
        let records = rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| self.unmarshal_row(row, Some((row_idx, &mut report))))
            .collect();
        (records, report)
    }

    fn unmarshal_row(&self, row: &Row, mut report: Option<(usize, &mut Report)>) -> T {
        let mut record = T::default();
        for (index, slot) in self.registry.injectors() {
            let reason = match row.get(index) {
                Some(cell) => {
                    if (slot.func)(&mut record, cell) {
                        continue;
                    }
                    SkipReason::Coercion
                }
                None => SkipReason::MissingColumn,
            };
            if let Some((row_idx, report)) = report.as_mut() {
                report.skipped.push(SkipNotice {
                    row: *row_idx,
                    column: index,
                    field: slot.name.clone(),
                    reason,
                });
            }
        }
        record
    }
}

/// Declarative entry point: build a registry from `T`'s directives,
/// then unmarshal. Never fails.
///
/// Directive resolution is permissive here so that heterogeneous or
/// legacy row data can still be read: malformed directives of any kind
/// simply leave their fields at default values.
pub fn unmarshal<T: SheetRecord + Default + 'static>(rows: &[Row]) -> Vec<T> {
    let registry = resolve::<T>(DirectivePolicy::Permissive).unwrap_or_default();
    Unmarshaler::new(registry).unmarshal(rows)
}
