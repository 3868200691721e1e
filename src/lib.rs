//! sheetmap - typed records to and from tabular rows
//!
//! Converts between typed in-memory records and generic tabular rows of
//! positionally-indexed, untyped cell values, as produced by
//! spreadsheet-like sources. Mappings come either from explicit
//! registration ([`Registry`]) or declaratively from per-field
//! directive strings (`"<displayName>,<columnIndex>"`) via the
//! [`sheet_columns!`] macro.
//!
//! ```
//! use sheetmap::{marshal, unmarshal, sheet_columns};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: i32,
//! }
//!
//! sheet_columns! {
//!     Person {
//!         name => "name,0",
//!         age => "age,1",
//!     }
//! }
//!
//! let people = vec![Person { name: "Ann".into(), age: 30 }];
//! let rows = marshal(&people).unwrap();
//! let restored: Vec<Person> = unmarshal(&rows);
//! assert_eq!(restored, people);
//! ```

pub mod coerce;
pub mod directive;
pub mod error;
pub mod marshal;
pub mod model;
pub mod registry;
pub mod unmarshal;

pub use coerce::{FromCell, ToCell};
pub use directive::{resolve, ColumnSpec, DirectivePolicy, SheetRecord};
pub use error::MapError;
pub use marshal::{marshal, Marshaler};
pub use model::{CellValue, Row};
pub use registry::{Extractor, Injector, Registry};
pub use unmarshal::{unmarshal, Report, SkipNotice, SkipReason, Unmarshaler};
