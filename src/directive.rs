//! Declarative per-field directives and the resolver that turns them
//! into a populated registry
//!
//! A directive is a single string attached to a field, format
//! `"<displayName>,<columnIndex>"`. Rust has no runtime reflection, so
//! the binding step is explicit: a [`ColumnSpec`] carries the
//! extractor/injector pair for one field, and the [`sheet_columns!`]
//! macro generates one per field from `field => "directive"` pairs.

use crate::error::MapError;
use crate::model::CellValue;
use crate::registry::Registry;

/// How the resolver treats a directive whose index segment is not a
/// valid integer. A malformed directive shape (not exactly two
/// comma-separated parts) is skipped under both policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirectivePolicy {
    /// Non-integer index aborts resolution with [`MapError::InvalidIndex`]
    Strict,
    /// Non-integer index skips the field silently
    #[default]
    Permissive,
}

impl std::str::FromStr for DirectivePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(DirectivePolicy::Strict),
            "permissive" => Ok(DirectivePolicy::Permissive),
            _ => Err(format!("Unknown directive policy: {}", s)),
        }
    }
}

/// Per-field mapping description for a record type `T`
pub struct ColumnSpec<T> {
    /// Struct field name, used in error messages and skip notices
    pub field: &'static str,
    /// Raw directive string; `None` means the field participates in no
    /// mapping
    pub directive: Option<&'static str>,
    /// Reads the field's current value as a cell
    pub extract: fn(&T) -> CellValue,
    /// Coerces a cell into the field; returns whether it was applied
    pub inject: fn(&mut T, &CellValue) -> bool,
}

/// A record type whose column mappings can be derived declaratively.
///
/// Usually implemented via [`sheet_columns!`] rather than by hand.
pub trait SheetRecord: Sized {
    fn columns() -> Vec<ColumnSpec<Self>>;
}

/// Split a raw directive into (display name, index segment).
///
/// Returns `None` unless the split yields exactly two parts.
fn split_directive(raw: &str) -> Option<(&str, &str)> {
    let mut parts = raw.split(',');
    let display = parts.next()?;
    let index = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((display, index))
}

/// Build a registry from a record type's declarative directives.
///
/// Fields without a directive, and fields whose directive is malformed,
/// are skipped: they are omitted from marshal output and left at their
/// default value on unmarshal. A non-integer index segment is handled
/// per `policy`. Both the extractor and the injector for a field are
/// registered under the directive's column index.
pub fn resolve<T: SheetRecord + 'static>(policy: DirectivePolicy) -> Result<Registry<T>, MapError> {
    let mut registry = Registry::new();
    for col in T::columns() {
        let Some(raw) = col.directive else { continue };
        let Some((_display, index_raw)) = split_directive(raw) else {
            continue;
        };
        let index = match index_raw.parse::<usize>() {
            Ok(idx) => idx,
            Err(_) => match policy {
                DirectivePolicy::Strict => {
                    return Err(MapError::InvalidIndex {
                        field: col.field.to_string(),
                        raw: index_raw.to_string(),
                    })
                }
                DirectivePolicy::Permissive => continue,
            },
        };
        registry.register_extractor(index, col.field, col.extract);
        registry.register_injector(index, col.field, col.inject);
    }
    Ok(registry)
}

/// Implement [`SheetRecord`] for a struct from `field => "directive"`
/// pairs.
///
/// The generated extractor reads the field via [`ToCell`](crate::ToCell);
/// the generated injector coerces via [`FromCell`](crate::FromCell) and
/// leaves the field untouched when coercion fails.
///
/// ```
/// use sheetmap::sheet_columns;
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// sheet_columns! {
///     Person {
///         name => "name,0",
///         age => "age,1",
///     }
/// }
/// ```
#[macro_export]
macro_rules! sheet_columns {
    ($ty:ty { $($field:ident => $directive:expr),* $(,)? }) => {
        impl $crate::SheetRecord for $ty {
            fn columns() -> ::std::vec::Vec<$crate::ColumnSpec<Self>> {
                vec![
                    $(
                        $crate::ColumnSpec {
                            field: stringify!($field),
                            directive: ::std::option::Option::Some($directive),
                            extract: |record: &Self| {
                                $crate::ToCell::to_cell(&record.$field)
                            },
                            inject: |record: &mut Self, value: &$crate::CellValue| {
                                match $crate::FromCell::from_cell(value) {
                                    ::std::option::Option::Some(v) => {
                                        record.$field = v;
                                        true
                                    }
                                    ::std::option::Option::None => false,
                                }
                            },
                        }
                    ),*
                ]
            }
        }
    };
}
