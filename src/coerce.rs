//! Value coercion between untyped cells and typed record fields

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset};

use crate::model::CellValue;

/// Conversion from an untyped cell into a field's static type.
///
/// `None` always means "skip": the destination field keeps its current
/// (normally zero) value and no error is surfaced. Numeric impls accept
/// either the native variant or a textual decimal string; a value that
/// does not fit the destination width is skipped, never wrapped.
pub trait FromCell: Sized {
    fn from_cell(value: &CellValue) -> Option<Self>;
}

/// Conversion from a field's static type into a cell value.
///
/// Used by declaratively synthesized extractors; always lossless
/// widening into the natural `CellValue` variant.
pub trait ToCell {
    fn to_cell(&self) -> CellValue;
}

impl FromCell for String {
    fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::String(s) => Some(s.clone().into_owned()),
            _ => None,
        }
    }
}

impl ToCell for String {
    fn to_cell(&self) -> CellValue {
        CellValue::String(Cow::Owned(self.clone()))
    }
}

macro_rules! impl_int_coercion {
    ($($t:ty),*) => {
        $(
            impl FromCell for $t {
                fn from_cell(value: &CellValue) -> Option<Self> {
                    match value {
                        CellValue::Int(i) => (*i).try_into().ok(),
                        // Parsing for the destination type checks the
                        // width along with the format.
                        CellValue::String(s) => s.parse::<$t>().ok(),
                        _ => None,
                    }
                }
            }

            impl ToCell for $t {
                fn to_cell(&self) -> CellValue {
                    CellValue::Int(i64::from(*self))
                }
            }
        )*
    };
}

impl_int_coercion!(i8, i16, i32, i64, u8, u16, u32);

impl FromCell for f64 {
    fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Float(f) => Some(*f),
            CellValue::String(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl ToCell for f64 {
    fn to_cell(&self) -> CellValue {
        CellValue::Float(*self)
    }
}

/// A finite value outside f32's finite range is skipped, not
/// saturated to infinity.
fn narrow_to_f32(wide: f64) -> Option<f32> {
    let narrowed = wide as f32;
    if wide.is_finite() && !narrowed.is_finite() {
        return None;
    }
    Some(narrowed)
}

impl FromCell for f32 {
    fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Float(f) => narrow_to_f32(*f),
            CellValue::String(s) => s.parse::<f64>().ok().and_then(narrow_to_f32),
            _ => None,
        }
    }
}

impl ToCell for f32 {
    fn to_cell(&self) -> CellValue {
        CellValue::Float(f64::from(*self))
    }
}

impl FromCell for bool {
    fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Bool(b) => Some(*b),
            // Only the exact literal "TRUE" is true; any other text,
            // including "true", is false.
            CellValue::String(s) => Some(s.as_ref() == "TRUE"),
            _ => None,
        }
    }
}

impl ToCell for bool {
    fn to_cell(&self) -> CellValue {
        CellValue::Bool(*self)
    }
}

impl FromCell for DateTime<FixedOffset> {
    fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::String(s) => DateTime::parse_from_rfc3339(s).ok(),
            _ => None,
        }
    }
}

impl ToCell for DateTime<FixedOffset> {
    fn to_cell(&self) -> CellValue {
        CellValue::DateTime(*self)
    }
}

impl<T: FromCell> FromCell for Option<T> {
    fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Null => Some(None),
            other => T::from_cell(other).map(Some),
        }
    }
}

impl<T: ToCell> ToCell for Option<T> {
    fn to_cell(&self) -> CellValue {
        match self {
            Some(v) => v.to_cell(),
            None => CellValue::Null,
        }
    }
}
