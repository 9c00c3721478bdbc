//! Naive name-based field mapper.
//!
//! Copies values from a source object into a freshly defaulted target by
//! matching field names: for every field the target declares as settable,
//! the mapper asks the source for a field of the same name and copies the
//! value when one exists. Target fields without a matching source field keep
//! their `Default` value.
//!
//! Sources implement [`FieldSource`] and targets implement [`FieldTarget`],
//! either by hand (for derived values such as a patient's age) or with the
//! [`field_source!`](crate::field_source) and
//! [`field_target!`](crate::field_target) macros.
//!
//! ```
//! use medlab_core::{field_source, field_target, mapping::map};
//!
//! struct Source { foo: String }
//! field_source!(Source { foo });
//!
//! #[derive(Default)]
//! struct Target { foo: String, baz: Option<i64> }
//! field_target!(Target { foo, baz });
//!
//! let target: Target = map(&Source { foo: "bar".into() }).unwrap();
//! assert_eq!(target.foo, "bar");
//! assert_eq!(target.baz, None);
//! ```
//!
//! Name collisions, numeric coercion and naming conventions other than
//! exact field names are not handled.

use thiserror::Error;
use time::{Date, OffsetDateTime};
use tracing::trace;

/// A dynamically typed field value passed between source and target.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(Date),
    DateTime(OffsetDateTime),
}

impl FieldValue {
    /// Short name of the carried type, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("Type mismatch on {target}.{field}: expected {expected}, found {found}")]
    TypeMismatch {
        target: &'static str,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An integer of the right kind that does not fit the narrower field.
    #[error("Value {value} does not fit {target}.{field}")]
    OutOfRange {
        target: &'static str,
        field: String,
        value: i64,
    },

    #[error("{target} has no settable field '{field}'")]
    UnknownField { target: &'static str, field: String },
}

/// Conversion of a Rust value into a [`FieldValue`].
pub trait IntoFieldValue {
    fn into_field_value(self) -> FieldValue;
}

/// Conversion of a [`FieldValue`] back into a Rust value.
///
/// Returns `None` when the value carries a different type.
pub trait FromFieldValue: Sized {
    const KIND: &'static str;

    fn from_field_value(value: FieldValue) -> Option<Self>;
}

macro_rules! scalar_field_value {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl IntoFieldValue for $ty {
            fn into_field_value(self) -> FieldValue {
                FieldValue::$variant(self)
            }
        }

        impl FromFieldValue for $ty {
            const KIND: &'static str = $kind;

            fn from_field_value(value: FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

scalar_field_value!(bool, Bool, "bool");
scalar_field_value!(i64, Int, "int");
scalar_field_value!(f64, Float, "float");
scalar_field_value!(String, Text, "text");
scalar_field_value!(Date, Date, "date");
scalar_field_value!(OffsetDateTime, DateTime, "datetime");

impl IntoFieldValue for i32 {
    fn into_field_value(self) -> FieldValue {
        FieldValue::Int(i64::from(self))
    }
}

impl FromFieldValue for i32 {
    const KIND: &'static str = "int";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }
}

impl IntoFieldValue for f32 {
    fn into_field_value(self) -> FieldValue {
        FieldValue::Float(f64::from(self))
    }
}

impl FromFieldValue for f32 {
    const KIND: &'static str = "float";

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl IntoFieldValue for &str {
    fn into_field_value(self) -> FieldValue {
        FieldValue::Text(self.to_string())
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    fn into_field_value(self) -> FieldValue {
        match self {
            Some(v) => v.into_field_value(),
            None => FieldValue::Null,
        }
    }
}

impl<T: FromFieldValue> FromFieldValue for Option<T> {
    const KIND: &'static str = T::KIND;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => Some(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

/// An object whose fields can be read by name.
pub trait FieldSource {
    /// Type name used in trace output.
    fn source_name(&self) -> &'static str;

    /// Returns the value of `name`, or `None` if the source has no such field.
    fn get_field(&self, name: &str) -> Option<FieldValue>;
}

/// A default-constructible object whose fields can be written by name.
pub trait FieldTarget: Default {
    const TARGET_NAME: &'static str;

    /// Names of every field [`FieldTarget::set_field`] accepts.
    fn settable_fields() -> &'static [&'static str];

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), MappingError>;
}

/// Converts `value` for `target.field`, reporting a mismatch as an error.
pub fn convert<T: FromFieldValue>(
    target: &'static str,
    field: &str,
    value: FieldValue,
) -> Result<T, MappingError> {
    let found = value.kind();
    let int = match value {
        FieldValue::Int(v) => Some(v),
        _ => None,
    };
    T::from_field_value(value).ok_or_else(|| match int {
        Some(value) if found == T::KIND => MappingError::OutOfRange {
            target,
            field: field.to_string(),
            value,
        },
        _ => MappingError::TypeMismatch {
            target,
            field: field.to_string(),
            expected: T::KIND,
            found,
        },
    })
}

/// Builds a default `T` and copies every same-named field from `source`.
pub fn map<T, S>(source: &S) -> Result<T, MappingError>
where
    T: FieldTarget,
    S: FieldSource + ?Sized,
{
    let mut target = T::default();
    let source_name = source.source_name();

    for &field in T::settable_fields() {
        trace!(target_type = T::TARGET_NAME, field, "found setter");
        match source.get_field(field) {
            Some(value) => {
                trace!(source_type = source_name, field, "getter found");
                target.set_field(field, value)?;
            }
            None => {
                trace!(source_type = source_name, field, "getter not found");
            }
        }
    }

    Ok(target)
}

/// Implements [`FieldSource`] for a struct by exposing the listed fields.
///
/// Each field is cloned into a [`FieldValue`].
#[macro_export]
macro_rules! field_source {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::mapping::FieldSource for $ty {
            fn source_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn get_field(&self, name: &str) -> ::std::option::Option<$crate::mapping::FieldValue> {
                match name {
                    $(
                        stringify!($field) => ::std::option::Option::Some(
                            $crate::mapping::IntoFieldValue::into_field_value(
                                ::std::clone::Clone::clone(&self.$field),
                            ),
                        ),
                    )*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

/// Implements [`FieldTarget`] for a `Default` struct, making the listed
/// fields settable.
#[macro_export]
macro_rules! field_target {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::mapping::FieldTarget for $ty {
            const TARGET_NAME: &'static str = stringify!($ty);

            fn settable_fields() -> &'static [&'static str] {
                &[$(stringify!($field)),*]
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::mapping::FieldValue,
            ) -> ::std::result::Result<(), $crate::mapping::MappingError> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::mapping::convert(Self::TARGET_NAME, name, value)?;
                            ::std::result::Result::Ok(())
                        }
                    )*
                    _ => ::std::result::Result::Err($crate::mapping::MappingError::UnknownField {
                        target: Self::TARGET_NAME,
                        field: name.to_string(),
                    }),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    struct Foo {
        foo: String,
    }
    crate::field_source!(Foo { foo });

    #[derive(Debug, Default, PartialEq)]
    struct Bar {
        foo: String,
        baz: String,
    }
    crate::field_target!(Bar { foo, baz });

    #[test]
    fn test_copies_matching_field() {
        let bar: Bar = map(&Foo { foo: "bar".into() }).unwrap();
        assert_eq!(bar.foo, "bar");
    }

    #[test]
    fn test_missing_getter_leaves_default() {
        let bar: Bar = map(&Foo { foo: "bar".into() }).unwrap();
        assert_eq!(bar.baz, String::default());
    }

    #[derive(Debug, Default)]
    struct Counter {
        foo: i64,
    }
    crate::field_target!(Counter { foo });

    #[test]
    fn test_type_mismatch_is_reported() {
        let err = map::<Counter, _>(&Foo { foo: "bar".into() }).unwrap_err();
        assert_eq!(
            err,
            MappingError::TypeMismatch {
                target: "Counter",
                field: "foo".into(),
                expected: "int",
                found: "text",
            }
        );
    }

    struct Visit {
        when: Option<Date>,
        score: Option<f32>,
        count: i32,
    }
    crate::field_source!(Visit { when, score, count });

    #[derive(Debug, Default)]
    struct VisitView {
        when: Option<Date>,
        score: Option<f32>,
        count: i32,
        note: Option<String>,
    }
    crate::field_target!(VisitView {
        when,
        score,
        count,
        note
    });

    #[test]
    fn test_optional_and_numeric_fields() {
        let view: VisitView = map(&Visit {
            when: Some(date!(2024 - 05 - 01)),
            score: Some(15.6),
            count: 3,
        })
        .unwrap();
        assert_eq!(view.when, Some(date!(2024 - 05 - 01)));
        assert_eq!(view.score, Some(15.6));
        assert_eq!(view.count, 3);
        assert_eq!(view.note, None);

        let empty: VisitView = map(&Visit {
            when: None,
            score: None,
            count: 0,
        })
        .unwrap();
        assert_eq!(empty.when, None);
        assert_eq!(empty.score, None);
    }

    #[test]
    fn test_null_into_required_field_is_mismatch() {
        let mut counter = Counter::default();
        let err = counter.set_field("foo", FieldValue::Null).unwrap_err();
        assert!(matches!(err, MappingError::TypeMismatch { found: "null", .. }));
    }

    #[test]
    fn test_unknown_setter_is_rejected() {
        let mut bar = Bar::default();
        let err = bar
            .set_field("qux", FieldValue::Text("x".into()))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::UnknownField {
                target: "Bar",
                field: "qux".into()
            }
        );
    }

    #[test]
    fn test_i32_overflow_is_reported_as_out_of_range() {
        assert_eq!(convert::<i32>("Bar", "age", FieldValue::Int(42)), Ok(42));

        let err = convert::<Option<i32>>("Bar", "age", FieldValue::Int(i64::MAX)).unwrap_err();
        assert_eq!(
            err,
            MappingError::OutOfRange {
                target: "Bar",
                field: "age".into(),
                value: i64::MAX,
            }
        );
        assert_eq!(
            err.to_string(),
            format!("Value {} does not fit Bar.age", i64::MAX)
        );

        let err = convert::<i32>("Bar", "age", FieldValue::Text("x".into())).unwrap_err();
        assert!(matches!(err, MappingError::TypeMismatch { expected: "int", found: "text", .. }));
    }
}
