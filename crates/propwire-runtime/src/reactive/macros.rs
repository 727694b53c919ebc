//! Declarative generator for observable record types.

/// Declare a record struct together with its field identifiers, its
/// [`Record`](crate::Record) implementation and one typed key per field.
///
/// Each field line reads `name: Type as Variant => KEY`:
///
/// - `Variant` becomes a variant of the generated field enum,
/// - `KEY` becomes an associated `const` of type [`Field<Self, Type>`](crate::Field),
/// - the field's declared name (`"name"`) is what name-based access resolves.
///
/// The struct derives `Debug`, `Clone`, `Default` and `PartialEq`; extra
/// attributes placed before `struct` are passed through. Field types must
/// implement [`FieldValue`](crate::FieldValue).
///
/// ```
/// use propwire_runtime::{ObservableRecord, Value, observable_record};
///
/// observable_record! {
///     /// A labelled counter.
///     pub struct Counter: CounterField {
///         pub label: String as Label => LABEL,
///         pub count: i64 as Count => COUNT,
///     }
/// }
///
/// let counter = ObservableRecord::new(Counter::default());
/// counter.set(Counter::COUNT, 3);
/// assert_eq!(counter.get(Counter::COUNT), 3);
/// assert_eq!(counter.get_by_name("count").unwrap(), Value::Int(3));
/// ```
#[macro_export]
macro_rules! observable_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $field_enum:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty as $variant:ident => $key:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )+
        }

        #[doc = concat!("Field identifiers of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $field_enum {
            $(
                #[doc = concat!("The `", stringify!($field), "` field.")]
                $variant,
            )+
        }

        impl $crate::FieldId for $field_enum {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($field),)+
                }
            }
        }

        impl $crate::Record for $name {
            type Field = $field_enum;
            const TYPE_NAME: &'static str = stringify!($name);

            fn value(&self, field: $field_enum) -> $crate::Value {
                match field {
                    $($field_enum::$variant => $crate::FieldValue::to_value(&self.$field),)+
                }
            }

            fn set_value(
                &mut self,
                field: $field_enum,
                value: $crate::Value,
            ) -> ::core::result::Result<(), $crate::RecordError> {
                match field {
                    $(
                        $field_enum::$variant => {
                            self.$field = <$ty as $crate::FieldValue>::from_value(value)
                                .map_err(|found| {
                                    $crate::RecordError::type_mismatch(
                                        stringify!($field),
                                        <$ty as $crate::FieldValue>::KIND,
                                        found.kind(),
                                    )
                                })?;
                        }
                    )+
                }
                ::core::result::Result::Ok(())
            }
        }

        impl $name {
            $(
                #[doc = concat!("Typed key for the `", stringify!($field), "` field.")]
                pub const $key: $crate::Field<$name, $ty> = {
                    fn get(record: &$name) -> &$ty {
                        &record.$field
                    }
                    fn get_mut(record: &mut $name) -> &mut $ty {
                        &mut record.$field
                    }
                    $crate::Field::new($field_enum::$variant, get, get_mut)
                };
            )+
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{FieldId, Record, RecordError, Value, ValueKind};

    observable_record! {
        /// Settings used only by these tests.
        struct Settings: SettingsField {
            /// Visible flag.
            enabled: bool as Enabled => ENABLED,
            ratio: f64 as Ratio => RATIO,
            label: Option<String> as Label => LABEL,
        }
    }

    #[test]
    fn field_enum_lists_declaration_order() {
        assert_eq!(
            SettingsField::ALL,
            &[
                SettingsField::Enabled,
                SettingsField::Ratio,
                SettingsField::Label
            ]
        );
        let names: Vec<_> = SettingsField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["enabled", "ratio", "label"]);
    }

    #[test]
    fn record_name_and_dynamic_access() {
        assert_eq!(Settings::TYPE_NAME, "Settings");
        let mut s = Settings::default();
        s.set_value(SettingsField::Ratio, Value::Float(0.5)).unwrap();
        assert_eq!(s.value(SettingsField::Ratio), Value::Float(0.5));
        assert_eq!(s.value(SettingsField::Label), Value::Null);
    }

    #[test]
    fn mismatch_reports_declared_name() {
        let mut s = Settings::default();
        let err = s
            .set_value(SettingsField::Enabled, Value::Int(1))
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::type_mismatch("enabled", ValueKind::Bool, ValueKind::Int)
        );
        assert!(!s.enabled);
    }

    #[test]
    fn typed_keys_map_to_fields() {
        let mut s = Settings::default();
        *Settings::ENABLED.get_mut(&mut s) = true;
        assert!(s.enabled);
        assert_eq!(Settings::RATIO.name(), "ratio");
        assert_eq!(Settings::LABEL.id(), SettingsField::Label);
    }
}
