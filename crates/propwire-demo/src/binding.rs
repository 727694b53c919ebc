//! Property-path bindings between notifying sources and text views.
//!
//! A [`Binding`] attaches once to a [`BindingSource`] and, on each
//! notification for its field, reads the field and pushes it into the
//! target view. Sources are records or other controls; both implement
//! [`NotifyPropertyChanged`].
//!
//! # Modes
//!
//! | Mode             | Source → view        | View → source |
//! |------------------|----------------------|---------------|
//! | `OneWay`         | on attach and notify | never         |
//! | `OneTime`        | on attach only       | never         |
//! | `TwoWay`         | on attach and notify | on edit       |
//! | `OneWayToSource` | never                | on attach and edit |
//!
//! `TwoWay` and `OneWayToSource` need an editable target; with a display-only
//! target they degrade to `OneWay` and `OneTime` respectively.
//!
//! # Failure Modes
//!
//! - **Unknown path**: [`Binding::attach`] logs at `warn` and fails with
//!   [`BindingError::UnknownPath`].
//! - **Rejected write-back**: a view edit the source cannot accept (for
//!   example text into an integer field) is logged at `warn` and dropped.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use propwire_runtime::{
    FieldId, NotifyPropertyChanged, ObservableRecord, PropertyObserver, Record, RecordError,
    Subscription, Value,
};
use tracing::{debug, warn};

use crate::view::{Entry, TextView, ViewProperty};

/// Direction of data flow for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingMode {
    #[default]
    OneWay,
    OneTime,
    TwoWay,
    OneWayToSource,
}

impl BindingMode {
    fn pushes_to_view(self) -> bool {
        !matches!(self, Self::OneWayToSource)
    }

    fn follows_source(self) -> bool {
        matches!(self, Self::OneWay | Self::TwoWay)
    }

    fn writes_back(self) -> bool {
        matches!(self, Self::TwoWay | Self::OneWayToSource)
    }
}

/// Errors from attaching or driving a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The source has no property at this path.
    UnknownPath { source: &'static str, path: String },
    /// The record rejected a write.
    Record(RecordError),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPath { source, path } => {
                write!(f, "no property '{path}' on binding source {source}")
            }
            Self::Record(err) => write!(f, "record rejected write: {err}"),
        }
    }
}

impl std::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Record(err) => Some(err),
            Self::UnknownPath { .. } => None,
        }
    }
}

impl From<RecordError> for BindingError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::InvalidField { record, name } => Self::UnknownPath {
                source: record,
                path: name,
            },
            other => Self::Record(other),
        }
    }
}

/// A notifying object whose properties can be addressed by path.
pub trait BindingSource: NotifyPropertyChanged + Clone {
    /// Name used in diagnostics.
    fn source_name(&self) -> &'static str;

    /// Resolve a property path.
    fn resolve_path(&self, path: &str) -> Result<Self::Field, BindingError>;

    /// Read a property.
    fn read(&self, field: Self::Field) -> Value;

    /// Write a property.
    fn write(&self, field: Self::Field, value: Value) -> Result<(), BindingError>;
}

impl<R: Record> BindingSource for ObservableRecord<R> {
    fn source_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn resolve_path(&self, path: &str) -> Result<R::Field, BindingError> {
        Ok(ObservableRecord::<R>::resolve(path)?)
    }

    fn read(&self, field: R::Field) -> Value {
        self.get_field(field)
    }

    fn write(&self, field: R::Field, value: Value) -> Result<(), BindingError> {
        Ok(self.set_field(field, value)?)
    }
}

impl BindingSource for Entry {
    fn source_name(&self) -> &'static str {
        self.id()
    }

    fn resolve_path(&self, path: &str) -> Result<ViewProperty, BindingError> {
        ViewProperty::from_name(path).ok_or_else(|| BindingError::UnknownPath {
            source: self.id(),
            path: path.to_owned(),
        })
    }

    fn read(&self, _field: ViewProperty) -> Value {
        Value::Text(self.text())
    }

    fn write(&self, _field: ViewProperty, value: Value) -> Result<(), BindingError> {
        self.set_text(value.to_string());
        Ok(())
    }
}

/// Forward half: pushes the source value into the view on notification.
struct PushToView<V, F> {
    field: F,
    target: V,
}

impl<S, V> PropertyObserver<S, S::Field> for PushToView<V, S::Field>
where
    S: BindingSource,
    V: TextView,
{
    fn property_changed(&self, source: &S, field: S::Field) {
        if field == self.field {
            push(source, field, &self.target);
        }
    }
}

fn push<S: BindingSource, V: TextView>(source: &S, field: S::Field, target: &V) {
    let text = source.read(field).to_string();
    debug!(view = target.id(), ?field, text = %text, "binding pushed value to view");
    target.set_text(text);
}

fn write_back<S: BindingSource>(source: &S, field: S::Field, text: &str) {
    let value = Value::from(text);
    if source.read(field) == value {
        return;
    }
    if let Err(err) = source.write(field, value) {
        warn!(source = source.source_name(), ?field, %err, "binding write-back rejected");
    }
}

/// A live binding. Dropping it detaches both directions.
pub struct Binding {
    path: String,
    mode: BindingMode,
    target: &'static str,
    /// Keeps the forward observer alive; the source holds it weakly.
    _forward: Option<Rc<dyn Any>>,
    _reverse: Option<Subscription>,
}

impl Binding {
    /// Bind `target`'s text to the property at `path` on `source`.
    pub fn attach<S, V>(
        source: &S,
        path: &str,
        target: &V,
        mode: BindingMode,
    ) -> Result<Self, BindingError>
    where
        S: BindingSource,
        V: TextView,
    {
        let field = source.resolve_path(path).inspect_err(|err| {
            warn!(view = target.id(), %err, "binding path did not resolve");
        })?;

        if mode.pushes_to_view() {
            push(source, field, target);
        }

        let forward = mode.follows_source().then(|| {
            let observer = Rc::new(PushToView {
                field,
                target: target.clone(),
            });
            source.subscribe(&observer);
            observer as Rc<dyn Any>
        });

        let reverse = if mode.writes_back() {
            let src = source.clone();
            let reverse = target.on_edited(Box::new(move |text| write_back(&src, field, text)));
            match (&reverse, mode) {
                (None, BindingMode::OneWayToSource) => {
                    // Display-only target: one push, the record is never written.
                    debug!(view = target.id(), ?mode, "target is display-only; copying once");
                    push(source, field, target);
                }
                (None, _) => {
                    debug!(view = target.id(), ?mode, "target is display-only; no write-back");
                }
                (Some(_), BindingMode::OneWayToSource) => write_back(source, field, &target.text()),
                (Some(_), _) => {}
            }
            reverse
        } else {
            None
        };

        debug!(
            source = source.source_name(),
            path,
            view = target.id(),
            ?mode,
            "binding attached"
        );
        Ok(Self {
            path: path.to_owned(),
            mode,
            target: target.id(),
            _forward: forward,
            _reverse: reverse,
        })
    }

    /// Bound property path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Binding mode.
    #[must_use]
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    /// Target view id.
    #[must_use]
    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Person;
    use crate::view::Label;

    fn person() -> ObservableRecord<Person> {
        ObservableRecord::new(Person::john())
    }

    #[test]
    fn one_way_follows_source() {
        let rec = person();
        let label = Label::new("name");
        let _b = Binding::attach(&rec, "name", &label, BindingMode::OneWay).unwrap();
        assert_eq!(label.text(), "John");

        rec.set(Person::NAME, "Peter".into());
        assert_eq!(label.text(), "Peter");
    }

    #[test]
    fn one_way_ignores_other_fields() {
        let rec = person();
        let label = Label::new("name");
        let _b = Binding::attach(&rec, "name", &label, BindingMode::OneWay).unwrap();
        label.set_text("stale".into());
        rec.set(Person::PHONE, "0".into());
        assert_eq!(label.text(), "stale");
    }

    #[test]
    fn one_time_copies_once() {
        let rec = person();
        let label = Label::new("phone");
        let _b = Binding::attach(&rec, "phone", &label, BindingMode::OneTime).unwrap();
        rec.set(Person::PHONE, "999".into());
        assert_eq!(label.text(), "1234567");
        assert_eq!(rec.observer_count(), 0);
    }

    #[test]
    fn two_way_writes_edits_back() {
        let rec = person();
        let entry = Entry::new("name-entry");
        let _b = Binding::attach(&rec, "name", &entry, BindingMode::TwoWay).unwrap();
        assert_eq!(entry.text(), "John");

        entry.type_text("Jane");
        assert_eq!(rec.get(Person::NAME), "Jane");
        let version = rec.version();

        rec.set(Person::NAME, "Peter".into());
        assert_eq!(entry.text(), "Peter");
        // The round trip stops at the entry: one mutation, no echo write.
        assert_eq!(rec.version(), version + 1);
    }

    #[test]
    fn one_way_to_source_seeds_record_from_view() {
        let rec = person();
        let entry = Entry::new("address-entry");
        entry.type_text("Z Address");
        let _b = Binding::attach(&rec, "address", &entry, BindingMode::OneWayToSource).unwrap();
        assert_eq!(rec.get(Person::ADDRESS), "Z Address");

        rec.set(Person::ADDRESS, "elsewhere".into());
        assert_eq!(entry.text(), "Z Address");

        entry.type_text("W Address");
        assert_eq!(rec.get(Person::ADDRESS), "W Address");
    }

    #[test]
    fn control_to_control() {
        let entry = Entry::new("source-entry");
        let echo = Label::new("echo");
        let _b = Binding::attach(&entry, "text", &echo, BindingMode::OneWay).unwrap();
        entry.type_text("typed");
        assert_eq!(echo.text(), "typed");
    }

    #[test]
    fn unknown_path_fails() {
        let rec = person();
        let label = Label::new("x");
        let err = Binding::attach(&rec, "email", &label, BindingMode::OneWay).unwrap_err();
        assert_eq!(
            err,
            BindingError::UnknownPath {
                source: "Person",
                path: "email".into()
            }
        );
        assert_eq!(err.to_string(), "no property 'email' on binding source Person");

        let entry = Entry::new("e");
        assert!(Binding::attach(&entry, "value", &label, BindingMode::OneWay).is_err());
    }

    #[test]
    fn dropping_binding_detaches() {
        let rec = person();
        let label = Label::new("name");
        let b = Binding::attach(&rec, "name", &label, BindingMode::OneWay).unwrap();
        assert_eq!(rec.observer_count(), 1);
        drop(b);
        rec.set(Person::NAME, "Peter".into());
        assert_eq!(label.text(), "John");
        assert_eq!(rec.observer_count(), 0);
    }

    #[test]
    fn record_error_converts() {
        use propwire_runtime::ValueKind;
        let err: BindingError =
            RecordError::type_mismatch("name", ValueKind::Text, ValueKind::Int).into();
        assert!(matches!(err, BindingError::Record(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn one_way_to_source_with_label_copies_once() {
        let rec = person();
        let label = Label::new("name");
        let hits = Rc::new(std::cell::Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = rec.subscribe_fn(move |_, _| hits_clone.set(hits_clone.get() + 1));

        let _b = Binding::attach(&rec, "name", &label, BindingMode::OneWayToSource).unwrap();
        assert_eq!(rec.get(Person::NAME), "John");
        assert_eq!(label.text(), "John");
        assert_eq!(hits.get(), 0);
        assert_eq!(rec.version(), 0);

        rec.set(Person::NAME, "Peter".into());
        assert_eq!(label.text(), "John");
    }

    #[test]
    #[tracing_test::traced_test]
    fn unknown_path_is_logged() {
        let rec = person();
        let label = Label::new("x");
        assert!(Binding::attach(&rec, "email", &label, BindingMode::OneWay).is_err());
        assert!(logs_contain("binding path did not resolve"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn attach_is_logged() {
        let rec = person();
        let label = Label::new("name");
        let _b = Binding::attach(&rec, "name", &label, BindingMode::OneWay).unwrap();
        assert!(logs_contain("binding attached"));
        assert!(logs_contain("binding pushed value to view"));
    }
}
