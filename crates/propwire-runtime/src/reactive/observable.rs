#![forbid(unsafe_code)]

//! Observable record handle with per-field change notification.
//!
//! # Design
//!
//! [`ObservableRecord<R>`] wraps a plain record `R` in shared,
//! reference-counted storage (`Rc<..>`). Every mutation writes the new value,
//! releases the borrow, then notifies all live observers in registration
//! order with the handle and the changed field. Observers therefore always
//! read the new value.
//!
//! `set` does not compare against the previous value: assigning an identical
//! value notifies again. [`ObservableRecord::set_if_changed`] is the opt-in
//! variant that skips equal values.
//!
//! # Performance
//!
//! | Operation      | Complexity                   |
//! |----------------|------------------------------|
//! | `get()`        | O(1) + clone of the field    |
//! | `set()`        | O(S) where S = registrations |
//! | `set_by_name()`| O(F + S) where F = fields    |
//! | `subscribe()`  | O(1) amortized               |
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: allowed. A `set` from inside an observer completes a
//!   full nested notification cycle before the outer `set` returns.
//! - **Re-entrant access inside `update`/`with`**: the closures passed to
//!   [`update`](ObservableRecord::update) and [`with`](ObservableRecord::with)
//!   run while the record is borrowed; touching the same record from inside
//!   them panics (`RefCell` borrow rules).
//! - **Observer panic**: see [`DispatchPolicy`](crate::config::DispatchPolicy).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use propwire_core::{Field, FieldId, Record, RecordError, Value};
use tracing::debug_span;

use crate::config::RecordConfig;
use crate::reactive::observer::{
    NotifyPropertyChanged, PropertyChanged, PropertyObserver, Subscription, SubscriptionId,
};

struct RecordState<R> {
    record: R,
    /// Completed mutations, including redundant ones.
    version: u64,
}

struct RecordInner<R: Record> {
    state: RefCell<RecordState<R>>,
    observers: PropertyChanged<ObservableRecord<R>, R::Field>,
    config: RecordConfig,
}

/// A shared record whose field mutations notify registered observers.
///
/// Cloning an `ObservableRecord` creates a new handle to the **same** record:
/// both handles see the same values and share observers.
///
/// # Invariants
///
/// 1. When a mutating call returns, every observer registered at the start
///    of its dispatch has been called exactly once per registration.
/// 2. Observers are called in registration order.
/// 3. The new value is visible to observers.
/// 4. `version` increments by exactly 1 per completed mutation.
/// 5. Observers subscribed after a mutation never see that mutation.
pub struct ObservableRecord<R: Record> {
    inner: Rc<RecordInner<R>>,
}

// Manual Clone: shares the same Rc.
impl<R: Record> Clone for ObservableRecord<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: Record + fmt::Debug> fmt::Debug for ObservableRecord<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ObservableRecord")
            .field("record", &state.record)
            .field("version", &state.version)
            .field("observer_count", &self.inner.observers.registration_count())
            .finish()
    }
}

impl<R: Record + Default> Default for ObservableRecord<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: Record> From<R> for ObservableRecord<R> {
    fn from(record: R) -> Self {
        Self::new(record)
    }
}

impl<R: Record> ObservableRecord<R> {
    /// Wrap `record` with the default configuration.
    ///
    /// The initial version is 0 and no observers are registered.
    #[must_use]
    pub fn new(record: R) -> Self {
        Self::with_config(record, RecordConfig::default())
    }

    /// Wrap `record` with an explicit configuration.
    #[must_use]
    pub fn with_config(record: R, config: RecordConfig) -> Self {
        Self {
            inner: Rc::new(RecordInner {
                state: RefCell::new(RecordState { record, version: 0 }),
                observers: PropertyChanged::new(config.dispatch),
                config,
            }),
        }
    }

    /// Configuration this record was created with.
    #[must_use]
    pub fn config(&self) -> RecordConfig {
        self.inner.config
    }

    /// Get a clone of the current value of `field`.
    #[must_use]
    pub fn get<T: Clone>(&self, field: Field<R, T>) -> T {
        field.get(&self.inner.state.borrow().record).clone()
    }

    /// Access the whole record by reference without cloning.
    pub fn with<U>(&self, f: impl FnOnce(&R) -> U) -> U {
        f(&self.inner.state.borrow().record)
    }

    /// Clone the whole record.
    #[must_use]
    pub fn snapshot(&self) -> R
    where
        R: Clone,
    {
        self.inner.state.borrow().record.clone()
    }

    /// Overwrite `field` with `value` and notify every observer.
    ///
    /// No equality check is made: setting the current value notifies too.
    pub fn set<T>(&self, field: Field<R, T>, value: T) {
        {
            let mut state = self.inner.state.borrow_mut();
            *field.get_mut(&mut state.record) = value;
            state.version += 1;
        }
        self.notify(field.id());
    }

    /// Overwrite `field` only if `value` differs from the current value.
    ///
    /// Returns whether a change (and notification) happened.
    pub fn set_if_changed<T: PartialEq>(&self, field: Field<R, T>, value: T) -> bool {
        {
            let mut state = self.inner.state.borrow_mut();
            let slot = field.get_mut(&mut state.record);
            if *slot == value {
                return false;
            }
            *slot = value;
            state.version += 1;
        }
        self.notify(field.id());
        true
    }

    /// Modify `field` in place, then notify every observer.
    ///
    /// # Panics
    ///
    /// Panics if `f` accesses this record.
    pub fn update<T>(&self, field: Field<R, T>, f: impl FnOnce(&mut T)) {
        {
            let mut state = self.inner.state.borrow_mut();
            f(field.get_mut(&mut state.record));
            state.version += 1;
        }
        self.notify(field.id());
    }

    /// Read a field by identifier as a dynamic value.
    #[must_use]
    pub fn get_field(&self, field: R::Field) -> Value {
        self.inner.state.borrow().record.value(field)
    }

    /// Overwrite a field by identifier from a dynamic value and notify.
    ///
    /// On a type mismatch nothing is written and nobody is notified.
    pub fn set_field(&self, field: R::Field, value: Value) -> Result<(), RecordError> {
        {
            let mut state = self.inner.state.borrow_mut();
            state.record.set_value(field, value)?;
            state.version += 1;
        }
        self.notify(field);
        Ok(())
    }

    /// Read a field by its declared name.
    pub fn get_by_name(&self, name: &str) -> Result<Value, RecordError> {
        Ok(self.get_field(Self::resolve(name)?))
    }

    /// Overwrite a field by its declared name and notify.
    ///
    /// Fails with [`RecordError::InvalidField`] for undeclared names and
    /// [`RecordError::TypeMismatch`] for values of the wrong kind.
    pub fn set_by_name(&self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        self.set_field(Self::resolve(name)?, value.into())
    }

    /// Resolve a declared field name.
    pub fn resolve(name: &str) -> Result<R::Field, RecordError> {
        R::Field::from_name(name).ok_or_else(|| RecordError::invalid_field(R::TYPE_NAME, name))
    }

    /// Register `observer`. Only a weak reference is kept.
    ///
    /// The same observer may be registered more than once; it is then called
    /// once per registration.
    pub fn subscribe<O>(&self, observer: &Rc<O>) -> SubscriptionId
    where
        O: PropertyObserver<Self, R::Field> + 'static,
    {
        self.inner.observers.subscribe(observer)
    }

    /// Register a closure; dropping the returned guard unsubscribes it.
    pub fn subscribe_fn(&self, callback: impl Fn(&Self, R::Field) + 'static) -> Subscription {
        self.inner.observers.subscribe_fn(callback)
    }

    /// Remove the most recent registration of `observer`.
    pub fn unsubscribe<O>(&self, observer: &Rc<O>) -> bool
    where
        O: PropertyObserver<Self, R::Field> + 'static,
    {
        self.inner.observers.unsubscribe(observer)
    }

    /// Remove a registration by id.
    pub fn unsubscribe_id(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe_id(id)
    }

    /// Notify observers that `field` changed without mutating it.
    pub fn notify(&self, field: R::Field) {
        let _span = self.inner.config.trace_spans.then(|| {
            debug_span!("propwire.notify", record = R::TYPE_NAME, field = field.name()).entered()
        });
        self.inner.observers.raise(self, field);
    }

    /// Number of live observer registrations.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.observer_count()
    }

    /// Completed mutations since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.state.borrow().version
    }

    /// Whether both handles point to the same record.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<R: Record> NotifyPropertyChanged for ObservableRecord<R> {
    type Field = R::Field;

    fn subscribe<O>(&self, observer: &Rc<O>) -> SubscriptionId
    where
        O: PropertyObserver<Self, R::Field> + 'static,
    {
        ObservableRecord::subscribe(self, observer)
    }

    fn unsubscribe<O>(&self, observer: &Rc<O>) -> bool
    where
        O: PropertyObserver<Self, R::Field> + 'static,
    {
        ObservableRecord::unsubscribe(self, observer)
    }

    fn notify(&self, field: R::Field) {
        ObservableRecord::notify(self, field);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
