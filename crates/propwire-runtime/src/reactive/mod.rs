#![forbid(unsafe_code)]

//! Observable records for change-driven UI updates.
//!
//! This module provides the change-notification primitives:
//!
//! - [`ObservableRecord`]: a shared record handle whose field mutations notify
//!   registered observers with the changed field.
//! - [`PropertyChanged`]: the ordered observer list behind it, usable on its
//!   own for any notifying source.
//! - [`NotifyPropertyChanged`]: the capability trait binding layers consume.
//! - [`Subscription`]: RAII guard that unsubscribes a closure on drop.
//! - [`observable_record!`](crate::observable_record): generates record
//!   types, field identifiers and typed keys.
//!
//! # Architecture
//!
//! `ObservableRecord<R>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Observers are stored as `Weak` references and pruned lazily
//! during dispatch. No borrow is held while observers run.
//!
//! # Invariants
//!
//! 1. Every mutation notifies, including assignments of an equal value
//!    (`set_if_changed` is the explicit opt-out).
//! 2. Observers are notified in registration order, once per registration.
//! 3. Nested mutations from inside an observer complete their own dispatch
//!    before the outer dispatch continues (depth-first).
//! 4. Registering after a mutation never replays it.

pub mod macros;
pub mod observable;
pub mod observer;

pub use observable::ObservableRecord;
pub use observer::{
    NotifyPropertyChanged, PropertyChanged, PropertyObserver, Subscription, SubscriptionId,
};
