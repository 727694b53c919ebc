#![forbid(unsafe_code)]

//! Runtime: observable records with synchronous change notification.
//!
//! # Role in propwire
//! `propwire-runtime` turns plain records from `propwire-core` into shared,
//! observable data sources. A presentation layer attaches an observer once
//! and, on every notification for a field, reads that field and re-renders.
//!
//! # Primary responsibilities
//! - **ObservableRecord**: typed and name-based get/set with per-field
//!   notification.
//! - **PropertyChanged**: weakly held, ordered observer registrations.
//! - **RecordConfig**: observer panic policy and dispatch tracing.
//!
//! # Threading
//! Everything here is single-threaded (`Rc`/`RefCell`), so handles are
//! neither `Send` nor `Sync`.

pub mod config;
pub mod reactive;

pub use config::{DispatchPolicy, RecordConfig, env_flag};
pub use reactive::{
    NotifyPropertyChanged, ObservableRecord, PropertyChanged, PropertyObserver, Subscription,
    SubscriptionId,
};

pub use propwire_core::{Field, FieldId, FieldValue, Record, RecordError, Value, ValueKind};
