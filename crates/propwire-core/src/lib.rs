#![forbid(unsafe_code)]

//! Core: field identity, dynamic values, and errors for observable records.
//!
//! # Role in propwire
//! `propwire-core` is the vocabulary layer. It defines how a record names its
//! fields and how field values cross the typed/dynamic boundary, without any
//! notion of observers. The runtime (`propwire-runtime`) builds change
//! notification on top of these types.
//!
//! # Primary responsibilities
//! - **FieldId**: a fixed, statically known set of field identifiers per record.
//! - **Field**: a typed key mapping a field identifier to plain accessor `fn`s.
//! - **Value**: a dynamic field value for name-based access.
//! - **RecordError**: invalid field names and value kind mismatches.
//!
//! # How it fits in the system
//! Record structs implement [`Record`] (normally through the runtime's
//! `observable_record!` macro). The typed path (`Field<R, T>`) is checked at
//! compile time; the dynamic path (`&str` + [`Value`]) is checked at runtime
//! and reports [`RecordError`].

pub mod error;
pub mod field;
pub mod value;

pub use error::RecordError;
pub use field::{Field, FieldId, Record};
pub use value::{FieldValue, Value, ValueKind};
