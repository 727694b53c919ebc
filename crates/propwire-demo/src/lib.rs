#![forbid(unsafe_code)]

//! Contact page walkthrough for propwire data binding.
//!
//! A `Person` record with three text fields is the binding context of a
//! headless page. Labels follow the record through change notification; the
//! change button mutates the record in place and the labels update without
//! any explicit refresh.

pub mod binding;
pub mod config;
pub mod logging;
pub mod model;
pub mod page;
pub mod view;

use std::collections::BTreeMap;

use propwire_runtime::{FieldId, ObservableRecord, Value};

use crate::model::{Person, PersonField};

/// Field name to value map of a person, in a stable order.
#[must_use]
pub fn person_fields(person: &ObservableRecord<Person>) -> BTreeMap<&'static str, Value> {
    PersonField::ALL
        .iter()
        .map(|f| (f.name(), person.get_field(*f)))
        .collect()
}

/// JSON object of a person's fields.
pub fn person_json(person: &ObservableRecord<Person>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&person_fields(person))
}
