//! Field identity and typed field keys.
//!
//! # Design
//!
//! A record's field set is fixed by its type. [`FieldId`] enumerates it
//! statically (`ALL`, `name`, `from_name`), so no reflection or caller-name
//! inference is involved. A [`Field<R, T>`] pairs one identifier with plain
//! accessor `fn`s, which makes `get`/`set` on the typed path both
//! type-checked and free of string lookups.

use std::fmt;
use std::hash::Hash;

use crate::error::RecordError;
use crate::value::Value;

/// Identifier of one field of a record.
///
/// Implementations are small `Copy` enums, one variant per declared field.
pub trait FieldId: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Every field of the record, in declaration order.
    const ALL: &'static [Self];

    /// The field's declared name.
    fn name(self) -> &'static str;

    /// Resolve a field by its declared name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// A plain data record with a fixed set of named fields.
pub trait Record: 'static {
    /// Field identifier type.
    type Field: FieldId;

    /// Record type name, used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Read a field as a dynamic value.
    fn value(&self, field: Self::Field) -> Value;

    /// Overwrite a field from a dynamic value.
    ///
    /// On [`RecordError::TypeMismatch`] the field is left untouched.
    fn set_value(&mut self, field: Self::Field, value: Value) -> Result<(), RecordError>;
}

/// Typed key for one field of record `R` holding a `T`.
pub struct Field<R: Record, T> {
    id: R::Field,
    get: fn(&R) -> &T,
    get_mut: fn(&mut R) -> &mut T,
}

impl<R: Record, T> Field<R, T> {
    /// Build a key from a field identifier and its accessors.
    #[must_use]
    pub const fn new(id: R::Field, get: fn(&R) -> &T, get_mut: fn(&mut R) -> &mut T) -> Self {
        Self { id, get, get_mut }
    }

    /// The field's identifier.
    #[must_use]
    pub fn id(&self) -> R::Field {
        self.id
    }

    /// The field's declared name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    /// Borrow the field inside `record`.
    pub fn get<'a>(&self, record: &'a R) -> &'a T {
        (self.get)(record)
    }

    /// Mutably borrow the field inside `record`.
    pub fn get_mut<'a>(&self, record: &'a mut R) -> &'a mut T {
        (self.get_mut)(record)
    }
}

// Manual Clone/Copy: derives would demand `R: Copy` and `T: Copy`.
impl<R: Record, T> Clone for Field<R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Record, T> Copy for Field<R, T> {}

impl<R: Record, T> fmt::Debug for Field<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("record", &R::TYPE_NAME)
            .field("name", &self.name())
            .finish()
    }
}
