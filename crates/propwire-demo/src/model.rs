//! The `Person` data model bound by the contact page.

use propwire_runtime::observable_record;

observable_record! {
    /// Contact details shown on the contact page.
    pub struct Person: PersonField {
        pub name: String as Name => NAME,
        pub phone: String as Phone => PHONE,
        pub address: String as Address => ADDRESS,
    }
}

impl Person {
    /// Build a person from all three fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    /// The person the contact page starts with.
    #[must_use]
    pub fn john() -> Self {
        Self::new("John", "1234567", "X Address")
    }
}
