//! The contact page: a binding context, its controls, and the change button.
//!
//! The page's binding context is an `ObservableRecord<Person>`. Three labels
//! follow the person's fields, an entry edits the name two-way, and an echo
//! label follows the entry (control-to-control binding).
//!
//! Clicking the change button mutates the **existing** person in place; the
//! labels update purely through change notification. Replacing the whole
//! context with [`ContactPage::set_binding_context`] is the contrasting
//! technique: every binding is detached and re-attached to the new record.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use propwire_runtime::ObservableRecord;
use tracing::info;

use crate::binding::{Binding, BindingError, BindingMode};
use crate::model::Person;
use crate::view::{Button, Entry, Label, TextView};

// Values the change button writes into the current person.

/// Name written by the change button.
pub const CHANGED_NAME: &str = "Peter";
/// Phone written by the change button.
pub const CHANGED_PHONE: &str = "7654321";
/// Address written by the change button.
pub const CHANGED_ADDRESS: &str = "Y Address";

/// Headless contact page.
#[derive(Debug)]
pub struct ContactPage {
    context: RefCell<ObservableRecord<Person>>,
    name_label: Label,
    phone_label: Label,
    address_label: Label,
    name_entry: Entry,
    echo_label: Label,
    change_button: Button,
    record_bindings: RefCell<Vec<Binding>>,
    /// Bound to the entry, so it survives context replacement.
    _echo_binding: Binding,
}

impl ContactPage {
    /// Build the page and bind it to `person`.
    pub fn new(person: ObservableRecord<Person>) -> Result<Rc<Self>, BindingError> {
        let name_entry = Entry::new("name_entry");
        let echo_label = Label::new("echo_label");
        let echo_binding = Binding::attach(&name_entry, "text", &echo_label, BindingMode::OneWay)?;

        let page = Rc::new_cyclic(|weak: &Weak<Self>| {
            let change_button = Button::new("change_button", "Change");
            let weak = weak.clone();
            change_button.on_clicked(move |_| {
                if let Some(page) = weak.upgrade() {
                    page.on_change_clicked();
                }
            });
            Self {
                context: RefCell::new(person),
                name_label: Label::new("name_label"),
                phone_label: Label::new("phone_label"),
                address_label: Label::new("address_label"),
                name_entry,
                echo_label,
                change_button,
                record_bindings: RefCell::new(Vec::new()),
                _echo_binding: echo_binding,
            }
        });
        page.attach_record_bindings()?;
        Ok(page)
    }

    fn attach_record_bindings(&self) -> Result<(), BindingError> {
        let person = self.binding_context();
        let bindings = vec![
            Binding::attach(&person, "name", &self.name_label, BindingMode::OneWay)?,
            Binding::attach(&person, "phone", &self.phone_label, BindingMode::OneWay)?,
            Binding::attach(&person, "address", &self.address_label, BindingMode::OneWay)?,
            Binding::attach(&person, "name", &self.name_entry, BindingMode::TwoWay)?,
        ];
        *self.record_bindings.borrow_mut() = bindings;
        Ok(())
    }

    /// The current binding context.
    #[must_use]
    pub fn binding_context(&self) -> ObservableRecord<Person> {
        self.context.borrow().clone()
    }

    /// Replace the binding context with another person.
    pub fn set_binding_context(&self, person: ObservableRecord<Person>) -> Result<(), BindingError> {
        self.record_bindings.borrow_mut().clear();
        *self.context.borrow_mut() = person;
        info!("binding context replaced");
        self.attach_record_bindings()
    }

    /// Click handler of the change button: mutates the current person.
    fn on_change_clicked(&self) {
        let person = self.binding_context();
        person.set(Person::NAME, CHANGED_NAME.to_owned());
        person.set(Person::PHONE, CHANGED_PHONE.to_owned());
        person.set(Person::ADDRESS, CHANGED_ADDRESS.to_owned());
        info!(version = person.version(), "person updated in place");
    }

    /// The change button.
    #[must_use]
    pub fn change_button(&self) -> &Button {
        &self.change_button
    }

    /// The editable name entry.
    #[must_use]
    pub fn name_entry(&self) -> &Entry {
        &self.name_entry
    }

    /// Text of a control by id, if the page has it.
    #[must_use]
    pub fn text_of(&self, id: &str) -> Option<String> {
        [
            &self.name_label,
            &self.phone_label,
            &self.address_label,
            &self.echo_label,
        ]
        .into_iter()
        .find(|l| l.id() == id)
        .map(|l| l.text())
        .or_else(|| (self.name_entry.id() == id).then(|| self.name_entry.text()))
    }

    /// Render the page as plain text, one control per line.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Name:    {}\nPhone:   {}\nAddress: {}\n[{}]\nEcho:    {}\n<{}>",
            self.name_label.text(),
            self.phone_label.text(),
            self.address_label.text(),
            self.name_entry.text(),
            self.echo_label.text(),
            self.change_button.caption(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_of_finds_controls() {
        let page = ContactPage::new(ObservableRecord::new(Person::john())).unwrap();
        assert_eq!(page.text_of("phone_label").as_deref(), Some("1234567"));
        assert_eq!(page.text_of("name_entry").as_deref(), Some("John"));
        assert_eq!(page.text_of("echo_label").as_deref(), Some("John"));
        assert_eq!(page.text_of("missing"), None);
    }

    #[test]
    fn click_keeps_same_instance() {
        let person = ObservableRecord::new(Person::john());
        let page = ContactPage::new(person.clone()).unwrap();
        page.change_button().click();
        assert!(page.binding_context().ptr_eq(&person));
        assert_eq!(person.get(Person::NAME), CHANGED_NAME);
    }
}
