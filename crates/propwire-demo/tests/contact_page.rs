//! End-to-end checks of the contact page and the `Person` record.
//!
//! Covers the canonical walkthrough (mutating the bound instance in place),
//! context replacement, control-to-control binding, and the record
//! scenarios the page relies on.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use propwire_demo::model::{Person, PersonField};
use propwire_demo::page::{CHANGED_ADDRESS, CHANGED_NAME, CHANGED_PHONE, ContactPage};
use propwire_demo::view::TextView;
use propwire_runtime::{FieldId, ObservableRecord};

fn rendered(name: &str, phone: &str, address: &str) -> String {
    format!(
        "Name:    {name}\nPhone:   {phone}\nAddress: {address}\n[{name}]\nEcho:    {name}\n<Change>"
    )
}

#[test]
fn initial_render_shows_bound_person() {
    let page = ContactPage::new(ObservableRecord::new(Person::john())).unwrap();
    assert_eq!(page.render(), rendered("John", "1234567", "X Address"));
}

#[test]
fn click_updates_labels_through_notification() {
    let person = ObservableRecord::new(Person::john());
    let page = ContactPage::new(person.clone()).unwrap();

    page.change_button().click();

    assert_eq!(
        page.render(),
        rendered(CHANGED_NAME, CHANGED_PHONE, CHANGED_ADDRESS)
    );
    assert!(page.binding_context().ptr_eq(&person));
    assert_eq!(person.version(), 3);
}

#[test]
fn click_notifies_outside_observer_once_per_field() {
    let person = ObservableRecord::new(Person::john());
    let page = ContactPage::new(person.clone()).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let _sub = person.subscribe_fn(move |_, f| seen_clone.borrow_mut().push(f.name()));

    page.change_button().click();
    assert_eq!(*seen.borrow(), vec!["name", "phone", "address"]);
}

#[test]
fn editing_entry_writes_back_and_echoes() {
    let person = ObservableRecord::new(Person::john());
    let page = ContactPage::new(person.clone()).unwrap();

    page.name_entry().type_text("Mary");

    assert_eq!(person.get(Person::NAME), "Mary");
    assert_eq!(page.text_of("name_label").as_deref(), Some("Mary"));
    assert_eq!(page.text_of("echo_label").as_deref(), Some("Mary"));
}

#[test]
fn replacing_context_rebinds_to_new_person() {
    let first = ObservableRecord::new(Person::john());
    let page = ContactPage::new(first.clone()).unwrap();
    let second = ObservableRecord::new(Person::new("Ada", "42", "Analytical Row"));

    page.set_binding_context(second.clone()).unwrap();
    assert_eq!(page.render(), rendered("Ada", "42", "Analytical Row"));

    // The old person is no longer observed by the page.
    first.set(Person::NAME, "ignored".into());
    assert_eq!(page.text_of("name_label").as_deref(), Some("Ada"));
    assert_eq!(first.observer_count(), 0);

    // Clicking now mutates the new context.
    page.change_button().click();
    assert_eq!(second.get(Person::NAME), CHANGED_NAME);
    assert_eq!(first.get(Person::NAME), "ignored");
}

#[test]
fn john_scenario() {
    let person = ObservableRecord::new(Person::john());
    let calls = Rc::new(RefCell::new(Vec::new()));
    let calls_clone = Rc::clone(&calls);
    let observer = Rc::new(move |_: &ObservableRecord<Person>, f: PersonField| {
        calls_clone.borrow_mut().push(f.name());
    });
    person.subscribe(&observer);

    person.set(Person::NAME, "Peter".into());

    assert_eq!(*calls.borrow(), vec!["name"]);
    assert_eq!(person.get(Person::NAME), "Peter");
    assert_eq!(person.get(Person::PHONE), "1234567");
}

#[test]
fn empty_person_scenario() {
    let person = ObservableRecord::<Person>::default();
    assert_eq!(person.get(Person::NAME), "");

    let calls = Rc::new(RefCell::new(0u32));
    let calls_clone = Rc::clone(&calls);
    let _sub = person.subscribe_fn(move |_, _| *calls_clone.borrow_mut() += 1);

    person.set(Person::NAME, String::new());
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn invalid_field_by_name() {
    let person = ObservableRecord::new(Person::john());
    let err = person.set_by_name("email", "a@b").unwrap_err();
    assert_eq!(err.to_string(), "invalid field 'email' on record Person");
    assert_eq!(person.version(), 0);
}

#[test]
fn labels_are_plain_text_views() {
    let page = ContactPage::new(ObservableRecord::new(Person::john())).unwrap();
    let entry = page.name_entry();
    assert_eq!(entry.id(), "name_entry");
    assert_eq!(entry.text(), "John");
}
