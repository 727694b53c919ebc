//! Headless stand-ins for the page's controls.
//!
//! Views only hold text. A [`Label`] is display-only; an [`Entry`] is
//! editable and announces edits through the same observer list records use,
//! which is what lets one control bind to another.
//!
//! Unlike records, views raise their change notification only when the text
//! actually changes. This is what terminates two-way binding round trips.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use propwire_runtime::{
    FieldId, NotifyPropertyChanged, PropertyChanged, PropertyObserver, Subscription,
    SubscriptionId,
};

/// Bindable properties of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewProperty {
    Text,
}

impl FieldId for ViewProperty {
    const ALL: &'static [Self] = &[Self::Text];

    fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
        }
    }
}

/// A control that shows text.
pub trait TextView: Clone + 'static {
    /// Control identifier, used in logs and rendering.
    fn id(&self) -> &'static str;

    /// Current text.
    fn text(&self) -> String;

    /// Replace the text.
    fn set_text(&self, text: String);

    /// Register for user edits. Display-only views return `None`.
    fn on_edited(&self, _callback: Box<dyn Fn(&str)>) -> Option<Subscription> {
        None
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

struct LabelInner {
    id: &'static str,
    text: RefCell<String>,
}

/// Display-only text.
#[derive(Clone)]
pub struct Label {
    inner: Rc<LabelInner>,
}

impl Label {
    /// Create an empty label.
    #[must_use]
    pub fn new(id: &'static str) -> Self {
        Self {
            inner: Rc::new(LabelInner {
                id,
                text: RefCell::new(String::new()),
            }),
        }
    }
}

impl TextView for Label {
    fn id(&self) -> &'static str {
        self.inner.id
    }

    fn text(&self) -> String {
        self.inner.text.borrow().clone()
    }

    fn set_text(&self, text: String) {
        *self.inner.text.borrow_mut() = text;
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("id", &self.inner.id)
            .field("text", &self.inner.text.borrow())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

struct EntryInner {
    id: &'static str,
    text: RefCell<String>,
    changed: PropertyChanged<Entry, ViewProperty>,
}

/// Editable single-line text.
#[derive(Clone)]
pub struct Entry {
    inner: Rc<EntryInner>,
}

impl Entry {
    /// Create an empty entry.
    #[must_use]
    pub fn new(id: &'static str) -> Self {
        Self {
            inner: Rc::new(EntryInner {
                id,
                text: RefCell::new(String::new()),
                changed: PropertyChanged::default(),
            }),
        }
    }

    /// Replace the text as if the user typed it.
    pub fn type_text(&self, text: &str) {
        self.set_text(text.to_owned());
    }

    fn replace(&self, text: String) -> bool {
        let mut current = self.inner.text.borrow_mut();
        if *current == text {
            return false;
        }
        *current = text;
        true
    }
}

impl TextView for Entry {
    fn id(&self) -> &'static str {
        self.inner.id
    }

    fn text(&self) -> String {
        self.inner.text.borrow().clone()
    }

    fn set_text(&self, text: String) {
        if self.replace(text) {
            self.inner.changed.raise(self, ViewProperty::Text);
        }
    }

    fn on_edited(&self, callback: Box<dyn Fn(&str)>) -> Option<Subscription> {
        Some(
            self.inner
                .changed
                .subscribe_fn(move |entry: &Entry, _| callback(&entry.text())),
        )
    }
}

impl NotifyPropertyChanged for Entry {
    type Field = ViewProperty;

    fn subscribe<O>(&self, observer: &Rc<O>) -> SubscriptionId
    where
        O: PropertyObserver<Self, ViewProperty> + 'static,
    {
        self.inner.changed.subscribe(observer)
    }

    fn unsubscribe<O>(&self, observer: &Rc<O>) -> bool
    where
        O: PropertyObserver<Self, ViewProperty> + 'static,
    {
        self.inner.changed.unsubscribe(observer)
    }

    fn notify(&self, field: ViewProperty) {
        self.inner.changed.raise(self, field);
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.inner.id)
            .field("text", &self.inner.text.borrow())
            .field("observers", &self.inner.changed.observer_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

type ClickHandler = Rc<dyn Fn(&Button)>;

struct ButtonInner {
    id: &'static str,
    caption: String,
    handlers: RefCell<Vec<ClickHandler>>,
}

/// A push button with click handlers.
#[derive(Clone)]
pub struct Button {
    inner: Rc<ButtonInner>,
}

impl Button {
    /// Create a button with a caption.
    #[must_use]
    pub fn new(id: &'static str, caption: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ButtonInner {
                id,
                caption: caption.into(),
                handlers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Control identifier.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.inner.id
    }

    /// Button caption.
    #[must_use]
    pub fn caption(&self) -> &str {
        &self.inner.caption
    }

    /// Append a click handler. Handlers are strongly held by the button.
    pub fn on_clicked(&self, handler: impl Fn(&Button) + 'static) {
        self.inner.handlers.borrow_mut().push(Rc::new(handler));
    }

    /// Run every click handler in registration order.
    pub fn click(&self) {
        let handlers: Vec<ClickHandler> = self.inner.handlers.borrow().clone();
        tracing::debug!(button = self.inner.id, handlers = handlers.len(), "clicked");
        for handler in &handlers {
            handler(self);
        }
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("id", &self.inner.id)
            .field("caption", &self.inner.caption)
            .field("handlers", &self.inner.handlers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn label_holds_text() {
        let label = Label::new("l");
        assert_eq!(label.text(), "");
        label.set_text("hi".into());
        assert_eq!(label.text(), "hi");
        assert!(label.on_edited(Box::new(|_| {})).is_none());
    }

    #[test]
    fn entry_notifies_only_on_change() {
        let entry = Entry::new("e");
        let edits = Rc::new(RefCell::new(Vec::new()));
        let edits_clone = Rc::clone(&edits);
        let _sub = entry
            .on_edited(Box::new(move |t| edits_clone.borrow_mut().push(t.to_owned())))
            .expect("entries are editable");

        entry.type_text("a");
        entry.type_text("a");
        entry.type_text("ab");
        assert_eq!(*edits.borrow(), vec!["a", "ab"]);
    }

    #[test]
    fn entry_is_a_notifier() {
        let entry = Entry::new("e");
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let observer = Rc::new(move |_: &Entry, p: ViewProperty| {
            assert_eq!(p, ViewProperty::Text);
            hits_clone.set(hits_clone.get() + 1);
        });
        NotifyPropertyChanged::subscribe(&entry, &observer);

        entry.type_text("x");
        NotifyPropertyChanged::notify(&entry, ViewProperty::Text);
        assert_eq!(hits.get(), 2);

        assert!(NotifyPropertyChanged::unsubscribe(&entry, &observer));
        entry.type_text("y");
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn button_runs_handlers_in_order() {
        let button = Button::new("b", "Change");
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            button.on_clicked(move |b| log.borrow_mut().push(format!("{tag}:{}", b.id())));
        }
        button.click();
        assert_eq!(*log.borrow(), vec!["first:b", "second:b"]);
        assert_eq!(button.caption(), "Change");
    }

    #[test]
    fn view_property_names() {
        assert_eq!(ViewProperty::from_name("text"), Some(ViewProperty::Text));
        assert_eq!(ViewProperty::from_name("Text"), None);
    }
}
