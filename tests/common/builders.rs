//! Test builders: ergonomic constructors for `Person` fixtures and pickers.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use ppl_core::{PeopleSearch, Person, PickerBuilder, PickerController};
use std::{cell::RefCell, rc::Rc, sync::Arc, time::Duration};

// ---------------------------------------------------------------------------
// PersonBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Person`] fixtures. The email defaults to
/// `<first name, lowercased>@example.com`.
///
/// ```rust
/// let ada = PersonBuilder::new("Ada Lovelace").alias("ada").build();
/// ```
pub struct PersonBuilder {
    id: Option<String>,
    name: String,
    email: Option<String>,
    alias: Option<String>,
}

impl PersonBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: None,
            alias: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn build(self) -> Person {
        let first = self
            .name
            .split_whitespace()
            .next()
            .unwrap_or("anon")
            .to_lowercase();
        let email = self.email.unwrap_or_else(|| format!("{first}@example.com"));
        let id = self.id.unwrap_or_else(|| format!("id-{first}"));
        let person = Person::new(id, self.name, email);
        match self.alias {
            Some(alias) => person.with_alias(alias),
            None => person,
        }
    }
}

/// Shorthand for `PersonBuilder::new(name).build()`.
pub fn person(name: &str) -> Person {
    PersonBuilder::new(name).build()
}

// ---------------------------------------------------------------------------
// Picker helpers
// ---------------------------------------------------------------------------

/// Records every list handed to the selection listener.
#[derive(Clone, Default)]
pub struct ListenerLog(Rc<RefCell<Vec<Vec<String>>>>);

impl ListenerLog {
    /// Emails of each notification, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.0.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }

    /// Attach this log as the builder's selection listener.
    pub fn attach(&self, builder: PickerBuilder) -> PickerBuilder {
        let sink = Rc::clone(&self.0);
        builder.on_selection_change(move |people| {
            sink.borrow_mut()
                .push(people.iter().map(|p| p.email.clone()).collect());
        })
    }
}

/// A picker with the usual defaults (300 ms, minimum length 3) searching
/// `search`, plus a listener log.
pub fn picker_with(search: impl PeopleSearch + 'static) -> (PickerController, ListenerLog) {
    let log = ListenerLog::default();
    let builder = PickerController::builder()
        .debounce_delay(Duration::from_millis(300))
        .min_search_length(3)
        .shared_search(Arc::new(search));
    (log.attach(builder).build(), log)
}
